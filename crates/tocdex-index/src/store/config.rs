use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long to wait for a locked database.
///
/// Each statement waits up to `wait_per_attempt` for the lock (SQLite's busy
/// timeout). A statement that still fails because the database is busy or
/// locked is run again, up to `attempts` runs in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockRetryPolicy {
    /// Total runs of a statement before giving up. 0 behaves like 1.
    pub attempts: u32,
    /// Busy timeout per run, written in configuration as milliseconds.
    #[serde(rename = "wait_per_attempt_ms", with = "millis")]
    pub wait_per_attempt: Duration,
}

impl Default for LockRetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            wait_per_attempt: Duration::from_secs(1),
        }
    }
}

impl LockRetryPolicy {
    /// Fail on the first lock conflict, after waiting once.
    #[must_use]
    pub const fn no_retry(wait_per_attempt: Duration) -> Self {
        Self {
            attempts: 1,
            wait_per_attempt,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
