//! Deduplicated warnings.
//!
//! The tokenizer and scanner can hit the same recoverable problem hundreds of
//! times on one page (a stray NUL, an unknown entity). Each distinct message
//! is logged once per component until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already logged (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Log a warning through `log::warn!`, once per unique `(component, message)`.
///
/// # Example
/// ```ignore
/// warn_once("HTML Tokenizer", "unexpected-null-character");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if first_occurrence(&format!("[{component}] {message}")) {
        log::warn!(target: "tocdex", "[{component}] {message}");
    }
}

/// Clear all recorded warnings (call when starting a new page)
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Record `key`, returning true if it had not been seen since the last clear.
fn first_occurrence(key: &str) -> bool {
    // A poisoned set only means another thread panicked mid-insert; the
    // contents are still a valid set of strings.
    WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_suppressed_until_cleared() {
        let key = "[Test] warning-module-test: repeated message";
        assert!(first_occurrence(key));
        assert!(!first_occurrence(key));
        assert!(first_occurrence("[Other] warning-module-test: repeated message"));

        warn_once("Test", "warning-module-test: logged once");
        assert!(!first_occurrence("[Test] warning-module-test: logged once"));

        clear_warnings();
        assert!(first_occurrence(key));
    }
}
