//! Common utilities for tocdex.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated diagnostics routed through `log`
//! - **Networking** - blocking HTTP client that never follows redirects
//! - **URL helpers** - href resolution and version normalization

pub mod net;
pub mod url;
pub mod warning;

pub use net::{FetchError, HttpClient};
