//! Environment variable parsing utilities.
//!
//! Used to layer `COVERAGE_*` overrides on top of the built-in defaults without
//! repeating the `std::env::var(..).ok().and_then(..)` dance at every call site.
//!
//! # Example
//!
//! ```
//! use coverage_types::env_utils::{env_bool_or, env_var_or};
//!
//! let timeout_ms: u64 = env_var_or("COVERAGE_TIMEOUT_MS", 500);
//! let verbose = env_bool_or("COVERAGE_PRINT", true);
//! # let _ = (timeout_ms, verbose);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a boolean flag, falling back to `default` when unset.
///
/// "1", "true", "yes" and "on" (case-insensitive) are truthy; any other set
/// value is false.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}
