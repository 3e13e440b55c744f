//! Configuration utility functions
//!
//! Helpers for reading `FREEZEFIX_*` overrides from the environment.
//! A variable that is unset or does not parse leaves the default in place.

use std::path::PathBuf;
use std::str::FromStr;

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => PathBuf::from(val),
        _ => default,
    }
}

/// Get a f64 value from an environment variable or use the default
pub fn get_env_f64(key: &str, default: f64) -> f64 {
    get_env_parsed(key).unwrap_or(default)
}

/// Get a i64 value from an environment variable or use the default
pub fn get_env_i64(key: &str, default: i64) -> i64 {
    get_env_parsed(key).unwrap_or(default)
}

/// Get an optional i64 value from an environment variable
pub fn get_env_opt_i64(key: &str) -> Option<i64> {
    get_env_parsed(key)
}

fn get_env_parsed<T: FromStr>(key: &str) -> Option<T> {
    let val = std::env::var(key).ok()?;
    match val.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring unparseable value for {}: {:?}", key, val);
            None
        }
    }
}
