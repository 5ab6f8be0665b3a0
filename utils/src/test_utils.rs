//! Per-thread stand-ins for environment variable access.
//!
//! Tests run in parallel threads, so mutating the real process
//! environment would leak between them. Modules that read env vars
//! swap `get_env_var` for this one under `#[cfg(test)]`.

use std::{cell::RefCell, collections::HashMap};

use miette::{miette, Result};

thread_local! {
    static ENV_VARS: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

/// Test harness function for getting env variables.
///
/// # Errors
/// Will error if the env variable wasn't set on this thread.
pub fn get_env_var<S>(key: S) -> Result<String>
where
    S: AsRef<str>,
{
    let key = key.as_ref();
    ENV_VARS
        .with_borrow(|vars| vars.get(key).cloned())
        .ok_or_else(|| miette!("Failed to retrieve env var '{key}'"))
}

/// Test harness function for checking env variables.
#[must_use]
pub fn has_env_var<S>(key: S) -> bool
where
    S: AsRef<str>,
{
    get_env_var(key).is_ok_and(|v| !v.is_empty())
}

pub fn set_env_var<S, T>(key: S, value: T)
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    ENV_VARS.with_borrow_mut(|vars| {
        vars.insert(key.as_ref().to_owned(), value.as_ref().to_owned());
    });
}

pub fn remove_env_var<S>(key: S)
where
    S: AsRef<str>,
{
    ENV_VARS.with_borrow_mut(|vars| {
        vars.remove(key.as_ref());
    });
}
