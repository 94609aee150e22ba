//! Environment composition for the child process.

use std::collections::HashMap;
use std::ffi::OsString;

/// Source of the base environment a child inherits.
pub trait EnvironmentSnapshot: Send + Sync {
    /// Take a copy of the current base environment.
    fn snapshot(&self) -> HashMap<OsString, OsString>;
}

/// Snapshot of the running process's environment.
///
/// Keys and values are copied as raw OS strings, so non-UTF-8 entries reach
/// the child unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentSnapshot for ProcessEnvironment {
    fn snapshot(&self) -> HashMap<OsString, OsString> {
        std::env::vars_os().collect()
    }
}

/// A fixed base environment.
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment {
    vars: HashMap<OsString, OsString>,
}

impl FixedEnvironment {
    /// Create a snapshot provider that always returns `vars`.
    pub fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvironmentSnapshot for FixedEnvironment {
    fn snapshot(&self) -> HashMap<OsString, OsString> {
        self.vars.clone()
    }
}

/// Merge overrides on top of a base environment.
///
/// Overrides replace inherited values key by key; nothing is removed.
pub fn compose_environment(
    mut base: HashMap<OsString, OsString>,
    overrides: Option<&HashMap<String, String>>,
) -> HashMap<OsString, OsString> {
    if let Some(overrides) = overrides {
        base.extend(
            overrides
                .iter()
                .map(|(k, v)| (OsString::from(k), OsString::from(v))),
        );
    }
    base
}
