//! Environment access behind a trait so dispatch logic never reads
//! process-global state directly.

use std::collections::BTreeMap;
use std::ffi::OsString;

/// Source of environment variables
pub trait EnvSource: Send + Sync {
    /// Returns the raw value of `key`, if set and valid unicode
    fn var(&self, key: &str) -> Option<String>;

    /// Returns every variable, used to build a child's environment
    fn vars(&self) -> Vec<(OsString, OsString)>;

    /// Returns the trimmed value of `key` when it is non-empty
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Reports whether `key` is set to a non-empty value
    fn is_set(&self, key: &str) -> bool {
        self.non_empty(key).is_some()
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn vars(&self) -> Vec<(OsString, OsString)> {
        std::env::vars_os().collect()
    }
}

/// In-memory environment
///
/// Lets tests exercise override, offline, and re-entrancy paths without
/// mutating the process environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.vars.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.vars.remove(key);
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn vars(&self) -> Vec<(OsString, OsString)> {
        self.vars
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims_and_filters_blank() {
        let env = MapEnv::new()
            .with("A", "  1.2.3 \n")
            .with("B", "   ")
            .with("C", "");

        assert_eq!(env.non_empty("A").as_deref(), Some("1.2.3"));
        assert_eq!(env.non_empty("B"), None);
        assert_eq!(env.non_empty("C"), None);
        assert_eq!(env.non_empty("MISSING"), None);
    }

    #[test]
    fn test_is_set_requires_non_empty_value() {
        let mut env = MapEnv::new().with("AL_NO_NETWORK", "1");
        assert!(env.is_set("AL_NO_NETWORK"));

        env.set("AL_NO_NETWORK", "");
        assert!(!env.is_set("AL_NO_NETWORK"));

        env.remove("AL_NO_NETWORK");
        assert!(!env.is_set("AL_NO_NETWORK"));
    }

    #[test]
    fn test_vars_lists_everything() {
        let env = MapEnv::new().with("X", "1").with("Y", "2");
        let vars = env.vars();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&(OsString::from("X"), OsString::from("1"))));
    }
}
