#![forbid(unsafe_code)]

//! Per-run state shared by rule configuration
//!
//! A session lives as long as one unit's run. It replaces process-global
//! "warn once" flags: each distinct warning key is logged at most once per
//! session, and parallel units never share a session.

use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct Session {
    warned: BTreeSet<String>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Logs a deprecation warning the first time `key` is seen
    ///
    /// Returns true when the warning was emitted.
    pub fn warn_once(&mut self, key: &str, message: &str) -> bool {
        if !self.warned.insert(key.to_string()) {
            return false;
        }
        tracing::warn!(key, "{message}");
        true
    }

    /// Warning keys emitted so far, sorted
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.warned.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_per_key() {
        let mut session = Session::new();
        assert!(session.warn_once("eol-last/unix", "deprecated"));
        assert!(!session.warn_once("eol-last/unix", "deprecated"));
        assert!(session.warn_once("eol-last/windows", "deprecated"));
        assert_eq!(
            session.warnings().collect::<Vec<_>>(),
            vec!["eol-last/unix", "eol-last/windows"]
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = Session::new();
        let mut second = Session::new();
        assert!(first.warn_once("k", "m"));
        assert!(second.warn_once("k", "m"));
    }
}
