//! Expected failures tracking via TOML file.
//!
//! ```toml
//! [[pending]]
//! fixture = "co2-with-flame.toml"
//! field = "questionnaire_yes"
//! reason = "sensor inhibition wording under review"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{SpecError, SpecResult};

/// Loaded expected failures configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known failures (won't fix soon).
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Pending failures (awaiting fix).
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

/// A single expected failure entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Fixture file name, relative to the fixtures directory.
    pub fixture: String,
    /// Expectation name as reported by the runner.
    pub field: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
}

/// Failure lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    Known,
    Pending,
    /// Expected to pass - failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file. A missing file means no expected failures.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SpecError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn is_expected(&self, fixture: &str, field: &str) -> FailureState {
        let matches = |entry: &&FailureEntry| entry.fixture == fixture && entry.field == field;
        if self.known.iter().any(|e| matches(&e)) {
            FailureState::Known
        } else if self.pending.iter().any(|e| matches(&e)) {
            FailureState::Pending
        } else {
            FailureState::Regression
        }
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }
}

/// Tally of a harness run.
#[derive(Debug, Clone, Default)]
pub struct HarnessResult {
    /// Fixtures that passed plus expectations that failed.
    pub total: usize,
    pub passed: usize,
    /// Expected failures (known + pending).
    pub expected_failures: usize,
    /// Unexpected failures.
    pub regressions: usize,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => self.expected_failures += 1,
            FailureState::Regression => self.regressions += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let failures = ExpectedFailures::load(&dir.path().join("expected-failures.toml")).unwrap();
        assert_eq!(failures.count(), 0);
        assert_eq!(
            failures.is_expected("welding.toml", "apn1_yes"),
            FailureState::Regression
        );
    }

    #[test]
    fn test_load_and_classify() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[known]]
fixture = "welding.toml"
field = "flags"

[[pending]]
fixture = "welding.toml"
field = "apn1_yes"
added = "2026-10-16"
"#
        )
        .unwrap();

        let failures = ExpectedFailures::load(file.path()).unwrap();
        assert_eq!(failures.count(), 2);
        assert_eq!(failures.is_expected("welding.toml", "flags"), FailureState::Known);
        assert_eq!(
            failures.is_expected("welding.toml", "apn1_yes"),
            FailureState::Pending
        );
        assert_eq!(
            failures.is_expected("over-sea.toml", "flags"),
            FailureState::Regression
        );
    }

    #[test]
    fn test_harness_tally() {
        let mut result = HarnessResult::new();
        result.record_pass();
        result.record_failure(FailureState::Pending);
        assert!(result.success());
        result.record_failure(FailureState::Regression);
        assert!(!result.success());
        assert_eq!(result.total, 3);
    }
}
