#![doc(
    html_logo_url = "https://raw.githubusercontent.com/hotwork/hotwork-plan/main/assets/hotwork-plan.svg",
    issue_tracker_base_url = "https://github.com/hotwork/hotwork-plan/issues/"
)]

//! Fixture-driven testing infrastructure for hotwork-plan.
//!
//! Test cases are stages described declaratively in `.toml` fixture files:
//! the stage text, optionally the answers already recorded on its forms, and
//! the plan and divergence the engine must produce.
//!
//! ## Modules
//!
//! - [`fixture`] - Fixture format and parsing
//! - [`loader`] - Fixture file loading
//! - [`runner`] - Evaluates fixtures and checks expectations
//! - [`errors`] - Error types for the spec system
//! - [`formatter`] - Failure output with the produced divergence
//! - [`failures`] - Expected failures tracking via TOML

pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod runner;

pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{parse_fixture, ExpectedDivergence, Expectations, StageFixture};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use runner::{assert_fixture, check_fixture, run_fixture, run_fixtures, Mismatch};
