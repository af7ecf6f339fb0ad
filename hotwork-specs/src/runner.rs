//! Fixture runner: evaluate the stage, then check expectations.

use std::collections::BTreeSet;

use hotwork_plan::{evaluate_stage, normalize_item, EngineConfig, StageEvaluation, StageResult};

use crate::errors::{SpecError, SpecResult};
use crate::failures::{ExpectedFailures, FailureState, HarnessResult};
use crate::fixture::{Expectations, StageFixture};
use crate::formatter::format_failure;

/// One expectation that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Expectation name, e.g. `apn1_yes` or `epi_radio.Q006`.
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl Mismatch {
    fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Evaluate the fixture stage. The fixture's own config wins over `config`.
pub fn run_fixture(fixture: &StageFixture, config: &EngineConfig) -> StageResult {
    let config = fixture.config.as_ref().unwrap_or(config);
    StageResult {
        stage_id: fixture.stage.id.clone(),
        outcome: evaluate_stage(&fixture.stage, config),
    }
}

fn joined<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compare a result against the fixture expectations.
pub fn check_fixture(fixture: &StageFixture, result: &StageResult) -> Vec<Mismatch> {
    let expect = &fixture.expect;
    let mut mismatches = Vec::new();

    let skipped = result.outcome.is_skipped();
    if let Some(expected) = expect.skipped {
        if expected != skipped {
            mismatches.push(Mismatch::new("skipped", expected.to_string(), skipped.to_string()));
        }
    }

    match result.outcome.evaluation() {
        Some(evaluation) => check_evaluation(expect, evaluation, &mut mismatches),
        None if expect.needs_evaluation() => {
            mismatches.push(Mismatch::new("outcome", "evaluated", "skipped"));
        }
        None => {}
    }

    mismatches
}

fn check_evaluation(expect: &Expectations, evaluation: &StageEvaluation, out: &mut Vec<Mismatch>) {
    let plan = &evaluation.plan;

    if let Some(flags) = &expect.flags {
        let expected: BTreeSet<&str> = flags.iter().map(String::as_str).collect();
        let actual: BTreeSet<&str> = plan.context().active_flags().map(|f| f.name()).collect();
        if expected != actual {
            out.push(Mismatch::new("flags", joined(expected), joined(actual)));
        }
    }

    for (code, expected) in &expect.epi_radio {
        let actual = plan.epi_radio_answer(*code);
        if actual != Some(*expected) {
            out.push(Mismatch::new(
                format!("epi_radio.{}", code),
                expected.label(),
                actual.map_or("-", |a| a.label()),
            ));
        }
    }

    for (category, expected) in &expect.epi_items {
        let wanted: BTreeSet<String> = expected.iter().map(|i| normalize_item(i)).collect();
        let planned = plan.epi_items().get(*category);
        let found: BTreeSet<String> = planned.iter().map(|i| normalize_item(i)).collect();
        if wanted != found {
            out.push(Mismatch::new(
                format!("epi_items.{}", category),
                joined(expected),
                joined(planned),
            ));
        }
    }

    if let Some(expected) = &expect.questionnaire_yes {
        let expected: BTreeSet<_> = expected.iter().copied().collect();
        let actual: BTreeSet<_> = plan
            .questionnaire()
            .iter()
            .filter(|entry| entry.answer.is_yes())
            .map(|entry| entry.code)
            .collect();
        if expected != actual {
            out.push(Mismatch::new("questionnaire_yes", joined(expected), joined(actual)));
        }
    }

    if let Some(expected) = &expect.apn1_yes {
        let expected: BTreeSet<_> = expected.iter().copied().collect();
        let actual: BTreeSet<_> = plan
            .apn1()
            .iter()
            .filter(|(_, answer)| answer.is_yes())
            .map(|(code, _)| *code)
            .collect();
        if expected != actual {
            out.push(Mismatch::new("apn1_yes", joined(expected), joined(actual)));
        }
    }

    if let Some(expected) = &expect.divergence {
        let expected: Vec<String> = expected
            .iter()
            .map(|d| format!("{} {}", d.kind, d.key))
            .collect();
        match &evaluation.divergence {
            Some(report) => {
                let actual: Vec<String> = report
                    .iter()
                    .filter(|item| expect.divergence_in.map_or(true, |c| item.category == c))
                    .map(|item| format!("{} {}", item.kind, item.key))
                    .collect();
                if expected != actual {
                    out.push(Mismatch::new("divergence", joined(expected), joined(actual)));
                }
            }
            None => out.push(Mismatch::new(
                "divergence",
                joined(expected),
                "no recorded answers",
            )),
        }
    }

    if let Some(expected) = &expect.epi_actions {
        let actual = evaluation.epi_actions.clone().unwrap_or_default();
        if *expected != actual {
            out.push(Mismatch::new(
                "epi_actions",
                format!("{:?}", expected),
                format!("{:?}", actual),
            ));
        }
    }
}

/// Run one fixture and require every expectation to hold.
///
/// A failing fixture becomes [`SpecError::Assertion`] carrying the formatted
/// failure.
pub fn assert_fixture(
    name: &str,
    fixture: &StageFixture,
    config: &EngineConfig,
) -> SpecResult<StageResult> {
    let result = run_fixture(fixture, config);
    let mismatches = check_fixture(fixture, &result);
    if mismatches.is_empty() {
        Ok(result)
    } else {
        Err(SpecError::Assertion {
            message: format_failure(name, fixture, &result, &mismatches),
        })
    }
}

/// Run every fixture and tally the outcome against the expected failures.
///
/// Returns the tally and the failure messages of regressions.
pub fn run_fixtures(
    fixtures: &[(String, StageFixture)],
    config: &EngineConfig,
    failures: &ExpectedFailures,
) -> (HarnessResult, Vec<String>) {
    let mut harness = HarnessResult::new();
    let mut messages = Vec::new();

    for (name, fixture) in fixtures {
        let result = run_fixture(fixture, config);
        let mismatches = check_fixture(fixture, &result);
        if mismatches.is_empty() {
            harness.record_pass();
            continue;
        }

        let mut regressions = Vec::new();
        for mismatch in &mismatches {
            let state = failures.is_expected(name, &mismatch.field);
            harness.record_failure(state);
            if state == FailureState::Regression {
                regressions.push(mismatch.clone());
            }
        }
        if !regressions.is_empty() {
            messages.push(format_failure(name, fixture, &result, &regressions));
        }
    }

    tracing::debug!(
        total = harness.total,
        passed = harness.passed,
        regressions = harness.regressions,
        "ran fixtures"
    );

    (harness, messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_fixture;

    #[test]
    fn reports_flag_mismatch() {
        let fixture = parse_fixture(
            r#"
            [stage]
            id = "s1"
            description = "Solda"

            [expect]
            flags = ["welding"]
            "#,
            "inline",
        )
        .unwrap();
        let result = run_fixture(&fixture, &EngineConfig::default());
        let mismatches = check_fixture(&fixture, &result);
        assert_eq!(
            mismatches,
            vec![Mismatch::new("flags", "welding", "open_flame, welding")]
        );
    }

    #[test]
    fn assert_fixture_reports_assertion_error() {
        let fixture = parse_fixture(
            r#"
            [stage]
            id = "s1"
            description = "Solda"

            [expect]
            apn1_yes = ["Q010"]
            "#,
            "inline",
        )
        .unwrap();
        let config = EngineConfig::default();
        assert!(assert_fixture("welding.toml", &fixture, &config).is_ok());

        let mut failing = fixture.clone();
        failing.expect.apn1_yes = Some(Vec::new());
        let err = assert_fixture("welding.toml", &failing, &config).unwrap_err();
        assert!(matches!(err, SpecError::Assertion { .. }));
        let message = err.to_string();
        assert!(message.contains("FAIL: welding.toml"));
        assert!(message.contains("apn1_yes"));
    }

    #[test]
    fn skipped_stage_fails_plan_expectations() {
        let fixture = parse_fixture(
            r#"
            [stage]
            id = "s1"
            work_type = "Trabalho a frio"

            [expect]
            apn1_yes = []
            "#,
            "inline",
        )
        .unwrap();
        let result = run_fixture(&fixture, &EngineConfig::default());
        let mismatches = check_fixture(&fixture, &result);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].field, "outcome");
    }

    #[test]
    fn fixture_config_overrides_harness_config() {
        let fixture = parse_fixture(
            r#"
            [config]
            skip_non_hot_work = false

            [stage]
            id = "s1"
            work_type = "Trabalho a frio"

            [expect]
            skipped = false
            "#,
            "inline",
        )
        .unwrap();
        let result = run_fixture(&fixture, &EngineConfig::default());
        assert!(check_fixture(&fixture, &result).is_empty());
    }
}
