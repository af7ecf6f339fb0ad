//! Failure formatting for fixture runs.

use crate::fixture::StageFixture;
use crate::runner::Mismatch;
use hotwork_plan::{ReportDisplay, StageResult};
use std::fmt::Write;

/// Format a failed fixture with its stage text and the divergence it produced.
pub fn format_failure(
    fixture_name: &str,
    fixture: &StageFixture,
    result: &StageResult,
    mismatches: &[Mismatch],
) -> String {
    let mut output = String::new();

    writeln!(output, "\nFAIL: {}", fixture_name).unwrap();
    if let Some(title) = &fixture.title {
        writeln!(output, "  {}", title).unwrap();
    }
    writeln!(output).unwrap();

    writeln!(output, "  description:     {}", fixture.stage.description).unwrap();
    writeln!(output, "  characteristics: {}", fixture.stage.characteristics).unwrap();
    writeln!(output).unwrap();

    for mismatch in mismatches {
        writeln!(
            output,
            "    \u{2717} {}: expected `{}`, found `{}`",
            mismatch.field, mismatch.expected, mismatch.actual
        )
        .unwrap();
    }

    if let Some(report) = result
        .outcome
        .evaluation()
        .and_then(|evaluation| evaluation.divergence.as_ref())
    {
        writeln!(output).unwrap();
        writeln!(output, "  divergence:").unwrap();
        for line in ReportDisplay::new(report).to_string().lines() {
            writeln!(output, "    {}", line).unwrap();
        }
    }

    // Full outcome for copy-pasting into a fixture.
    let outcome = serde_json::to_string_pretty(&result.outcome)
        .unwrap_or_else(|e| format!("<unserializable outcome: {}>", e));
    writeln!(output).unwrap();
    writeln!(output, "  outcome:").unwrap();
    for line in outcome.lines() {
        writeln!(output, "    {}", line).unwrap();
    }

    output
}

/// Format a summary of a harness run.
pub fn format_summary(
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let mut output = String::new();

    let status = if regressions > 0 { "FAIL" } else { "PASS" };

    writeln!(output, "\n{}: stage fixtures", status).unwrap();
    writeln!(
        output,
        "  {} passed, {} failed ({} expected, {} regressions)",
        passed, failed, expected_failures, regressions
    )
    .unwrap();

    output
}
