//! Divergence detection between a [`Plan`] and recorded answers.
//!
//! Every form family is compared independently. Keys present on one side
//! only become `missing` (plan only) or `extra` (recorded only); keys present
//! on both sides are compared by value. APN-1 is compared directionally: only
//! disagreements about `Yes` are reported.
//!
//! Nothing here is a fault. Unknown codes, stray items and inconsistent
//! snapshots all surface as ordinary report items.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::{Answer, QuestionCode};
use crate::base_table::EpiCategory;
use crate::normalize::normalize_item;
use crate::plan::{Plan, QuestionKey, QuestionnaireAnswer};

// ============================================================================
// Recorded answers
// ============================================================================

/// Snapshot of what was actually recorded on the forms of one stage.
///
/// Uses the same key scheme as [`Plan`]. Any family may be left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualAnswers {
    pub epi_radio: BTreeMap<QuestionCode, Answer>,
    pub epi_items: BTreeMap<EpiCategory, Vec<String>>,
    pub questionnaire: Vec<QuestionnaireAnswer>,
    pub apn1: BTreeMap<QuestionCode, Answer>,
    pub environmental: BTreeMap<QuestionCode, Answer>,
}

impl ActualAnswers {
    /// A snapshot that agrees with `plan` everywhere.
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            epi_radio: plan.epi_radio().clone(),
            epi_items: plan
                .epi_items()
                .iter()
                .map(|(category, items)| (category, items.to_vec()))
                .collect(),
            questionnaire: plan.questionnaire().to_vec(),
            apn1: plan.apn1().clone(),
            environmental: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Report items
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceKind {
    /// Expected by the plan, not recorded.
    Missing,
    /// Recorded, not in the plan.
    Extra,
    /// Recorded with a different value.
    Diff,
    /// APN-1 recorded `Yes` where the plan does not expect it.
    UnexpectedYes,
    /// APN-1 plan expects `Yes`, recorded something else.
    MissingYes,
}

impl DivergenceKind {
    pub fn name(self) -> &'static str {
        match self {
            DivergenceKind::Missing => "missing",
            DivergenceKind::Extra => "extra",
            DivergenceKind::Diff => "diff",
            DivergenceKind::UnexpectedYes => "unexpected_yes",
            DivergenceKind::MissingYes => "missing_yes",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DivergenceKind::Missing | DivergenceKind::MissingYes => Severity::Primary,
            DivergenceKind::Extra | DivergenceKind::Diff | DivergenceKind::UnexpectedYes => {
                Severity::Secondary
            }
        }
    }
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something expected that was not done is primary; everything else is
/// secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Primary,
    Secondary,
}

/// The form family (and EPI item category) an item belongs to.
///
/// Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceCategory {
    EpiRadio,
    EpiItems(EpiCategory),
    Questionnaire,
    Apn1,
    Environmental,
}

impl fmt::Display for DivergenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceCategory::EpiRadio => f.write_str("EPI"),
            DivergenceCategory::EpiItems(category) => write!(f, "EPI/{}", category),
            DivergenceCategory::Questionnaire => f.write_str("Questionário PT"),
            DivergenceCategory::Apn1 => f.write_str("APN-1"),
            DivergenceCategory::Environmental => f.write_str("Análise Ambiental"),
        }
    }
}

/// One discrepancy. `expected` is `None` only for `extra` items, `actual`
/// is `None` only for `missing` items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergenceItem {
    pub category: DivergenceCategory,
    pub key: String,
    pub kind: DivergenceKind,
    pub actual: Option<String>,
    pub expected: Option<String>,
}

impl DivergenceItem {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// All discrepancies of one stage, ordered by category then key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DivergenceReport {
    items: Vec<DivergenceItem>,
}

impl DivergenceReport {
    pub fn items(&self) -> &[DivergenceItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DivergenceItem> {
        self.items.iter()
    }

    pub fn primary_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.severity() == Severity::Primary)
            .count()
    }

    pub fn in_category(
        &self,
        category: DivergenceCategory,
    ) -> impl Iterator<Item = &DivergenceItem> + '_ {
        self.items.iter().filter(move |item| item.category == category)
    }

    /// The items covered by `view`, order kept.
    pub fn restricted_to(&self, view: DivergenceView) -> DivergenceReport {
        DivergenceReport {
            items: self
                .items
                .iter()
                .filter(|item| view.covers(item.category))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DivergenceReport {
    type Item = &'a DivergenceItem;
    type IntoIter = std::slice::Iter<'a, DivergenceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// Detection
// ============================================================================

fn answer_label(answer: Answer) -> Option<String> {
    Some(answer.label().to_string())
}

/// Plain comparison: any difference in value is a `diff`.
fn plain(expected: Answer, actual: Answer) -> Option<DivergenceKind> {
    (expected != actual).then_some(DivergenceKind::Diff)
}

/// APN-1 comparison: only disagreements about `Yes` count.
fn directional(expected: Answer, actual: Answer) -> Option<DivergenceKind> {
    match (expected.is_yes(), actual.is_yes()) {
        (false, true) => Some(DivergenceKind::UnexpectedYes),
        (true, false) => Some(DivergenceKind::MissingYes),
        _ => None,
    }
}

fn diff_answers<K: Ord + fmt::Display>(
    category: DivergenceCategory,
    expected: &BTreeMap<K, Answer>,
    actual: &BTreeMap<K, Answer>,
    compare: fn(Answer, Answer) -> Option<DivergenceKind>,
    out: &mut Vec<DivergenceItem>,
) {
    let keys: BTreeSet<&K> = expected.keys().chain(actual.keys()).collect();
    for key in keys {
        let (expected, actual) = (expected.get(key).copied(), actual.get(key).copied());
        let kind = match (expected, actual) {
            (Some(_), None) => Some(DivergenceKind::Missing),
            (None, Some(_)) => Some(DivergenceKind::Extra),
            (Some(expected), Some(actual)) => compare(expected, actual),
            (None, None) => None,
        };
        if let Some(kind) = kind {
            out.push(DivergenceItem {
                category,
                key: key.to_string(),
                kind,
                actual: actual.and_then(answer_label),
                expected: expected.and_then(answer_label),
            });
        }
    }
}

fn questionnaire_map(entries: &[QuestionnaireAnswer]) -> BTreeMap<QuestionKey, Answer> {
    entries
        .iter()
        .map(|entry| (entry.key(), entry.answer))
        .collect()
}

fn item_map(items: &[String]) -> BTreeMap<String, &str> {
    items
        .iter()
        .map(|item| (normalize_item(item), item.as_str()))
        .collect()
}

fn diff_items(
    category: EpiCategory,
    expected: &[String],
    actual: &[String],
    out: &mut Vec<DivergenceItem>,
) {
    let (expected, actual) = (item_map(expected), item_map(actual));
    let keys: BTreeSet<&String> = expected.keys().chain(actual.keys()).collect();
    for key in keys {
        let item = match (expected.get(key), actual.get(key)) {
            (Some(name), None) => DivergenceItem {
                category: DivergenceCategory::EpiItems(category),
                key: name.to_string(),
                kind: DivergenceKind::Missing,
                actual: None,
                expected: Some(name.to_string()),
            },
            (None, Some(name)) => DivergenceItem {
                category: DivergenceCategory::EpiItems(category),
                key: name.to_string(),
                kind: DivergenceKind::Extra,
                actual: Some(name.to_string()),
                expected: None,
            },
            _ => continue,
        };
        out.push(item);
    }
}

/// Compare a plan against recorded answers.
///
/// `diff(plan, &ActualAnswers::from_plan(plan))` is always empty.
pub fn diff(plan: &Plan, actual: &ActualAnswers) -> DivergenceReport {
    let mut items = Vec::new();

    diff_answers(
        DivergenceCategory::EpiRadio,
        plan.epi_radio(),
        &actual.epi_radio,
        plain,
        &mut items,
    );

    for category in EpiCategory::ALL {
        let recorded = actual
            .epi_items
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        diff_items(category, plan.epi_items().get(category), recorded, &mut items);
    }

    diff_answers(
        DivergenceCategory::Questionnaire,
        &questionnaire_map(plan.questionnaire()),
        &questionnaire_map(&actual.questionnaire),
        plain,
        &mut items,
    );

    diff_answers(
        DivergenceCategory::Apn1,
        plan.apn1(),
        &actual.apn1,
        directional,
        &mut items,
    );

    let expected = plan.environmental_expected();
    for (code, answer) in &actual.environmental {
        if *answer != expected {
            items.push(DivergenceItem {
                category: DivergenceCategory::Environmental,
                key: code.to_string(),
                kind: DivergenceKind::Diff,
                actual: answer_label(*answer),
                expected: answer_label(expected),
            });
        }
    }

    let report = DivergenceReport { items };
    tracing::debug!(
        items = report.len(),
        primary = report.primary_count(),
        "detected divergence"
    );
    report
}

// ============================================================================
// Stage-level views
// ============================================================================

/// The three places divergences are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceView {
    /// EPI radios, EPI items and Questionnaire-PT.
    EpiAndQuestionnaire,
    Apn1,
    Environmental,
}

impl DivergenceView {
    pub const ALL: [DivergenceView; 3] = [
        DivergenceView::EpiAndQuestionnaire,
        DivergenceView::Apn1,
        DivergenceView::Environmental,
    ];

    pub fn covers(self, category: DivergenceCategory) -> bool {
        match self {
            DivergenceView::EpiAndQuestionnaire => matches!(
                category,
                DivergenceCategory::EpiRadio
                    | DivergenceCategory::EpiItems(_)
                    | DivergenceCategory::Questionnaire
            ),
            DivergenceView::Apn1 => category == DivergenceCategory::Apn1,
            DivergenceView::Environmental => category == DivergenceCategory::Environmental,
        }
    }
}

/// The divergence report of one stage, tagged by stage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDivergence {
    pub stage_id: String,
    pub report: DivergenceReport,
}

/// Select the stages that belong in `view`, each restricted to the items
/// the view covers. Stages with nothing to show are left out.
pub fn surface(view: DivergenceView, stages: &[StageDivergence]) -> Vec<StageDivergence> {
    stages
        .iter()
        .filter_map(|stage| {
            let report = stage.report.restricted_to(view);
            (!report.is_empty()).then(|| StageDivergence {
                stage_id: stage.stage_id.clone(),
                report,
            })
        })
        .collect()
}
