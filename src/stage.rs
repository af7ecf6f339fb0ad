//! Stage evaluation.
//!
//! A stage is one work step of a permit: its work type, two free-text
//! fields and, optionally, the answers already recorded on its forms.
//! Evaluating it yields a plan and, when answers are supplied, the divergence
//! report and EPI item actions.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::context::extract_context;
use crate::divergence::{diff, ActualAnswers, DivergenceReport, StageDivergence};
use crate::normalize::normalize;
use crate::plan::{build_plan, Plan};
use crate::reconcile::{plan_epi_actions, EpiItemActions};

const HOT_WORK: &str = "TRABALHO A QUENTE";

/// Whether a work type label denotes hot work.
pub fn is_hot_work(work_type: &str) -> bool {
    normalize(work_type).contains(HOT_WORK)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInput {
    pub id: String,
    /// Work type label; `None` when the host did not say.
    #[serde(default)]
    pub work_type: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub characteristics: String,
    #[serde(default)]
    pub actual: Option<ActualAnswers>,
}

impl StageInput {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        characteristics: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            characteristics: characteristics.into(),
            ..Self::default()
        }
    }

    pub fn with_work_type(mut self, work_type: impl Into<String>) -> Self {
        self.work_type = Some(work_type.into());
        self
    }

    pub fn with_actual(mut self, actual: ActualAnswers) -> Self {
        self.actual = Some(actual);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvaluation {
    pub plan: Plan,
    /// Present when recorded answers were supplied.
    pub divergence: Option<DivergenceReport>,
    pub epi_actions: Option<EpiItemActions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Work type is known and is not hot work.
    Skipped { work_type: String },
    Evaluated(StageEvaluation),
}

impl StageOutcome {
    pub fn evaluation(&self) -> Option<&StageEvaluation> {
        match self {
            StageOutcome::Evaluated(evaluation) => Some(evaluation),
            StageOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped { .. })
    }
}

/// The outcome of one stage, tagged with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage_id: String,
    pub outcome: StageOutcome,
}

impl StageResult {
    /// The divergence report of an evaluated stage, ready for view surfacing.
    pub fn divergence(&self) -> Option<StageDivergence> {
        let report = self.outcome.evaluation()?.divergence.clone()?;
        Some(StageDivergence {
            stage_id: self.stage_id.clone(),
            report,
        })
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(stage = %input.id))]
pub fn evaluate_stage(input: &StageInput, config: &EngineConfig) -> StageOutcome {
    if config.skip_non_hot_work {
        if let Some(work_type) = input.work_type.as_deref() {
            if !is_hot_work(work_type) {
                tracing::debug!(work_type, "skipping stage that is not hot work");
                return StageOutcome::Skipped {
                    work_type: work_type.to_string(),
                };
            }
        }
    }

    let context = extract_context(&input.description, &input.characteristics);
    let plan = build_plan(&context);
    let (divergence, epi_actions) = match &input.actual {
        Some(actual) => (
            Some(diff(&plan, actual)),
            Some(plan_epi_actions(&plan, actual, config)),
        ),
        None => (None, None),
    };

    StageOutcome::Evaluated(StageEvaluation {
        plan,
        divergence,
        epi_actions,
    })
}

/// Evaluate every stage. Results keep input order.
pub fn evaluate_stages(inputs: &[StageInput], config: &EngineConfig) -> Vec<StageResult> {
    tracing::debug!(stages = inputs.len(), parallel = config.parallel, "evaluating stages");

    let evaluate = |input: &StageInput| StageResult {
        stage_id: input.id.clone(),
        outcome: evaluate_stage(input, config),
    };

    if config.parallel {
        inputs.par_iter().map(evaluate).collect()
    } else {
        inputs.iter().map(evaluate).collect()
    }
}
