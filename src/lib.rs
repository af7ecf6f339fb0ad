#![doc(
    html_logo_url = "https://raw.githubusercontent.com/hotwork/hotwork-plan/main/assets/hotwork-plan.svg",
    issue_tracker_base_url = "https://github.com/hotwork/hotwork-plan/issues/"
)]

//! Deterministic keyword-driven planning for hot-work safety forms.
//!
//! Given the free-text description and declared characteristics of a work
//! stage, this crate derives a situation [`Context`], builds the expected
//! answers of every form family as a [`Plan`], and compares a plan against
//! the answers actually recorded to produce a [`DivergenceReport`].
//!
//! ## Pipeline
//!
//! - [`normalize`] - Upper-case, accent-free, whitespace-collapsed text
//! - [`extract_context`] - Flags from a declarative trigger table
//! - [`build_plan`] - EPI radios, EPI items, Questionnaire-PT, APN-1 and
//!   Environmental-Analysis answers
//! - [`diff`] - Divergences between a plan and [`ActualAnswers`]
//! - [`surface`] - Stage-level views over divergence reports
//!
//! ## Stage Processing
//!
//! - [`evaluate_stage`] / [`evaluate_stages`] - Skip non hot-work stages,
//!   plan, diff and reconcile, in parallel for batches
//! - [`plan_epi_actions`] - EPI items to add and, when enabled, to remove
//! - [`resolve_apn1_prompt`] - Answer APN-1 questions by prompt text
//!
//! ## Example
//!
//! ```
//! use hotwork_plan::{build_plan, extract_context, Answer, QuestionCode};
//!
//! let ctx = extract_context("Troca de válvula", "Acesso por cordas");
//! let plan = build_plan(&ctx);
//! assert_eq!(plan.apn1_answer(QuestionCode::new(7)), Some(Answer::Yes));
//! ```

mod answer;
mod apn1_prompt;
pub mod base_table;
mod config;
mod context;
mod display;
mod divergence;
mod errors;
mod normalize;
mod plan;
mod reconcile;
mod stage;

pub use answer::{Answer, QuestionCode};
pub use apn1_prompt::{resolve_apn1_prompt, topic_for_prompt, Apn1Topic, APN1_TOPICS};
pub use base_table::{EpiCategory, RadioQuestion};
pub use config::EngineConfig;
pub use context::{extract_context, Context, Flag, FlagRule, Trigger, FLAG_RULES};
pub use display::{PlanDisplay, PlanSection, ReportDisplay};
pub use divergence::{
    diff, surface, ActualAnswers, DivergenceCategory, DivergenceItem, DivergenceKind,
    DivergenceReport, DivergenceView, Severity, StageDivergence,
};
pub use errors::{ConfigError, ConfigResult};
pub use normalize::{normalize, normalize_item, NormalizedText};
pub use plan::{
    build_plan, AnswerRule, Condition, ItemTable, Plan, QuestionKey, QuestionnaireAnswer,
    APN1_RULES, EPI_RADIO_RULES, QUESTIONNAIRE_RULES,
};
pub use reconcile::{plan_epi_actions, EpiItemActions};
pub use stage::{
    evaluate_stage, evaluate_stages, is_hot_work, StageEvaluation, StageInput, StageOutcome,
    StageResult,
};
