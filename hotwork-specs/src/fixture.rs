//! Stage fixture format.
//!
//! A fixture is a TOML file describing one stage and what evaluating it
//! must produce. Every expectation is optional; only the listed ones are
//! checked.
//!
//! ```toml
//! title = "Welding over the sea"
//!
//! [stage]
//! id = "welding-over-sea"
//! work_type = "Trabalho a quente"
//! description = "Solda de guarda-corpo"
//! characteristics = "Sobre o mar"
//!
//! [stage.actual.epi_items]
//! respiratory = ["NÃO APLICÁVEL"]
//!
//! [expect]
//! flags = ["over_sea", "open_flame", "welding"]
//! apn1_yes = ["Q007", "Q008", "Q010"]
//! epi_radio = { Q001 = "Sim", Q003 = "Sim" }
//! divergence_in = { epi_items = "respiratory" }
//!
//! [[expect.divergence]]
//! kind = "extra"
//! key = "NÃO APLICÁVEL"
//!
//! [[expect.divergence]]
//! kind = "missing"
//! key = "PEÇA SEMI-FACIAL FILTRANTE 2"
//! ```

use std::collections::BTreeMap;

use hotwork_plan::{
    Answer, DivergenceCategory, DivergenceKind, EngineConfig, EpiCategory, EpiItemActions,
    QuestionCode, StageInput,
};
use serde::{Deserialize, Serialize};

use crate::errors::{SpecError, SpecResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageFixture {
    #[serde(default)]
    pub title: Option<String>,
    /// Overrides the harness configuration for this fixture.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub stage: StageInput,
    #[serde(default)]
    pub expect: Expectations,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expectations {
    pub skipped: Option<bool>,
    /// Exactly the flags that fire, by name.
    pub flags: Option<Vec<String>>,
    /// Listed EPI radios only.
    pub epi_radio: BTreeMap<QuestionCode, Answer>,
    /// Exact item set of each listed category.
    pub epi_items: BTreeMap<EpiCategory, Vec<String>>,
    /// Exactly the questionnaire codes answered `Sim`.
    pub questionnaire_yes: Option<Vec<QuestionCode>>,
    /// Exactly the APN-1 codes answered `Sim`.
    pub apn1_yes: Option<Vec<QuestionCode>>,
    /// Exact divergence items, in report order.
    pub divergence: Option<Vec<ExpectedDivergence>>,
    /// Restrict the `divergence` check to one category.
    pub divergence_in: Option<DivergenceCategory>,
    pub epi_actions: Option<EpiItemActions>,
}

impl Expectations {
    /// Whether any expectation needs an evaluated stage.
    pub fn needs_evaluation(&self) -> bool {
        self.flags.is_some()
            || !self.epi_radio.is_empty()
            || !self.epi_items.is_empty()
            || self.questionnaire_yes.is_some()
            || self.apn1_yes.is_some()
            || self.divergence.is_some()
            || self.epi_actions.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedDivergence {
    pub kind: DivergenceKind,
    pub key: String,
}

/// Parse fixture text. `path` names the source in errors.
pub fn parse_fixture(content: &str, path: &str) -> SpecResult<StageFixture> {
    toml::from_str(content).map_err(|e| SpecError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })
}
