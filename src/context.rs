//! Situation context extraction.
//!
//! A [`Context`] is the set of situation flags that fire for one stage. Each
//! flag is defined by a row of [`FLAG_RULES`]: a list of triggers matched
//! against the combined normalized description and characteristics. A flag is
//! set iff at least one of its triggers matches; flags never influence each
//! other. Composite views (flame class, eye hazard, ...) are methods on
//! [`Context`] and conjunctions are left to the plan builder.
//!
//! ## Example
//!
//! ```
//! use hotwork_plan::{extract_context, Flag};
//!
//! let ctx = extract_context("Solda de suporte", "Acesso por cordas");
//! assert!(ctx.is_set(Flag::Welding));
//! assert!(ctx.is_set(Flag::RopeAccess));
//! assert!(ctx.eye_hazard());
//! ```

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, NormalizedText};

/// Primitive situation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    ConfinedSpace,
    Height,
    RopeAccess,
    OverSea,
    /// Open flame or any flame-producing tool (grinder, oxy-cutting, welding).
    OpenFlame,
    OxyCutting,
    /// "SOLDA" as a whole word.
    Welding,
    Co2ProtectedEnvironment,
    MechanicalTreatment,
    NeedleGun,
    PneumaticSander,
    /// Any sander, pneumatic or not.
    Sander,
    PneumaticTool,
    ElectricalWork,
    /// "CORTE" as a whole word, oxy-cutting excluded.
    Cutting,
    SabreSaw,
    PressurizedEquipment,
    Hydroblast,
    MovingParts,
}

impl Flag {
    pub const ALL: [Flag; 19] = [
        Flag::ConfinedSpace,
        Flag::Height,
        Flag::RopeAccess,
        Flag::OverSea,
        Flag::OpenFlame,
        Flag::OxyCutting,
        Flag::Welding,
        Flag::Co2ProtectedEnvironment,
        Flag::MechanicalTreatment,
        Flag::NeedleGun,
        Flag::PneumaticSander,
        Flag::Sander,
        Flag::PneumaticTool,
        Flag::ElectricalWork,
        Flag::Cutting,
        Flag::SabreSaw,
        Flag::PressurizedEquipment,
        Flag::Hydroblast,
        Flag::MovingParts,
    ];

    /// Stable snake_case name, as used in fixtures and logs.
    pub fn name(self) -> &'static str {
        match self {
            Flag::ConfinedSpace => "confined_space",
            Flag::Height => "height",
            Flag::RopeAccess => "rope_access",
            Flag::OverSea => "over_sea",
            Flag::OpenFlame => "open_flame",
            Flag::OxyCutting => "oxy_cutting",
            Flag::Welding => "welding",
            Flag::Co2ProtectedEnvironment => "co2_protected_environment",
            Flag::MechanicalTreatment => "mechanical_treatment",
            Flag::NeedleGun => "needle_gun",
            Flag::PneumaticSander => "pneumatic_sander",
            Flag::Sander => "sander",
            Flag::PneumaticTool => "pneumatic_tool",
            Flag::ElectricalWork => "electrical_work",
            Flag::Cutting => "cutting",
            Flag::SabreSaw => "sabre_saw",
            Flag::PressurizedEquipment => "pressurized_equipment",
            Flag::Hydroblast => "hydroblast",
            Flag::MovingParts => "moving_parts",
        }
    }

    pub fn from_name(name: &str) -> Option<Flag> {
        Flag::ALL.iter().copied().find(|flag| flag.name() == name)
    }

    /// The rule row defining this flag. Rows follow declaration order.
    pub fn rule(self) -> &'static FlagRule {
        &FLAG_RULES[self as usize]
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Trigger table
// ============================================================================

/// A single way for a flag to fire. Texts are in normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Exact contiguous substring.
    Phrase(&'static str),
    /// Whole word, bounded by non-alphanumeric characters. Occurrences that
    /// directly follow one of `not_after` are ignored.
    Word {
        word: &'static str,
        not_after: &'static [&'static str],
    },
}

/// The triggers of one flag.
#[derive(Debug, Clone, Copy)]
pub struct FlagRule {
    pub flag: Flag,
    pub triggers: &'static [Trigger],
}

use Trigger::Phrase;

/// Declarative flag definitions, one row per [`Flag`].
pub const FLAG_RULES: &[FlagRule] = &[
    FlagRule {
        flag: Flag::ConfinedSpace,
        triggers: &[
            Phrase("ESPACO CONFINADO"),
            Phrase("INTERIOR DE ESPACO"),
            Phrase("DENTRO DE"),
            Phrase("INTERIOR DO"),
        ],
    },
    FlagRule {
        flag: Flag::Height,
        triggers: &[
            Phrase("ALTURA"),
            Phrase("ACESSO POR CORDAS"),
            Phrase("CORDAS"),
            Phrase("NR-35"),
            Phrase("TRABALHO EM ALTURA"),
        ],
    },
    FlagRule {
        flag: Flag::RopeAccess,
        triggers: &[Phrase("ACESSO POR CORDAS")],
    },
    FlagRule {
        flag: Flag::OverSea,
        triggers: &[Phrase("SOBRE O MAR")],
    },
    FlagRule {
        flag: Flag::OpenFlame,
        triggers: &[
            Phrase("CHAMA ABERTA"),
            Phrase("ESMERILHADEIRA"),
            Phrase("OXICORTE"),
            Phrase("SOLDA"),
        ],
    },
    FlagRule {
        flag: Flag::OxyCutting,
        triggers: &[Phrase("OXICORTE")],
    },
    FlagRule {
        flag: Flag::Welding,
        triggers: &[Trigger::Word {
            word: "SOLDA",
            not_after: &[],
        }],
    },
    FlagRule {
        flag: Flag::Co2ProtectedEnvironment,
        triggers: &[
            Phrase("AMBIENTES PROTEGIDOS POR CO2"),
            Phrase("PROTEGIDO POR SISTEMA DE CO2"),
            Phrase("PROTEGIDOS POR CO2"),
            Phrase("PROTEGIDO POR CO2"),
        ],
    },
    FlagRule {
        flag: Flag::MechanicalTreatment,
        triggers: &[Phrase("TRATAMENTO MECANICO")],
    },
    FlagRule {
        flag: Flag::NeedleGun,
        triggers: &[Phrase("AGULHEIRO")],
    },
    FlagRule {
        flag: Flag::PneumaticSander,
        triggers: &[Phrase("LIXADEIRA PNEUMATIC")],
    },
    FlagRule {
        flag: Flag::Sander,
        triggers: &[Phrase("LIXADEIRA")],
    },
    FlagRule {
        flag: Flag::PneumaticTool,
        triggers: &[Phrase("PNEUMATIC")],
    },
    FlagRule {
        flag: Flag::ElectricalWork,
        triggers: &[Phrase("ELETRIC")],
    },
    FlagRule {
        flag: Flag::Cutting,
        triggers: &[Trigger::Word {
            word: "CORTE",
            not_after: &["OXI-", "OXI "],
        }],
    },
    FlagRule {
        flag: Flag::SabreSaw,
        triggers: &[Phrase("SERRA SABRE")],
    },
    FlagRule {
        flag: Flag::PressurizedEquipment,
        triggers: &[Phrase("PRESSURIZADO")],
    },
    FlagRule {
        flag: Flag::Hydroblast,
        triggers: &[Phrase("HIDROJATO"), Phrase("HIDROJATEAMENTO")],
    },
    FlagRule {
        flag: Flag::MovingParts,
        triggers: &[Phrase("PARTES MOVEIS")],
    },
];

/// Word triggers compiled once. Phrase triggers need no compilation.
static WORD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FLAG_RULES
        .iter()
        .flat_map(|rule| rule.triggers.iter())
        .filter_map(|trigger| match trigger {
            Trigger::Word { word, .. } => Some(*word),
            Trigger::Phrase(_) => None,
        })
        .map(|word| {
            let pattern = format!(r"\b{}\b", regex::escape(word));
            let regex = Regex::new(&pattern).expect("escaped trigger word is a valid pattern");
            (word, regex)
        })
        .collect()
});

impl Trigger {
    /// Test this trigger against normalized text.
    pub fn matches(&self, text: &NormalizedText) -> bool {
        match *self {
            Trigger::Phrase(phrase) => text.contains(phrase),
            Trigger::Word { word, not_after } => {
                let haystack = text.as_str();
                WORD_PATTERNS
                    .iter()
                    .filter(|(w, _)| *w == word)
                    .flat_map(|(_, regex)| regex.find_iter(haystack))
                    .any(|m| {
                        let before = &haystack[..m.start()];
                        !not_after.iter().any(|prefix| before.ends_with(prefix))
                    })
            }
        }
    }
}

impl FlagRule {
    /// The first trigger that matches, if any.
    pub fn first_match(&self, text: &NormalizedText) -> Option<&'static Trigger> {
        self.triggers.iter().find(|trigger| trigger.matches(text))
    }
}

// ============================================================================
// Context
// ============================================================================

/// Derived situation flags for one stage.
///
/// Immutable once built. Absent flags read as `false`, so
/// `Context::default()` is the all-false context of an empty stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    search_text: NormalizedText,
    active: BTreeSet<Flag>,
}

impl Context {
    /// Build a context directly from flags, without any text.
    pub fn from_flags(flags: impl IntoIterator<Item = Flag>) -> Self {
        Self {
            search_text: NormalizedText::default(),
            active: flags.into_iter().collect(),
        }
    }

    /// Evaluate every rule of [`FLAG_RULES`] against `search_text`.
    pub fn from_search_text(search_text: NormalizedText) -> Self {
        let active = FLAG_RULES
            .iter()
            .filter(|rule| rule.first_match(&search_text).is_some())
            .map(|rule| rule.flag)
            .collect();
        Self {
            search_text,
            active,
        }
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        self.active.contains(&flag)
    }

    /// Flags that fired, in declaration order.
    pub fn active_flags(&self) -> impl Iterator<Item = Flag> + '_ {
        self.active.iter().copied()
    }

    /// The combined normalized description and characteristics.
    pub fn search_text(&self) -> &NormalizedText {
        &self.search_text
    }

    /// Open flame, oxy-cutting or welding.
    pub fn flame_class(&self) -> bool {
        self.is_set(Flag::OpenFlame) || self.is_set(Flag::OxyCutting) || self.is_set(Flag::Welding)
    }

    /// Mechanical surface treatment: explicit treatment, needle gun or pneumatic sander.
    pub fn mechanical_treatment_class(&self) -> bool {
        self.is_set(Flag::MechanicalTreatment)
            || self.is_set(Flag::NeedleGun)
            || self.is_set(Flag::PneumaticSander)
    }

    /// Any activity that projects particles or radiation towards the eyes.
    pub fn eye_hazard(&self) -> bool {
        self.flame_class()
            || self.mechanical_treatment_class()
            || self.is_set(Flag::Sander)
            || self.is_set(Flag::Cutting)
            || self.is_set(Flag::SabreSaw)
    }

    pub fn works_at_height(&self) -> bool {
        self.is_set(Flag::Height) || self.is_set(Flag::RopeAccess)
    }

    /// Flame-class work inside a CO2-protected environment.
    pub fn co2_with_flame(&self) -> bool {
        self.is_set(Flag::Co2ProtectedEnvironment) && self.flame_class()
    }
}

/// Derive the context of a stage from its two text fields.
///
/// Both fields are normalized and space-joined, description first. Empty
/// fields are fine and simply contribute nothing.
pub fn extract_context(description: &str, characteristics: &str) -> Context {
    let search_text = normalize(description).join(&normalize(characteristics));
    let context = Context::from_search_text(search_text);

    tracing::debug!(
        flags = ?context.active_flags().map(Flag::name).collect::<Vec<_>>(),
        "extracted stage context"
    );

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flag_has_exactly_one_rule() {
        for (idx, flag) in Flag::ALL.iter().copied().enumerate() {
            assert_eq!(flag as usize, idx);
            let rows = FLAG_RULES.iter().filter(|rule| rule.flag == flag).count();
            assert_eq!(rows, 1, "{} must have one rule row", flag);
            assert_eq!(flag.rule().flag, flag);
        }
        assert_eq!(FLAG_RULES.len(), Flag::ALL.len());
    }

    #[test]
    fn flag_names_round_trip() {
        for flag in Flag::ALL {
            assert_eq!(Flag::from_name(flag.name()), Some(flag));
        }
        assert_eq!(Flag::from_name("unknown"), None);
    }

    #[test]
    fn word_trigger_requires_boundaries() {
        let welding = Flag::Welding.rule();
        assert!(welding.first_match(&normalize("SOLDA DE TUBO")).is_some());
        assert!(welding.first_match(&normalize("tubo, solda.")).is_some());
        assert!(welding.first_match(&normalize("SOLDAGEM")).is_none());
    }

    #[test]
    fn cutting_ignores_oxy_cutting() {
        let cutting = Flag::Cutting.rule();
        assert!(cutting.first_match(&normalize("corte de chapa")).is_some());
        assert!(cutting.first_match(&normalize("oxicorte")).is_none());
        assert!(cutting.first_match(&normalize("oxi-corte")).is_none());
        assert!(cutting.first_match(&normalize("oxi-corte e corte")).is_some());
    }
}
