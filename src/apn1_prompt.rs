//! Answer APN-1 questions by their prompt text.
//!
//! Some host forms renumber APN-1, so the code-based plan cannot always be
//! applied. Each [`Apn1Topic`] pairs patterns that identify the question with
//! the APN-1 code it stands for and the [`Condition`] that answers it `Yes`,
//! the same condition the code-based plan uses.

use crate::answer::{Answer, QuestionCode};
use crate::base_table::apn1;
use crate::context::{Context, Flag};
use crate::normalize::normalize;
use crate::plan::Condition;

#[derive(Debug, Clone, Copy)]
pub struct Apn1Topic {
    pub name: &'static str,
    /// Any of these in the normalized prompt selects the topic.
    pub question_patterns: &'static [&'static str],
    /// The APN-1 code this topic answers when forms keep their numbering.
    pub code: QuestionCode,
    pub when: Condition,
}

pub const APN1_TOPICS: &[Apn1Topic] = &[
    Apn1Topic {
        name: "height",
        question_patterns: &[
            "ALTURA",
            "2 METROS",
            "2M",
            "TRABALHO EM ALTURA",
            "ELEVADO",
            "ACESSO POR CORDAS",
        ],
        code: apn1::WORK_AT_HEIGHT,
        when: Condition::Any(&[Condition::WorksAtHeight, Condition::Flag(Flag::OverSea)]),
    },
    Apn1Topic {
        name: "over_sea",
        question_patterns: &["SOBRE O MAR", "MARITIMO"],
        code: apn1::OVER_SEA,
        when: Condition::Flag(Flag::OverSea),
    },
    Apn1Topic {
        name: "flame",
        question_patterns: &[
            "CHAMA ABERTA",
            "SOLDA",
            "OXICORTE",
            "ESMERILHADEIRA",
            "TRABALHO A QUENTE",
            "CHAMA",
        ],
        code: apn1::FLAME,
        when: Condition::FlameClass,
    },
    Apn1Topic {
        name: "co2",
        question_patterns: &["CO2", "GAS CARBONICO"],
        code: apn1::CO2_WITH_FLAME,
        when: Condition::Co2WithFlame,
    },
    Apn1Topic {
        name: "confined_space",
        question_patterns: &["ESPACO CONFINADO", "CONFINADO"],
        code: apn1::CONFINED_SPACE,
        when: Condition::Flag(Flag::ConfinedSpace),
    },
    Apn1Topic {
        name: "pressurized",
        question_patterns: &["PRESSURIZADO", "PRESSAO", "PRESSAO TRAPEADA", "PRESSAO TRAP"],
        code: apn1::PRESSURIZED,
        when: Condition::Flag(Flag::PressurizedEquipment),
    },
    Apn1Topic {
        name: "moving_parts",
        question_patterns: &["PARTES MOVEIS"],
        code: apn1::MOVING_PARTS,
        when: Condition::Flag(Flag::MovingParts),
    },
    Apn1Topic {
        name: "hydroblast",
        question_patterns: &["HIDROJATO", "HIDROJATEAMENTO", "JATEAMENTO"],
        code: apn1::HYDROBLAST,
        when: Condition::Flag(Flag::Hydroblast),
    },
];

/// The first topic whose question patterns match `prompt`.
pub fn topic_for_prompt(prompt: &str) -> Option<&'static Apn1Topic> {
    let prompt = normalize(prompt);
    APN1_TOPICS.iter().find(|topic| {
        topic
            .question_patterns
            .iter()
            .any(|pattern| prompt.contains(pattern))
    })
}

/// Answer an APN-1 question from its prompt.
///
/// The prompt selects a topic via [`topic_for_prompt`]; the answer is `Yes`
/// when the topic's condition holds for `ctx`. Unrecognized prompts are `No`.
pub fn resolve_apn1_prompt(prompt: &str, ctx: &Context) -> Answer {
    match topic_for_prompt(prompt) {
        Some(topic) if topic.when.holds(ctx) => {
            tracing::trace!(topic = topic.name, prompt, "apn-1 prompt answered yes");
            Answer::Yes
        }
        _ => Answer::No,
    }
}
