//! Plan construction.
//!
//! A [`Plan`] holds the expected answers of every form family for one stage.
//! It is a pure function of a [`Context`] and the static base tables: each
//! family starts from a copy of its base and the override rules below are
//! applied to the copy, in table order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::{Answer, QuestionCode};
use crate::base_table::{
    self, apn1, epi_radio, items, questionnaire, EpiCategory, EPI_ITEM_BASE, EPI_RADIO_BASE,
    EYEWEAR_NO_HAZARD, FLAME_CLOTHING, FLAME_GLOVES, OVER_SEA_CLOTHING, QUESTIONNAIRE_BASE,
    ROPE_ACCESS_CLOTHING,
};
use crate::context::{Context, Flag};
use crate::normalize::{normalize, normalize_item, NormalizedText};

// ============================================================================
// Rule tables
// ============================================================================

/// A condition over a [`Context`], as used by the override tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Flag(Flag),
    WorksAtHeight,
    FlameClass,
    MechanicalTreatmentClass,
    EyeHazard,
    Co2WithFlame,
    /// Holds when any of the inner conditions holds.
    Any(&'static [Condition]),
}

impl Condition {
    pub fn holds(&self, ctx: &Context) -> bool {
        match self {
            Condition::Flag(flag) => ctx.is_set(*flag),
            Condition::WorksAtHeight => ctx.works_at_height(),
            Condition::FlameClass => ctx.flame_class(),
            Condition::MechanicalTreatmentClass => ctx.mechanical_treatment_class(),
            Condition::EyeHazard => ctx.eye_hazard(),
            Condition::Co2WithFlame => ctx.co2_with_flame(),
            Condition::Any(inner) => inner.iter().any(|c| c.holds(ctx)),
        }
    }
}

/// Set `codes` to `answer` when `when` holds.
#[derive(Debug, Clone, Copy)]
pub struct AnswerRule {
    pub when: Condition,
    pub codes: &'static [QuestionCode],
    pub answer: Answer,
}

const fn yes_when(when: Condition, codes: &'static [QuestionCode]) -> AnswerRule {
    AnswerRule {
        when,
        codes,
        answer: Answer::Yes,
    }
}

/// EPI-radio overrides. The face shield is handled separately since it is
/// recomputed in both directions.
pub const EPI_RADIO_RULES: &[AnswerRule] = &[
    yes_when(
        Condition::Any(&[Condition::WorksAtHeight, Condition::Flag(Flag::OverSea)]),
        &[epi_radio::SAFETY_HARNESS],
    ),
    yes_when(Condition::Flag(Flag::OverSea), &[epi_radio::LIFE_VEST]),
];

pub const QUESTIONNAIRE_RULES: &[AnswerRule] = &[
    yes_when(
        Condition::Any(&[Condition::Flag(Flag::ElectricalWork), Condition::FlameClass]),
        &[questionnaire::ELECTRICAL_INSPECTIONS],
    ),
    yes_when(
        Condition::Any(&[
            Condition::Flag(Flag::PneumaticTool),
            Condition::MechanicalTreatmentClass,
        ]),
        &[questionnaire::AIR_HOSES],
    ),
    yes_when(
        Condition::FlameClass,
        &[
            questionnaire::SPARK_CONTAINMENT,
            questionnaire::BLANKING,
            questionnaire::FIRE_WATCH,
        ],
    ),
    yes_when(Condition::Co2WithFlame, &[questionnaire::SENSOR_INHIBITION]),
];

pub const APN1_RULES: &[AnswerRule] = &[
    yes_when(Condition::WorksAtHeight, &[apn1::WORK_AT_HEIGHT]),
    yes_when(
        Condition::Flag(Flag::OverSea),
        &[apn1::WORK_AT_HEIGHT, apn1::OVER_SEA],
    ),
    yes_when(Condition::FlameClass, &[apn1::FLAME]),
    yes_when(Condition::Co2WithFlame, &[apn1::CO2_WITH_FLAME]),
    yes_when(Condition::Flag(Flag::ConfinedSpace), &[apn1::CONFINED_SPACE]),
    yes_when(
        Condition::Flag(Flag::PressurizedEquipment),
        &[apn1::PRESSURIZED],
    ),
    yes_when(Condition::Flag(Flag::MovingParts), &[apn1::MOVING_PARTS]),
    yes_when(Condition::Flag(Flag::Hydroblast), &[apn1::HYDROBLAST]),
];

fn apply_rules(
    rules: &[AnswerRule],
    ctx: &Context,
    mut set: impl FnMut(QuestionCode, Answer),
) {
    for rule in rules.iter().filter(|rule| rule.when.holds(ctx)) {
        for code in rule.codes {
            set(*code, rule.answer);
        }
    }
}

// ============================================================================
// Questionnaire keys
// ============================================================================

/// Identity of a Questionnaire-PT question: its code and normalized prompt.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionKey {
    pub code: QuestionCode,
    pub prompt: NormalizedText,
}

impl QuestionKey {
    pub fn new(code: QuestionCode, prompt: &str) -> Self {
        Self {
            code,
            prompt: normalize(prompt),
        }
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.prompt)
    }
}

/// One answered Questionnaire-PT question, prompt kept as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireAnswer {
    pub code: QuestionCode,
    pub prompt: String,
    pub answer: Answer,
}

impl QuestionnaireAnswer {
    pub fn new(code: QuestionCode, prompt: impl Into<String>, answer: Answer) -> Self {
        Self {
            code,
            prompt: prompt.into(),
            answer,
        }
    }

    pub fn key(&self) -> QuestionKey {
        QuestionKey::new(self.code, &self.prompt)
    }
}

// ============================================================================
// EPI items
// ============================================================================

/// Per-category item lists that keep first-seen spelling and drop duplicates
/// by [`normalize_item`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemTable(BTreeMap<EpiCategory, Vec<String>>);

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: EpiCategory) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, category: EpiCategory, item: &str) -> bool {
        let wanted = normalize_item(item);
        self.get(category)
            .iter()
            .any(|existing| normalize_item(existing) == wanted)
    }

    pub fn insert(&mut self, category: EpiCategory, item: &str) {
        if !self.contains(category, item) {
            self.0.entry(category).or_default().push(item.to_string());
        }
    }

    pub fn extend(&mut self, category: EpiCategory, items: &[&str]) {
        for item in items {
            self.insert(category, item);
        }
    }

    /// Replace the whole category with `items`.
    pub fn replace(&mut self, category: EpiCategory, items: &[&str]) {
        self.0.remove(&category);
        self.extend(category, items);
    }

    pub fn iter(&self) -> impl Iterator<Item = (EpiCategory, &[String])> + '_ {
        self.0
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }
}

fn plan_epi_items(ctx: &Context) -> ItemTable {
    let mut table = ItemTable::new();
    for (category, base) in EPI_ITEM_BASE {
        table.extend(*category, base);
    }

    if !ctx.eye_hazard() {
        table.replace(EpiCategory::Eyewear, EYEWEAR_NO_HAZARD);
    }

    if ctx.flame_class() {
        table.extend(EpiCategory::Gloves, FLAME_GLOVES);
        table.extend(EpiCategory::Clothing, FLAME_CLOTHING);
        table.replace(EpiCategory::Respiratory, &[items::FILTERING_HALF_MASK]);
        table.insert(EpiCategory::Eyewear, items::WELDER_MASK);
        if ctx.is_set(Flag::Welding) || ctx.is_set(Flag::OxyCutting) {
            table.insert(EpiCategory::Eyewear, items::AMPERAGE_LENS);
        }
        if ctx.is_set(Flag::OxyCutting) {
            table.insert(EpiCategory::Eyewear, items::TORCH_GOGGLES);
        }
    }

    if ctx.mechanical_treatment_class() {
        table.replace(EpiCategory::Respiratory, &[items::FILTERING_HALF_MASK]);
        table.insert(EpiCategory::Gloves, items::ANTI_VIBRATION_GLOVE);
    }

    if ctx.works_at_height() {
        table.extend(EpiCategory::Clothing, ROPE_ACCESS_CLOTHING);
    }

    if ctx.is_set(Flag::OverSea) {
        table.extend(EpiCategory::Clothing, OVER_SEA_CLOTHING);
    }

    table
}

// ============================================================================
// Plan
// ============================================================================

/// Expected answers for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    context: Context,
    epi_radio: BTreeMap<QuestionCode, Answer>,
    epi_items: ItemTable,
    questionnaire: Vec<QuestionnaireAnswer>,
    apn1: BTreeMap<QuestionCode, Answer>,
}

impl Plan {
    /// The context the plan was built from.
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn epi_radio(&self) -> &BTreeMap<QuestionCode, Answer> {
        &self.epi_radio
    }

    pub fn epi_radio_answer(&self, code: QuestionCode) -> Option<Answer> {
        self.epi_radio.get(&code).copied()
    }

    pub fn epi_items(&self) -> &ItemTable {
        &self.epi_items
    }

    /// Questionnaire-PT answers in base-table order.
    pub fn questionnaire(&self) -> &[QuestionnaireAnswer] {
        &self.questionnaire
    }

    pub fn questionnaire_answer(&self, code: QuestionCode, prompt: &str) -> Option<Answer> {
        let key = QuestionKey::new(code, prompt);
        self.questionnaire
            .iter()
            .find(|entry| entry.key() == key)
            .map(|entry| entry.answer)
    }

    pub fn apn1(&self) -> &BTreeMap<QuestionCode, Answer> {
        &self.apn1
    }

    pub fn apn1_answer(&self, code: QuestionCode) -> Option<Answer> {
        self.apn1.get(&code).copied()
    }

    /// Environmental-Analysis is answered `No` throughout, whatever the code.
    pub fn environmental_expected(&self) -> Answer {
        Answer::No
    }
}

/// Build the plan of a stage from its context.
///
/// Total: every context, including the empty one, yields a complete plan.
pub fn build_plan(ctx: &Context) -> Plan {
    let mut epi_radio: BTreeMap<QuestionCode, Answer> = EPI_RADIO_BASE
        .iter()
        .map(|question| (question.code, question.default))
        .collect();
    apply_rules(EPI_RADIO_RULES, ctx, |code, answer| {
        epi_radio.insert(code, answer);
    });
    let face_shield = if ctx.eye_hazard() {
        Answer::Yes
    } else {
        Answer::No
    };
    epi_radio.insert(epi_radio::FACE_SHIELD, face_shield);

    let mut questionnaire: Vec<QuestionnaireAnswer> = QUESTIONNAIRE_BASE
        .iter()
        .map(|question| QuestionnaireAnswer::new(question.code, question.prompt, question.default))
        .collect();
    apply_rules(QUESTIONNAIRE_RULES, ctx, |code, answer| {
        for entry in questionnaire.iter_mut().filter(|entry| entry.code == code) {
            entry.answer = answer;
        }
    });

    let mut apn1: BTreeMap<QuestionCode, Answer> =
        base_table::apn1_codes().map(|code| (code, Answer::No)).collect();
    apply_rules(APN1_RULES, ctx, |code, answer| {
        apn1.insert(code, answer);
    });

    let plan = Plan {
        context: ctx.clone(),
        epi_radio,
        epi_items: plan_epi_items(ctx),
        questionnaire,
        apn1,
    };

    tracing::trace!(
        apn1_yes = plan.apn1.values().filter(|a| a.is_yes()).count(),
        face_shield = %face_shield,
        "built plan"
    );

    plan
}
