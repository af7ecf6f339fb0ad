use proptest::prelude::*;
use proptest::sample::subsequence;

use crate::base_table::{epi_radio, items};
use crate::{
    build_plan, diff, extract_context, normalize, ActualAnswers, Answer, Context,
    DivergenceCategory, DivergenceKind, EpiCategory, Flag, QuestionCode, QuestionnaireAnswer,
};

const TRIGGER_PHRASES: &[&str] = &[
    "ESPACO CONFINADO",
    "ACESSO POR CORDAS",
    "SOBRE O MAR",
    "CHAMA ABERTA",
    "OXICORTE",
    "SOLDA",
    "PROTEGIDOS POR CO2",
    "AGULHEIRO",
    "LIXADEIRA PNEUMATICA",
    "CORTE",
    "SERRA SABRE",
    "HIDROJATO",
    "PARTES MOVEIS",
];

fn stage_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9áàâãéêíóôõúçÁÀÂÃÉÊÍÓÔÕÚÇ ,.\\-\t\n]{0,64}"
}

fn flag_set() -> impl Strategy<Value = Vec<Flag>> {
    subsequence(Flag::ALL.to_vec(), 0..=Flag::ALL.len())
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in stage_text()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn planning_is_deterministic(description in stage_text(), characteristics in stage_text()) {
        let first = build_plan(&extract_context(&description, &characteristics));
        let second = build_plan(&extract_context(&description, &characteristics));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn adding_a_trigger_only_sets_flags(
        description in stage_text(),
        phrase in proptest::sample::select(TRIGGER_PHRASES),
    ) {
        let before = extract_context(&description, "");
        let after = extract_context(&description, phrase);
        for flag in before.active_flags() {
            prop_assert!(after.is_set(flag), "{} was lost after adding {:?}", flag, phrase);
        }
    }

    #[test]
    fn face_shield_follows_eye_hazard(flags in flag_set()) {
        let ctx = Context::from_flags(flags);
        let expected = if ctx.eye_hazard() { Answer::Yes } else { Answer::No };
        prop_assert_eq!(build_plan(&ctx).epi_radio_answer(epi_radio::FACE_SHIELD), Some(expected));
    }

    #[test]
    fn respiratory_override_drops_not_applicable(flags in flag_set()) {
        let ctx = Context::from_flags(flags);
        let plan = build_plan(&ctx);
        let respiratory = plan.epi_items().get(EpiCategory::Respiratory);
        if ctx.flame_class() || ctx.mechanical_treatment_class() {
            prop_assert_eq!(respiratory, &[items::FILTERING_HALF_MASK.to_string()][..]);
        } else {
            prop_assert_eq!(respiratory, &[items::RESPIRATORY_NOT_APPLICABLE.to_string()][..]);
        }
    }

    #[test]
    fn plan_agrees_with_itself(flags in flag_set()) {
        let plan = build_plan(&Context::from_flags(flags));
        prop_assert!(diff(&plan, &ActualAnswers::from_plan(&plan)).is_empty());
    }

    #[test]
    fn one_sided_keys_yield_one_item(
        flags in flag_set(),
        dropped in 1u16..=20,
        unknown in 21u16..=999,
    ) {
        let plan = build_plan(&Context::from_flags(flags));
        let mut actual = ActualAnswers::from_plan(&plan);
        actual.apn1.remove(&QuestionCode::new(dropped));
        actual.apn1.insert(QuestionCode::new(unknown), Answer::Yes);

        let report = diff(&plan, &actual);
        let kinds: Vec<DivergenceKind> = report.iter().map(|item| item.kind).collect();
        prop_assert_eq!(kinds, vec![DivergenceKind::Missing, DivergenceKind::Extra]);
        prop_assert_eq!(&report.items()[0].key, &QuestionCode::new(dropped).to_string());
        prop_assert_eq!(&report.items()[1].key, &QuestionCode::new(unknown).to_string());
    }

    #[test]
    fn unknown_radio_and_questionnaire_keys_are_extra(
        flags in flag_set(),
        dropped_radio in 1u16..=6,
        unknown_radio in 7u16..=999,
        dropped_question in 0usize..16,
        unknown_question in 17u16..=999,
        answer in proptest::sample::select(&[Answer::Yes, Answer::No, Answer::NotApplicable][..]),
    ) {
        let plan = build_plan(&Context::from_flags(flags));
        let mut actual = ActualAnswers::from_plan(&plan);
        actual.epi_radio.remove(&QuestionCode::new(dropped_radio));
        actual.epi_radio.insert(QuestionCode::new(unknown_radio), answer);
        let removed = actual.questionnaire.remove(dropped_question);
        actual.questionnaire.push(QuestionnaireAnswer::new(
            QuestionCode::new(unknown_question),
            "Pergunta fora da tabela",
            answer,
        ));

        let report = diff(&plan, &actual);
        prop_assert_eq!(report.len(), 4);

        let radio: Vec<_> = report
            .in_category(DivergenceCategory::EpiRadio)
            .map(|item| (item.kind, item.key.clone()))
            .collect();
        prop_assert_eq!(radio, vec![
            (DivergenceKind::Missing, QuestionCode::new(dropped_radio).to_string()),
            (DivergenceKind::Extra, QuestionCode::new(unknown_radio).to_string()),
        ]);

        let questionnaire: Vec<_> = report
            .in_category(DivergenceCategory::Questionnaire)
            .map(|item| (item.kind, item.key.clone()))
            .collect();
        prop_assert_eq!(questionnaire, vec![
            (DivergenceKind::Missing, removed.key().to_string()),
            (
                DivergenceKind::Extra,
                format!("{} PERGUNTA FORA DA TABELA", QuestionCode::new(unknown_question)),
            ),
        ]);
    }
}
