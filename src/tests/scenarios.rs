use crate::base_table::{apn1, epi_radio, items, questionnaire, OVER_SEA_CLOTHING, ROPE_ACCESS_CLOTHING};
use crate::{
    build_plan, diff, evaluate_stages, extract_context, surface, ActualAnswers, Answer,
    DivergenceCategory, DivergenceKind, DivergenceView, EngineConfig, EpiCategory, Flag, Plan,
    QuestionCode, StageInput,
};

fn plan_for(description: &str, characteristics: &str) -> Plan {
    build_plan(&extract_context(description, characteristics))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn apn1_yes(plan: &Plan) -> Vec<QuestionCode> {
    plan.apn1()
        .iter()
        .filter(|(_, answer)| answer.is_yes())
        .map(|(code, _)| *code)
        .collect()
}

// ============================================================================
// Plans from text
// ============================================================================

#[test]
fn plain_valve_swap() {
    let plan = plan_for("TROCA DE VALVULA", "");

    assert_eq!(plan.context().active_flags().count(), 0);
    assert_eq!(plan.epi_radio_answer(epi_radio::FACE_SHIELD), Some(Answer::No));
    assert_eq!(
        plan.epi_items().get(EpiCategory::Respiratory),
        strings(&[items::RESPIRATORY_NOT_APPLICABLE]).as_slice()
    );
    assert!(apn1_yes(&plan).is_empty());
}

#[test]
fn rope_access() {
    let plan = plan_for("Pintura de costado", "ACESSO POR CORDAS");

    assert!(plan.context().is_set(Flag::RopeAccess));
    assert_eq!(plan.epi_radio_answer(epi_radio::SAFETY_HARNESS), Some(Answer::Yes));
    assert_eq!(plan.epi_radio_answer(epi_radio::LIFE_VEST), Some(Answer::No));

    let clothing = plan.epi_items().get(EpiCategory::Clothing);
    assert_eq!(clothing.len(), 2 + ROPE_ACCESS_CLOTHING.len());
    for item in ROPE_ACCESS_CLOTHING {
        assert!(clothing.contains(&item.to_string()), "missing {}", item);
    }
    assert_eq!(apn1_yes(&plan), vec![apn1::WORK_AT_HEIGHT]);
}

#[test]
fn over_sea() {
    let plan = plan_for("Reparo de guarda-corpo", "Sobre o mar");

    assert_eq!(plan.epi_radio_answer(epi_radio::SAFETY_HARNESS), Some(Answer::Yes));
    assert_eq!(plan.epi_radio_answer(epi_radio::LIFE_VEST), Some(Answer::Yes));
    assert_eq!(
        plan.epi_items().get(EpiCategory::Clothing).len(),
        2 + OVER_SEA_CLOTHING.len()
    );
    assert_eq!(apn1_yes(&plan), vec![apn1::WORK_AT_HEIGHT, apn1::OVER_SEA]);
}

#[test]
fn welding() {
    let plan = plan_for("SOLDA", "");

    assert!(plan.context().eye_hazard());
    assert_eq!(plan.epi_radio_answer(epi_radio::FACE_SHIELD), Some(Answer::Yes));
    assert_eq!(
        plan.epi_items().get(EpiCategory::Eyewear),
        strings(&[
            items::WIDE_VISION_GOGGLES,
            items::FACE_SHIELD,
            items::WELDER_MASK,
            items::AMPERAGE_LENS,
        ])
        .as_slice()
    );
    assert_eq!(
        plan.epi_items().get(EpiCategory::Gloves),
        strings(&[items::IMPACT_GLOVE, items::ARAMID_GLOVE, items::RASPA_GLOVE]).as_slice()
    );
    assert_eq!(
        plan.epi_items().get(EpiCategory::Respiratory),
        strings(&[items::FILTERING_HALF_MASK]).as_slice()
    );

    let yes: Vec<QuestionCode> = plan
        .questionnaire()
        .iter()
        .filter(|entry| entry.answer.is_yes())
        .map(|entry| entry.code)
        .collect();
    for code in [
        questionnaire::ELECTRICAL_INSPECTIONS,
        questionnaire::SPARK_CONTAINMENT,
        questionnaire::BLANKING,
        questionnaire::FIRE_WATCH,
    ] {
        assert!(yes.contains(&code), "{} should be Sim", code);
    }
    assert!(!yes.contains(&questionnaire::SENSOR_INHIBITION));
}

#[test]
fn co2_needs_flame() {
    let plan = plan_for("AMBIENTES PROTEGIDOS POR CO2", "CHAMA ABERTA");
    assert_eq!(plan.apn1_answer(apn1::CO2_WITH_FLAME), Some(Answer::Yes));
    assert!(plan
        .questionnaire()
        .iter()
        .any(|entry| entry.code == questionnaire::SENSOR_INHIBITION && entry.answer.is_yes()));

    let plan = plan_for("AMBIENTES PROTEGIDOS POR CO2", "");
    assert!(plan.context().is_set(Flag::Co2ProtectedEnvironment));
    assert_eq!(plan.apn1_answer(apn1::CO2_WITH_FLAME), Some(Answer::No));
}

#[test]
fn accents_and_case_do_not_matter() {
    let accented = plan_for("Tratamento mecânico com lixadeira pneumática", "");
    let plain = plan_for("TRATAMENTO MECANICO COM LIXADEIRA PNEUMATICA", "");
    assert_eq!(accented, plain);
    assert!(accented.context().is_set(Flag::PneumaticSander));
    assert!(accented.context().is_set(Flag::PneumaticTool));
}

#[test]
fn oxy_cutting_is_not_cutting() {
    let ctx = extract_context("Oxicorte de chapa", "");
    assert!(ctx.is_set(Flag::OxyCutting));
    assert!(ctx.is_set(Flag::OpenFlame));
    assert!(!ctx.is_set(Flag::Cutting));
}

// ============================================================================
// Divergence
// ============================================================================

#[test]
fn stale_not_applicable_respiratory_is_extra() {
    let plan = plan_for("SOLDA", "");
    let mut actual = ActualAnswers::from_plan(&plan);
    actual.epi_items.insert(
        EpiCategory::Respiratory,
        strings(&[items::RESPIRATORY_NOT_APPLICABLE, items::FILTERING_HALF_MASK]),
    );

    let report = diff(&plan, &actual);
    assert_eq!(report.len(), 1);
    let item = &report.items()[0];
    assert_eq!(item.category, DivergenceCategory::EpiItems(EpiCategory::Respiratory));
    assert_eq!(item.kind, DivergenceKind::Extra);
    assert_eq!(item.key, items::RESPIRATORY_NOT_APPLICABLE);
    assert_eq!(item.expected, None);
}

#[test]
fn report_is_ordered_by_category() {
    let plan = plan_for("SOLDA", "");
    let mut actual = ActualAnswers::from_plan(&plan);
    actual.environmental.insert(QuestionCode::new(1), Answer::Yes);
    actual.apn1.insert(apn1::FLAME, Answer::No);
    actual.epi_radio.insert(epi_radio::FACE_SHIELD, Answer::NotApplicable);
    actual.questionnaire.retain(|entry| entry.code != questionnaire::FIRE_WATCH);
    actual.epi_items.remove(&EpiCategory::Gloves);

    let report = diff(&plan, &actual);
    let categories: Vec<DivergenceCategory> = report.iter().map(|item| item.category).collect();
    let mut sorted = categories.clone();
    sorted.sort();
    assert_eq!(categories, sorted);
    assert_eq!(categories.first(), Some(&DivergenceCategory::EpiRadio));
    assert_eq!(categories.last(), Some(&DivergenceCategory::Environmental));

    let questionnaire_item = report
        .in_category(DivergenceCategory::Questionnaire)
        .next()
        .unwrap();
    assert_eq!(questionnaire_item.kind, DivergenceKind::Missing);
    assert!(questionnaire_item.key.starts_with("Q014 "));
}

#[test]
fn batch_views() {
    let welding = plan_for("SOLDA", "");
    let mut apn_only = ActualAnswers::from_plan(&welding);
    apn_only.apn1.insert(apn1::FLAME, Answer::No);

    let inputs = vec![
        StageInput::new("cold", "SOLDA", "").with_work_type("Trabalho a frio"),
        StageInput::new("clean", "SOLDA", "")
            .with_work_type("Trabalho a quente")
            .with_actual(ActualAnswers::from_plan(&welding)),
        StageInput::new("apn", "SOLDA", "")
            .with_work_type("Trabalho a quente")
            .with_actual(apn_only),
        StageInput::new("no-answers", "SOLDA", ""),
    ];

    let results = evaluate_stages(&inputs, &EngineConfig::default());
    assert!(results[0].outcome.is_skipped());
    let stages: Vec<_> = results.iter().filter_map(|r| r.divergence()).collect();
    assert_eq!(stages.len(), 2);

    let apn = surface(DivergenceView::Apn1, &stages);
    assert_eq!(apn.len(), 1);
    assert_eq!(apn[0].stage_id, "apn");
    assert_eq!(apn[0].report.items()[0].kind, DivergenceKind::MissingYes);
    assert!(surface(DivergenceView::EpiAndQuestionnaire, &stages).is_empty());
}
