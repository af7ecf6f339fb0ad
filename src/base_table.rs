//! Static reference data for every form family.
//!
//! These tables are never mutated. The plan builder copies a base, then
//! applies context-conditioned overrides to the copy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::{Answer, QuestionCode};
use crate::normalize::normalize;

/// A radio-button question with its context-free default answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioQuestion {
    pub code: QuestionCode,
    pub prompt: &'static str,
    pub default: Answer,
}

const fn question(code: u16, prompt: &'static str, default: Answer) -> RadioQuestion {
    RadioQuestion {
        code: QuestionCode::new(code),
        prompt,
        default,
    }
}

// ============================================================================
// EPI radios ("EPI adicional necessário e proteções")
// ============================================================================

pub mod epi_radio {
    use crate::answer::QuestionCode;

    pub const SAFETY_HARNESS: QuestionCode = QuestionCode::new(1);
    pub const FORCED_VENTILATION: QuestionCode = QuestionCode::new(2);
    pub const LIFE_VEST: QuestionCode = QuestionCode::new(3);
    pub const EX_LIGHTING: QuestionCode = QuestionCode::new(4);
    pub const DOUBLE_HEARING_PROTECTION: QuestionCode = QuestionCode::new(5);
    pub const FACE_SHIELD: QuestionCode = QuestionCode::new(6);
}

pub const EPI_RADIO_BASE: &[RadioQuestion] = &[
    question(1, "Cinto de Segurança", Answer::No),
    question(2, "Ventilação Forçada", Answer::No),
    question(3, "Colete Salva-vidas", Answer::No),
    question(4, "Iluminação p/ uso em área classificada (tipo Ex)", Answer::No),
    question(5, "Dupla Proteção Auricular", Answer::Yes),
    question(6, "Protetor Facial", Answer::Yes),
];

// ============================================================================
// Questionnaire PT
// ============================================================================

pub mod questionnaire {
    use crate::answer::QuestionCode;

    pub const ELECTRICAL_INSPECTIONS: QuestionCode = QuestionCode::new(5);
    pub const AIR_HOSES: QuestionCode = QuestionCode::new(7);
    pub const SPARK_CONTAINMENT: QuestionCode = QuestionCode::new(9);
    pub const BLANKING: QuestionCode = QuestionCode::new(11);
    pub const SENSOR_INHIBITION: QuestionCode = QuestionCode::new(13);
    pub const FIRE_WATCH: QuestionCode = QuestionCode::new(14);
}

/// The questionnaire reuses `Q001` and `Q002` for two prompts each, so its
/// questions are identified by code and prompt together.
pub const QUESTIONNAIRE_BASE: &[RadioQuestion] = &[
    question(1, "O trabalho a ser realizado é caracterizado como uma mudança?", Answer::No),
    question(1, "Permanência do Operador no Local de Trabalho?", Answer::No),
    question(
        2,
        "Acompanhamento Periódico? (Em caso de Acompanhamento Periódico, efetuar verificações de ____em___horas)",
        Answer::Yes,
    ),
    question(
        2,
        "As manobras, bloqueios e isolamentos foram executados conforme o plano de isolamento?",
        Answer::NotApplicable,
    ),
    question(
        3,
        "O equipamento foi drenado e/ou lavado e/ou limpo e/ou ventilado ?",
        Answer::NotApplicable,
    ),
    question(
        4,
        "O equipamento está corretamente sinalizado com etiquetas de advertência ?",
        Answer::NotApplicable,
    ),
    question(
        5,
        "Foram realizadas inspeções prévias nos equipamentos elétricos (luminárias, quadros, painéis, conexões, cabos, etc) e os cabos elétricos estão supensos?",
        Answer::NotApplicable,
    ),
    question(
        6,
        "Caso os sistemas e equipamentos de combate a incêndio do local onde será executado o trabalho não estejam em condições normais de operação, foram definidas salvaguardas?",
        Answer::NotApplicable,
    ),
    question(
        7,
        "As mangueiras de ar comprimido possuem engates rápidos compatíveis e os mesmos estão travados",
        Answer::NotApplicable,
    ),
    question(
        8,
        "O local foi isolado, sinalizado e o pessoal desnecessário  afastado ?",
        Answer::Yes,
    ),
    question(
        9,
        "Foi providenciada a contenção de fagulhas com mantas e materiais adequados?",
        Answer::NotApplicable,
    ),
    question(
        10,
        "Caso o equipamento esteja acoplado a equipamento elétrico (ex: motor elétrico),  foram tomadas precauções quanto à energização acidental do equipamento ?",
        Answer::NotApplicable,
    ),
    question(
        11,
        "Foi providenciado Tamponamentos de drenos, ralos, vents e outras aberturas próximas ao local do trabalho?",
        Answer::NotApplicable,
    ),
    question(
        12,
        "A execução deste trabalho pode causar Risco de Perda de Produção?",
        Answer::No,
    ),
    question(
        13,
        "Caso necessário inibir sensores do sistema de detecção de fogo e gás, foram definidas salvaguardas para suprir a inibição?",
        Answer::NotApplicable,
    ),
    question(
        14,
        "O observador foi instruído quanto a utilização dos equipamentos de combate a incêndio?",
        Answer::NotApplicable,
    ),
];

// ============================================================================
// APN-1
// ============================================================================

/// APN-1 has codes `Q001..=Q020`, all `No` unless a rule fires.
pub const APN1_QUESTION_COUNT: u16 = 20;

pub mod apn1 {
    use crate::answer::QuestionCode;

    pub const CONFINED_SPACE: QuestionCode = QuestionCode::new(6);
    pub const WORK_AT_HEIGHT: QuestionCode = QuestionCode::new(7);
    pub const OVER_SEA: QuestionCode = QuestionCode::new(8);
    pub const FLAME: QuestionCode = QuestionCode::new(10);
    pub const PRESSURIZED: QuestionCode = QuestionCode::new(13);
    pub const HYDROBLAST: QuestionCode = QuestionCode::new(16);
    pub const MOVING_PARTS: QuestionCode = QuestionCode::new(17);
    pub const CO2_WITH_FLAME: QuestionCode = QuestionCode::new(19);
}

pub fn apn1_codes() -> impl Iterator<Item = QuestionCode> {
    (1..=APN1_QUESTION_COUNT).map(QuestionCode::new)
}

// ============================================================================
// EPI items by category
// ============================================================================

/// The four item categories of the EPI tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpiCategory {
    Clothing,
    Eyewear,
    Gloves,
    Respiratory,
}

impl EpiCategory {
    pub const ALL: [EpiCategory; 4] = [
        EpiCategory::Clothing,
        EpiCategory::Eyewear,
        EpiCategory::Gloves,
        EpiCategory::Respiratory,
    ];

    /// Label of the category on the host form.
    pub fn label(self) -> &'static str {
        match self {
            EpiCategory::Clothing => "Vestimentas",
            EpiCategory::Eyewear => "Óculos",
            EpiCategory::Gloves => "Luvas",
            EpiCategory::Respiratory => "Proteção Respiratória",
        }
    }

    /// Match a host label, ignoring case and accents.
    pub fn from_label(label: &str) -> Option<EpiCategory> {
        let wanted = normalize(label);
        EpiCategory::ALL
            .iter()
            .copied()
            .find(|category| normalize(category.label()) == wanted)
    }
}

impl fmt::Display for EpiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Item names exactly as the EPI catalog spells them.
pub mod items {
    pub const IMPACT_GLOVE: &str = "LUVA DE PROTEÇÃO CONTRA IMPACTOS MODELO II (3, 4, 3, 3, 'C', 'P')";
    pub const ARAMID_GLOVE: &str = "LUVA ARAMIDA";
    pub const RASPA_GLOVE: &str = "LUVA DE RASPA";
    pub const ANTI_VIBRATION_GLOVE: &str = "LUVA ANTI-VIBRAÇÃO";

    pub const RESPIRATORY_NOT_APPLICABLE: &str = "NÃO APLICÁVEL";
    pub const FILTERING_HALF_MASK: &str = "PEÇA SEMI-FACIAL FILTRANTE 2";

    pub const DOUBLE_HEARING_PROTECTION: &str = "DUPLA PROTEÇÃO AUDITIVA";
    pub const MANDATORY_EPIS: &str = "EPI´s OBRIGATÓRIOS (CAPACETE, BOTA, PROT. AURIC. E UNIFORME)";

    pub const WIDE_VISION_GOGGLES: &str = "ÓCULOS AMPLA VISÃO";
    pub const FACE_SHIELD: &str = "PROTETOR FACIAL";
    pub const IMPACT_GLASSES: &str = "ÓCULOS SEGURANÇA CONTRA IMPACTO";
    pub const WELDER_MASK: &str = "MÁSCARA SOLDADOR";
    pub const AMPERAGE_LENS: &str = "LENTE DE ACORDO COM AMPERAGEM DA MÁQUINA";
    pub const TORCH_GOGGLES: &str = "ÓCULOS MAÇARIQUEIRO";
}

pub const EPI_ITEM_BASE: &[(EpiCategory, &[&str])] = &[
    (
        EpiCategory::Clothing,
        &[items::DOUBLE_HEARING_PROTECTION, items::MANDATORY_EPIS],
    ),
    (
        EpiCategory::Eyewear,
        &[items::WIDE_VISION_GOGGLES, items::FACE_SHIELD],
    ),
    (EpiCategory::Gloves, &[items::IMPACT_GLOVE]),
    (
        EpiCategory::Respiratory,
        &[items::RESPIRATORY_NOT_APPLICABLE],
    ),
];

/// Eyewear when nothing threatens the eyes.
pub const EYEWEAR_NO_HAZARD: &[&str] = &[items::IMPACT_GLASSES];

pub const FLAME_GLOVES: &[&str] = &[items::ARAMID_GLOVE, items::RASPA_GLOVE];

pub const FLAME_CLOTHING: &[&str] = &[
    "BALACLAVA",
    "AVENTAL DE RASPA",
    "CAPUZ",
    "MANGA DE RASPA",
    "PERNEIRA DE RASPA",
    "VESTIM. COMPLETA DE RASPA",
];

pub const ROPE_ACCESS_CLOTHING: &[&str] = &[
    "BOTA CANO ALTO",
    "CAPACETE S/ABAS C/ CARNEIRA E PRESILHA DE QUEIXO EM Y",
    "CINTO DE SEG. TP PARA-QUEDISTA",
    "CINTO DE SEGURANÇA PARA RESGATE",
    "DUPLO TALABARTE EM Y OU LINHA DE VIDA CONJUGADA TRAVA QUEDA",
    "MACACÃO COM GOLA TIPO PADRE E BOLSOS FECHADOS",
];

pub const OVER_SEA_CLOTHING: &[&str] = &[
    "BOTA CANO ALTO",
    "CAPACETE S/ABAS C/ CARNEIRA E PRESILHA DE QUEIXO EM Y",
    "CINTO DE SEG. TP PARA-QUEDISTA",
    "CINTO DE SEGURANÇA PARA RESGATE",
    "COLETE SALVA VIDAS RF (apenas para trabalhos a quente)",
    "COLETE SALVA-VIDAS",
    "DUPLO TALABARTE EM Y OU LINHA DE VIDA CONJUGADA TRAVA QUEDA",
    "MACACÃO COM GOLA TIPO PADRE E BOLSOS FECHADOS",
];
