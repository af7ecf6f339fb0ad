//! Answer domain and question codes shared by every form family.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Ternary answer used by the radio-button forms.
///
/// APN-1 and Environmental-Analysis only ever use `Yes`/`No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Answer {
    /// "Sim"
    #[serde(alias = "Sim")]
    Yes,
    /// "Não"
    #[serde(alias = "Não", alias = "Nao")]
    No,
    /// "NA"
    #[serde(alias = "NA")]
    NotApplicable,
}

impl Answer {
    /// The label the host forms show for this answer.
    pub fn label(self) -> &'static str {
        match self {
            Answer::Yes => "Sim",
            Answer::No => "Não",
            Answer::NotApplicable => "NA",
        }
    }

    pub fn is_yes(self) -> bool {
        self == Answer::Yes
    }

    /// Parse a host label leniently.
    ///
    /// Accepts the Portuguese labels with or without accents, single-letter
    /// abbreviations and the English words. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Answer> {
        match normalize(raw).as_str() {
            "SIM" | "S" | "YES" | "Y" => Some(Answer::Yes),
            "NAO" | "N" | "NO" => Some(Answer::No),
            "NA" | "N/A" | "N.A." | "NAO APLICAVEL" => Some(Answer::NotApplicable),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric question code, displayed as `Q001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionCode(u16);

impl QuestionCode {
    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    pub fn number(self) -> u16 {
        self.0
    }

    /// Extract the digits of `raw` and read them as a code.
    ///
    /// Host forms render the ordinal as `"7"`, `"07"` or `"Q007"`; all of
    /// them parse to `Q007`. Returns `None` when `raw` holds no digits or the
    /// number does not fit.
    pub fn parse(raw: &str) -> Option<QuestionCode> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok().map(QuestionCode)
    }
}

impl fmt::Display for QuestionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{:03}", self.0)
    }
}

impl TryFrom<String> for QuestionCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QuestionCode::parse(&value).ok_or_else(|| format!("not a question code: {:?}", value))
    }
}

impl From<QuestionCode> for String {
    fn from(code: QuestionCode) -> Self {
        code.to_string()
    }
}
