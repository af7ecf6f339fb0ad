//! Text normalization for keyword matching.
//!
//! Every matching rule in this crate operates on [`NormalizedText`], never on
//! raw input. Normalization upper-cases the text, drops diacritical marks
//! (acute, grave, circumflex, tilde, cedilla) while keeping the base letter,
//! and collapses whitespace runs into single spaces.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Text that has been canonicalized for matching.
///
/// Upper-case, free of combining marks, trimmed and whitespace-collapsed.
/// The only way to build one is through [`normalize`], so holding a
/// `NormalizedText` is proof that the invariant holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Normalize `raw` into matching form.
    pub fn new(raw: &str) -> Self {
        normalize(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Contiguous substring test. `phrase` must already be in normalized form.
    pub fn contains(&self, phrase: &str) -> bool {
        self.0.contains(phrase)
    }

    /// Space-join two normalized texts, skipping empty sides.
    pub fn join(&self, other: &NormalizedText) -> NormalizedText {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other.clone(),
            (_, true) => self.clone(),
            _ => NormalizedText(format!("{} {}", self.0, other.0)),
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize raw text for matching.
///
/// Never fails; empty or whitespace-only input yields an empty text.
/// Idempotent: `normalize(normalize(x).as_str()) == normalize(x)`.
///
/// ```
/// use hotwork_plan::normalize;
///
/// assert_eq!(normalize("  Acesso   por cordas ").as_str(), "ACESSO POR CORDAS");
/// assert_eq!(normalize("Ação Pressão").as_str(), "ACAO PRESSAO");
/// ```
pub fn normalize(raw: &str) -> NormalizedText {
    // Upper-case first: some upper-case mappings expand into base + combining
    // mark, which the decomposition pass then removes.
    let upper = raw.to_uppercase();
    let stripped: String = upper.nfd().filter(|c| !is_combining_mark(*c)).collect();
    NormalizedText(collapse_whitespace(&stripped))
}

/// Normalize an EPI item name for set comparison.
///
/// Item catalogs spell names with accents ("ÓCULOS", "NÃO APLICÁVEL"), so
/// accents are kept; only case and spacing are canonicalized.
pub fn normalize_item(raw: &str) -> String {
    collapse_whitespace(&raw.to_uppercase())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_cedilla() {
        assert_eq!(normalize("Espaço confinado").as_str(), "ESPACO CONFINADO");
        assert_eq!(normalize("Partes móveis").as_str(), "PARTES MOVEIS");
        assert_eq!(normalize("TRATAMENTO MECÂNICO").as_str(), "TRATAMENTO MECANICO");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("\tSOBRE\n\n o   mar  ").as_str(), "SOBRE O MAR");
    }

    #[test]
    fn empty_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n\t").is_empty());
    }

    #[test]
    fn join_skips_empty_sides() {
        let a = normalize("solda");
        let empty = normalize("");
        assert_eq!(a.join(&empty).as_str(), "SOLDA");
        assert_eq!(empty.join(&a).as_str(), "SOLDA");
        assert_eq!(a.join(&normalize("chama aberta")).as_str(), "SOLDA CHAMA ABERTA");
        assert!(empty.join(&empty).is_empty());
    }

    #[test]
    fn item_normalization_keeps_accents() {
        assert_eq!(normalize_item(" não   aplicável "), "NÃO APLICÁVEL");
    }
}
