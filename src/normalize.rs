//! Text normalization used as the comparison key for municipality names.
//!
//! Two concerns live here:
//! - [`normalize`]: accent and case folding, producing lookup keys
//! - [`RegionSuffixStripper`]: removal of state qualifiers such as `(BA)`,
//!   `- BA` and `, BA` that news sources append to place names
//!
//! Everything in this module is pure and infallible.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Default state abbreviation stripped from free text.
pub const DEFAULT_STATE_CODE: &str = "BA";

static DEFAULT_STRIPPER: Lazy<RegionSuffixStripper> = Lazy::new(|| {
    RegionSuffixStripper::new(DEFAULT_STATE_CODE).expect("escaped state code is a valid pattern")
});

/// Fold case and accents: `"Glória"`, `"GLORIA"` and `"gloria"` all become `"gloria"`.
///
/// # Arguments
///
/// * `text` - Any text; blank input gives an empty string
///
/// # Returns
///
/// The text lower-cased, decomposed (NFKD) and stripped of combining marks.
/// The result is idempotent: `normalize(&normalize(t)) == normalize(t)`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Strip accents but keep the original casing.
///
/// Used where capitalization still carries meaning, e.g. telling a proper
/// noun ("Saúde", the town) from a common noun ("saúde", health).
pub fn fold_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// [`normalize`] for optional fields; absent text normalizes to `""`.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Remove `(BA)`, `- BA` and `, BA` qualifiers using the default state code.
///
/// # Examples
///
/// ```
/// use municipio_news::normalize::strip_region_suffix;
///
/// assert_eq!(strip_region_suffix("Salvador (BA)"), "Salvador");
/// assert_eq!(strip_region_suffix("Feira de Santana - BA"), "Feira de Santana");
/// ```
pub fn strip_region_suffix(text: &str) -> String {
    DEFAULT_STRIPPER.strip(text)
}

/// Removes state qualifiers for one state abbreviation.
///
/// Matching is case-insensitive and tolerates whitespace around the
/// qualifier. Qualifiers are removed wherever they occur, not only at the
/// end, and the result is trimmed.
#[derive(Debug, Clone)]
pub struct RegionSuffixStripper {
    parenthesized: Regex,
    dashed: Regex,
    comma: Regex,
}

impl RegionSuffixStripper {
    /// Build the qualifier patterns for `state_code` (e.g. `"BA"`).
    ///
    /// The code is escaped before being embedded in the patterns, so this
    /// only fails if the regex engine rejects the compiled size.
    pub fn new(state_code: &str) -> Result<Self, regex::Error> {
        let code = regex::escape(state_code.trim());
        Ok(Self {
            parenthesized: Regex::new(&format!(r"(?i)\s*\(\s*{code}\s*\)\s*"))?,
            dashed: Regex::new(&format!(r"(?i)\s*-\s*{code}\b\s*"))?,
            comma: Regex::new(&format!(r"(?i)\s*,\s*{code}\b"))?,
        })
    }

    /// Remove every qualifier occurrence from `text` and trim the ends.
    pub fn strip(&self, text: &str) -> String {
        let text = remove_joining(&self.parenthesized, text);
        let text = remove_joining(&self.dashed, &text);
        let text = self.comma.replace_all(&text, "");
        text.trim().to_string()
    }
}

impl Default for RegionSuffixStripper {
    fn default() -> Self {
        DEFAULT_STRIPPER.clone()
    }
}

/// Replace matches of `re` so that the words on either side stay separated:
/// a single space between two words, nothing next to punctuation or the ends.
fn remove_joining(re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &Captures<'_>| {
        let Some(m) = caps.get(0) else {
            return String::new();
        };
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        match (before, after) {
            (Some(b), Some(a)) if b.is_alphanumeric() && a.is_alphanumeric() => " ".to_string(),
            _ => String::new(),
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_case_and_accents() {
        assert_eq!(normalize("Glória"), "gloria");
        assert_eq!(normalize("GLORIA"), "gloria");
        assert_eq!(normalize("gloria"), "gloria");
        assert_eq!(normalize("Ilhéus"), "ilheus");
        assert_eq!(normalize("Camaçari"), "camacari");
        assert_eq!(normalize("Dias d'Ávila"), "dias d'avila");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for text in [
            "Vitória da Conquista",
            "SÃO FÉLIX DO CORIBE",
            "Prefeitura de Ilhéus (BA)",
            "",
            "ﬁ ligature and ½",
        ] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn test_fold_accents_keeps_case() {
        assert_eq!(fold_accents("Saúde"), "Saude");
        assert_eq!(fold_accents("CÂMARA de Glória"), "CAMARA de Gloria");
    }

    #[test]
    fn test_normalize_opt() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("Jequié")), "jequie");
    }

    #[test]
    fn test_strip_region_suffix_trailing_forms() {
        assert_eq!(strip_region_suffix("Salvador (BA)"), "Salvador");
        assert_eq!(strip_region_suffix("Feira de Santana - BA"), "Feira de Santana");
        assert_eq!(strip_region_suffix("Ilhéus, BA"), "Ilhéus");
        assert_eq!(strip_region_suffix("Itabuna (ba)"), "Itabuna");
        assert_eq!(strip_region_suffix("Juazeiro-BA"), "Juazeiro");
    }

    #[test]
    fn test_strip_region_suffix_embedded() {
        assert_eq!(
            strip_region_suffix("Prefeitura de Jequié (BA) abre licitação"),
            "Prefeitura de Jequié abre licitação"
        );
        assert_eq!(
            strip_region_suffix("Operação em Ilhéus - BA: três presos"),
            "Operação em Ilhéus: três presos"
        );
        assert_eq!(
            strip_region_suffix("Polícia prende suspeito em Itabuna, BA, nesta terça"),
            "Polícia prende suspeito em Itabuna, nesta terça"
        );
    }

    #[test]
    fn test_strip_region_suffix_leaves_words_starting_with_code() {
        assert_eq!(strip_region_suffix("Salvador-Bahia"), "Salvador-Bahia");
        assert_eq!(strip_region_suffix("Itabuna, Barra e Ilhéus"), "Itabuna, Barra e Ilhéus");
    }

    #[test]
    fn test_stripper_for_other_state() {
        let stripper = RegionSuffixStripper::new("SE").unwrap();
        assert_eq!(stripper.strip("Aracaju (SE)"), "Aracaju");
        assert_eq!(stripper.strip("Salvador (BA)"), "Salvador (BA)");
    }
}
