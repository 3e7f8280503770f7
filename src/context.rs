//! Geographic-context heuristics for municipality names that double as
//! ordinary Portuguese words.
//!
//! "Saúde" is a municipality and also the word for health. A candidate in the
//! [`AmbiguousWords`] set is only accepted when a [`ContextClassifier`] says
//! the surrounding text uses it as a place. [`PatternContextClassifier`] does
//! this with hand-written syntax patterns, favouring precision over recall.

use crate::normalize::{RegionSuffixStripper, fold_accents, normalize};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::trace;

/// Municipality names that are frequently plain vocabulary.
pub const DEFAULT_AMBIGUOUS_WORDS: &[&str] = &[
    "saude", "gloria", "vitoria", "esperanca", "nazare", "america", "campo", "alegre", "formosa",
    "nova", "belo", "bonito", "feira", "central", "santana", "wagner",
];

static DEFAULT_SET: Lazy<AmbiguousWords> =
    Lazy::new(|| AmbiguousWords::from_words(DEFAULT_AMBIGUOUS_WORDS.iter().copied()));

/// Normalized words that need geographic context before they count as a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousWords {
    words: HashSet<String>,
}

impl AmbiguousWords {
    /// Build the set, normalizing each entry so `"Nazaré"` and `"nazare"` agree.
    pub fn from_words<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(|w| normalize(w.as_ref().trim()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// `normalized` must already be the output of [`normalize`].
    pub fn contains(&self, normalized: &str) -> bool {
        self.words.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for AmbiguousWords {
    fn default() -> Self {
        DEFAULT_SET.clone()
    }
}

/// Decides whether `candidate` is used as a place name inside `context`.
///
/// Implementations must be pure and must not panic on any input; a
/// statistical model can replace [`PatternContextClassifier`] behind this
/// trait without touching the extractor.
pub trait ContextClassifier {
    /// Whether `candidate` is used as a place name in `context`.
    ///
    /// # Arguments
    ///
    /// * `candidate` - The name as it appeared in the article
    /// * `context` - Surrounding text, usually the article body
    ///
    /// # Returns
    ///
    /// `true` only on positive evidence; blank input is `false`.
    fn is_geographic_context(&self, candidate: &str, context: &str) -> bool;
}

impl<T: ContextClassifier + ?Sized> ContextClassifier for Box<T> {
    fn is_geographic_context(&self, candidate: &str, context: &str) -> bool {
        (**self).is_geographic_context(candidate, context)
    }
}

/// Syntax-pattern classifier.
///
/// The context has its region qualifiers removed and its accents folded
/// (case kept). A candidate counts as a place when, written as a proper noun
/// (initial capital), it appears:
///
/// 1. after a governing body and a linking preposition:
///    `prefeitura|município|cidade|câmara` + `de|do|da|dos|das`;
/// 2. right after a locative preposition: `em|na|no|de|do|da|para|às`;
/// 3. right before a governing body: `prefeitura|município|cidade`.
///
/// Keywords match case-insensitively; the capital on the candidate is what
/// separates "Prefeitura de Saúde" from "programa de saúde". The keyword
/// patterns are compiled once and shared; the candidate itself is located by
/// scanning the context, so no regex is built per call.
#[derive(Debug, Clone, Default)]
pub struct PatternContextClassifier {
    stripper: RegionSuffixStripper,
}

static INSTITUTIONAL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:prefeitura|municipio|cidade|camara)\s+(?:de|do|da|dos|das)\s+$")
        .expect("institutional prefix pattern is valid")
});
static LOCATIVE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:em|na|no|de|do|da|para|as)\s+$").expect("locative pattern is valid")
});
static INSTITUTIONAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s+(?:prefeitura|municipio|cidade)\b")
        .expect("institutional suffix pattern is valid")
});

impl PatternContextClassifier {
    pub fn new(stripper: RegionSuffixStripper) -> Self {
        Self { stripper }
    }
}

impl ContextClassifier for PatternContextClassifier {
    fn is_geographic_context(&self, candidate: &str, context: &str) -> bool {
        let folded = fold_accents(candidate.trim());
        let words: Vec<&str> = folded.split_whitespace().collect();
        if words.is_empty() {
            return false;
        }

        let text = fold_accents(&self.stripper.strip(context));
        for (start, _) in text.char_indices() {
            let Some(len) = proper_noun_len(&text[start..], &words) else {
                continue;
            };
            if let Some(label) = matching_pattern(&text, start, start + len) {
                trace!(candidate, pattern = label, "Geographic context matched");
                return true;
            }
        }
        false
    }
}

/// Which pattern, if any, accepts the name occupying `text[start..end]`.
fn matching_pattern(text: &str, start: usize, end: usize) -> Option<&'static str> {
    let (before, name, after) = (&text[..start], &text[start..end], &text[end..]);

    if word_boundary(name.chars().next_back(), after.chars().next()) {
        if INSTITUTIONAL_PREFIX.is_match(before) {
            return Some("institutional_prefix");
        }
        if LOCATIVE_PREFIX.is_match(before) {
            return Some("locative_preposition");
        }
    }
    if word_boundary(before.chars().next_back(), name.chars().next())
        && INSTITUTIONAL_SUFFIX.is_match(after)
    {
        return Some("institutional_suffix");
    }
    None
}

/// Byte length of `words` written as a proper noun at the start of `text`:
/// first letter upper case, the rest compared case-insensitively, any run of
/// whitespace between words.
fn proper_noun_len(text: &str, words: &[&str]) -> Option<usize> {
    if !text.starts_with(char::is_uppercase) {
        return None;
    }
    let mut pos = 0;
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let rest = &text[pos..];
            let gap = rest.len() - rest.trim_start().len();
            if gap == 0 {
                return None;
            }
            pos += gap;
        }
        pos += prefix_len_ignore_case(&text[pos..], word)?;
    }
    Some(pos)
}

fn prefix_len_ignore_case(text: &str, word: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    for expected in word.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(text.len(), |(i, _)| i))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `\b` between two neighbouring characters (`None` at either end of the text).
fn word_boundary(left: Option<char>, right: Option<char>) -> bool {
    left.is_some_and(is_word_char) != right.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(candidate: &str, context: &str) -> bool {
        PatternContextClassifier::default().is_geographic_context(candidate, context)
    }

    #[test]
    fn test_default_ambiguous_words_are_normalized() {
        let words = AmbiguousWords::default();
        assert!(words.contains("saude"));
        assert!(words.contains("nazare"));
        assert!(words.contains("wagner"));
        assert!(!words.contains("Saúde"));
        assert!(!words.contains("salvador"));
        assert_eq!(words.len(), DEFAULT_AMBIGUOUS_WORDS.len());
    }

    #[test]
    fn test_custom_ambiguous_words() {
        let words = AmbiguousWords::from_words(["Nazaré", "  Wagner ", "", "GLÓRIA"]);
        assert_eq!(words.len(), 3);
        assert!(words.contains("nazare"));
        assert!(words.contains("gloria"));
    }

    #[test]
    fn test_common_noun_usage_is_not_geographic() {
        assert!(!classify("Saúde", "O programa de saúde pública foi cortado"));
        assert!(!classify("Nova", "A nova lei entra em vigor"));
        assert!(!classify("Glória", "Um momento de glória para o time"));
    }

    #[test]
    fn test_institutional_prefix() {
        assert!(classify("Saúde", "A Prefeitura de Saúde anunciou cortes"));
        assert!(classify("Glória", "vereadores da Câmara de Glória aprovaram"));
        assert!(classify("Santana", "o município de Santana registrou"));
        assert!(classify("saúde", "PREFEITURA DE SAÚDE É ALVO DE OPERAÇÃO"));
    }

    #[test]
    fn test_locative_preposition() {
        assert!(classify("Glória", "Operação em Glória (BA) prende prefeito"));
        assert!(classify("Saúde", "Investigação chega às Saúde"));
        assert!(classify("Feira", "Ônibus para Feira sai às 8h"));
    }

    #[test]
    fn test_institutional_suffix() {
        assert!(classify("Glória", "Glória Prefeitura divulga nota"));
        assert!(classify("Esperança", "Esperança cidade histórica"));
    }

    #[test]
    fn test_region_qualifier_does_not_block_match() {
        assert!(classify("Santana", "suspeitos presos em Santana - BA"));
        assert!(classify("Saúde", "Câmara de Saúde, BA, aprova contas"));
    }

    #[test]
    fn test_whole_word_only() {
        assert!(!classify("Nova", "em Novas regras"));
        assert!(!classify("Campo", "de Campos diferentes"));
    }

    #[test]
    fn test_blank_inputs() {
        assert!(!classify("", "Prefeitura de Saúde"));
        assert!(!classify("   ", "Prefeitura de Saúde"));
        assert!(!classify("Saúde", ""));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        assert!(!classify("Saúde (", "Prefeitura de Saúde ("));
        assert!(classify("Dias d'Ávila", "Prefeitura de Dias d'Ávila"));
    }

    #[test]
    fn test_multi_word_candidate_with_irregular_spacing() {
        assert!(classify("Vitória da Conquista", "a Prefeitura de Vitória  da\tConquista"));
        assert!(!classify("Vitória da Conquista", "Prefeitura de Vitória da Conquistas"));
    }

    #[test]
    fn test_keyword_patterns_shared_across_candidates() {
        let classifier = PatternContextClassifier::default();
        let context = "Prefeitura de Glória e Câmara de Saúde aprovam convênio";
        for _ in 0..3 {
            assert!(classifier.is_geographic_context("Glória", context));
            assert!(classifier.is_geographic_context("Saúde", context));
            assert!(!classifier.is_geographic_context("Nova", context));
        }
    }

    #[test]
    fn test_boxed_classifier() {
        let boxed: Box<dyn ContextClassifier> = Box::new(PatternContextClassifier::default());
        assert!(boxed.is_geographic_context("Saúde", "na Saúde"));
    }
}
