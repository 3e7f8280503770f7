//! Municipality detection for one article.
//!
//! [`MunicipalityExtractor`] ties the pieces together: candidate spans from
//! the title, gazetteer membership, the ambiguous-word gate, composite-name
//! suppression, and mapping to `"Name-Identifier"` strings.
//!
//! # Pipeline
//!
//! 1. Strip region qualifiers from title and body.
//! 2. Use the body as disambiguation context, or the title when the body is blank.
//! 3. Ask the [`CandidateNameExtractor`] for candidates found in the title.
//! 4. Keep a candidate when its normalized form is a municipality other than
//!    the state itself, passes the context gate if it is ambiguous, and is
//!    not a component of a multi-word municipality also among the candidates.
//! 5. Map survivors through the lookup table, first occurrence wins.

use crate::candidates::{CandidateNameExtractor, ProperNounSpanExtractor};
use crate::context::{AmbiguousWords, ContextClassifier, PatternContextClassifier};
use crate::gazetteer::Gazetteer;
use crate::normalize::{RegionSuffixStripper, normalize};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// The state name used when none is configured.
pub const DEFAULT_STATE_NAME: &str = "Bahia";

/// Finds the municipalities an article refers to.
///
/// Holds only immutable state after construction, so a single instance can be
/// shared across threads (wrap it in an `Arc`) as long as the candidate
/// extractor and classifier are `Sync`.
#[derive(Debug, Clone)]
pub struct MunicipalityExtractor<N = ProperNounSpanExtractor, C = PatternContextClassifier> {
    gazetteer: Arc<Gazetteer>,
    ambiguous: AmbiguousWords,
    candidates: N,
    classifier: C,
    stripper: RegionSuffixStripper,
    excluded: String,
}

impl MunicipalityExtractor {
    /// Extractor with the default candidate heuristic, pattern classifier,
    /// ambiguous-word list and `BA` region qualifiers.
    pub fn new(gazetteer: Arc<Gazetteer>) -> Self {
        let stripper = RegionSuffixStripper::default();
        Self {
            gazetteer,
            ambiguous: AmbiguousWords::default(),
            candidates: ProperNounSpanExtractor::default(),
            classifier: PatternContextClassifier::new(stripper.clone()),
            stripper,
            excluded: normalize(DEFAULT_STATE_NAME),
        }
    }
}

impl<N> MunicipalityExtractor<N, PatternContextClassifier> {
    /// Region qualifiers to strip and the state name that never counts as a match.
    ///
    /// The pattern classifier is rebuilt with the same qualifiers, so title,
    /// body and context are all stripped alike. Call this before
    /// [`Self::with_classifier`] when swapping in another strategy.
    pub fn with_region(mut self, stripper: RegionSuffixStripper, state_name: &str) -> Self {
        self.classifier = PatternContextClassifier::new(stripper.clone());
        self.stripper = stripper;
        self.excluded = normalize(state_name.trim());
        self
    }
}

impl<N, C> MunicipalityExtractor<N, C> {
    /// Swap the candidate source, e.g. for a real NER model or a test stub.
    pub fn with_candidates<M>(self, candidates: M) -> MunicipalityExtractor<M, C> {
        MunicipalityExtractor {
            gazetteer: self.gazetteer,
            ambiguous: self.ambiguous,
            candidates,
            classifier: self.classifier,
            stripper: self.stripper,
            excluded: self.excluded,
        }
    }

    /// Swap the geographic-context strategy.
    pub fn with_classifier<D>(self, classifier: D) -> MunicipalityExtractor<N, D> {
        MunicipalityExtractor {
            gazetteer: self.gazetteer,
            ambiguous: self.ambiguous,
            candidates: self.candidates,
            classifier,
            stripper: self.stripper,
            excluded: self.excluded,
        }
    }

    pub fn with_ambiguous_words(mut self, ambiguous: AmbiguousWords) -> Self {
        self.ambiguous = ambiguous;
        self
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }
}

impl<N, C> MunicipalityExtractor<N, C>
where
    N: CandidateNameExtractor,
    C: ContextClassifier,
{
    /// Confirmed municipalities for an article, as `"Name-Identifier"` strings
    /// in first-detection order without duplicates.
    ///
    /// A confirmed name that sits word-for-word inside another confirmed,
    /// longer name ("São Félix" within "São Félix do Coribe") is dropped.
    ///
    /// # Arguments
    ///
    /// * `title` - Headline; candidates are taken from it
    /// * `body` - Article text used as disambiguation context; may be blank
    ///
    /// # Returns
    ///
    /// The tagged municipalities. Never fails: blank input gives an empty result.
    pub fn extract_municipalities(&self, title: &str, body: &str) -> Vec<String> {
        if title.trim().is_empty() && body.trim().is_empty() {
            return Vec::new();
        }

        let title = self.stripper.strip(title);
        let body = self.stripper.strip(body);
        let context = if body.trim().is_empty() { &title } else { &body };

        let raw = self.candidates.extract_candidate_names(&title);
        let detected: HashSet<String> = raw.iter().map(|name| normalize(name.trim())).collect();

        let mut confirmed: Vec<String> = Vec::new();
        for name in &raw {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let key = normalize(name);

            if key == self.excluded || !self.gazetteer.contains(&key) {
                continue;
            }
            if self.ambiguous.contains(&key)
                && !self.classifier.is_geographic_context(name, context)
            {
                trace!(candidate = name, "Ambiguous word without geographic context");
                continue;
            }
            if self.gazetteer.composites().is_shadowed_by(&key, &detected) {
                trace!(candidate = name, "Component of a detected multi-word municipality");
                continue;
            }
            if !confirmed.contains(&key) {
                confirmed.push(key);
            }
        }

        let found: Vec<String> = confirmed
            .iter()
            .filter(|key| {
                let nested = confirmed.iter().any(|other| is_nested_name(key, other));
                if nested {
                    trace!(candidate = key.as_str(), "Contained in a longer detected name");
                }
                !nested
            })
            .filter_map(|key| self.gazetteer.lookup(key))
            .map(str::to_string)
            .unique()
            .collect();

        debug!(
            title = %truncate_for_log(&title, 80),
            candidates = raw.len(),
            found = ?found,
            "Detected municipalities"
        );
        found
    }

    /// [`Self::extract_municipalities`] joined with `,`, the form stored on
    /// article records before row expansion.
    pub fn extract_joined(&self, title: &str, body: &str) -> String {
        self.extract_municipalities(title, body).join(",")
    }
}

/// Whether `inner` occurs in the longer name `outer` on word boundaries.
fn is_nested_name(inner: &str, outer: &str) -> bool {
    inner.len() < outer.len() && format!(" {outer} ").contains(&format!(" {inner} "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::StaticCandidates;
    use crate::gazetteer::StaticGazetteer;
    use crate::gazetteer::tests::fixture;

    fn stubbed(names: &[&str]) -> MunicipalityExtractor<StaticCandidates> {
        MunicipalityExtractor::new(Arc::new(fixture()))
            .with_candidates(StaticCandidates::new(names.iter().copied()))
    }

    #[test]
    fn test_blank_article_yields_nothing() {
        let extractor = stubbed(&["Ilhéus"]);
        assert!(extractor.extract_municipalities("", "").is_empty());
        assert!(extractor.extract_municipalities("  ", "\n").is_empty());
    }

    #[test]
    fn test_state_name_is_never_a_match() {
        let extractor = stubbed(&["Prefeitura", "Ilhéus", "Bahia", "BAHIA"]);
        let found = extractor.extract_municipalities("Prefeitura de Ilhéus investigada", "");
        assert_eq!(found, vec!["Ilhéus-2913606"]);
        assert!(!found.iter().any(|m| m.starts_with("Bahia")));
    }

    #[test]
    fn test_default_candidates_from_title() {
        let extractor = MunicipalityExtractor::new(Arc::new(fixture()));
        let found = extractor.extract_municipalities("Prefeitura de Ilhéus investigada", "");
        assert_eq!(found, vec!["Ilhéus-2913606"]);
    }

    #[test]
    fn test_ambiguous_word_needs_context() {
        let extractor = stubbed(&["Saúde"]);
        assert!(extractor
            .extract_municipalities("Saúde em crise", "O programa de saúde pública foi cortado")
            .is_empty());
        assert_eq!(
            extractor.extract_municipalities("Saúde em crise", "A Prefeitura de Saúde anunciou cortes"),
            vec!["Saúde-2929800"]
        );
    }

    #[test]
    fn test_title_is_context_when_body_blank() {
        let extractor = stubbed(&["Glória"]);
        assert_eq!(
            extractor.extract_municipalities("Operação em Glória (BA) prende prefeito", "  "),
            vec!["Glória-2911402"]
        );
        assert!(extractor
            .extract_municipalities("Glória eterna ao campeão", "")
            .is_empty());
    }

    #[test]
    fn test_composite_suppresses_component() {
        let extractor = stubbed(&["Santa Cruz", "Cruz"]);
        assert_eq!(
            extractor.extract_municipalities("Fraude em Santa Cruz", ""),
            vec!["Santa Cruz-9990001"]
        );

        let alone = stubbed(&["Cruz"]);
        assert_eq!(
            alone.extract_municipalities("Fraude em Cruz", ""),
            vec!["Cruz-9990002"]
        );
    }

    #[test]
    fn test_composite_suppression_uses_raw_candidates() {
        // The component is dropped even though the full name would itself be
        // rejected later; only candidate presence is checked.
        let g = Arc::new(fixture());
        let extractor = MunicipalityExtractor::new(g)
            .with_candidates(StaticCandidates::new(["Feira de Santana", "Santana"]))
            .with_ambiguous_words(AmbiguousWords::from_words(["feira de santana"]));
        assert!(extractor
            .extract_municipalities("Feira de Santana", "sem contexto")
            .is_empty());
    }

    #[test]
    fn test_duplicates_and_accent_variants_collapse_in_order() {
        let extractor = stubbed(&["Itabuna", "Ilhéus", "ILHEUS", "Itabuna", "Salvador"]);
        assert_eq!(
            extractor.extract_municipalities("Itabuna e Ilhéus", ""),
            vec!["Itabuna-2914802", "Ilhéus-2913606", "Salvador-2927408"]
        );
    }

    #[test]
    fn test_unknown_and_blank_candidates_are_skipped() {
        let extractor = stubbed(&["", "   ", "Gotham", "Salvador"]);
        assert_eq!(
            extractor.extract_municipalities("Notícia", ""),
            vec!["Salvador-2927408"]
        );
    }

    #[test]
    fn test_nested_multi_word_name_is_not_reported_twice() {
        let gazetteer = Gazetteer::load(&StaticGazetteer::new([
            ("São Félix", "2929206"),
            ("São Félix do Coribe", "2929255"),
        ]))
        .unwrap();
        let extractor = MunicipalityExtractor::new(Arc::new(gazetteer));

        assert_eq!(
            extractor.extract_municipalities("Prefeitura de São Félix do Coribe é alvo da PF", ""),
            vec!["São Félix do Coribe-2929255"]
        );
        assert_eq!(
            extractor.extract_municipalities("Prefeitura de São Félix é alvo da PF", ""),
            vec!["São Félix-2929206"]
        );
    }

    #[test]
    fn test_nested_name_needs_word_boundaries() {
        assert!(is_nested_name("sao felix", "sao felix do coribe"));
        assert!(is_nested_name("coribe", "sao felix do coribe"));
        assert!(!is_nested_name("sao fe", "sao felix do coribe"));
        assert!(!is_nested_name("sao felix", "sao felix"));
    }

    #[test]
    fn test_with_region_also_rebuilds_classifier() {
        let extractor = MunicipalityExtractor::new(Arc::new(fixture()))
            .with_region(RegionSuffixStripper::new("SE").unwrap(), "Sergipe");
        assert!(
            extractor
                .classifier
                .is_geographic_context("Saúde", "Saúde - SE prefeitura divulga nota")
        );
        assert!(
            !extractor
                .classifier
                .is_geographic_context("Saúde", "Saúde - BA prefeitura divulga nota")
        );
    }

    #[test]
    fn test_deterministic() {
        let extractor = MunicipalityExtractor::new(Arc::new(fixture()));
        let title = "Operação em Itabuna e Vitória da Conquista (BA) mira prefeituras de Salvador";
        let body = "A PF cumpriu mandados em Itabuna.";
        let first = extractor.extract_municipalities(title, body);
        let second = extractor.extract_municipalities(title, body);
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec!["Itabuna-2914802", "Vitória da Conquista-2933307", "Salvador-2927408"]
        );
    }

    #[test]
    fn test_extract_joined() {
        let extractor = stubbed(&["Ilhéus", "Itabuna"]);
        assert_eq!(
            extractor.extract_joined("Ilhéus e Itabuna", ""),
            "Ilhéus-2913606,Itabuna-2914802"
        );
        assert_eq!(extractor.extract_joined("", ""), "");
    }

    #[test]
    fn test_custom_classifier() {
        struct Always;
        impl ContextClassifier for Always {
            fn is_geographic_context(&self, _: &str, _: &str) -> bool {
                true
            }
        }
        let extractor = stubbed(&["Saúde"]).with_classifier(Always);
        assert_eq!(
            extractor.extract_municipalities("Saúde", "o programa de saúde"),
            vec!["Saúde-2929800"]
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let extractor = Arc::new(MunicipalityExtractor::new(Arc::new(fixture())));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let extractor = Arc::clone(&extractor);
                std::thread::spawn(move || {
                    extractor.extract_municipalities("Prefeitura de Ilhéus investigada", "")
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["Ilhéus-2913606"]);
        }
    }
}
