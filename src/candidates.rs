//! Candidate place-name extraction.
//!
//! The extractor only needs literal candidate strings; where they come from
//! is pluggable through [`CandidateNameExtractor`]. A statistical NER model
//! can sit behind it. [`ProperNounSpanExtractor`] is the deterministic
//! default and [`StaticCandidates`] replays a fixed list.

/// Returns the proper-noun strings found in a text.
///
/// No ordering or uniqueness guarantee is required of implementations.
pub trait CandidateNameExtractor {
    fn extract_candidate_names(&self, text: &str) -> Vec<String>;
}

impl<T: CandidateNameExtractor + ?Sized> CandidateNameExtractor for Box<T> {
    fn extract_candidate_names(&self, text: &str) -> Vec<String> {
        (**self).extract_candidate_names(text)
    }
}

/// Always answers with the same list, whatever the text.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidates {
    names: Vec<String>,
}

impl StaticCandidates {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl CandidateNameExtractor for StaticCandidates {
    fn extract_candidate_names(&self, _text: &str) -> Vec<String> {
        self.names.clone()
    }
}

/// Lowercase words allowed between two capitalized words of one name.
const CONNECTORS: &[&str] = &["de", "da", "do", "das", "dos"];

const LEADING_PUNCTUATION: &[char] = &['(', '[', '{', '"', '\'', '«', '“', '‘'];
const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '}', '"', '\'', '»', '”', '’',
];

/// Capitalized-span heuristic.
///
/// Finds maximal runs of capitalized words, allowing `de/da/do/das/dos`
/// between them, and emits every sub-span that starts and ends on a
/// capitalized word, up to `max_span_words` words long. Punctuation ends a
/// run. "Prefeitura de Ilhéus" yields `Prefeitura`, `Prefeitura de Ilhéus`
/// and `Ilhéus`, so the gazetteer can pick whichever span is a municipality.
#[derive(Debug, Clone)]
pub struct ProperNounSpanExtractor {
    max_span_words: usize,
}

impl ProperNounSpanExtractor {
    pub const DEFAULT_MAX_SPAN_WORDS: usize = 6;

    pub fn new(max_span_words: usize) -> Self {
        Self {
            max_span_words: max_span_words.max(1),
        }
    }

    fn runs<'a>(&self, text: &'a str) -> Vec<Vec<&'a str>> {
        let mut runs = Vec::new();
        let mut current: Vec<&'a str> = Vec::new();

        for raw in text.split_whitespace() {
            let word = raw.trim_start_matches(LEADING_PUNCTUATION);
            let breaks_before = word.len() != raw.len();
            let trimmed = word.trim_end_matches(TRAILING_PUNCTUATION);
            let breaks_after = trimmed.len() != word.len();

            if breaks_before {
                flush(&mut current, &mut runs);
            }

            if is_capitalized(trimmed) {
                current.push(trimmed);
            } else if !current.is_empty() && is_connector(trimmed) {
                current.push(trimmed);
            } else {
                flush(&mut current, &mut runs);
            }

            if breaks_after {
                flush(&mut current, &mut runs);
            }
        }
        flush(&mut current, &mut runs);
        runs
    }
}

impl Default for ProperNounSpanExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SPAN_WORDS)
    }
}

impl CandidateNameExtractor for ProperNounSpanExtractor {
    fn extract_candidate_names(&self, text: &str) -> Vec<String> {
        let mut spans = Vec::new();
        for run in self.runs(text) {
            for start in 0..run.len() {
                if !is_capitalized(run[start]) {
                    continue;
                }
                let end_limit = run.len().min(start + self.max_span_words);
                for end in start..end_limit {
                    if is_capitalized(run[end]) {
                        spans.push(run[start..=end].join(" "));
                    }
                }
            }
        }
        spans
    }
}

/// Close the current run, dropping connectors left dangling at its end.
fn flush<'a>(current: &mut Vec<&'a str>, runs: &mut Vec<Vec<&'a str>>) {
    while current.last().is_some_and(|w| is_connector(w)) {
        current.pop();
    }
    if !current.is_empty() {
        runs.push(std::mem::take(current));
    }
}

fn is_connector(word: &str) -> bool {
    CONNECTORS.contains(&word.to_lowercase().as_str())
}

/// Starts with an upper-case letter, or is an elided `d'Xxx` form.
fn is_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => true,
        Some('d') | Some('D') => {
            matches!(chars.next(), Some('\'') | Some('’'))
                && chars.next().is_some_and(char::is_uppercase)
        }
        _ => false,
    }
}
