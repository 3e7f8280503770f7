//! YAML configuration.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working setup for Bahia:
//!
//! ```yaml
//! state_code: BA
//! state_name: Bahia
//! gazetteer_path: data/municipios.json
//! min_publication_year: 2023
//! max_span_words: 6
//! # ambiguous_words: [saude, gloria, nova]
//! ```

use crate::candidates::ProperNounSpanExtractor;
use crate::context::AmbiguousWords;
use crate::extractor::{DEFAULT_STATE_NAME, MunicipalityExtractor};
use crate::gazetteer::Gazetteer;
use crate::normalize::{DEFAULT_STATE_CODE, RegionSuffixStripper};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Runtime settings for the detection pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Abbreviation stripped from text as `(BA)`, `- BA` or `, BA`.
    pub state_code: String,
    /// The state's own name, never reported as a municipality.
    pub state_name: String,
    /// JSON or YAML gazetteer file.
    pub gazetteer_path: Option<PathBuf>,
    /// Replaces the built-in ambiguous-word list when set.
    pub ambiguous_words: Option<Vec<String>>,
    /// Articles published before this year are dropped.
    pub min_publication_year: Option<i32>,
    /// Longest span the default candidate extractor emits.
    pub max_span_words: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_code: DEFAULT_STATE_CODE.to_string(),
            state_name: DEFAULT_STATE_NAME.to_string(),
            gazetteer_path: None,
            ambiguous_words: None,
            min_publication_year: Some(2023),
            max_span_words: ProperNounSpanExtractor::DEFAULT_MAX_SPAN_WORDS,
        }
    }
}

impl Config {
    /// Read a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// this structure.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!(?config, "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML text; blank text yields the defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// The ambiguous-word set this config selects.
    pub fn ambiguous_words(&self) -> AmbiguousWords {
        match &self.ambiguous_words {
            Some(words) => AmbiguousWords::from_words(words),
            None => AmbiguousWords::default(),
        }
    }

    /// Assemble the default extractor for `gazetteer` with these settings.
    ///
    /// # Errors
    ///
    /// Fails only if the region qualifier patterns cannot be compiled.
    pub fn build_extractor(
        &self,
        gazetteer: Arc<Gazetteer>,
    ) -> Result<MunicipalityExtractor, regex::Error> {
        let stripper = RegionSuffixStripper::new(&self.state_code)?;
        Ok(MunicipalityExtractor::new(gazetteer)
            .with_region(stripper, &self.state_name)
            .with_candidates(ProperNounSpanExtractor::new(self.max_span_words))
            .with_ambiguous_words(self.ambiguous_words()))
    }
}
