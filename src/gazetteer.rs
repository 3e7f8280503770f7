//! Canonical municipality list and the lookup structures built from it.
//!
//! The gazetteer is loaded once at startup from a [`GazetteerSource`] and
//! shared read-only by every component afterwards. An unreadable or empty
//! source is fatal: nothing can be detected without it.
//!
//! # File format
//!
//! [`FileGazetteer`] reads a JSON or YAML mapping from display name to
//! identifier. Identifiers may be strings or integers:
//!
//! ```json
//! { "Salvador": 2927408, "Feira de Santana": "2910800" }
//! ```

use crate::composite::CompositeIndex;
use crate::normalize::normalize;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Startup failures while loading the gazetteer.
#[derive(Debug, Error)]
pub enum GazetteerError {
    #[error("failed to read gazetteer file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON gazetteer '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed YAML gazetteer '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported gazetteer format for '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
    #[error("gazetteer is empty")]
    Empty,
}

/// One municipality as officially written, with its stable identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Municipality {
    /// Display name, may contain spaces and accents.
    pub name: String,
    /// Opaque identifier, never reused across municipalities.
    pub identifier: String,
}

impl Municipality {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
        }
    }

    /// Accent- and case-folded name used as the lookup key.
    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }

    /// The `"Name-Identifier"` form stored on article records.
    pub fn tagged(&self) -> String {
        format!("{}-{}", self.name, self.identifier)
    }
}

/// Anything that can supply `(display name, identifier)` pairs.
pub trait GazetteerSource {
    fn load(&self) -> Result<Vec<(String, String)>, GazetteerError>;
}

/// In-memory pairs, for embedding a dataset or for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticGazetteer {
    entries: Vec<(String, String)>,
}

impl StaticGazetteer {
    pub fn new<N, I>(entries: impl IntoIterator<Item = (N, I)>) -> Self
    where
        N: Into<String>,
        I: ToString,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, id)| (name.into(), id.to_string()))
                .collect(),
        }
    }
}

impl GazetteerSource for StaticGazetteer {
    fn load(&self) -> Result<Vec<(String, String)>, GazetteerError> {
        Ok(self.entries.clone())
    }
}

/// A JSON or YAML file mapping display names to identifiers.
#[derive(Debug, Clone)]
pub struct FileGazetteer {
    path: PathBuf,
}

impl FileGazetteer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Identifiers show up both quoted and as bare numbers in published datasets.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Number(u64),
    Text(String),
}

impl RawIdentifier {
    fn into_string(self) -> String {
        match self {
            RawIdentifier::Number(n) => n.to_string(),
            RawIdentifier::Text(s) => s.trim().to_string(),
        }
    }
}

impl GazetteerSource for FileGazetteer {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<(String, String)>, GazetteerError> {
        let path = &self.path;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let raw = std::fs::read_to_string(path).map_err(|source| GazetteerError::Io {
            path: path.clone(),
            source,
        })?;

        let entries: BTreeMap<String, RawIdentifier> = match extension.as_deref() {
            Some("json") => serde_json::from_str(&raw).map_err(|source| GazetteerError::Json {
                path: path.clone(),
                source,
            })?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&raw).map_err(|source| GazetteerError::Yaml {
                    path: path.clone(),
                    source,
                })?
            }
            _ => return Err(GazetteerError::UnsupportedFormat(path.clone())),
        };

        Ok(entries
            .into_iter()
            .map(|(name, id)| (name.trim().to_string(), id.into_string()))
            .collect())
    }
}

/// The loaded municipality list with its lookup table and composite index.
///
/// Built once, then only read. It is `Send + Sync`, so one instance behind an
/// `Arc` can serve any number of concurrent extractions.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    municipalities: Vec<Municipality>,
    lookup: HashMap<String, String>,
    names: HashSet<String>,
    composites: CompositeIndex,
}

impl Gazetteer {
    /// Load from `source` and build every lookup structure.
    ///
    /// # Arguments
    ///
    /// * `source` - Where the name-to-identifier pairs come from
    ///
    /// # Returns
    ///
    /// A gazetteer holding the lookup table, the normalized name set and the
    /// composite-name index, ready to be shared behind an `Arc`.
    ///
    /// # Errors
    ///
    /// Propagates the source's error, or [`GazetteerError::Empty`] when it
    /// yields no usable entries.
    #[instrument(level = "info", skip_all)]
    pub fn load(source: &impl GazetteerSource) -> Result<Self, GazetteerError> {
        let entries = source.load()?;
        let gazetteer = Self::from_municipalities(
            entries
                .into_iter()
                .filter(|(name, _)| !name.trim().is_empty())
                .map(|(name, id)| Municipality::new(name, id)),
        );
        if gazetteer.is_empty() {
            return Err(GazetteerError::Empty);
        }
        info!(
            municipalities = gazetteer.len(),
            composites = gazetteer.composites.len(),
            "Loaded gazetteer"
        );
        Ok(gazetteer)
    }

    /// Build the lookup table and composite index from `municipalities`.
    ///
    /// Names that normalize to the same key overwrite earlier ones.
    pub fn from_municipalities(municipalities: impl IntoIterator<Item = Municipality>) -> Self {
        let municipalities: Vec<Municipality> = municipalities.into_iter().collect();

        let mut lookup = HashMap::with_capacity(municipalities.len());
        for municipality in &municipalities {
            let key = municipality.normalized_name();
            if let Some(previous) = lookup.insert(key.clone(), municipality.tagged()) {
                warn!(%key, %previous, replacement = %municipality.tagged(), "Duplicate normalized municipality name");
            }
        }

        let names: HashSet<String> = lookup.keys().cloned().collect();
        let normalized: Vec<String> = municipalities
            .iter()
            .map(Municipality::normalized_name)
            .collect();
        let composites = CompositeIndex::build(normalized.iter().map(String::as_str), &names);

        Self {
            municipalities,
            lookup,
            names,
            composites,
        }
    }

    /// `"Name-Identifier"` for a normalized name.
    ///
    /// # Arguments
    ///
    /// * `normalized` - A key produced by [`crate::normalize::normalize`]
    ///
    /// # Returns
    ///
    /// The tagged display name, or `None` for names outside the gazetteer.
    pub fn lookup(&self, normalized: &str) -> Option<&str> {
        self.lookup.get(normalized).map(String::as_str)
    }

    /// True when `normalized` is a key of the lookup table.
    pub fn contains(&self, normalized: &str) -> bool {
        self.names.contains(normalized)
    }

    /// Every normalized municipality name.
    pub fn normalized_names(&self) -> &HashSet<String> {
        &self.names
    }

    pub fn composites(&self) -> &CompositeIndex {
        &self.composites
    }

    pub fn municipalities(&self) -> &[Municipality] {
        &self.municipalities
    }

    /// Number of distinct normalized names.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
