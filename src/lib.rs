//! # municipio_news
//!
//! Detects which municipalities of a state (Bahia by default) a news article
//! refers to, despite accents, region qualifiers such as `(BA)`, place names
//! that are also common words, and multi-word names that contain other
//! municipality names.
//!
//! ## Pipeline
//!
//! ```text
//! HarvestedArticle ──annotate──▶ ArticleRecord ──expand_rows──▶ ExpandedRow
//!                       │
//!                       └─ MunicipalityExtractor
//!                            ├─ Gazetteer (lookup table + CompositeIndex)
//!                            ├─ CandidateNameExtractor (NER stand-in)
//!                            └─ ContextClassifier (ambiguous words)
//! ```
//!
//! ## Example
//!
//! ```
//! use municipio_news::gazetteer::{Gazetteer, StaticGazetteer};
//! use municipio_news::MunicipalityExtractor;
//! use std::sync::Arc;
//!
//! let gazetteer = Gazetteer::load(&StaticGazetteer::new([
//!     ("Ilhéus", "2913606"),
//!     ("Bahia", "0"),
//! ]))
//! .unwrap();
//! let extractor = MunicipalityExtractor::new(Arc::new(gazetteer));
//!
//! let found = extractor.extract_municipalities("Prefeitura de Ilhéus (BA) investigada", "");
//! assert_eq!(found, vec!["Ilhéus-2913606"]);
//! ```

pub mod annotate;
pub mod candidates;
pub mod composite;
pub mod config;
pub mod context;
pub mod dates;
pub mod expand;
pub mod extractor;
pub mod gazetteer;
pub mod models;
pub mod normalize;
pub mod utils;

pub use annotate::annotate_articles;
pub use candidates::{CandidateNameExtractor, ProperNounSpanExtractor, StaticCandidates};
pub use context::{AmbiguousWords, ContextClassifier, PatternContextClassifier};
pub use expand::expand_rows;
pub use extractor::MunicipalityExtractor;
pub use gazetteer::{Gazetteer, GazetteerError, GazetteerSource, Municipality};
pub use models::{ArticleRecord, ExpandedRow, HarvestedArticle};
pub use normalize::{normalize, strip_region_suffix};
