//! Feed configuration.
//!
//! Everything the pipeline needs to know about a feed dialect in one place:
//! the tag vocabulary, the structural tables, the schema registry, and the
//! source encoding. `FeedConfig::default()` is the FBO feed; tests assemble
//! reduced configurations from the same parts.

use encoding_rs::Encoding;

use crate::error::Result;
use crate::schema::{create_fbo_schemas, SchemaRegistry};
use crate::source::{resolve_encoding, DEFAULT_ENCODING_LABEL};
use crate::structure::{create_fbo_structure, StructureTables};
use crate::vocabulary::{create_fbo_vocabulary, TagVocabulary};

/// Complete configuration of one feed dialect.
#[derive(Clone)]
pub struct FeedConfig {
    /// Tag names the tokenizer recognizes.
    pub vocabulary: TagVocabulary,

    /// Top-level and composite structure tables.
    pub structure: StructureTables,

    /// Per-notice-type schemas.
    pub schemas: SchemaRegistry,

    /// Source byte encoding.
    pub encoding: &'static Encoding,
}

impl FeedConfig {
    /// The FBO feed configuration with a caller-chosen encoding label.
    ///
    /// # Errors
    /// Returns [`crate::error::FeedError::UnsupportedEncoding`] for an
    /// unknown label.
    pub fn with_encoding_label(label: &str) -> Result<Self> {
        Ok(Self {
            encoding: resolve_encoding(label)?,
            ..Self::default()
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            vocabulary: create_fbo_vocabulary(),
            structure: create_fbo_structure(),
            schemas: create_fbo_schemas(),
            // The default label is a compile-time constant that always
            // resolves.
            encoding: Encoding::for_label(DEFAULT_ENCODING_LABEL.as_bytes())
                .unwrap_or(encoding_rs::WINDOWS_1252),
        }
    }
}
