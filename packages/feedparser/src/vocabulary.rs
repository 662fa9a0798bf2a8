//! The closed tag vocabulary recognized by the tokenizer.
//!
//! The feed format has no general tag syntax: only a fixed set of names is
//! ever treated as markup, and anything else stays ordinary text, tag-shaped
//! substrings with unknown names included. The vocabulary is an explicit
//! configuration object so tests can run with a reduced set.

use std::collections::HashSet;

/// A closed set of recognized tag names.
#[derive(Debug, Clone, Default)]
pub struct TagVocabulary {
    names: HashSet<String>,
}

/// A recognized tag occurrence, as classified by [`TagVocabulary::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizedTag<'a> {
    /// The vocabulary name.
    pub name: &'a str,
    /// Whether the spelling was `</NAME>`.
    pub closing: bool,
}

impl TagVocabulary {
    /// Create a vocabulary from an iterator of names.
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a bare name is in the vocabulary.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of names in the vocabulary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Classify a candidate spelling of the form `<NAME>` or `</NAME>`.
    ///
    /// Returns `None` unless the candidate is exactly one of the
    /// vocabulary's open/close spellings.
    #[must_use]
    pub fn classify<'a>(&self, candidate: &'a str) -> Option<RecognizedTag<'a>> {
        let inner = candidate.strip_prefix('<')?.strip_suffix('>')?;
        let (name, closing) = match inner.strip_prefix('/') {
            Some(rest) => (rest, true),
            None => (inner, false),
        };
        if !name.is_empty() && self.contains(name) {
            Some(RecognizedTag { name, closing })
        } else {
            None
        }
    }
}

/// Create the FBO feed tag vocabulary.
///
/// The full fixed set of names the feed uses, attribute-like markers
/// included. Names absent from this set are never markup, even when they
/// appear angle-bracketed in the data.
#[must_use]
pub fn create_fbo_vocabulary() -> TagVocabulary {
    TagVocabulary::new([
        "ADDRESS", "AGENCY", "ALT", "AMDCSS", "ARCHDATE", "ARCHIVE", "AWARD", "AWARDEE",
        "AWDAMT", "AWDDATE", "AWDNBR", "BOANBR", "CBAC", "CLASSCOD", "CMP", "COMBINE",
        "COMBINED", "CONTACT", "CORRECTION", "CPU", "CR", "CSMP", "DATE", "DD", "DESC",
        "DONBR", "EMAIL", "EMAILDESC", "FAIROPP", "FILE", "FILELIST", "FOJA", "FSTD", "GO",
        "H", "HTML", "IS", "ITB", "JA", "JTR", "LINENBR", "LINK", "LOCATION", "MDT", "MOD",
        "MODNBR", "NAICS", "NONE", "NTYPE", "OFFADD", "OFFICE", "OL", "P", "PASSWORD",
        "POPADDRESS", "POPCOUNTRY", "POPZIP", "PRESOL", "REDACTED", "REESPDATE", "RESERVED",
        "RESPDATE", "SETASIDE", "SNOTE", "SOLNBR", "SOURCE", "SRCSGT", "SSALE", "STAUTH",
        "STRONG", "SUBJECT", "SUP", "TBD", "TITLE", "UNARCHIVE", "URL", "YEAR", "ZIP",
    ])
}
