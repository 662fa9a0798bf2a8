//! Configuration tables for structural parsing.

use std::collections::{HashMap, HashSet};

/// Which names open notices and which composites may contain what.
///
/// Adding a notice type or composite is a data change here, not a code
/// change in the segmenter or nester.
#[derive(Debug, Clone, Default)]
pub struct StructureTables {
    top_level: HashSet<String>,
    composites: HashMap<String, Vec<String>>,
}

impl StructureTables {
    /// Create an empty table set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level notice-type name.
    pub fn register_top_level(&mut self, name: impl Into<String>) {
        self.top_level.insert(name.into());
    }

    /// Register a composite element and the child names it may contain.
    pub fn register_composite(
        &mut self,
        name: impl Into<String>,
        children: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.composites
            .insert(name.into(), children.into_iter().map(Into::into).collect());
    }

    /// Whether a name opens a top-level notice.
    #[must_use]
    pub fn is_top_level(&self, name: &str) -> bool {
        self.top_level.contains(name)
    }

    /// Whether a name is a registered composite.
    #[must_use]
    pub fn is_composite(&self, name: &str) -> bool {
        self.composites.contains_key(name)
    }

    /// Whether composite `parent` may directly contain `child`.
    #[must_use]
    pub fn allows(&self, parent: &str, child: &str) -> bool {
        self.composites
            .get(parent)
            .is_some_and(|allowed| allowed.iter().any(|c| c == child))
    }
}

/// Top-level notice-type names of the FBO feed.
pub const FBO_TOP_LEVEL: [&str; 14] = [
    "PRESOL", "COMBINE", "AMDCSS", "MOD", "AWARD", "JA", "ITB", "FAIROPP", "SRCSGT", "FSTD",
    "SNOTE", "SSALE", "ARCHIVE", "UNARCHIVE",
];

/// Create the structural tables for the FBO feed.
///
/// A link holds a URL and a description, an email an address and a
/// description. DESC admits the notice-type names themselves: descriptions
/// sometimes quote whole notices, and those nest rather than orphan.
#[must_use]
pub fn create_fbo_structure() -> StructureTables {
    let mut tables = StructureTables::new();

    for name in FBO_TOP_LEVEL {
        tables.register_top_level(name);
    }

    tables.register_composite("LINK", ["URL", "DESC"]);
    tables.register_composite("EMAIL", ["ADDRESS", "DESC"]);
    tables.register_composite("DESC", FBO_TOP_LEVEL);

    tables
}
