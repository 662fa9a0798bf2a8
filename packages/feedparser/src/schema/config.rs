//! Declarative per-notice-type schemas.

use std::collections::{HashMap, HashSet};

/// Required count of a child element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one occurrence.
    ExactlyOne,
    /// Zero or one occurrence.
    ZeroOrOne,
}

/// One child-element rule of a notice or composite schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Child element name.
    pub child: String,

    /// Required count.
    pub cardinality: Cardinality,

    /// Whether a zero-or-one rule reports ambiguity on multiple
    /// occurrences. Unchecked rules silently pick none instead; the feed
    /// abuses optional fields far too often to flag every duplicate.
    pub checked: bool,
}

impl Rule {
    /// An exactly-one rule.
    #[must_use]
    pub fn required(child: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            cardinality: Cardinality::ExactlyOne,
            checked: true,
        }
    }

    /// A zero-or-one rule that tolerates duplicates.
    #[must_use]
    pub fn optional(child: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            cardinality: Cardinality::ZeroOrOne,
            checked: false,
        }
    }

    /// A zero-or-one rule that reports duplicates as ambiguous.
    #[must_use]
    pub fn optional_checked(child: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            cardinality: Cardinality::ZeroOrOne,
            checked: true,
        }
    }
}

/// The declared shape of one notice type.
#[derive(Debug, Clone, Default)]
pub struct NoticeSchema {
    /// Child rules, in declaration order.
    pub rules: Vec<Rule>,

    /// Composite children (by name) whose own schemas also apply.
    pub composites: Vec<String>,
}

impl NoticeSchema {
    /// Create a schema from rules, with no composites.
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            composites: Vec::new(),
        }
    }

    /// Declare composite children to validate.
    #[must_use]
    pub fn with_composites(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.composites = names.into_iter().map(Into::into).collect();
        self
    }
}

/// All schemas of a feed: notice types, composites, and preprocessing.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    notices: HashMap<String, NoticeSchema>,
    composites: HashMap<String, NoticeSchema>,
    prune_empty: HashSet<String>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notice-type schema.
    pub fn register_notice(&mut self, name: impl Into<String>, schema: NoticeSchema) {
        self.notices.insert(name.into(), schema);
    }

    /// Register a composite schema.
    pub fn register_composite(&mut self, name: impl Into<String>, schema: NoticeSchema) {
        self.composites.insert(name.into(), schema);
    }

    /// Mark an element name whose childless occurrences are pruned before
    /// validation.
    pub fn register_prune_empty(&mut self, name: impl Into<String>) {
        self.prune_empty.insert(name.into());
    }

    /// Schema for a notice type.
    #[must_use]
    pub fn notice(&self, name: &str) -> Option<&NoticeSchema> {
        self.notices.get(name)
    }

    /// Schema for a composite.
    #[must_use]
    pub fn composite(&self, name: &str) -> Option<&NoticeSchema> {
        self.composites.get(name)
    }

    /// Whether childless occurrences of `name` are pruned.
    #[must_use]
    pub fn prunes_empty(&self, name: &str) -> bool {
        self.prune_empty.contains(name)
    }
}

/// The rule list shared by solicitation-shaped notices (PRESOL, COMBINE,
/// AMDCSS, MOD, SRCSGT).
fn solicitation_rules() -> Vec<Rule> {
    vec![
        Rule::required("DATE"),
        Rule::required("YEAR"),
        Rule::required("ZIP"),
        Rule::required("CLASSCOD"),
        Rule::optional("NAICS"),
        Rule::optional("OFFADD"),
        Rule::required("SUBJECT"),
        Rule::required("SOLNBR"),
        Rule::optional("RESPDATE"),
        Rule::optional("ARCHDATE"),
        Rule::required("CONTACT"),
        Rule::optional("DESC"),
        Rule::optional("SETASIDE"),
        Rule::optional("POPADDRESS"),
        Rule::optional("POPZIP"),
        Rule::optional("POPCOUNTRY"),
    ]
}

/// Create the FBO schema registry: all fourteen notice types plus the LINK
/// and EMAIL composites.
///
/// Archive and unarchive records carry no contact structure, so they skip
/// the composites; everything else validates LINK and EMAIL when present.
/// Childless EMAIL elements are a pervasive artifact of the feed and are
/// pruned as noise before any rule runs.
#[must_use]
pub fn create_fbo_schemas() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    let with_contact = |rules: Vec<Rule>| NoticeSchema::new(rules).with_composites(["LINK", "EMAIL"]);

    for name in ["PRESOL", "COMBINE", "AMDCSS", "MOD", "SRCSGT"] {
        registry.register_notice(name, with_contact(solicitation_rules()));
    }

    registry.register_notice(
        "AWARD",
        with_contact(vec![
            Rule::required("DATE"),
            Rule::required("YEAR"),
            Rule::optional("ZIP"),
            Rule::required("CLASSCOD"),
            Rule::optional("NAICS"),
            Rule::optional("OFFADD"),
            Rule::required("SUBJECT"),
            Rule::optional("SOLNBR"),
            Rule::optional("NTYPE"),
            Rule::optional("DESC"),
            Rule::required("CONTACT"),
            Rule::required("AWDNBR"),
            Rule::required("AWDAMT"),
            Rule::optional("LINENBR"),
            Rule::required("AWDDATE"),
            Rule::optional("ARCHDATE"),
            Rule::required("AWARDEE"),
            Rule::optional("SETASIDE"),
            Rule::optional("CORRECTION"),
        ]),
    );

    registry.register_notice(
        "JA",
        with_contact(vec![
            Rule::required("DATE"),
            Rule::required("YEAR"),
            Rule::optional("ZIP"),
            Rule::required("CLASSCOD"),
            Rule::required("NAICS"),
            Rule::optional("OFFADD"),
            Rule::required("SUBJECT"),
            Rule::optional("NTYPE"),
            Rule::optional("DESC"),
            Rule::required("CONTACT"),
            Rule::required("STAUTH"),
            Rule::required("AWDNBR"),
            Rule::optional("MODNBR"),
            Rule::required("AWDDATE"),
            Rule::optional("ARCHDATE"),
            Rule::optional("CORRECTION"),
        ]),
    );

    registry.register_notice(
        "ITB",
        with_contact(vec![
            Rule::required("DATE"),
            Rule::required("YEAR"),
            Rule::optional("ZIP"),
            Rule::required("CLASSCOD"),
            Rule::required("NAICS"),
            Rule::optional("OFFADD"),
            Rule::required("SUBJECT"),
            Rule::optional("SOLNBR"),
            Rule::optional("NTYPE"),
            Rule::required("DESC"),
            Rule::required("CONTACT"),
            Rule::optional("AWDNBR"),
            Rule::optional("DONBR"),
            Rule::optional("ARCHDATE"),
            Rule::optional("CORRECTION"),
        ]),
    );

    registry.register_notice(
        "FAIROPP",
        with_contact(vec![
            Rule::required("DATE"),
            Rule::required("YEAR"),
            Rule::optional("ZIP"),
            Rule::required("CLASSCOD"),
            Rule::required("NAICS"),
            Rule::optional("OFFADD"),
            Rule::required("SUBJECT"),
            Rule::optional("SOLNBR"),
            Rule::optional("NTYPE"),
            Rule::optional("DESC"),
            Rule::required("CONTACT"),
            Rule::required("FOJA"),
            Rule::required("AWDNBR"),
            Rule::required("DONBR"),
            Rule::optional("MODNBR"),
            Rule::required("AWDDATE"),
            Rule::optional("ARCHDATE"),
            Rule::optional("CORRECTION"),
        ]),
    );

    let bulletin_rules = |contact_required: bool| {
        let mut rules = vec![
            Rule::required("DATE"),
            Rule::required("YEAR"),
            Rule::optional("SOLNBR"),
            Rule::required("ZIP"),
            Rule::optional("CLASSCOD"),
            Rule::optional("NAICS"),
            Rule::optional("OFFADD"),
            Rule::required("SUBJECT"),
            Rule::optional("DESC"),
            Rule::optional("ARCHDATE"),
        ];
        rules.push(if contact_required {
            Rule::required("CONTACT")
        } else {
            Rule::optional("CONTACT")
        });
        rules
    };

    registry.register_notice("FSTD", with_contact(bulletin_rules(false)));
    registry.register_notice("SNOTE", with_contact(bulletin_rules(false)));
    registry.register_notice("SSALE", with_contact(bulletin_rules(true)));

    registry.register_notice(
        "ARCHIVE",
        NoticeSchema::new(vec![
            Rule::optional("DATE"),
            Rule::optional("YEAR"),
            Rule::required("SOLNBR"),
            Rule::optional("NTYPE"),
            Rule::optional("ARCHDATE"),
        ]),
    );

    registry.register_notice(
        "UNARCHIVE",
        NoticeSchema::new(vec![
            Rule::optional("SOLNBR"),
            Rule::optional("NTYPE"),
            Rule::optional("AWDNBR"),
            Rule::optional("ARCHDATE"),
        ]),
    );

    registry.register_composite(
        "LINK",
        NoticeSchema::new(vec![Rule::optional("URL"), Rule::optional("DESC")]),
    );
    registry.register_composite(
        "EMAIL",
        NoticeSchema::new(vec![Rule::optional("ADDRESS"), Rule::optional("DESC")]),
    );

    registry.register_prune_empty("EMAIL");

    registry
}
