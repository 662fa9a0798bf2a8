//! Core data types for the feed parser.
//!
//! [`Token`] is the tokenizer's unit of output; [`Element`] is a node in the
//! recovered notice tree. Both carry the span bookkeeping (character offsets
//! and line numbers) that the rest of the pipeline and the failure reports
//! rely on.

use std::fmt;
use std::io::Write;

use serde::Serialize;

/// Classification of a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal content, including whitespace.
    Text,

    /// A recognized open or close marker from the tag vocabulary.
    Tag {
        /// Tag name with `<`, `/` and `>` stripped.
        name: String,
        /// Whether the marker was spelled `</NAME>`.
        closing: bool,
    },
}

/// Smallest unit of tokenizer output.
///
/// Offsets are 1-based over characters consumed so far and chosen so that
/// `end_offset - begin_offset` equals the token's character length.
/// Concatenating every token's `text` in `sequence_number` order
/// reconstructs the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Raw captured substring.
    pub text: String,

    /// Monotonically increasing emission order, starting at 0.
    pub sequence_number: u64,

    /// Character offset of the first captured character (1-based).
    pub begin_offset: usize,

    /// Character offset one past the last captured character.
    pub end_offset: usize,

    /// Line number at the start of the token (1-based).
    pub begin_line: usize,

    /// Line number at the end of the token.
    pub end_line: usize,

    /// Text or tag classification.
    pub kind: TokenKind,
}

impl Token {
    /// Tag name if this token is a tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Tag { name, .. } => Some(name),
            TokenKind::Text => None,
        }
    }

    /// Whether this token is a closing tag.
    #[must_use]
    pub fn is_closing_tag(&self) -> bool {
        matches!(&self.kind, TokenKind::Tag { closing: true, .. })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Text => write!(
                f,
                "Text[{}:{}]:{:?}",
                self.begin_offset, self.end_offset, self.text
            ),
            TokenKind::Tag { name, .. } => {
                write!(f, "Tag[{}:{}]:{}", self.begin_offset, self.end_offset, name)
            }
        }
    }
}

/// Identity of an [`Element`] within one pipeline run.
///
/// Stands in for object identity: a closer element refers to the opener it
/// matched through this id rather than through a shared reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// A node in the recovered notice tree.
///
/// Serializes to the archival JSON shape: `element`, `text`, `children` and
/// the span fields; identity and matching bookkeeping are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Per-run identity, assigned by the tree builder.
    #[serde(skip)]
    pub id: ElementId,

    /// Tag vocabulary identifier.
    #[serde(rename = "element")]
    pub name: String,

    /// Trimmed text content directly following the opening tag, if any.
    pub text: Option<String>,

    /// Ordered child elements.
    pub children: Vec<Element>,

    /// Id of the element this one's closing tag was matched against.
    ///
    /// `None` for openers awaiting structural placement; always names an
    /// element with the same `name` when present.
    #[serde(skip)]
    pub closes: Option<ElementId>,

    /// Character offset of the opening tag (1-based).
    #[serde(rename = "begin")]
    pub begin_offset: usize,

    /// Character offset one past the element's span.
    #[serde(rename = "end")]
    pub end_offset: usize,

    /// Line number of the opening tag.
    pub begin_line: usize,

    /// Line number at the end of the span.
    pub end_line: usize,
}

impl Element {
    /// All direct children with the given name.
    pub fn children_named<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'b> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children_named(name).next()
    }

    /// Text of the first direct child with the given name.
    #[must_use]
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Whether this element or any descendant carries the given id.
    #[must_use]
    pub fn subtree_contains(&self, id: ElementId) -> bool {
        self.id == id || self.children.iter().any(|c| c.subtree_contains(id))
    }

    /// Render the subtree as an indented listing, one element per line.
    ///
    /// Elements with text render as `NAME => "text"`, bare elements as
    /// `NAME`.
    ///
    /// # Errors
    /// Propagates write errors from the sink.
    pub fn render_tree(&self, out: &mut impl Write, indent: usize) -> std::io::Result<()> {
        match &self.text {
            Some(text) => writeln!(out, "{:i$}{} => {:?}", "", self.name, text, i = indent)?,
            None => writeln!(out, "{:i$}{}", "", self.name, i = indent)?,
        }
        for child in &self.children {
            child.render_tree(out, indent + 2)?;
        }
        Ok(())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

/// Human-readable label for a notice-type tag name.
#[must_use]
pub fn notice_label(name: &str) -> Option<&'static str> {
    match name {
        "PRESOL" => Some("Presolicitation"),
        "COMBINE" => Some("Combined Synopsis/Solicitation"),
        "AMDCSS" => Some("Amended Combined Synopsis/Solicitation"),
        "MOD" => Some("Modification"),
        "AWARD" => Some("Award Notice"),
        "JA" => Some("Justification and Approval"),
        "ITB" => Some("Intent to Bundle Requirements"),
        "FAIROPP" => Some("Fair Opportunity"),
        "SRCSGT" => Some("Sources Sought"),
        "FSTD" => Some("Foreign Government Standard"),
        "SNOTE" => Some("Special Notice"),
        "SSALE" => Some("Sale of Surplus Property"),
        "ARCHIVE" => Some("Archive Notice"),
        "UNARCHIVE" => Some("Unarchive Notice"),
        _ => None,
    }
}
