//! The assembled pipeline: bytes in, checked notices out.
//!
//! Every stage pulls from the previous one, so a caller iterating notices
//! holds at most one notice's working set in memory regardless of file
//! size. Nothing here retries or recovers across files; one pipeline value
//! serves one source.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::config::FeedConfig;
use crate::error::Result;
use crate::schema::{validator, SchemaRegistry, Violation};
use crate::source::CharSource;
use crate::structure::Segmenter;
use crate::tokenizer::Tokenizer;
use crate::tree::{NearestOpenerPolicy, TreeBuilder};
use crate::types::Element;

/// The notice stream produced by [`parse_reader`].
pub type NoticeStream<R> =
    Segmenter<TreeBuilder<Tokenizer<CharSource<R>>, NearestOpenerPolicy>>;

/// Parse a feed from any byte reader into a lazy stream of notice trees.
pub fn parse_reader<R: Read>(reader: R, config: &FeedConfig) -> NoticeStream<R> {
    let chars = CharSource::new(reader, config.encoding);
    let tokens = Tokenizer::new(chars, config.vocabulary.clone());
    let elements = TreeBuilder::new(tokens, NearestOpenerPolicy);
    Segmenter::new(elements, config.structure.clone())
}

/// Parse a feed file by path.
///
/// # Errors
/// Fails when the file cannot be opened; read errors surface through the
/// returned stream.
pub fn parse_path(path: impl AsRef<Path>, config: &FeedConfig) -> Result<NoticeStream<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(parse_reader(BufReader::new(file), config))
}

/// A notice together with its schema-validation outcome.
///
/// Valid notices expose the queryable tree; failed ones keep the full tree
/// and the violation list so a consumer can store them verbatim for later
/// reprocessing instead of rejecting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedNotice {
    /// The recovered notice tree, after validation preprocessing.
    pub notice: Element,

    /// Violations found; empty for a clean pass.
    pub violations: Vec<Violation>,

    /// Whether the notice's type had a schema at all.
    pub recognized: bool,
}

impl CheckedNotice {
    /// Whether the notice passed a known schema with no violations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.recognized && self.violations.is_empty()
    }
}

/// Validate one notice against the registry, consuming it.
#[must_use]
pub fn check(mut notice: Element, schemas: &SchemaRegistry) -> CheckedNotice {
    match validator::validate(&mut notice, schemas) {
        Some(violations) => CheckedNotice {
            notice,
            violations,
            recognized: true,
        },
        None => {
            tracing::warn!(notice = %notice.name, "unrecognized notice type");
            CheckedNotice {
                notice,
                violations: Vec::new(),
                recognized: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SMALL_FEED: &str = "<ARCHIVE>\n<DATE>0219\n<YEAR>07\n<SOLNBR>N00406-07-Q-0102\n\
                              </ARCHIVE>\n\n<UNARCHIVE>\n<SOLNBR>W912DY-07-R-0005\n</UNARCHIVE>\n";

    #[test]
    fn test_parse_reader_yields_notice_per_record() {
        let config = FeedConfig::default();
        let notices: Vec<Element> = parse_reader(SMALL_FEED.as_bytes(), &config)
            .map(|n| n.unwrap())
            .collect();

        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].name, "ARCHIVE");
        assert_eq!(notices[1].name, "UNARCHIVE");
        assert_eq!(notices[1].text_of("SOLNBR"), Some("W912DY-07-R-0005"));
    }

    #[test]
    fn test_check_valid_and_invalid() {
        let config = FeedConfig::default();
        let mut stream = parse_reader(SMALL_FEED.as_bytes(), &config);

        let archive = check(stream.next().unwrap().unwrap(), &config.schemas);
        assert!(archive.is_valid());

        let unarchive = check(stream.next().unwrap().unwrap(), &config.schemas);
        assert!(unarchive.is_valid());
    }

    #[test]
    fn test_check_keeps_failed_tree_accessible() {
        let config = FeedConfig::default();
        let checked = check(
            parse_reader("<ARCHIVE>\n<NTYPE>AWARD\n</ARCHIVE>\n".as_bytes(), &config)
                .next()
                .unwrap()
                .unwrap(),
            &config.schemas,
        );

        assert!(!checked.is_valid());
        assert_eq!(checked.violations.len(), 1);
        assert_eq!(checked.notice.text_of("NTYPE"), Some("AWARD"));
    }
}
