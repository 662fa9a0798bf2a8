//! FBO feed parser - Recover structured procurement notices from the legacy
//! FedBizOpps flat-file feed.
//!
//! The feed is an SGML-like stream of fixed-vocabulary tags interleaved with
//! free text. Most tags are never closed, some closers match nothing, and
//! nesting varies by notice type; this crate rebuilds a well-formed forest
//! of notice trees from that stream and validates each notice against its
//! type's declared shape.
//!
//! # Example
//!
//! ```
//! use fbofeed_parser::config::FeedConfig;
//! use fbofeed_parser::pipeline::{check, parse_reader};
//!
//! let feed = "<ARCHIVE>\n<DATE>0219\n<YEAR>07\n<SOLNBR>N00406-07-Q-0102\n</ARCHIVE>\n";
//! let config = FeedConfig::default();
//!
//! let mut notices = parse_reader(feed.as_bytes(), &config);
//! let notice = notices.next().unwrap().unwrap();
//! assert_eq!(notice.text_of("SOLNBR"), Some("N00406-07-Q-0102"));
//!
//! let checked = check(notice, &config.schemas);
//! assert!(checked.is_valid());
//! ```
//!
//! # Architecture
//!
//! The pipeline is a chain of lazy, pull-based stages; each stage owns its
//! own window or stack and hands elements onward by value:
//!
//! - [`source`]: byte stream to characters (legacy single-byte encodings)
//! - [`vocabulary`]: the closed tag vocabulary
//! - [`tokenizer`]: characters to text/tag tokens with span tracking
//! - [`tree`]: tokens to elements, pairing openers with closers
//! - [`structure`]: elements to top-level notice trees, composites re-nested
//! - [`schema`]: per-notice-type validation
//! - [`pipeline`]: the assembled chain plus the checked-notice output form
//! - [`config`]: feed dialect configuration
//! - [`error`]: error types and Result alias
//! - [`cli`]: command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod source;
pub mod structure;
pub mod tokenizer;
pub mod tree;
pub mod types;
pub mod vocabulary;

// Re-export the main entry points
pub use pipeline::{check, parse_path, parse_reader, CheckedNotice};

// Re-export commonly used items
pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use schema::Violation;
pub use types::{Element, ElementId, Token, TokenKind};
