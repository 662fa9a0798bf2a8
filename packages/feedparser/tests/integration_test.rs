//! End-to-end integration tests for the recovery pipeline.
//!
//! Exercises the complete chain from bytes to checked notices using fixture
//! files: a real-shaped presolicitation and a mixed feed with the usual
//! malformations (orphans, spurious closers, empty emails, a truncated
//! tail).

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use fbofeed_parser::config::FeedConfig;
use fbofeed_parser::pipeline::{check, parse_path, parse_reader};
use fbofeed_parser::schema::Violation;
use fbofeed_parser::tokenizer::tokenize_str;
use fbofeed_parser::types::Element;
use fbofeed_parser::vocabulary::create_fbo_vocabulary;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn parse_fixture(name: &str) -> Vec<Element> {
    let config = FeedConfig::default();
    parse_path(fixture_path(name), &config)
        .unwrap_or_else(|e| panic!("Failed to open {name}: {e}"))
        .map(|n| n.unwrap())
        .collect()
}

#[test]
fn test_presol_parses_to_one_valid_notice() {
    let notices = parse_fixture("presol_valid1");
    assert_eq!(notices.len(), 1);

    let notice = &notices[0];
    assert_eq!(notice.name, "PRESOL");
    assert_eq!(notice.text_of("DATE"), Some("0101"));
    assert_eq!(notice.text_of("YEAR"), Some("07"));
    assert_eq!(notice.text_of("SOLNBR"), Some("F38604-07-Q-C006"));

    let config = FeedConfig::default();
    let checked = check(notice.clone(), &config.schemas);
    assert!(checked.is_valid(), "violations: {:?}", checked.violations);
}

#[test]
fn test_presol_link_nests_url_and_desc() {
    let notices = parse_fixture("presol_valid1");
    let link = notices[0].child("LINK").expect("LINK child");

    let names: Vec<&str> = link.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["URL", "DESC"]);
    assert_eq!(
        link.text_of("DESC"),
        Some("Link to FedBizOpps document.")
    );
    // The notice keeps its own description; the link's stays nested.
    assert_eq!(
        notices[0].text_of("DESC"),
        Some("TRANSFORMER, 750 KVA FOR MANAS AIR BASE, KYRGYZSTAN")
    );
}

#[test]
fn test_multiline_text_spans_lines() {
    let notices = parse_fixture("presol_valid1");
    let pop = notices[0].child("POPADDRESS").expect("POPADDRESS child");
    assert_eq!(pop.text.as_deref(), Some("376 AEW/ECONS\nAPO AE"));
    assert_eq!(pop.end_line - pop.begin_line, 2);
}

#[test]
fn test_token_round_trip_on_fixtures() {
    for name in ["presol_valid1", "feed_mixed"] {
        let input = load_fixture(name);
        let reconstructed: String = tokenize_str(&input, create_fbo_vocabulary())
            .map(|t| t.unwrap().text)
            .collect();
        assert_eq!(reconstructed, input, "round trip failed for {name}");
    }
}

#[test]
fn test_token_offsets_are_consistent_and_monotone() {
    let input = load_fixture("feed_mixed");
    let mut previous_end = 0;
    for token in tokenize_str(&input, create_fbo_vocabulary()) {
        let token = token.unwrap();
        assert_eq!(token.begin_offset, previous_end);
        assert_eq!(
            token.end_offset - token.begin_offset,
            token.text.chars().count()
        );
        assert!(token.begin_line <= token.end_line);
        previous_end = token.end_offset;
    }
    assert_eq!(previous_end, input.chars().count());
}

#[test]
fn test_mixed_feed_segments_and_recovers() {
    let notices = parse_fixture("feed_mixed");

    // The leading stray DATE is discarded; three complete notices follow,
    // and the truncated ARCHIVE at the tail surfaces flat.
    let names: Vec<&str> = notices.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["PRESOL", "AWARD", "PRESOL", "ARCHIVE", "SOLNBR"]);
}

#[test]
fn test_spurious_closer_does_not_break_following_notice() {
    let notices = parse_fixture("feed_mixed");

    // The third notice contains a stray </EMAIL> with no opener anywhere;
    // its </PRESOL> must still close the notice.
    let third = &notices[2];
    assert_eq!(third.name, "PRESOL");
    assert_eq!(third.text_of("CONTACT"), Some("Nobody In Particular"));
}

#[test]
fn test_missing_solnbr_reports_exactly_one_violation() {
    let config = FeedConfig::default();
    let notices = parse_fixture("feed_mixed");

    let checked = check(notices[2].clone(), &config.schemas);
    assert_eq!(
        checked.violations,
        vec![Violation::Missing {
            name: "SOLNBR".to_string()
        }]
    );
    // Other fields stay accessible on the failed notice.
    assert_eq!(checked.notice.text_of("DATE"), Some("0507"));
}

#[test]
fn test_empty_email_absent_after_validation() {
    let config = FeedConfig::default();
    let notices = parse_fixture("feed_mixed");

    let first = &notices[0];
    assert!(first.child("EMAIL").is_some(), "EMAIL parses into the tree");

    let checked = check(first.clone(), &config.schemas);
    assert!(checked.is_valid(), "violations: {:?}", checked.violations);
    assert!(
        checked.notice.child("EMAIL").is_none(),
        "childless EMAIL must be dropped by validation preprocessing"
    );
}

#[test]
fn test_award_notice_validates() {
    let config = FeedConfig::default();
    let notices = parse_fixture("feed_mixed");

    let award = check(notices[1].clone(), &config.schemas);
    assert!(award.is_valid(), "violations: {:?}", award.violations);
    assert_eq!(award.notice.text_of("AWDNBR"), Some("W912-09-C-0001"));
    assert_eq!(award.notice.text_of("AWDAMT"), Some("$1,234,567.00"));
}

#[test]
fn test_pipeline_is_idempotent() {
    let first = parse_fixture("feed_mixed");
    let second = parse_fixture("feed_mixed");
    assert_eq!(first, second);
}

#[test]
fn test_notice_spans_cover_opener_through_closer() {
    let input = load_fixture("presol_valid1");
    let notices = parse_fixture("presol_valid1");

    let notice = &notices[0];
    assert_eq!(notice.begin_offset, 0);
    // The span ends at the </PRESOL> closer, before the trailing blank line.
    let closer_end = input.trim_end().chars().count();
    assert_eq!(notice.end_offset, closer_end);
    assert_eq!(notice.begin_line, 1);
}

#[test]
fn test_archival_json_shape() {
    let notices = parse_fixture("presol_valid1");
    let json = serde_json::to_value(&notices[0]).unwrap();

    assert_eq!(json["element"], "PRESOL");
    assert!(json["begin"].is_u64());
    assert!(json["end"].is_u64());
    let children = json["children"].as_array().unwrap();
    assert!(children.iter().any(|c| c["element"] == "SOLNBR"));
}

#[test]
fn test_parse_reader_equivalent_to_parse_path() {
    let config = FeedConfig::default();
    let input = load_fixture("feed_mixed");

    let from_reader: Vec<Element> = parse_reader(input.as_bytes(), &config)
        .map(|n| n.unwrap())
        .collect();
    let from_path = parse_fixture("feed_mixed");
    assert_eq!(from_reader, from_path);
}
