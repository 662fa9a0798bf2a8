//! Tokenizer: character stream to typed token stream.
//!
//! The feed has no general markup syntax. A sliding window of unclassified
//! characters accumulates until a `>` completes one of the vocabulary's
//! open/close spellings; the window prefix is then flushed as a text token
//! ahead of the tag token. Everything else stays text, unknown tag-like
//! substrings included, and the concatenation of all emitted token text
//! reproduces the input exactly.

use crate::error::Result;
use crate::types::{Token, TokenKind};
use crate::vocabulary::TagVocabulary;

/// Lazy, single-pass tokenizer over a fallible character stream.
///
/// Offsets follow the subtraction convention: a token's `begin_offset` is
/// the count of characters consumed before it and its `end_offset` the count
/// consumed through its last character, so `end - begin` is the token's
/// length and spans concatenate seamlessly.
pub struct Tokenizer<I> {
    chars: I,
    vocabulary: TagVocabulary,
    window: String,
    window_chars: usize,
    /// Byte index of the last `<` in the window, if any.
    last_open_angle: Option<usize>,
    /// Characters consumed so far.
    offset: usize,
    sequence: u64,
    begin_line: usize,
    end_line: usize,
    queued: Option<Token>,
    done: bool,
}

impl<I> Tokenizer<I>
where
    I: Iterator<Item = Result<char>>,
{
    /// Create a tokenizer over `chars` recognizing `vocabulary`.
    pub fn new(chars: I, vocabulary: TagVocabulary) -> Self {
        Self {
            chars,
            vocabulary,
            window: String::new(),
            window_chars: 0,
            last_open_angle: None,
            offset: 0,
            sequence: 0,
            begin_line: 1,
            end_line: 1,
            queued: None,
            done: false,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence;
        self.sequence += 1;
        seq
    }

    /// Count a line ending, unless it is the second half of a `\r\n` or
    /// `\n\r` pair. Repeated identical line endings each count.
    fn count_line_ending(&mut self, c: char) {
        let prev = self.window.chars().next_back();
        let paired = matches!(prev, Some(p) if is_line_ending(p) && p != c);
        if !paired {
            self.end_line += 1;
        }
    }

    /// Emit the window suffix as a tag token, preceded by any window prefix
    /// as text. Returns the first token to yield; the second, if any, is
    /// queued.
    fn emit_tag(&mut self, angle: usize, name: String, closing: bool) -> Token {
        let tag_text = self.window[angle..].to_string();
        let tag_chars = tag_text.chars().count();

        let prefix_text = self.window[..angle].to_string();
        let prefix_chars = self.window_chars - tag_chars;

        let tag_token = Token {
            text: tag_text,
            sequence_number: 0, // assigned below, after any prefix
            begin_offset: self.offset - tag_chars,
            end_offset: self.offset,
            // A tag contains no line endings, so both ends sit on the
            // current line.
            begin_line: self.end_line,
            end_line: self.end_line,
            kind: TokenKind::Tag { name, closing },
        };

        let first = if prefix_chars > 0 {
            let text_token = Token {
                text: prefix_text,
                sequence_number: self.next_sequence(),
                begin_offset: self.offset - self.window_chars,
                end_offset: self.offset - tag_chars,
                begin_line: self.begin_line,
                end_line: self.end_line,
                kind: TokenKind::Text,
            };
            self.queued = Some(Token {
                sequence_number: self.next_sequence(),
                ..tag_token
            });
            text_token
        } else {
            Token {
                sequence_number: self.next_sequence(),
                ..tag_token
            }
        };

        self.window.clear();
        self.window_chars = 0;
        self.last_open_angle = None;
        self.begin_line = self.end_line;
        first
    }

    /// Flush whatever remains in the window as a final text token.
    fn flush_remainder(&mut self) -> Option<Token> {
        if self.window.is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.window);
        let token = Token {
            text,
            sequence_number: self.next_sequence(),
            begin_offset: self.offset - self.window_chars,
            end_offset: self.offset,
            begin_line: self.begin_line,
            end_line: self.end_line,
            kind: TokenKind::Text,
        };
        self.window_chars = 0;
        Some(token)
    }
}

fn is_line_ending(c: char) -> bool {
    c == '\r' || c == '\n'
}

impl<I> Iterator for Tokenizer<I>
where
    I: Iterator<Item = Result<char>>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.queued.take() {
            return Some(Ok(token));
        }
        if self.done {
            return None;
        }

        loop {
            let c = match self.chars.next() {
                Some(Ok(c)) => c,
                Some(Err(e)) => {
                    // I/O failure is fatal for the file; no partial flush.
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return self.flush_remainder().map(Ok);
                }
            };

            self.offset += 1;
            if is_line_ending(c) {
                self.count_line_ending(c);
            }
            if c == '<' {
                self.last_open_angle = Some(self.window.len());
            }
            self.window.push(c);
            self.window_chars += 1;

            if c == '>' {
                if let Some(angle) = self.last_open_angle {
                    let recognized = self
                        .vocabulary
                        .classify(&self.window[angle..])
                        .map(|tag| (tag.name.to_string(), tag.closing));
                    if let Some((name, closing)) = recognized {
                        return Some(Ok(self.emit_tag(angle, name, closing)));
                    }
                }
            }
        }
    }
}

/// Tokenize an in-memory string. Convenience for tests and small inputs.
pub fn tokenize_str(
    input: &str,
    vocabulary: TagVocabulary,
) -> Tokenizer<impl Iterator<Item = Result<char>> + '_> {
    Tokenizer::new(input.chars().map(Ok), vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::create_fbo_vocabulary;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize_str(input, create_fbo_vocabulary())
            .map(|t| t.unwrap())
            .collect()
    }

    fn spellings(input: &str) -> Vec<String> {
        tokens(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tags_split_from_text() {
        let toks = tokens("<PRESOL>\n<DATE>0101\n");
        assert_eq!(
            toks.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["<PRESOL>", "\n", "<DATE>", "0101\n"]
        );
        assert!(matches!(toks[0].kind, TokenKind::Tag { ref name, closing: false } if name == "PRESOL"));
        assert!(matches!(toks[1].kind, TokenKind::Text));
    }

    #[test]
    fn test_closing_tag_recognized() {
        let toks = tokens("</PRESOL>");
        assert_eq!(toks.len(), 1);
        assert!(toks[0].is_closing_tag());
        assert_eq!(toks[0].tag_name(), Some("PRESOL"));
    }

    #[test]
    fn test_unknown_tags_stay_text() {
        // Neither <FOO> nor the html-ish <b> are vocabulary names.
        assert_eq!(spellings("<FOO>text<b>"), vec!["<FOO>text<b>"]);
    }

    #[test]
    fn test_angle_noise_stays_text() {
        assert_eq!(
            spellings("5 > 3 and 2 < 4<DATE>"),
            vec!["5 > 3 and 2 < 4", "<DATE>"]
        );
    }

    #[test]
    fn test_round_trip_reconstruction() {
        let input = "<PRESOL>\n<DATE>0101\n<DESC>a < b > c</DESC>junk</PRESOL>\ntrailing";
        let reconstructed: String = spellings(input).concat();
        assert_eq!(reconstructed, input);
    }

    #[test]
    fn test_offsets_match_lengths_and_abut() {
        let toks = tokens("<PRESOL>\n<DATE>0101\n<YEAR>07\n");
        let mut expected_begin = 0;
        for t in &toks {
            assert_eq!(t.begin_offset, expected_begin);
            assert_eq!(
                t.end_offset - t.begin_offset,
                t.text.chars().count(),
                "span width must equal text length for {t}"
            );
            expected_begin = t.end_offset;
        }
    }

    #[test]
    fn test_sequence_numbers_are_dense() {
        let toks = tokens("x<DATE>y<YEAR>z");
        let seqs: Vec<u64> = toks.iter().map(|t| t.sequence_number).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_line_numbers_simple() {
        let toks = tokens("<DATE>a\nb\n<YEAR>");
        // Text "a\nb\n" starts on line 1 and ends on line 3.
        assert_eq!(toks[1].begin_line, 1);
        assert_eq!(toks[1].end_line, 3);
        // The following tag sits entirely on line 3.
        assert_eq!(toks[2].begin_line, 3);
        assert_eq!(toks[2].end_line, 3);
    }

    #[test]
    fn test_crlf_counts_once() {
        let toks = tokens("<DATE>a\r\nb");
        assert_eq!(toks[1].end_line, 2);
    }

    #[test]
    fn test_repeated_identical_endings_each_count() {
        let toks = tokens("<DATE>a\n\n\nb");
        assert_eq!(toks[1].end_line, 4);
    }

    #[test]
    fn test_crlf_then_lf_counts_twice() {
        // \r\n is one break, the following \n a second.
        let toks = tokens("<DATE>a\r\n\nb");
        assert_eq!(toks[1].end_line, 3);
    }

    #[test]
    fn test_reduced_vocabulary() {
        let vocab = TagVocabulary::new(["DATE"]);
        let toks: Vec<Token> = tokenize_str("<DATE>x<YEAR>y", vocab)
            .map(|t| t.unwrap())
            .collect();
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].text, "<DATE>");
        assert_eq!(toks[1].text, "x<YEAR>y");
    }

    #[test]
    fn test_stray_open_angle_inside_candidate() {
        // The second < restarts the candidate; the first stays text.
        assert_eq!(spellings("<DA<DATE>"), vec!["<DA", "<DATE>"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_io_error_propagates_and_ends_stream() {
        use crate::error::FeedError;

        let chars = vec![
            Ok('<'),
            Ok('D'),
            Err(FeedError::UnsupportedEncoding("x".into())),
        ];
        let mut tok = Tokenizer::new(chars.into_iter(), create_fbo_vocabulary());
        assert!(matches!(tok.next(), Some(Err(_))));
        assert!(tok.next().is_none(), "tokenizer must fuse after an error");
    }
}
