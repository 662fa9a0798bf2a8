//! Decoding character source.
//!
//! Feed files arrive in a legacy single-byte encoding (ISO-8859-2 for the
//! historical corpus), so the pipeline starts from a character stream rather
//! than a byte stream. [`CharSource`] decodes incrementally over any
//! [`Read`], keeping only one chunk resident, and surfaces I/O failures as a
//! single terminal error item.

use std::collections::VecDeque;
use std::io::Read;

use encoding_rs::{CoderResult, Decoder, Encoding};

use crate::error::{FeedError, Result};

/// Default encoding of historical feed files.
pub const DEFAULT_ENCODING_LABEL: &str = "iso-8859-2";

const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Resolve a WHATWG encoding label.
///
/// # Errors
/// Returns [`FeedError::UnsupportedEncoding`] when the label is unknown.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| FeedError::UnsupportedEncoding(label.to_string()))
}

/// Lazy character stream over a byte reader.
///
/// Malformed byte sequences decode to replacement characters and are never
/// fatal; only reader errors end the stream early.
pub struct CharSource<R: Read> {
    reader: R,
    decoder: Decoder,
    decoded: VecDeque<char>,
    buf: Vec<u8>,
    finished: bool,
    failed: bool,
}

impl<R: Read> CharSource<R> {
    /// Create a character source decoding `reader` with `encoding`.
    pub fn new(reader: R, encoding: &'static Encoding) -> Self {
        Self {
            reader,
            decoder: encoding.new_decoder(),
            decoded: VecDeque::new(),
            buf: vec![0u8; READ_CHUNK_BYTES],
            finished: false,
            failed: false,
        }
    }

    fn refill(&mut self) -> Result<()> {
        let n = loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        let last = n == 0;
        let mut out = String::with_capacity(
            self.decoder
                .max_utf8_buffer_length(n)
                .unwrap_or(READ_CHUNK_BYTES * 4)
                .max(16),
        );
        let (result, _read, _had_errors) = self.decoder.decode_to_string(&self.buf[..n], &mut out, last);
        debug_assert!(
            matches!(result, CoderResult::InputEmpty),
            "decode output buffer sized to consume the whole chunk"
        );
        self.decoded.extend(out.chars());
        if last {
            self.finished = true;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for CharSource<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.decoded.pop_front() {
                return Some(Ok(c));
            }
            if self.finished || self.failed {
                return None;
            }
            if let Err(e) = self.refill() {
                self.failed = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: CharSource<&[u8]>) -> String {
        source.map(|c| c.unwrap()).collect()
    }

    #[test]
    fn test_ascii_passthrough() {
        let enc = resolve_encoding("iso-8859-2").unwrap();
        let text = collect(CharSource::new(b"<PRESOL>\n" as &[u8], enc));
        assert_eq!(text, "<PRESOL>\n");
    }

    #[test]
    fn test_latin2_high_bytes_decode() {
        let enc = resolve_encoding("iso-8859-2").unwrap();
        // 0xB1 is LATIN SMALL LETTER A WITH OGONEK in ISO-8859-2
        let text = collect(CharSource::new(&[0x61, 0xB1][..], enc));
        assert_eq!(text, "a\u{105}");
    }

    #[test]
    fn test_resolve_encoding_rejects_unknown_label() {
        assert!(matches!(
            resolve_encoding("latin-99"),
            Err(FeedError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_read_error_is_terminal() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }

        let enc = resolve_encoding("iso-8859-2").unwrap();
        let mut source = CharSource::new(Failing, enc);
        assert!(matches!(source.next(), Some(Err(FeedError::Io(_)))));
        assert!(source.next().is_none(), "stream must end after an IO error");
    }
}
