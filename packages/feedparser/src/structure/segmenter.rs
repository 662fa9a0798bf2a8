//! Top-level segmentation of the element stream into notice trees.
//!
//! Elements buffer in an ordered window until the closer of the window's
//! head notice arrives; the head then adopts the buffered run (re-nested by
//! [`nester`](crate::structure::nester)) and is yielded as one notice.
//! Closers for *other* top-level names buffer too, which lets incorrectly
//! interleaved notices resolve once the earlier head's closer shows up.

use std::collections::VecDeque;

use crate::error::Result;
use crate::structure::config::StructureTables;
use crate::structure::nester::nest_children;
use crate::types::Element;

/// Groups a flat element stream into top-level notice trees.
pub struct Segmenter<I> {
    elements: I,
    tables: StructureTables,
    window: VecDeque<Element>,
    done: bool,
}

impl<I> Segmenter<I>
where
    I: Iterator<Item = Result<Element>>,
{
    /// Create a segmenter over `elements` using `tables`.
    pub fn new(elements: I, tables: StructureTables) -> Self {
        Self {
            elements,
            tables,
            window: VecDeque::new(),
            done: false,
        }
    }

    /// Complete the notice at the window's head with `closer`, adopting and
    /// re-nesting everything buffered behind it.
    fn complete_head(&mut self, closer: &Element) -> Option<Element> {
        let mut buffered = std::mem::take(&mut self.window);
        let mut head = buffered.pop_front()?;
        head.children = nest_children(&self.tables, &head.name, head.id, &mut buffered);
        head.end_offset = closer.end_offset;
        head.end_line = closer.end_line;
        Some(head)
    }
}

impl<I> Iterator for Segmenter<I>
where
    I: Iterator<Item = Result<Element>>,
{
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return self.window.pop_front().map(Ok);
            }

            let element = match self.elements.next() {
                Some(Ok(element)) => element,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    // Best-effort: whatever is still buffered surfaces
                    // as-is rather than failing the file.
                    self.done = true;
                    continue;
                }
            };

            let closes_top_level =
                element.closes.is_some() && self.tables.is_top_level(&element.name);

            if closes_top_level {
                let head_matches = self
                    .window
                    .front()
                    .is_some_and(|head| head.name == element.name);
                if head_matches {
                    if let Some(notice) = self.complete_head(&element) {
                        return Some(Ok(notice));
                    }
                } else if !self.window.is_empty() {
                    // A different notice is still open; defer this closer
                    // until the head resolves.
                    self.window.push_back(element);
                } else {
                    tracing::warn!(
                        element = %element.name,
                        line = element.end_line,
                        "top-level closer arrived with nothing buffered; discarded"
                    );
                }
            } else if self.window.is_empty() && !self.tables.is_top_level(&element.name) {
                tracing::warn!(
                    element = %element.name,
                    line = element.begin_line,
                    "orphaned non-top-level element discarded"
                );
            } else {
                self.window.push_back(element);
            }
        }
    }
}
