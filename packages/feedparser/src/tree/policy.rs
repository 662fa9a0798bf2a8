//! Policies for resolving a closing tag against the stack of open elements.
//!
//! The discard behavior is a named, testable object rather than control flow
//! inside the builder, so a stricter policy can be substituted without
//! touching the rest of the pipeline.

use crate::types::ElementId;

/// A pending opener on the builder's stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenElement {
    /// Identity of the already-emitted element.
    pub id: ElementId,
    /// Tag name, the only matching key.
    pub name: String,
    /// Line of the opening tag, carried for reporting.
    pub begin_line: usize,
}

/// Outcome of resolving one closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The opener the closing tag pairs with, if any.
    pub opener: Option<OpenElement>,
    /// Openers removed from the stack without ever being closed.
    pub discarded: Vec<OpenElement>,
}

impl Resolution {
    fn unmatched() -> Self {
        Self {
            opener: None,
            discarded: Vec::new(),
        }
    }
}

/// How a closing tag finds its opener on the stack.
///
/// The stack's top is the vector's end. Implementations own the full
/// decision: which opener matches, and what happens to the entries above it.
pub trait MatchPolicy {
    /// Resolve a closing tag named `closer` against `stack`.
    fn resolve(&self, stack: &mut Vec<OpenElement>, closer: &str) -> Resolution;
}

/// Match the most recently opened element with the closer's name, discarding
/// every opener above it.
///
/// This is the recovery behavior the historical corpus was validated
/// against: a closer reaches over unclosed intermediate elements, and those
/// elements lose any chance of being closed themselves. A closer whose name
/// is nowhere on the stack matches nothing and leaves the stack untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestOpenerPolicy;

impl MatchPolicy for NearestOpenerPolicy {
    fn resolve(&self, stack: &mut Vec<OpenElement>, closer: &str) -> Resolution {
        let Some(found) = stack.iter().rposition(|open| open.name == closer) else {
            return Resolution::unmatched();
        };
        let discarded = stack.split_off(found + 1);
        let opener = stack.pop();
        Resolution { opener, discarded }
    }
}

/// Match only the innermost opener.
///
/// A closer whose name differs from the top of the stack is dropped and
/// nothing is discarded. Useful when a corpus is known to be properly
/// nested and reaching-over recovery would hide real malformation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictNestingPolicy;

impl MatchPolicy for StrictNestingPolicy {
    fn resolve(&self, stack: &mut Vec<OpenElement>, closer: &str) -> Resolution {
        if stack.last().is_some_and(|top| top.name == closer) {
            Resolution {
                opener: stack.pop(),
                discarded: Vec::new(),
            }
        } else {
            Resolution::unmatched()
        }
    }
}
