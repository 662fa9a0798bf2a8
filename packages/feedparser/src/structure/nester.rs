//! Composite re-nesting within one notice.
//!
//! The segmenter hands over a flat run of elements; this pass rebuilds the
//! nesting the feed implies but rarely spells out. Recursion is driven by
//! [`StructureTables`]: a composite consumes following elements while their
//! names stay in its allowed set, and a notice-level parent takes anything
//! that is not claimed by a deeper level.

use std::collections::VecDeque;

use crate::structure::config::StructureTables;
use crate::types::{Element, ElementId};

/// Re-nest `queue` as the children of the element identified by
/// `parent_name`/`parent_id`, consuming what belongs to it.
///
/// Closer markers steer the recursion: one closing the current parent ends
/// the level; one closing an element already collected here is spent and
/// skipped; any other closer belongs to an ancestor and is pushed back.
/// Likewise an element the current composite does not allow is pushed back
/// for the caller.
pub fn nest_children(
    tables: &StructureTables,
    parent_name: &str,
    parent_id: ElementId,
    queue: &mut VecDeque<Element>,
) -> Vec<Element> {
    let mut children: Vec<Element> = Vec::new();

    while let Some(element) = queue.pop_front() {
        if let Some(closes) = element.closes {
            if closes == parent_id {
                return children;
            }
            if children.iter().any(|c| c.subtree_contains(closes)) {
                continue;
            }
            queue.push_front(element);
            return children;
        }

        if tables.is_composite(parent_name) && !tables.allows(parent_name, &element.name) {
            queue.push_front(element);
            return children;
        }

        if tables.is_composite(&element.name) || tables.is_top_level(&element.name) {
            let mut element = element;
            element.children = nest_children(tables, &element.name, element.id, queue);
            children.push(element);
        } else if tables.is_composite(parent_name) || tables.is_top_level(parent_name) {
            children.push(element);
        } else {
            queue.push_front(element);
            return children;
        }
    }

    children
}
