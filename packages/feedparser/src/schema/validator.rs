//! The schema validator.
//!
//! Checks one notice against its type's schema and aggregates every
//! violation found; a notice missing three required children reports all
//! three. Nothing here aborts: the caller decides what a failed notice is
//! worth.

use thiserror::Error;

use crate::schema::config::{Cardinality, NoticeSchema, Rule, SchemaRegistry};
use crate::types::Element;

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// An exactly-one child was absent.
    #[error("missing {name} element")]
    Missing {
        /// Child element name.
        name: String,
    },

    /// More than one child existed where at most one was allowed.
    #[error("multiple {name} elements found ({count})")]
    Ambiguous {
        /// Child element name.
        name: String,
        /// Observed count.
        count: usize,
    },
}

/// Result of looking up one rule's child in a parent element.
fn apply_rule<'a>(parent: &'a Element, rule: &Rule, violations: &mut Vec<Violation>) -> Option<&'a Element> {
    let count = parent.children_named(&rule.child).count();
    match (rule.cardinality, count) {
        (_, 1) => parent.child(&rule.child),
        (Cardinality::ExactlyOne, 0) => {
            violations.push(Violation::Missing {
                name: rule.child.clone(),
            });
            None
        }
        (Cardinality::ZeroOrOne, 0) => None,
        (_, n) if rule.checked => {
            violations.push(Violation::Ambiguous {
                name: rule.child.clone(),
                count: n,
            });
            None
        }
        // Unchecked zero-or-one with duplicates: silently pick none.
        _ => None,
    }
}

fn check_rules(parent: &Element, schema: &NoticeSchema, violations: &mut Vec<Violation>) {
    for rule in &schema.rules {
        apply_rule(parent, rule, violations);
    }
}

/// Validate a notice against the registry.
///
/// Returns `None` when the registry has no schema for the notice's name;
/// otherwise every violation found, empty for a clean pass. Childless
/// occurrences of pruned names (EMAIL in the FBO registry) are removed from
/// the notice's children before any rule runs, so a degenerate `<EMAIL>`
/// with no address neither validates nor counts as present.
#[must_use]
pub fn validate(notice: &mut Element, registry: &SchemaRegistry) -> Option<Vec<Violation>> {
    let schema = registry.notice(&notice.name)?;

    notice
        .children
        .retain(|child| !registry.prunes_empty(&child.name) || !child.children.is_empty());

    let mut violations = Vec::new();
    check_rules(notice, schema, &mut violations);

    for composite_name in &schema.composites {
        let lookup = Rule::optional(composite_name.clone());
        let Some(composite) = apply_rule(notice, &lookup, &mut violations) else {
            continue;
        };
        if let Some(composite_schema) = registry.composite(composite_name) {
            check_rules(composite, composite_schema, &mut violations);
        }
    }

    Some(violations)
}
