//! Tree building: pairing openers with closers under ambiguity.
//!
//! The feed closes almost nothing, and the closers it does have are not
//! always matched by an opener. [`TreeBuilder`] turns the token stream into
//! a flat stream of elements, resolving each closing tag against a stack of
//! open candidates through a pluggable [`MatchPolicy`].

pub mod builder;
pub mod policy;

pub use builder::TreeBuilder;
pub use policy::{MatchPolicy, NearestOpenerPolicy, OpenElement, Resolution, StrictNestingPolicy};
