//! Structural parsing: top-level segmentation and composite re-nesting.
//!
//! [`Segmenter`] groups the flat element stream into one tree per notice;
//! within each notice, [`nester`] re-nests the composite substructures
//! (links, emails) the feed never closes properly. Both are driven by the
//! same [`StructureTables`] configuration.

pub mod config;
pub mod nester;
pub mod segmenter;

pub use config::{create_fbo_structure, StructureTables};
pub use segmenter::Segmenter;
