//! Schema validation of recovered notices.
//!
//! Each notice type declares the children it requires and tolerates; the
//! validator checks a notice against its declaration and reports every
//! violation it finds. The rule tables double as the formal description of
//! each notice type's shape.

pub mod config;
pub mod validator;

pub use config::{create_fbo_schemas, Cardinality, NoticeSchema, Rule, SchemaRegistry};
pub use validator::Violation;
