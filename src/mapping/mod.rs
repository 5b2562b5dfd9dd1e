//! Data carriers exchanged with the mapping layer.
//!
//! The mapping layer above this crate resolves which SQL to run and how
//! runtime values map onto its placeholders. It hands the result down as
//! a `BoundStatement` plus a `ParameterSet`; this module defines both
//! sides of that hand-off.

pub mod bound;
pub mod value;

// Re-export commonly used types
pub use bound::{
    count_placeholders, BoundStatement, ParameterDescriptor, ParameterMode, SemanticType,
};
pub use value::{ParameterSet, ParameterValue};
