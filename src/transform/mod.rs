//! Transform list parsing and keyframe merging
//!
//! # Module Structure
//!
//! - [`types`] - The closed transform-function grammar and list data model
//! - [`parsing`] - Transform list string parsing
//! - [`merge`] - Keyframe pairing and merge plans
//! - [`matrix`] - Matrix fallback engine (collapse, decompose, slerp,
//!   recompose)

pub mod matrix;
pub mod merge;
pub mod parsing;
pub mod types;

// Re-export main types at the module level for convenience
pub use merge::{merge_transform_lists, MergePlan};
pub use parsing::parse_transform_list;
pub use types::{ArgType, Kind, Operation, ParseError, TransformList};

/// Result type alias for transform parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
