//! Tweenform - CSS-style transform list parsing and animation interpolation
//!
//! This library provides functionality to:
//! - Parse transform declarations like `translate(10px, 5px) rotate(90deg)`
//!   into a typed operation list
//! - Pair two such lists as animation keyframes, with 2D/3D coercion and
//!   identity padding where the shapes allow it
//! - Fall back to full matrix decomposition (translation, scale, skew,
//!   perspective, rotation quaternion) with slerp-based interpolation when
//!   the lists are structurally incompatible
//!
//! # Example
//!
//! ```
//! use tweenform::{merge_transform_lists, parse_transform_list};
//!
//! let from = parse_transform_list("translateX(10px)").unwrap();
//! let to = parse_transform_list("translateX(20px)").unwrap();
//! let plan = merge_transform_lists(&from, &to);
//! assert_eq!(plan.sample(0.5), "translatex(15px)");
//! ```

pub mod dimension;
pub mod transform;

pub use dimension::{Arg, Dim, Unit};
pub use transform::{
    merge_transform_lists, parse_transform_list, Kind, MergePlan, Operation, ParseError,
    TransformList,
};
