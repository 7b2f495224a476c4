//! Condition trees
//!
//! The hierarchical, edit-friendly form of a filter expression. A tree is
//! decoded from a linear condition, edited in place (add, group, invert,
//! reorder, delete) and encoded back for execution.

pub mod convert;
mod edit;
mod node;
pub mod validator;


pub use convert::{to_condition, to_tree};
pub use edit::*;
pub use node::*;
pub use validator::{find_first_invalid, find_first_invalid_path};
