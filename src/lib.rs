//! Filter Condition Core - boolean filter expressions for OData-style queries
//!
//! This crate models a filter expression in two equivalent forms: a flat,
//! order-preserving [`Condition`] that renders to the wire filter string
//! consumed by a query transport, and a [`ConditionTree`] that an
//! interactive editor groups, inverts, reorders and prunes. Conversions
//! between the two are lossless.
//!
//! ```
//! use filter_condition_core::{Comparison, ComparisonOperator, ConditionTree, Field, FieldKind};
//!
//! let mut tree = ConditionTree::new();
//! let code = Field::new("Code", FieldKind::Text);
//! let qty = Field::new("Qty", FieldKind::Int32);
//! tree.add_leaf(Comparison::new(code, ComparisonOperator::Equal, "001").unwrap(), None);
//! tree.add_leaf(Comparison::new(qty, ComparisonOperator::Greater, 5).unwrap(), None);
//!
//! let filter = tree.compile().unwrap();
//! assert_eq!(filter.wire(), "Code eq '001' and Qty gt 5");
//! ```

pub mod condition;
pub mod config;
pub mod element;
pub mod error;
pub mod tree;

pub use crate::condition::{parse, Condition, FilterElement, FilterSnapshot};
pub use crate::config::{Field, FieldCatalog, FieldKind};
pub use crate::element::{Comparison, ComparisonBuilder, ComparisonOperator, Literal, LogicalConnective};
pub use crate::error::{FilterError, Result};
pub use crate::tree::{ConditionTree, Group, Node, NodePath};
