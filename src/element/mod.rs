//! Leaf-level building blocks of a filter expression
//!
//! Comparison operators, logical connectives, typed literals and the
//! field/operator/value comparison they combine into.

mod comparison;
mod literal;
mod operator;

pub use comparison::*;
pub use literal::*;
pub use operator::*;
