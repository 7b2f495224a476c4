//! Field metadata configuration
//!
//! This module holds the descriptors of queryable fields and the read-only
//! catalog they are looked up from. Catalogs are usually deserialized from a
//! JSON metadata document supplied by the surrounding application.

mod catalog;
mod field;

pub use catalog::*;
pub use field::*;

/// Maximum number of fractional digits rendered for decimal literals
pub const MAX_FRACTION_DIGITS: usize = 6;

/// Prefix that marks a named-parameter placeholder literal
pub const PARAMETER_SIGIL: char = '@';
