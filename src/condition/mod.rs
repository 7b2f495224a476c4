//! Linear filter conditions
//!
//! This module holds the flat, order-preserving form of a filter
//! expression such as `Code eq '001' and not (Qty gt 5 or Posted eq true)`,
//! its wire and display renderings, the immutable snapshot handed to the
//! query transport, and a parser that reads stored wire strings back.

mod linear;
pub mod parser;
mod snapshot;


pub use linear::*;
pub use parser::parse;
pub use snapshot::*;
