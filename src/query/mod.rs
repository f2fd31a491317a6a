//! Query compiler
//!
//! Turns backend-independent filters into backend query documents.
//! Total over well-formed filters: there is no error path.

mod compiler;
mod filter;

pub use compiler::compile;
pub use filter::{Filter, MatchValue, RangeBounds};
