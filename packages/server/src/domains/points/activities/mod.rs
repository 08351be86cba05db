//! Donation point activities - business logic functions
//!
//! Activities take the caller's identity explicitly and return domain types.

mod mutations;
mod queries;

pub use mutations::*;
pub use queries::*;
