// Donation Points - API Core
//
// Backend for publishing, moderating and bookmarking donation drop-off points.
// Business logic lives per-domain in domains/*/activities; storage sits behind
// the kernel store traits.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
