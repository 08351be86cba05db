//! Donation points domain - map points, moderation workflow, category filters

pub mod activities;
pub mod data;
pub mod filter;
pub mod models;

// Re-export commonly used types
pub use data::{DonationPointData, PointInput};
pub use filter::CategoryFilter;
pub use models::{CreatorType, DonationPoint, PointStatus};
