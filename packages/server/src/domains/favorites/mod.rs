//! Favorites domain - donor bookmarks with tags and a planned visit date

pub mod activities;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::FavoriteData;
pub use models::Favorite;
