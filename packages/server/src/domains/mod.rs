// Business domains
pub mod favorites;
pub mod points;
