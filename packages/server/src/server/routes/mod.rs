// HTTP routes
pub mod favorites;
pub mod health;
pub mod points;

pub use favorites::*;
pub use health::*;
pub use points::*;
