pub mod activation;
pub mod category;
pub mod point;

pub use activation::*;
pub use category::*;
pub use point::*;
