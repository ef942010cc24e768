pub mod asset;
pub mod features;
pub mod prediction;
pub mod price;

pub use asset::*;
pub use features::*;
pub use prediction::*;
pub use price::*;
