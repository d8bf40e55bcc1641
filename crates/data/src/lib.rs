//! Pack-catalog loading and saved-state persistence.

pub mod load;
pub mod persistence;

pub use load::*;
pub use persistence::*;
