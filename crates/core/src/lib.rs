//! Core pack-opening logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod events;
pub mod packs;
pub mod rng;
pub mod roster;
pub mod session;
pub mod store;

pub use cards::*;
pub use events::*;
pub use packs::*;
pub use rng::*;
pub use roster::*;
pub use session::*;
pub use store::*;
