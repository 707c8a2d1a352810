//! Core primitives shared by every other module: vectors, the AABB value
//! type, notification delegates and the indexing macros.

// Must come first so `fast!` is visible to the rest of the crate.
#[path = "utils/safety.rs"]
#[macro_use]
pub mod safety;

pub mod aabb;
pub mod delegate;
pub mod math;

pub use aabb::Aabb;
pub use delegate::Delegate;
pub use math::{Vec2f, Vec2i};
