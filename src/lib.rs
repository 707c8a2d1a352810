//! Gridbox Engine - 2D AABB collision detection and resolution on a uniform grid
//!
//! Architecture:
//! - core/       - Math, rectangles, notifications, access macros
//! - domain/     - Bodies, groups, configuration, errors
//! - spatial/    - Grid cells and lazy grid queries
//! - systems/    - Resolvers (impulse, retro)
//! - simulation/ - World orchestration and the JS facade

// Utils with safety macros (must be first for macro export!)
#[macro_use]
pub mod core;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&"Gridbox collision engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::{Aabb, Delegate, Vec2f, Vec2i};
pub use domain::{Body, BodyHandle, BodyKind, DetectionInfo, Group, GroupData, GroupSet, ResolutionInfo, WorldConfig, WorldError};
pub use simulation::{CollisionWorld, StepStats, World};
pub use spatial::{Area, Direction, Distance, Grid, GridQuery, Orthogonal, Point, RayCast, Traversal};
pub use systems::{Impulse, ImpulseInfo, Resolver, Retro, RetroInfo};
