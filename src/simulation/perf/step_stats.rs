use wasm_bindgen::prelude::*;

/// Counters for one `World::update`.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub(super) step_ms: f64,
    pub(super) bodies_updated: u32,
    pub(super) bodies_skipped: u32,
    pub(super) bodies_removed: u32,
    pub(super) detections: u32,
    pub(super) resolutions: u32,
    pub(super) out_of_bounds: u32,
    pub(super) frame: u64,
}

#[wasm_bindgen]
impl StepStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    /// Bodies that ran the full pipeline.
    #[wasm_bindgen(getter)]
    pub fn bodies_updated(&self) -> u32 { self.bodies_updated }
    /// Bodies that skipped the step after leaving the grid.
    #[wasm_bindgen(getter)]
    pub fn bodies_skipped(&self) -> u32 { self.bodies_skipped }
    #[wasm_bindgen(getter)]
    pub fn bodies_removed(&self) -> u32 { self.bodies_removed }
    #[wasm_bindgen(getter)]
    pub fn detections(&self) -> u32 { self.detections }
    /// Candidates handed to the resolver.
    #[wasm_bindgen(getter)]
    pub fn resolutions(&self) -> u32 { self.resolutions }
    #[wasm_bindgen(getter)]
    pub fn out_of_bounds(&self) -> u32 { self.out_of_bounds }
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.frame }
}
