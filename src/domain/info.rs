use std::any::Any;
use std::rc::Rc;

use crate::core::Vec2i;

use super::handle::BodyHandle;

/// Opaque host data attached to a body.
pub type UserData = Rc<dyn Any>;

/// Payload of `Body::on_detection`.
#[derive(Clone)]
pub struct DetectionInfo {
    pub other: BodyHandle,
    pub frame_time: f32,
    pub user_data: Option<UserData>,
    /// Signed minimum intersection on both axes.
    pub intersection: Vec2i,
}

/// Payload of `Body::on_resolution`.
///
/// Subscribers may set either flag to skip that half of the response for this pair.
#[derive(Clone)]
pub struct ResolutionInfo {
    pub other: BodyHandle,
    pub user_data: Option<UserData>,
    pub resolution: Vec2i,
    pub no_resolve_position: bool,
    pub no_resolve_velocity: bool,
}

impl ResolutionInfo {
    pub(crate) fn new(other: BodyHandle, user_data: Option<UserData>, resolution: Vec2i) -> Self {
        Self {
            other,
            user_data,
            resolution,
            no_resolve_position: false,
            no_resolve_velocity: false,
        }
    }
}
