use crate::core::{Aabb, Vec2i};
use crate::domain::bodies::Bodies;
use crate::domain::body::Body;
use crate::domain::handle::BodyHandle;
use crate::domain::info::ResolutionInfo;

/// Largest overlap first, insertion order on ties.
pub(super) fn sort_by_overlap<I>(bodies: &Bodies<I>, body: BodyHandle, to_resolve: &mut [BodyHandle]) {
    let Some(shape) = bodies.get(body).map(|b| *b.shape()) else {
        return;
    };
    let area = |h: BodyHandle| bodies.get(h).map_or(0, |o| shape.overlap_area(o.shape()));
    to_resolve.sort_by_key(|h| std::cmp::Reverse(area(*h)));
}

/// Penetration of `shape` into `other`, per axis and as a single-axis push.
#[derive(Clone, Copy, Debug)]
pub(super) struct Contact {
    pub intersection: Vec2i,
    pub resolution: Vec2i,
}

impl Contact {
    pub fn between(shape: &Aabb, other: &Aabb) -> Self {
        Self {
            intersection: shape.min_intersection(other),
            resolution: shape.min_translation(other),
        }
    }

    /// Whether the push is horizontal.
    pub fn on_x(&self) -> bool {
        self.intersection.x.abs() < self.intersection.y.abs()
    }
}

/// Fire `on_resolution` and hand back the subscribers' verdict.
pub(super) fn notify<I, J>(me: &mut Body<I>, other_handle: BodyHandle, other: &Body<J>, resolution: Vec2i) -> ResolutionInfo {
    let mut info = ResolutionInfo::new(other_handle, other.user_data().cloned(), resolution);
    me.on_resolution.fire(&mut info);
    info
}

/// Direction `me` was driving into `other` when they met, per axis:
/// `1` moving right/down, `-1` moving left/up, `0` no fresh impact.
///
/// `me.shape` must already hold the corrected position. An axis counts only
/// when the velocity points into the contact and the previous shapes show
/// the bodies were apart along it, or side by side across the other axis.
pub(super) fn approach<I, J>(me: &Body<I>, other: &Body<J>, resolution: Vec2i) -> (i32, i32) {
    let shape = me.shape();
    let old = me.old_shape();
    let s = other.shape();
    let os = other.old_shape();
    let velocity = me.velocity();

    let (old_left, old_right) = (old.is_left_of(s), old.is_right_of(s));
    let (old_above, old_below) = (old.is_above(s), old.is_below(s));
    let old_h_overlap = !(old_left || old_right);
    let old_v_overlap = !(old_above || old_below);

    let y = if resolution.y < 0 && velocity.y > 0.0 && (old_above || (os.is_below(shape) && old_h_overlap)) {
        1
    } else if resolution.y > 0 && velocity.y < 0.0 && (old_below || (os.is_above(shape) && old_h_overlap)) {
        -1
    } else {
        0
    };

    let x = if resolution.x < 0 && velocity.x > 0.0 && (old_left || (os.is_right_of(shape) && old_v_overlap)) {
        1
    } else if resolution.x > 0 && velocity.x < 0.0 && (old_right || (os.is_left_of(shape) && old_v_overlap)) {
        -1
    } else {
        0
    };

    (x, y)
}
