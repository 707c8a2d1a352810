//! Resolvers - turn a body's overlaps into position and velocity response
//!
//! The world hands a resolver one body and the bodies it must resolve
//! against, once per body per step, then calls `post_update` once after the
//! whole pass. Per-body resolver state lives in `Body::resolver_info`.

use crate::domain::bodies::Bodies;
use crate::domain::handle::BodyHandle;

mod contact;
mod impulse;
mod retro;

pub use impulse::{Impulse, ImpulseInfo};
pub use retro::{Retro, RetroInfo};

pub trait Resolver {
    /// Per-body state owned by each body.
    type Info: Default;

    /// Short name for logs and hosts.
    fn name(&self) -> &'static str;

    /// Separate `body` from every overlapping body in `to_resolve`.
    /// The list is reordered in place.
    fn resolve(&self, bodies: &mut Bodies<Self::Info>, body: BodyHandle, to_resolve: &mut Vec<BodyHandle>);

    /// Once per step, after every body was resolved.
    fn post_update(&self, bodies: &mut Bodies<Self::Info>);
}
