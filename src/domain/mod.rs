pub mod bodies;
pub mod body;
pub mod config;
pub mod error;
pub mod groups;
pub mod handle;
pub mod info;

pub use bodies::Bodies;
pub use body::{Body, BodyKind, MassData};
pub use config::WorldConfig;
pub use error::WorldError;
pub use groups::{Group, GroupData, GroupSet, MAX_GROUPS};
pub use handle::BodyHandle;
pub use info::{DetectionInfo, ResolutionInfo, UserData};
