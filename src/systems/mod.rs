pub mod resolver;

pub use resolver::{Impulse, ImpulseInfo, Resolver, Retro, RetroInfo};
