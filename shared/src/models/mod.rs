//! Domain models for the FarmLink platform

mod crop;
mod discussion;
mod farmland;
mod irrigation;
mod user;
mod weather;

pub use crop::*;
pub use discussion::*;
pub use farmland::*;
pub use irrigation::*;
pub use user::*;
pub use weather::*;
