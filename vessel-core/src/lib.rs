#![deny(rust_2018_idioms)]

//! Domain types and the in-memory vessel registry shared by the ais consumer and anything
//! that reads the live vessel picture.

mod ais;
mod category;
mod registry;
mod snapshot;
mod update;
mod vessel;

pub use ais::*;
pub use category::*;
pub use registry::*;
pub use snapshot::*;
pub use update::*;
pub use vessel::*;
