//! Hardware input through midir.

mod input;

pub use input::MidirBackend;
