//! Centralized error type for the bindery umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] bindery_core::Error),

    #[error("Device: {0}")]
    Device(#[from] bindery_midi_io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
