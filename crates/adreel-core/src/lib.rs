//! AdReel Core - Foundation types for the composition engine
//!
//! This crate provides the fundamental pieces shared by the engine crates:
//! - Second-based time helpers (formatting, tolerance comparison)
//! - The shared error type and `Result` alias

pub mod error;
pub mod time;

pub use error::{EngineError, Result};
pub use time::{approx_eq, format_timecode, TIME_TOLERANCE};
