//! Integration test crate for the AdReel engine.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the engine crates to verify they work together.

#[cfg(test)]
mod export;

#[cfg(test)]
mod playback;
