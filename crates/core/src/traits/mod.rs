//! Core traits for platform-agnostic control functionality.
//!
//! Trait definitions here carry no feature gates. The mock implementation
//! is always available so that the simulator and host tests can drive the
//! control core deterministically.

pub mod time;

pub use time::{MockTime, TimeSource};
