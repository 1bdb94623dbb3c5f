//! Dataset sources.
//!
//! - built-in synthetic sample generation (`sample`)

pub mod sample;

pub use sample::*;
