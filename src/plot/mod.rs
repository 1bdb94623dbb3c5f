//! Terminal plotting helpers.
//!
//! - deterministic ASCII charts for the CLI reports (`ascii`)

pub mod ascii;

pub use ascii::*;
