//! # Domain Models
//!
//! Pure TokenForge types with minimal dependencies (`serde`, `bitflags`).
//! No I/O and no composition logic live here: only the configuration tree, the
//! capability flag set and the constants the other crates agree on.

pub mod capabilities;
pub mod config;
pub mod constants;
pub mod registry;
