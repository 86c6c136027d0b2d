//! Domain layer: portfolio entities and their invariants.

pub mod encoding;
pub mod entities;
pub mod error;
