//! Common types shared by every mini-bendu crate.
//!
//! - Source location tracking (`SourceLocation`)
//! - Centralized limits/thresholds (`limits`)

pub mod limits;
pub mod location;

pub use location::SourceLocation;
