//! Terrain and entity kinds for the two grid layers.
//!
//! Every tile carries exactly one terrain kind and at most one entity kind.
//! Both are closed enums with stable `u8` codes so they can be stored as the
//! `type_id` feature of a graph node.

mod entity;
mod terrain;

pub use entity::*;
pub use terrain::*;

/// RGB colour in the 0-255 range.
pub type Rgb = (u8, u8, u8);
