//! # Grid World
//!
//! The environment observed by the spatial memory: a rectangular grid with a
//! terrain layer, an entity layer and a single mobile agent. This crate owns
//! the ground truth and the rules for changing it. It knows nothing about
//! what the agent has discovered.

pub mod error;
pub mod kinds;
pub mod mechanics;
pub mod world_state;

pub use error::*;
pub use kinds::*;
pub use mechanics::*;
pub use world_state::*;
