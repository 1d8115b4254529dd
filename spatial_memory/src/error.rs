//! Error types for the spatial memory.

use grid_world::{Coord, EntityKind, WorldId};
use thiserror::Error;

use crate::knowledge_base::NodeKey;

/// Internal-consistency and precondition failures of the knowledge graph.
///
/// None of these are expected at runtime; they point at a construction bug
/// or at a caller that skipped its own checks.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node key {0} is already assigned")]
    DuplicateKey(NodeKey),

    #[error("node key {0} was never assigned")]
    UnknownNode(NodeKey),

    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Coord),

    #[error("entity at {coord} is {found}, expected a wood path")]
    NotAPath { coord: Coord, found: EntityKind },

    #[error("terrain at {0} cannot be raised any further")]
    TerrainAtPeak(Coord),

    #[error("graph belongs to world {expected}, got world {actual}")]
    WorldMismatch { expected: WorldId, actual: WorldId },
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failures surfaced by the agent controller.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    World(#[from] grid_world::WorldError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
