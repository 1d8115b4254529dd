//! Errors raised while building or mutating a world grid.

use thiserror::Error;

use crate::world_state::Coord;

/// Failures of world construction and world mutations.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("unknown terrain code {0}")]
    UnknownTerrainCode(u8),

    #[error("unknown entity code {0}")]
    UnknownEntityCode(u8),

    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("{layer} layer has {actual} cells, expected {expected}")]
    LayerSizeMismatch {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{layer} row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        layer: &'static str,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Coord),

    #[error("player tile {0} is occupied by an entity")]
    PlayerTileOccupied(Coord),

    #[error("failed to parse world layout: {0}")]
    Layout(#[from] toml::de::Error),
}
