//! Colour resolution for drawing the graph. Purely a lookup; nothing here
//! renders or touches graph state.

use grid_world::{EntityKind, TerrainKind};
use serde::{Deserialize, Serialize};

use crate::knowledge_base::{Layer, NodeRow};

/// Normalized RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn from_rgb((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }
}

/// Type to colour table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette;

impl Palette {
    /// Masked rows are drawn as transparent grey.
    pub const HIDDEN: Rgba = Rgba::new(0.5, 0.5, 0.5, 0.0);
    pub const PLAYER: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    /// Used for type codes with no known colour.
    pub const UNKNOWN: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

    /// Colour of a node row, `None` when the row should not be drawn.
    pub fn resolve(&self, row: &NodeRow) -> Option<Rgba> {
        if !row.active {
            return Some(Self::HIDDEN);
        }
        match row.layer {
            Layer::Terrain => Some(
                TerrainKind::try_from(row.type_id)
                    .map(|kind| Rgba::from_rgb(kind.colour()))
                    .unwrap_or(Self::UNKNOWN),
            ),
            Layer::Entity => EntityKind::try_from(row.type_id)
                .ok()
                .and_then(EntityKind::colour)
                .map(Rgba::from_rgb),
            Layer::Player => Some(Self::PLAYER),
        }
    }
}
