//! Terrain definitions.

use serde::{Deserialize, Serialize};

use super::{EntityKind, Rgb};
use crate::error::WorldError;

/// Terrain kinds ordered by elevation, deepest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TerrainKind {
    DeepWater,
    Water,
    Plains,
    Hills,
    Mountains,
    Snow,
}

impl TerrainKind {
    /// All terrain kinds in code order.
    pub const ALL: [TerrainKind; 6] = [
        TerrainKind::DeepWater,
        TerrainKind::Water,
        TerrainKind::Plains,
        TerrainKind::Hills,
        TerrainKind::Mountains,
        TerrainKind::Snow,
    ];

    /// Stable numeric code, also used as the node `type_id`.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Elevation level. Matches the code.
    pub fn elevation(self) -> u8 {
        self.code()
    }

    /// Energy spent by the agent for a step taken on this terrain.
    pub fn energy_requirement(self) -> u32 {
        match self {
            TerrainKind::DeepWater => 10,
            TerrainKind::Water => 6,
            TerrainKind::Plains => 4,
            TerrainKind::Hills => 6,
            TerrainKind::Mountains => 5,
            TerrainKind::Snow => 3,
        }
    }

    /// Check if this terrain is one of the water levels.
    pub fn is_water(self) -> bool {
        matches!(self, TerrainKind::DeepWater | TerrainKind::Water)
    }

    /// The entity kind that naturally spawns on this terrain.
    pub fn spawns(self) -> EntityKind {
        match self {
            TerrainKind::DeepWater | TerrainKind::Water => EntityKind::Fish,
            TerrainKind::Plains | TerrainKind::Hills => EntityKind::Tree,
            TerrainKind::Mountains => EntityKind::MossyRock,
            TerrainKind::Snow => EntityKind::SnowyRock,
        }
    }

    /// The terrain one level shallower, or `None` at the highest level.
    pub fn elevated(self) -> Option<TerrainKind> {
        Self::ALL.get(self as usize + 1).copied()
    }

    /// Display colour.
    pub fn colour(self) -> Rgb {
        match self {
            TerrainKind::DeepWater => (0, 0, 128),
            TerrainKind::Water => (0, 0, 255),
            TerrainKind::Plains => (0, 200, 0),
            TerrainKind::Hills => (20, 128, 20),
            TerrainKind::Mountains => (128, 128, 128),
            TerrainKind::Snow => (255, 255, 255),
        }
    }
}

impl TryFrom<u8> for TerrainKind {
    type Error = WorldError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(WorldError::UnknownTerrainCode(code))
    }
}

impl From<TerrainKind> for u8 {
    fn from(kind: TerrainKind) -> Self {
        kind.code()
    }
}

impl std::fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
