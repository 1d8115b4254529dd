//! Entity definitions.

use serde::{Deserialize, Serialize};

use super::Rgb;
use crate::error::WorldError;
use crate::mechanics::Resource;

/// Entity kinds that can occupy a tile.
///
/// `None` marks an empty tile. `Fish` is reserved: it is placed by world
/// generation but never collected and never surfaces in the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EntityKind {
    #[default]
    None,
    Fish,
    Tree,
    MossyRock,
    SnowyRock,
    Outpost,
    WoodPath,
}

impl EntityKind {
    /// All entity kinds in code order.
    pub const ALL: [EntityKind; 7] = [
        EntityKind::None,
        EntityKind::Fish,
        EntityKind::Tree,
        EntityKind::MossyRock,
        EntityKind::SnowyRock,
        EntityKind::Outpost,
        EntityKind::WoodPath,
    ];

    /// Stable numeric code, also used as the node `type_id`.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the entity is represented by an active node once its tile is known.
    pub fn is_discoverable(self) -> bool {
        self.code() > EntityKind::Fish.code()
    }

    /// Check if the entity can be harvested.
    pub fn is_resource(self) -> bool {
        self.yields().is_some()
    }

    /// Resource gained by harvesting this entity.
    pub fn yields(self) -> Option<Resource> {
        match self {
            EntityKind::Tree => Some(Resource::Wood),
            EntityKind::MossyRock | EntityKind::SnowyRock => Some(Resource::Stone),
            _ => None,
        }
    }

    /// Whether the entity stops the agent from entering its tile.
    pub fn blocks_movement(self) -> bool {
        !matches!(self, EntityKind::None | EntityKind::WoodPath)
    }

    /// Display colour, `None` for kinds that are never drawn.
    pub fn colour(self) -> Option<Rgb> {
        match self {
            EntityKind::Tree => Some((34, 84, 41)),
            EntityKind::MossyRock | EntityKind::SnowyRock => Some((156, 166, 158)),
            EntityKind::Outpost => Some((199, 41, 31)),
            EntityKind::WoodPath => Some((117, 79, 10)),
            EntityKind::None | EntityKind::Fish => None,
        }
    }
}

impl TryFrom<u8> for EntityKind {
    type Error = WorldError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(WorldError::UnknownEntityCode(code))
    }
}

impl From<EntityKind> for u8 {
    fn from(kind: EntityKind) -> Self {
        kind.code()
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
