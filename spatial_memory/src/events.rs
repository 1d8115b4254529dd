//! World events reported by the environment after it has changed.

use grid_world::{Coord, WorldView};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::knowledge_base::KnowledgeGraph;

/// A world mutation the knowledge graph must mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A coordinate came into view.
    Scouted(Coord),
    /// The agent now stands at the coordinate.
    PlayerMoved(Coord),
    /// A wood path was placed at the coordinate.
    PathBuilt(Coord),
    /// Water at the coordinate was raised by a rock.
    TerrainElevated(Coord),
    /// The entity at the coordinate was harvested.
    EntityRemoved(Coord),
}

impl WorldEvent {
    /// Coordinate the event happened at.
    pub fn coord(&self) -> Coord {
        match self {
            WorldEvent::Scouted(c)
            | WorldEvent::PlayerMoved(c)
            | WorldEvent::PathBuilt(c)
            | WorldEvent::TerrainElevated(c)
            | WorldEvent::EntityRemoved(c) => *c,
        }
    }
}

impl KnowledgeGraph {
    /// Mirror one world event in the graph.
    pub fn apply(&mut self, world: &impl WorldView, event: WorldEvent) -> Result<(), GraphError> {
        match event {
            WorldEvent::Scouted(coord) => self.discover(coord).map(|_| ()),
            WorldEvent::PlayerMoved(coord) => self.move_player(coord),
            WorldEvent::PathBuilt(coord) => self.build_path(world, coord),
            WorldEvent::TerrainElevated(coord) => self.elevate_terrain(coord).map(|_| ()),
            WorldEvent::EntityRemoved(coord) => self.remove_entity(coord),
        }
    }
}
