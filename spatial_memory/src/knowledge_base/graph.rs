//! Knowledge Graph - the agent's incrementally revealed view of the world.

use grid_world::{Coord, EntityKind, TerrainKind, WorldId, WorldView};
use tracing::{debug, info};

use super::{
    CoordinateIndex, DiscoveryTracker, EdgeSlot, GraphStore, Layer, NodeId, NodeKey, NodeRow,
};
use crate::config::MemoryConfig;
use crate::error::GraphError;

/// Number of node rows for a grid: one terrain and one entity node per
/// coordinate, plus the player.
pub fn node_capacity(width: u32, height: u32) -> usize {
    2 * width as usize * height as usize + 1
}

/// Number of directed edge slots for a grid.
///
/// Terrain grid edges in both directions, plus an entity-terrain pair and an
/// entity-player pair for every coordinate whether or not it holds an entity.
pub fn edge_capacity(width: u32, height: u32) -> usize {
    let (w, h) = (width as usize, height as usize);
    2 * (w * h.saturating_sub(1) + h * w.saturating_sub(1)) + 4 * w * h
}

/// The latent graph of a whole world, masked down to what the agent knows.
///
/// Every node and edge is allocated once in [`KnowledgeGraph::new`]. Mutations
/// only flip mask bits and rewrite attributes, so ids and table shapes stay
/// stable for the whole episode. An edge is active exactly when both of its
/// endpoints are.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    world: WorldId,
    width: u32,
    height: u32,
    index: CoordinateIndex,
    store: GraphStore,
    discovery: DiscoveryTracker,
    player: NodeId,
    player_pos: Coord,
    next_slot: usize,
}

impl KnowledgeGraph {
    /// Build the full latent graph of a world and pre-seed discovery around
    /// the player's start.
    pub fn new(world: &impl WorldView, config: &MemoryConfig) -> Result<Self, GraphError> {
        let (width, height) = (world.width(), world.height());
        let player_pos = world.player_position();
        if !world.within_bounds(player_pos) {
            return Err(GraphError::OutOfBounds(player_pos));
        }

        let radius =
            DiscoveryTracker::initial_radius(config.completeness, config.vision_range, width);
        let mut discovery = DiscoveryTracker::new(width, height);
        discovery.seed_window(player_pos, radius);

        let mut index = CoordinateIndex::new(width, height);
        let mut store =
            GraphStore::with_capacity(node_capacity(width, height), edge_capacity(width, height));

        let player = index.assign(NodeKey::Player)?;
        store.set_node(
            player,
            NodeRow {
                x: player_pos.x,
                y: player_pos.y,
                layer: Layer::Player,
                type_id: 0,
                active: true,
            },
        );

        for y in 0..height {
            for x in 0..width {
                let coord = Coord::new(x, y);
                let known = discovery.is_discovered(coord);
                let terrain = world
                    .terrain_at(coord)
                    .ok_or(GraphError::OutOfBounds(coord))?;
                let entity = world
                    .entity_at(coord)
                    .ok_or(GraphError::OutOfBounds(coord))?;

                let terrain_id = index.assign(NodeKey::Terrain(coord))?;
                store.set_node(
                    terrain_id,
                    NodeRow {
                        x,
                        y,
                        layer: Layer::Terrain,
                        type_id: terrain.code(),
                        active: known,
                    },
                );

                let entity_id = index.assign(NodeKey::Entity(coord))?;
                store.set_node(
                    entity_id,
                    NodeRow {
                        x,
                        y,
                        layer: Layer::Entity,
                        type_id: entity.code(),
                        active: known && entity.is_discoverable(),
                    },
                );
            }
        }

        let mut graph = Self {
            world: world.world_id(),
            width,
            height,
            index,
            store,
            discovery,
            player,
            player_pos,
            next_slot: 0,
        };
        graph.create_terrain_edges()?;
        graph.create_entity_edges()?;
        debug_assert_eq!(graph.next_slot, graph.store.edge_slot_count());

        info!(
            world = %graph.world,
            nodes = graph.store.node_count(),
            edge_slots = graph.store.edge_slot_count(),
            radius,
            discovered = graph.discovery.discovered_count(),
            "knowledge graph built"
        );
        Ok(graph)
    }

    /// Write both directions of a new edge into the next free slot pair.
    fn create_edge(&mut self, a: NodeId, b: NodeId, distance: u32) {
        let forward = EdgeSlot(self.next_slot);
        let active = self.store.node_active(a) && self.store.node_active(b);

        self.store.set_endpoints(forward, a, b);
        self.store.set_endpoints(forward.reverse(), b, a);
        self.store.set_edge(forward, distance, active);
        self.store.set_edge(forward.reverse(), distance, active);
        self.index.register_edge(a, b, forward);

        self.next_slot += 2;
    }

    fn create_terrain_edges(&mut self) -> Result<(), GraphError> {
        for y in 0..self.height {
            for x in 0..self.width {
                let current = self.node_id(NodeKey::Terrain(Coord::new(x, y)))?;
                if x + 1 < self.width {
                    let right = self.node_id(NodeKey::Terrain(Coord::new(x + 1, y)))?;
                    self.create_edge(current, right, 1);
                }
                if y + 1 < self.height {
                    let bottom = self.node_id(NodeKey::Terrain(Coord::new(x, y + 1)))?;
                    self.create_edge(current, bottom, 1);
                }
            }
        }
        Ok(())
    }

    fn create_entity_edges(&mut self) -> Result<(), GraphError> {
        for y in 0..self.height {
            for x in 0..self.width {
                let coord = Coord::new(x, y);
                let entity = self.node_id(NodeKey::Entity(coord))?;
                let terrain = self.node_id(NodeKey::Terrain(coord))?;
                self.create_edge(entity, terrain, 0);
                self.create_edge(entity, self.player, coord.manhattan(self.player_pos));
            }
        }
        Ok(())
    }

    fn node_id(&self, key: NodeKey) -> Result<NodeId, GraphError> {
        self.index.lookup(key).ok_or(GraphError::UnknownNode(key))
    }

    fn check_bounds(&self, coord: Coord) -> Result<(), GraphError> {
        if coord.x < self.width && coord.y < self.height {
            Ok(())
        } else {
            Err(GraphError::OutOfBounds(coord))
        }
    }

    /// Set a node active and switch on every edge whose other end is active.
    ///
    /// Entity-player edges are refreshed to the live distance as they come up.
    fn activate_node_and_edges(&mut self, id: NodeId) {
        self.store.node_mut(id).active = true;

        for inc in self.index.incident(id) {
            if !self.store.node_active(inc.peer) {
                continue;
            }
            self.store.set_pair_active(inc.slot, true);

            let player_edge = inc.peer == self.player || id == self.player;
            if player_edge {
                let other = if id == self.player { inc.peer } else { id };
                if let Some(coord) = self.index.coordinate_of(other) {
                    self.store
                        .set_pair_distance(inc.slot, coord.manhattan(self.player_pos));
                }
            }
        }
    }

    /// Clear a node and every edge touching it.
    fn deactivate_node_and_edges(&mut self, id: NodeId) {
        self.store.node_mut(id).active = false;
        for inc in self.index.incident(id) {
            self.store.set_pair_active(inc.slot, false);
        }
    }

    /// Reveal a coordinate.
    ///
    /// Activates its terrain node and, when a discoverable entity stands
    /// there, its entity node. Returns false if it was already known.
    pub fn discover(&mut self, coord: Coord) -> Result<bool, GraphError> {
        self.check_bounds(coord)?;
        if !self.discovery.mark_discovered(coord) {
            return Ok(false);
        }

        let terrain = self.node_id(NodeKey::Terrain(coord))?;
        self.activate_node_and_edges(terrain);

        let entity = self.node_id(NodeKey::Entity(coord))?;
        let kind = EntityKind::try_from(self.store.node(entity).type_id).unwrap_or_default();
        if kind.is_discoverable() {
            self.activate_node_and_edges(entity);
        }

        debug!(%coord, entity = %kind, "coordinate discovered");
        Ok(true)
    }

    /// Move the player node, reveal its new tile and refresh every active
    /// entity-player distance.
    pub fn move_player(&mut self, coord: Coord) -> Result<(), GraphError> {
        self.check_bounds(coord)?;
        self.player_pos = coord;
        let row = self.store.node_mut(self.player);
        row.x = coord.x;
        row.y = coord.y;

        self.discover(coord)?;
        self.recalculate_player_distances();

        debug!(%coord, "player moved");
        Ok(())
    }

    fn recalculate_player_distances(&mut self) {
        for inc in self.index.incident(self.player) {
            if !self.store.edge(inc.slot).active {
                continue;
            }
            if let Some(coord) = self.index.coordinate_of(inc.peer) {
                self.store
                    .set_pair_distance(inc.slot, coord.manhattan(self.player_pos));
            }
        }
    }

    /// Record a path the world has already placed at `coord`.
    ///
    /// The tile is discovered first, so a path never shows up on unknown ground.
    pub fn build_path(&mut self, world: &impl WorldView, coord: Coord) -> Result<(), GraphError> {
        self.check_world(world)?;
        self.check_bounds(coord)?;

        let found = world.entity_at(coord).unwrap_or_default();
        if found != EntityKind::WoodPath {
            return Err(GraphError::NotAPath { coord, found });
        }

        self.discover(coord)?;

        let entity = self.node_id(NodeKey::Entity(coord))?;
        self.store.node_mut(entity).type_id = EntityKind::WoodPath.code();
        self.activate_node_and_edges(entity);

        debug!(%coord, "path recorded");
        Ok(())
    }

    /// Raise the terrain at `coord` by one level. Activation is unchanged.
    pub fn elevate_terrain(&mut self, coord: Coord) -> Result<TerrainKind, GraphError> {
        self.check_bounds(coord)?;
        let terrain = self.node_id(NodeKey::Terrain(coord))?;

        let raised = TerrainKind::try_from(self.store.node(terrain).type_id)
            .ok()
            .and_then(TerrainKind::elevated)
            .ok_or(GraphError::TerrainAtPeak(coord))?;
        self.store.node_mut(terrain).type_id = raised.code();

        debug!(%coord, terrain = %raised, "terrain elevated");
        Ok(raised)
    }

    /// Forget the entity at `coord`: type cleared, node and edges masked.
    pub fn remove_entity(&mut self, coord: Coord) -> Result<(), GraphError> {
        self.check_bounds(coord)?;
        let entity = self.node_id(NodeKey::Entity(coord))?;

        self.store.node_mut(entity).type_id = EntityKind::None.code();
        self.deactivate_node_and_edges(entity);

        debug!(%coord, "entity removed");
        Ok(())
    }

    fn check_world(&self, world: &impl WorldView) -> Result<(), GraphError> {
        let actual = world.world_id();
        if actual != self.world {
            return Err(GraphError::WorldMismatch {
                expected: self.world,
                actual,
            });
        }
        Ok(())
    }

    /// Node id of a key.
    pub fn lookup(&self, key: NodeKey) -> Option<NodeId> {
        self.index.lookup(key)
    }

    pub fn node(&self, id: NodeId) -> &NodeRow {
        self.store.node(id)
    }

    /// Row of the node behind a key.
    pub fn node_at(&self, key: NodeKey) -> Option<&NodeRow> {
        self.lookup(key).map(|id| self.store.node(id))
    }

    pub fn is_node_active(&self, id: NodeId) -> bool {
        self.store.node_active(id)
    }

    pub fn is_discovered(&self, coord: Coord) -> bool {
        self.discovery.is_discovered(coord)
    }

    /// Kind recorded for the entity node at a coordinate.
    pub fn entity_kind_at(&self, coord: Coord) -> Option<EntityKind> {
        self.node_at(NodeKey::Entity(coord))
            .and_then(|row| EntityKind::try_from(row.type_id).ok())
    }

    /// Kind recorded for the terrain node at a coordinate.
    pub fn terrain_kind_at(&self, coord: Coord) -> Option<TerrainKind> {
        self.node_at(NodeKey::Terrain(coord))
            .and_then(|row| TerrainKind::try_from(row.type_id).ok())
    }

    /// Edge slots whose mask disagrees with their endpoints.
    ///
    /// Always empty for a graph only mutated through its public operations.
    pub fn inconsistent_edges(&self) -> Vec<EdgeSlot> {
        (0..self.store.edge_slot_count())
            .map(EdgeSlot)
            .filter(|slot| {
                let [a, b] = self.store.endpoints(*slot);
                let expected = self.store.node_active(a) && self.store.node_active(b);
                self.store.edge(*slot).active != expected
            })
            .collect()
    }

    pub fn world_id(&self) -> WorldId {
        self.world
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn player_node(&self) -> NodeId {
        self.player
    }

    pub fn player_position(&self) -> Coord {
        self.player_pos
    }

    pub fn index(&self) -> &CoordinateIndex {
        &self.index
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn discovery(&self) -> &DiscoveryTracker {
        &self.discovery
    }
}
