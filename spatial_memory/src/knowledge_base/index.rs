//! Coordinate index - the bijection between (coordinate, layer) keys and
//! dense node ids, plus the paired edge slots between nodes.

use grid_world::Coord;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Dense identifier of a node row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Dense identifier of a directed edge row.
///
/// Slots come in pairs: the reverse of slot `s` is always `s + 1` when `s` is
/// even, and `s - 1` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeSlot(pub usize);

impl EdgeSlot {
    pub fn index(self) -> usize {
        self.0
    }

    /// The slot holding the opposite direction of the same edge.
    pub fn reverse(self) -> EdgeSlot {
        EdgeSlot(self.0 ^ 1)
    }
}

/// Logical plane of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layer {
    #[default]
    Terrain,
    Entity,
    Player,
}

impl Layer {
    /// Numeric level used in exported features.
    pub fn level(self) -> u8 {
        match self {
            Layer::Terrain => 0,
            Layer::Entity => 1,
            Layer::Player => 2,
        }
    }
}

/// Logical key of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKey {
    Terrain(Coord),
    Entity(Coord),
    /// The single agent node. Its position lives in the node row, not the key.
    Player,
}

impl NodeKey {
    pub fn layer(&self) -> Layer {
        match self {
            NodeKey::Terrain(_) => Layer::Terrain,
            NodeKey::Entity(_) => Layer::Entity,
            NodeKey::Player => Layer::Player,
        }
    }

    pub fn coord(&self) -> Option<Coord> {
        match self {
            NodeKey::Terrain(coord) | NodeKey::Entity(coord) => Some(*coord),
            NodeKey::Player => None,
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKey::Terrain(coord) => write!(f, "terrain{}", coord),
            NodeKey::Entity(coord) => write!(f, "entity{}", coord),
            NodeKey::Player => write!(f, "player"),
        }
    }
}

/// One end of an undirected edge as seen from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    pub peer: NodeId,
    /// Slot of the direction leaving the owning node towards `peer`.
    pub slot: EdgeSlot,
}

/// Fixed-stride index over a `width x height` grid.
///
/// Grid keys resolve through a flat array indexed by layer, then
/// `y * width + x`. Each node keeps its static list of incident edges, so
/// lookups of edges touching a node never scan the whole edge set.
#[derive(Debug, Clone)]
pub struct CoordinateIndex {
    width: u32,
    height: u32,
    by_key: Vec<Option<NodeId>>,
    player: Option<NodeId>,
    keys: Vec<NodeKey>,
    adjacency: Vec<Vec<Incidence>>,
}

impl CoordinateIndex {
    /// Create an empty index for a grid.
    pub fn new(width: u32, height: u32) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width,
            height,
            by_key: vec![None; 2 * cells],
            player: None,
            keys: Vec::with_capacity(2 * cells + 1),
            adjacency: Vec::with_capacity(2 * cells + 1),
        }
    }

    fn slot_of(&self, key: &NodeKey) -> Result<Option<usize>, GraphError> {
        let (offset, coord) = match key {
            NodeKey::Terrain(coord) => (0, *coord),
            NodeKey::Entity(coord) => (1, *coord),
            NodeKey::Player => return Ok(None),
        };
        if coord.x >= self.width || coord.y >= self.height {
            return Err(GraphError::OutOfBounds(coord));
        }
        let cells = self.width as usize * self.height as usize;
        Ok(Some(
            offset * cells + coord.y as usize * self.width as usize + coord.x as usize,
        ))
    }

    /// Allocate the next dense id for a key.
    pub fn assign(&mut self, key: NodeKey) -> Result<NodeId, GraphError> {
        let id = NodeId(self.keys.len());
        let entry = match self.slot_of(&key)? {
            Some(slot) => &mut self.by_key[slot],
            None => &mut self.player,
        };
        if entry.is_some() {
            return Err(GraphError::DuplicateKey(key));
        }
        *entry = Some(id);
        self.keys.push(key);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Resolve a key to its id, `None` if never assigned or out of bounds.
    pub fn lookup(&self, key: NodeKey) -> Option<NodeId> {
        match self.slot_of(&key) {
            Ok(Some(slot)) => self.by_key[slot],
            Ok(None) => self.player,
            Err(_) => None,
        }
    }

    pub fn key_of(&self, id: NodeId) -> Option<NodeKey> {
        self.keys.get(id.index()).copied()
    }

    /// Grid coordinate of a terrain or entity node.
    pub fn coordinate_of(&self, id: NodeId) -> Option<Coord> {
        self.key_of(id).and_then(|key| key.coord())
    }

    /// Record an edge between `a` and `b`: `forward` for `a -> b` and the
    /// adjacent slot for `b -> a`.
    ///
    /// # Panics
    ///
    /// Panics if either node id was never assigned.
    pub fn register_edge(&mut self, a: NodeId, b: NodeId, forward: EdgeSlot) {
        self.adjacency[a.index()].push(Incidence {
            peer: b,
            slot: forward,
        });
        self.adjacency[b.index()].push(Incidence {
            peer: a,
            slot: forward.reverse(),
        });
    }

    /// Slots of `a -> b` and `b -> a`.
    pub fn edge_slots(&self, a: NodeId, b: NodeId) -> Option<(EdgeSlot, EdgeSlot)> {
        self.adjacency
            .get(a.index())?
            .iter()
            .find(|inc| inc.peer == b)
            .map(|inc| (inc.slot, inc.slot.reverse()))
    }

    /// Static incidence list of a node.
    pub fn incident(&self, id: NodeId) -> &[Incidence] {
        self.adjacency
            .get(id.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Undirected edges touching a node, as `(id, peer)` pairs.
    pub fn edges_touching(&self, id: NodeId) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.incident(id).iter().map(move |inc| (id, inc.peer))
    }

    /// Number of assigned nodes.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
