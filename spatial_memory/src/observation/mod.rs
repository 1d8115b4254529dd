//! Observation - read-only exports of the knowledge graph.
//!
//! Consumers never mutate the graph. They either take the full fixed-shape
//! [`GraphSnapshot`] (masked rows included, so ids and shapes stay stable as
//! discovery grows) or an [`ActiveSubgraph`] holding only what is known.

mod palette;

pub use palette::*;

use grid_world::{Coord, WorldId};
use serde::Serialize;

use crate::knowledge_base::{EdgeRow, EdgeSlot, KnowledgeGraph, NodeId, NodeRow};

/// Width of a node feature vector: x, y, layer, type_id, mask.
pub const NODE_FEATURES: usize = 5;

/// Width of an edge feature vector: distance, mask.
pub const EDGE_FEATURES: usize = 2;

/// Borrowed view of the complete node and edge tables.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphSnapshot<'a> {
    pub world: WorldId,
    pub player: Coord,
    pub nodes: &'a [NodeRow],
    /// Source and target of each directed edge slot.
    pub edge_index: &'a [[NodeId; 2]],
    pub edge_attr: &'a [EdgeRow],
}

impl GraphSnapshot<'_> {
    /// Node rows as dense feature vectors.
    pub fn node_features(&self) -> Vec<[f32; NODE_FEATURES]> {
        self.nodes
            .iter()
            .map(|row| {
                [
                    row.x as f32,
                    row.y as f32,
                    row.layer.level() as f32,
                    row.type_id as f32,
                    if row.active { 1.0 } else { 0.0 },
                ]
            })
            .collect()
    }

    /// Edge rows as dense feature vectors.
    pub fn edge_features(&self) -> Vec<[f32; EDGE_FEATURES]> {
        self.edge_attr
            .iter()
            .map(|row| [row.distance as f32, if row.active { 1.0 } else { 0.0 }])
            .collect()
    }

    /// Edge endpoints as two parallel rows (sources, targets).
    pub fn edge_index_rows(&self) -> [Vec<usize>; 2] {
        let sources = self.edge_index.iter().map(|[s, _]| s.index()).collect();
        let targets = self.edge_index.iter().map(|[_, t]| t.index()).collect();
        [sources, targets]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Only the active part of the graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActiveSubgraph {
    pub nodes: Vec<(NodeId, NodeRow)>,
    /// Active directed edges as (slot, source, target).
    pub edges: Vec<(EdgeSlot, NodeId, NodeId)>,
}

impl ActiveSubgraph {
    /// Filter a snapshot down to its active rows.
    pub fn from_snapshot(snapshot: &GraphSnapshot<'_>) -> Self {
        let nodes = snapshot
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, row)| row.active)
            .map(|(idx, row)| (NodeId(idx), *row))
            .collect();

        let edges = snapshot
            .edge_attr
            .iter()
            .zip(snapshot.edge_index)
            .enumerate()
            .filter(|(_, (row, _))| row.active)
            .map(|(idx, (_, [source, target]))| (EdgeSlot(idx), *source, *target))
            .collect();

        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|(n, _)| *n == id)
    }
}

impl KnowledgeGraph {
    /// Full fixed-shape export of the current state.
    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        let store = self.store();
        GraphSnapshot {
            world: self.world_id(),
            player: self.player_position(),
            nodes: store.nodes(),
            edge_index: store.endpoint_pairs(),
            edge_attr: store.edges(),
        }
    }

    /// The part of the graph currently known to the agent.
    pub fn active_subgraph(&self) -> ActiveSubgraph {
        ActiveSubgraph::from_snapshot(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfig;
    use crate::knowledge_base::{Layer, NodeKey};
    use grid_world::{EntityKind, TerrainKind, WorldGrid};

    fn graph_3x3() -> (WorldGrid, KnowledgeGraph) {
        let mut world = WorldGrid::filled(3, 3, TerrainKind::Hills, Coord::new(0, 0)).unwrap();
        world.set_entity(Coord::new(1, 0), EntityKind::Tree).unwrap();
        world.set_entity(Coord::new(2, 2), EntityKind::SnowyRock).unwrap();
        let graph = KnowledgeGraph::new(&world, &MemoryConfig::default()).unwrap();
        (world, graph)
    }

    #[test]
    fn test_snapshot_shapes_are_stable() {
        let (_, mut graph) = graph_3x3();

        let before = graph.snapshot();
        let shapes = (before.nodes.len(), before.edge_index.len(), before.edge_attr.len());

        graph.discover(Coord::new(2, 2)).unwrap();
        graph.move_player(Coord::new(0, 1)).unwrap();

        let after = graph.snapshot();
        assert_eq!(
            (after.nodes.len(), after.edge_index.len(), after.edge_attr.len()),
            shapes
        );
        assert_eq!(after.player, Coord::new(0, 1));
    }

    #[test]
    fn test_node_features() {
        let (_, graph) = graph_3x3();
        let features = graph.snapshot().node_features();

        assert_eq!(features.len(), 19);
        assert_eq!(features[0], [0.0, 0.0, 2.0, 0.0, 1.0]);

        let tree = graph.lookup(NodeKey::Entity(Coord::new(1, 0))).unwrap();
        assert_eq!(
            features[tree.index()],
            [1.0, 0.0, 1.0, EntityKind::Tree.code() as f32, 1.0]
        );
    }

    #[test]
    fn test_edge_features_match_rows() {
        let (_, graph) = graph_3x3();
        let snapshot = graph.snapshot();
        let features = snapshot.edge_features();
        let [sources, targets] = snapshot.edge_index_rows();

        assert_eq!(features.len(), snapshot.edge_attr.len());
        assert_eq!(sources.len(), targets.len());
        for (slot, row) in snapshot.edge_attr.iter().enumerate() {
            assert_eq!(features[slot][0], row.distance as f32);
            // Paired slots point in opposite directions.
            let reverse = EdgeSlot(slot).reverse().index();
            assert_eq!(sources[slot], targets[reverse]);
        }
    }

    #[test]
    fn test_active_subgraph() {
        let (_, mut graph) = graph_3x3();
        let active = graph.active_subgraph();

        // Player, four terrain nodes of the 2x2 window, and the tree.
        assert_eq!(active.node_count(), 6);
        assert!(active.contains_node(graph.player_node()));
        // Four terrain edges, tree-terrain and tree-player.
        assert_eq!(active.edge_count(), 6);
        assert!(active
            .nodes
            .iter()
            .all(|(_, row)| row.active && (row.layer != Layer::Entity || row.type_id > 1)));

        graph.discover(Coord::new(2, 2)).unwrap();
        let grown = graph.active_subgraph();
        assert_eq!(grown.node_count(), 8);
        assert_eq!(grown.edge_count(), 8);
    }

    #[test]
    fn test_snapshot_json() {
        let (_, graph) = graph_3x3();
        let json = graph.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nodes"].as_array().unwrap().len(), 19);
        assert_eq!(value["nodes"][0]["layer"], "Player");
        assert_eq!(value["player"]["x"], 0);
    }
}
