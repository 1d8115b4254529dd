//! Graph store - the fixed-capacity node and edge feature tables.

use serde::{Deserialize, Serialize};

use super::{EdgeSlot, Layer, NodeId};

/// One node row: position, layer, kind code and mask bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeRow {
    pub x: u32,
    pub y: u32,
    pub layer: Layer,
    /// Terrain code, entity code, or 0 for "none".
    pub type_id: u8,
    pub active: bool,
}

/// One directed edge row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeRow {
    pub distance: u32,
    pub active: bool,
}

/// Preallocated node and edge tables.
///
/// Rows are zeroed and inactive until written. The tables never grow; an id
/// or slot outside the allocated range is a programmer error and panics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStore {
    nodes: Vec<NodeRow>,
    endpoints: Vec<[NodeId; 2]>,
    edges: Vec<EdgeRow>,
}

impl GraphStore {
    /// Allocate `node_count` node rows and `edge_slots` directed edge rows.
    pub fn with_capacity(node_count: usize, edge_slots: usize) -> Self {
        Self {
            nodes: vec![NodeRow::default(); node_count],
            endpoints: vec![[NodeId(0), NodeId(0)]; edge_slots],
            edges: vec![EdgeRow::default(); edge_slots],
        }
    }

    pub fn set_node(&mut self, id: NodeId, row: NodeRow) {
        self.nodes[id.index()] = row;
    }

    pub fn node(&self, id: NodeId) -> &NodeRow {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut NodeRow {
        &mut self.nodes[id.index()]
    }

    pub fn node_active(&self, id: NodeId) -> bool {
        self.node(id).active
    }

    /// Write the source and target of a directed slot.
    pub fn set_endpoints(&mut self, slot: EdgeSlot, source: NodeId, target: NodeId) {
        self.endpoints[slot.index()] = [source, target];
    }

    pub fn endpoints(&self, slot: EdgeSlot) -> [NodeId; 2] {
        self.endpoints[slot.index()]
    }

    pub fn set_edge(&mut self, slot: EdgeSlot, distance: u32, active: bool) {
        self.edges[slot.index()] = EdgeRow { distance, active };
    }

    pub fn edge(&self, slot: EdgeSlot) -> &EdgeRow {
        &self.edges[slot.index()]
    }

    /// Set the mask bit of both directions of an edge.
    pub fn set_pair_active(&mut self, slot: EdgeSlot, active: bool) {
        self.edges[slot.index()].active = active;
        self.edges[slot.reverse().index()].active = active;
    }

    /// Set the distance of both directions of an edge.
    pub fn set_pair_distance(&mut self, slot: EdgeSlot, distance: u32) {
        self.edges[slot.index()].distance = distance;
        self.edges[slot.reverse().index()].distance = distance;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_slot_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[NodeRow] {
        &self.nodes
    }

    pub fn endpoint_pairs(&self) -> &[[NodeId; 2]] {
        &self.endpoints
    }

    pub fn edges(&self) -> &[EdgeRow] {
        &self.edges
    }
}
