//! Knowledge Base module - the masked graph of everything the agent could know.
//!
//! The knowledge graph consists of:
//! - **CoordinateIndex**: bijection between (coordinate, layer) keys and dense node ids
//! - **GraphStore**: fixed-size node and edge feature tables with mask bits
//! - **DiscoveryTracker**: which coordinates have been revealed
//! - **KnowledgeGraph**: the orchestrator exposing mutation and read entry points

mod discovery;
mod graph;
mod index;
mod store;

pub use discovery::*;
pub use graph::*;
pub use index::*;
pub use store::*;
