//! # Spatial Memory
//!
//! A partially-observable memory of a grid world. This crate keeps a
//! graph-shaped record of what the agent currently knows about the world in
//! `grid_world`, so a policy can consume a bounded, consistent snapshot
//! instead of the full world state.
//!
//! ## Core Components
//!
//! - **knowledge_base**: coordinate index, feature store, discovery tracker and the knowledge graph
//! - **events**: world mutations reported by the environment
//! - **observation**: fixed-shape snapshots, active subgraphs and colour lookup
//! - **agent**: couples agent actions on the world to graph updates
//!
//! ## Design Philosophy
//!
//! - **Preallocated**: every node and edge exists from construction; discovery only flips masks
//! - **Event-Driven**: the graph reacts to world changes, it never decides what the agent does
//! - **Read-Only Consumers**: observers read snapshots and never mutate the tables

pub mod agent;
pub mod config;
pub mod error;
pub mod events;
pub mod knowledge_base;
pub mod observation;

pub use agent::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use knowledge_base::*;
pub use observation::*;
