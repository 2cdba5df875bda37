//! Relationship graph construction from scored contacts
//!
//! Scores produced by the external relationship scorer are graded and ranked
//! ([`score`]), turned into a star-shaped graph around the viewer ([`builder`]),
//! and summarized for the renderer:
//!
//! - [`cluster::ClusteredView`]: contacts bucketed by grade
//! - [`network::NetworkStatistics`]: density, weights and grade distribution
//! - [`force::ForceParameters`]: force simulation settings
//! - [`timeline::Timeline`]: per-contact score history and trend
//!
//! [`payload::GraphPayload`] bundles the graph with its derived views.
//!
//! # Examples
//!
//! ```
//! use rapport_graph::{
//!     builder::{GraphConfig, build_graph},
//!     score::{EntityScore, rank_entities},
//! };
//!
//! let entities = rank_entities(vec![
//!     EntityScore { id: "1".into(), name: Some("Kim".into()), score: 82.0, grade: None },
//!     EntityScore { id: "2".into(), name: None, score: 47.5, grade: None },
//! ]);
//! let payload = build_graph(&entities, &GraphConfig::default()).to_payload(&entities);
//! assert_eq!(payload.graph.nodes.len(), 3);
//! assert_eq!(payload.network.edge_count, 2);
//! ```

pub mod builder;
pub mod cluster;
pub mod force;
pub mod network;
pub mod payload;
pub mod score;
pub mod timeline;
