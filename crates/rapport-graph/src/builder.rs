//! Relationship graph construction
//!
//! The graph is a star: one fixed center node for the viewer and one node per
//! scored contact. Contacts whose score reaches `min_score_for_edge` are linked to
//! the center; the others are rendered as isolated nodes.
//!
//! # Encodings
//!
//! With `t = score / 100`:
//!
//! | property        | formula          | score 0 | score 100 |
//! |-----------------|------------------|---------|-----------|
//! | node size       | `15 + t * 20`    | 15      | 35        |
//! | edge distance   | `300 - t * 200`  | 300     | 100       |
//! | edge width      | `1 + t * 4`      | 1       | 5         |
//! | edge weight     | `score`          | 0       | 100       |

use serde::{Deserialize, Serialize};

use crate::score::{Grade, ScoredEntity};

pub const CENTER_NODE_SIZE: f64 = 40.0;
pub const CENTER_NODE_COLOR: &str = "#6366f1";

/// Graph construction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub center_node_id: String,
    pub center_label: String,
    /// Entities below this score get a node but no edge
    pub min_score_for_edge: f64,
    /// Maximum number of contact nodes
    pub max_nodes: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            center_node_id: "me".to_owned(),
            center_label: "Me".to_owned(),
            min_score_for_edge: 10.0,
            max_nodes: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Center,
    Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub size: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    /// Fixed x position; only set on the center node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,
    /// Fixed y position; only set on the center node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub distance: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub node_count: usize,
    pub edge_count: usize,
    /// Lowest score among retained entities
    pub min_score: Option<f64>,
    /// Highest score among retained entities
    pub max_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

impl RelationshipGraph {
    pub fn contact_nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Contact)
    }
}

#[must_use]
pub fn node_size(score: f64) -> f64 {
    15.0 + (score / 100.0) * 20.0
}

#[must_use]
pub fn edge_distance(score: f64) -> f64 {
    300.0 - (score / 100.0) * 200.0
}

#[must_use]
pub fn edge_width(score: f64) -> f64 {
    1.0 + (score / 100.0) * 4.0
}

/// Builds the relationship graph from entities sorted by score, descending.
///
/// Only the first `max_nodes` entities are kept. Never fails; an empty list
/// produces a graph containing only the center node.
///
/// # Examples
///
/// ```
/// use rapport_graph::{
///     builder::{GraphConfig, build_graph},
///     score::{EntityScore, rank_entities},
/// };
///
/// let entities = rank_entities(
///     [90.0, 50.0, 5.0]
///         .iter()
///         .enumerate()
///         .map(|(i, &score)| EntityScore { id: i.to_string(), name: None, score, grade: None })
///         .collect(),
/// );
/// let graph = build_graph(&entities, &GraphConfig::default());
/// assert_eq!(graph.nodes.len(), 4);
/// assert_eq!(graph.edges.len(), 2);
/// ```
#[must_use]
pub fn build_graph(entities: &[ScoredEntity], config: &GraphConfig) -> RelationshipGraph {
    let retained = &entities[..entities.len().min(config.max_nodes)];

    let mut nodes = Vec::with_capacity(retained.len() + 1);
    nodes.push(GraphNode {
        id: config.center_node_id.clone(),
        label: config.center_label.clone(),
        kind: NodeKind::Center,
        size: CENTER_NODE_SIZE,
        color: CENTER_NODE_COLOR.to_owned(),
        grade: None,
        score: None,
        rank: None,
        fx: Some(0.0),
        fy: Some(0.0),
    });

    let mut edges = vec![];
    for entity in retained {
        nodes.push(GraphNode {
            id: entity.id.clone(),
            label: entity.label(),
            kind: NodeKind::Contact,
            size: node_size(entity.score),
            color: entity.grade.color().to_owned(),
            grade: Some(entity.grade),
            score: Some(entity.score),
            rank: Some(entity.rank),
            fx: None,
            fy: None,
        });

        if entity.score >= config.min_score_for_edge {
            edges.push(GraphEdge {
                source: config.center_node_id.clone(),
                target: entity.id.clone(),
                weight: entity.score,
                distance: edge_distance(entity.score),
                width: edge_width(entity.score),
            });
        }
    }

    let scores = retained.iter().map(|entity| entity.score);
    let metadata = GraphMetadata {
        node_count: nodes.len(),
        edge_count: edges.len(),
        min_score: scores.clone().min_by(f64::total_cmp),
        max_score: scores.max_by(f64::total_cmp),
    };
    tracing::info!(
        nodes = metadata.node_count,
        edges = metadata.edge_count,
        truncated = entities.len() - retained.len(),
        "relationship graph built"
    );

    RelationshipGraph {
        nodes,
        edges,
        metadata,
    }
}
