//! Force simulation parameters for a force-directed renderer

use serde::{Deserialize, Serialize};

use crate::builder::RelationshipGraph;

pub const BASE_CHARGE_STRENGTH: f64 = -300.0;
pub const CHARGE_PER_NODE: f64 = -5.0;
pub const CENTER_STRENGTH: f64 = 0.05;
pub const COLLISION_PADDING: f64 = 5.0;
pub const ALPHA_DECAY: f64 = 0.0228;
pub const VELOCITY_DECAY: f64 = 0.4;

/// Spring between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkForce {
    pub source: String,
    pub target: String,
    pub distance: f64,
    /// Edge weight scaled into `[0, 1]`
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionForce {
    pub node_id: String,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceParameters {
    /// Many-body repulsion; grows with the node count so larger graphs spread out
    pub charge_strength: f64,
    pub center_strength: f64,
    pub alpha_decay: f64,
    pub velocity_decay: f64,
    pub links: Vec<LinkForce>,
    pub collisions: Vec<CollisionForce>,
}

impl ForceParameters {
    /// Derives simulation parameters from `graph`.
    ///
    /// ```
    /// use rapport_graph::{
    ///     builder::{GraphConfig, build_graph},
    ///     force::ForceParameters,
    /// };
    ///
    /// let graph = build_graph(&[], &GraphConfig::default());
    /// let force = ForceParameters::from_graph(&graph);
    /// assert_eq!(force.charge_strength, -305.0);
    /// assert_eq!(force.collisions[0].radius, 45.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_graph(graph: &RelationshipGraph) -> Self {
        let links = graph
            .edges
            .iter()
            .map(|edge| LinkForce {
                source: edge.source.clone(),
                target: edge.target.clone(),
                distance: edge.distance,
                strength: edge.weight / 100.0,
            })
            .collect();
        let collisions = graph
            .nodes
            .iter()
            .map(|node| CollisionForce {
                node_id: node.id.clone(),
                radius: node.size + COLLISION_PADDING,
            })
            .collect();

        Self {
            charge_strength: BASE_CHARGE_STRENGTH + CHARGE_PER_NODE * graph.nodes.len() as f64,
            center_strength: CENTER_STRENGTH,
            alpha_decay: ALPHA_DECAY,
            velocity_decay: VELOCITY_DECAY,
            links,
            collisions,
        }
    }
}
