use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    builder::{GraphEdge, RelationshipGraph},
    score::Grade,
};

/// Number of edges reported in [`NetworkStatistics::strongest_edges`].
pub const STRONGEST_EDGE_COUNT: usize = 5;

/// Network-level summary of a relationship graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    /// All nodes, center included
    pub node_count: usize,
    pub edge_count: usize,
    /// `edges / (n * (n - 1) / 2)`, `0` for fewer than two nodes
    pub density: f64,
    /// Mean edge weight, `0` without edges
    pub average_weight: f64,
    /// Contact nodes per grade; every grade is present
    pub grade_distribution: BTreeMap<Grade, usize>,
    /// Heaviest edges, descending; equal weights keep graph order
    pub strongest_edges: Vec<GraphEdge>,
}

impl NetworkStatistics {
    /// Summarizes `graph`.
    ///
    /// ```
    /// use rapport_graph::{
    ///     builder::{GraphConfig, build_graph},
    ///     network::NetworkStatistics,
    ///     score::{EntityScore, rank_entities},
    /// };
    ///
    /// let entities = rank_entities(vec![
    ///     EntityScore { id: "a".into(), name: None, score: 80.0, grade: None },
    ///     EntityScore { id: "b".into(), name: None, score: 40.0, grade: None },
    /// ]);
    /// let stats = NetworkStatistics::from_graph(&build_graph(&entities, &GraphConfig::default()));
    /// // 2 edges out of 3 possible between 3 nodes
    /// assert!((stats.density - 2.0 / 3.0).abs() < 1e-12);
    /// assert_eq!(stats.average_weight, 60.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_graph(graph: &RelationshipGraph) -> Self {
        let node_count = graph.nodes.len();
        let edge_count = graph.edges.len();

        let density = if node_count < 2 {
            0.0
        } else {
            let possible = node_count * (node_count - 1) / 2;
            edge_count as f64 / possible as f64
        };

        let average_weight = if edge_count == 0 {
            0.0
        } else {
            graph.edges.iter().map(|edge| edge.weight).sum::<f64>() / edge_count as f64
        };

        let mut grade_distribution = Grade::ALL
            .iter()
            .map(|&grade| (grade, 0))
            .collect::<BTreeMap<_, _>>();
        for grade in graph.contact_nodes().filter_map(|node| node.grade) {
            *grade_distribution.entry(grade).or_default() += 1;
        }

        let mut strongest_edges = graph.edges.clone();
        strongest_edges.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        strongest_edges.truncate(STRONGEST_EDGE_COUNT);

        Self {
            node_count,
            edge_count,
            density,
            average_weight,
            grade_distribution,
            strongest_edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{GraphConfig, build_graph},
        score::{EntityScore, rank_entities},
    };

    fn graph(scores: &[f64]) -> RelationshipGraph {
        let entities = rank_entities(
            scores
                .iter()
                .enumerate()
                .map(|(i, &score)| EntityScore {
                    id: format!("c{i}"),
                    name: None,
                    score,
                    grade: None,
                })
                .collect(),
        );
        build_graph(&entities, &GraphConfig::default())
    }

    #[test]
    fn test_center_only() {
        let stats = NetworkStatistics::from_graph(&graph(&[]));
        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.average_weight, 0.0);
        assert!(stats.strongest_edges.is_empty());
        assert!(stats.grade_distribution.values().all(|&n| n == 0));
    }

    #[test]
    fn test_top_five_edges() {
        let stats = NetworkStatistics::from_graph(&graph(&[
            15.0, 95.0, 45.0, 85.0, 5.0, 65.0, 25.0, 75.0,
        ]));
        assert_eq!(stats.node_count, 9);
        assert_eq!(stats.edge_count, 7);
        let weights = stats
            .strongest_edges
            .iter()
            .map(|edge| edge.weight)
            .collect::<Vec<_>>();
        assert_eq!(weights, [95.0, 85.0, 75.0, 65.0, 45.0]);
        // 7 edges out of 36 possible
        assert!((stats.density - 7.0 / 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_grade_distribution_counts_contacts_only() {
        let stats = NetworkStatistics::from_graph(&graph(&[90.0, 81.0, 50.0, 5.0]));
        assert_eq!(stats.grade_distribution[&Grade::A], 2);
        assert_eq!(stats.grade_distribution[&Grade::B], 0);
        assert_eq!(stats.grade_distribution[&Grade::C], 1);
        assert_eq!(stats.grade_distribution[&Grade::F], 1);
        assert_eq!(stats.grade_distribution.values().sum::<usize>(), 4);
    }
}
