use serde::{Deserialize, Serialize};

use crate::{
    builder::RelationshipGraph, cluster::ClusteredView, force::ForceParameters,
    network::NetworkStatistics, score::ScoredEntity,
};

/// Everything the visualization needs for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub graph: RelationshipGraph,
    pub clusters: ClusteredView,
    pub network: NetworkStatistics,
    pub force: ForceParameters,
}

impl RelationshipGraph {
    /// Bundles the graph with its derived views.
    ///
    /// `entities` feeds the clustered view and is normally the same list the
    /// graph was built from.
    #[must_use]
    pub fn to_payload(self, entities: &[ScoredEntity]) -> GraphPayload {
        let clusters = ClusteredView::from_entities(entities);
        let network = NetworkStatistics::from_graph(&self);
        let force = ForceParameters::from_graph(&self);
        GraphPayload {
            graph: self,
            clusters,
            network,
            force,
        }
    }
}
