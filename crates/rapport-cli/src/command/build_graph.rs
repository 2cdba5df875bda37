use std::path::PathBuf;

use clap::Args;
use rapport_graph::{
    builder::{GraphConfig, build_graph},
    score::{EntityScore, rank_entities},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct BuildGraphArg {
    /// Path to the entity scores JSON file
    pub scores: PathBuf,

    /// Graph configuration JSON file; missing fields use defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BuildGraphArg) -> anyhow::Result<()> {
    let config: GraphConfig = util::read_config_or_default("graph config", arg.config.as_ref())?;
    let scores: Vec<EntityScore> = util::read_json_file("entity scores", &arg.scores)?;

    let entities = rank_entities(scores);
    let graph = build_graph(&entities, &config);
    let retained = &entities[..entities.len().min(config.max_nodes)];
    let payload = graph.to_payload(retained);

    eprintln!(
        "Graph: {} nodes, {} edges, density {:.3}, average weight {:.1}",
        payload.network.node_count,
        payload.network.edge_count,
        payload.network.density,
        payload.network.average_weight,
    );
    for cluster in &payload.clusters.clusters {
        eprintln!(
            "  Grade {}: {:>4} contacts, average score {:>5.1}",
            cluster.grade,
            cluster.entities.len(),
            cluster.average_score,
        );
    }

    Output::save_json(&payload, arg.output.as_deref())?;
    Ok(())
}
