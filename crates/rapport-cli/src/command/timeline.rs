use std::path::PathBuf;

use clap::Args;
use rapport_graph::timeline::{ScoreSnapshot, Timeline};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct TimelineArg {
    /// Path to the score snapshots JSON file
    pub snapshots: PathBuf,

    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TimelineArg) -> anyhow::Result<()> {
    let snapshots: Vec<ScoreSnapshot> = util::read_json_file("score snapshots", &arg.snapshots)?;
    let timeline = Timeline::from_snapshots(snapshots);

    eprintln!(
        "  {:<24} {:>7} {:>8} {:>8} {:>8} {:>8}",
        "Contact", "Points", "First", "Latest", "Change", "Trend",
    );
    // contact(24) + points(7) + first(8) + latest(8) + change(8) + trend(8) + spaces(5)
    eprintln!("  {}", "-".repeat(68));
    for entity in &timeline.entities {
        eprintln!(
            "  {:<24} {:>7} {:>8.1} {:>8.1} {:>+8.1} {:>8}",
            entity.entity_id,
            entity.points.len(),
            entity.first_score,
            entity.latest_score,
            entity.change,
            entity.trend.to_string(),
        );
    }

    Output::save_json(&timeline, arg.output.as_deref())?;
    Ok(())
}
