use clap::{Parser, Subcommand};

use self::{
    analyze_features::AnalyzeFeaturesArg, build_graph::BuildGraphArg,
    derive_feature::DeriveFeatureArg, timeline::TimelineArg,
};

mod analyze_features;
mod build_graph;
mod derive_feature;
mod timeline;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Filter features by significance and rank them
    AnalyzeFeatures(#[clap(flatten)] AnalyzeFeaturesArg),
    /// Add a feature computed from an arithmetic formula
    DeriveFeature(#[clap(flatten)] DeriveFeatureArg),
    /// Build the relationship graph payload from scored contacts
    BuildGraph(#[clap(flatten)] BuildGraphArg),
    /// Group score snapshots into per-contact timelines
    Timeline(#[clap(flatten)] TimelineArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::AnalyzeFeatures(arg) => analyze_features::run(&arg)?,
        Mode::DeriveFeature(arg) => derive_feature::run(&arg)?,
        Mode::BuildGraph(arg) => build_graph::run(&arg)?,
        Mode::Timeline(arg) => timeline::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_features() {
        let args = CommandArgs::try_parse_from([
            "rapport",
            "analyze-features",
            "vectors.json",
            "--correlations",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::AnalyzeFeatures(arg) if arg.correlations));
    }

    #[test]
    fn test_derive_feature_requires_formula() {
        let result =
            CommandArgs::try_parse_from(["rapport", "derive-feature", "v.json", "--name", "x"]);
        assert!(result.is_err());
    }
}
