//! Feature significance analysis command
//!
//! Runs the significance filter over per-contact feature vectors, prints a ranked
//! table to stderr and writes the full report as JSON.

mod table;

use std::path::PathBuf;

use clap::Args;
use rapport_analysis::{
    correlation::{CorrelationConfig, CorrelationPair, find_correlations},
    significance::{FilterConfig, FilterReport, SignificanceFilter},
};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeFeaturesArg {
    /// Path to the feature vectors JSON file
    pub vectors: PathBuf,

    /// Filter configuration JSON file; missing fields use defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also report correlated pairs among significant features
    #[arg(long)]
    pub correlations: bool,

    /// Correlation configuration JSON file; missing fields use defaults
    #[arg(long, requires = "correlations")]
    pub correlation_config: Option<PathBuf>,

    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FeatureAnalysis<'a> {
    config: &'a FilterConfig,
    #[serde(flatten)]
    report: &'a FilterReport,
    /// Significant keys whose entropy falls below `config.min_entropy`
    entropy_warnings: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlations: Option<Vec<CorrelationPair>>,
}

pub(crate) fn run(arg: &AnalyzeFeaturesArg) -> anyhow::Result<()> {
    let config: FilterConfig = util::read_config_or_default("filter config", arg.config.as_ref())?;
    let vectors = util::read_vectors_file(&arg.vectors)?;

    let filter = SignificanceFilter::new(config);
    let report = filter.apply(&vectors);
    let entropy_warnings = report.entropy_warnings(filter.config().min_entropy);

    eprintln!(
        "Feature Significance Report ({} entities, {} features)",
        report.summary.entity_count, report.summary.total_features
    );
    eprintln!("==========================================\n");
    table::print_significant_table(&report);
    eprintln!();
    table::print_exclusion_table(&report);
    eprintln!();
    for key in &entropy_warnings {
        tracing::warn!(feature = *key, "significant feature has low entropy");
    }

    let correlations = if arg.correlations {
        let correlation_config: CorrelationConfig =
            util::read_config_or_default("correlation config", arg.correlation_config.as_ref())?;
        let keys = report.significant_keys().collect::<Vec<_>>();
        let pairs = find_correlations(&report.filtered, &keys, &correlation_config);
        table::print_correlation_table(&pairs);
        eprintln!();
        Some(pairs)
    } else {
        None
    };

    let analysis = FeatureAnalysis {
        config: filter.config(),
        report: &report,
        entropy_warnings,
        correlations,
    };
    Output::save_json(&analysis, arg.output.as_deref())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_path;

    #[test]
    fn test_run_writes_report() {
        let vectors = test_path("analyze-vectors.json");
        let config = test_path("analyze-config.json");
        let output = test_path("analyze-report.json");
        std::fs::write(
            &vectors,
            r#"[
                {"id":"a","features":{"x":1,"y":2,"note":"vip"}},
                {"id":"b","features":{"x":5,"y":10}},
                {"id":"c","features":{"x":9,"y":18}},
                {"id":"d","features":{"x":3,"y":6}},
                {"id":"e","features":{"x":7,"y":14}}
            ]"#,
        )
        .unwrap();
        std::fs::write(&config, r#"{"min_coefficient_of_variation": 0.2}"#).unwrap();

        run(&AnalyzeFeaturesArg {
            vectors: vectors.clone(),
            config: Some(config.clone()),
            correlations: true,
            correlation_config: None,
            output: Some(output.clone()),
        })
        .unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["config"]["min_coefficient_of_variation"], 0.2);
        assert_eq!(report["summary"]["entity_count"], 5);
        assert_eq!(report["decisions"]["x"]["status"], "significant");
        assert_eq!(report["decisions"]["note"]["status"], "excluded");
        assert_eq!(report["decisions"]["note"]["reason"]["kind"], "no_data");
        assert_eq!(report["correlations"][0]["feature_a"], "x");
        assert_eq!(report["correlations"][0]["strength"], "strong");

        for path in [vectors, config, output] {
            std::fs::remove_file(path).unwrap();
        }
    }
}
