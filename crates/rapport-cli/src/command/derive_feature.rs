use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rapport_analysis::formula::{Formula, derive_feature};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct DeriveFeatureArg {
    /// Path to the feature vectors JSON file
    pub vectors: PathBuf,

    /// Key of the derived feature
    #[arg(long)]
    pub name: String,

    /// Arithmetic formula over existing feature keys, e.g. `totalMemos / (totalMeetings + 1)`
    #[arg(long)]
    pub formula: String,

    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DeriveFeatureArg) -> anyhow::Result<()> {
    let formula = Formula::parse(&arg.formula)
        .with_context(|| format!("Invalid formula for {}: {}", arg.name, arg.formula))?;
    let vectors = util::read_vectors_file(&arg.vectors)?;

    let derived = derive_feature(&vectors, &arg.name, &formula);
    let computed = derived
        .iter()
        .filter(|vector| vector.features.contains_key(&arg.name))
        .count();
    eprintln!(
        "Derived {} = {formula} for {computed} of {} entities",
        arg.name,
        derived.len()
    );

    Output::save_json(&derived, arg.output.as_deref())?;
    Ok(())
}
