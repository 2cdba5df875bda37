use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use rapport_analysis::feature::FeatureVector;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)?;
        if let Output::File { path, .. } = &output {
            tracing::info!(path = %path.display(), "output written");
        }
        Ok(())
    }

    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path.to_path_buf()),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads a configuration file, falling back to defaults when no path is given.
///
/// Fields missing from the file take their default values.
pub fn read_config_or_default<T, P>(file_kind: &str, path: Option<P>) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
    P: AsRef<Path>,
{
    match path {
        Some(path) => read_json_file(file_kind, path),
        None => Ok(T::default()),
    }
}

/// Reads per-entity feature vectors from a JSON array file.
pub fn read_vectors_file<P>(path: P) -> anyhow::Result<Vec<FeatureVector>>
where
    P: AsRef<Path>,
{
    let vectors: Vec<FeatureVector> = read_json_file("feature vectors", path)?;
    tracing::info!(entities = vectors.len(), "feature vectors loaded");
    Ok(vectors)
}

/// Unique path in the system temp directory for test fixtures.
#[cfg(test)]
pub fn test_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rapport-{}-{name}", std::process::id()))
}

#[cfg(test)]
mod tests {
    use rapport_analysis::significance::FilterConfig;
    use rapport_graph::builder::GraphConfig;

    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let path = test_path("partial-filter.json");
        std::fs::write(&path, r#"{"min_data_coverage": 0.5}"#).unwrap();

        let config: FilterConfig = read_config_or_default("filter config", Some(&path)).unwrap();
        assert_eq!(config.min_data_coverage, 0.5);
        assert_eq!(
            config.min_coefficient_of_variation,
            FilterConfig::default().min_coefficient_of_variation
        );
        assert_eq!(
            config.high_priority_features,
            FilterConfig::default().high_priority_features
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_config_path_gives_defaults() {
        let config: GraphConfig = read_config_or_default("graph config", None::<&Path>).unwrap();
        assert_eq!(config, GraphConfig::default());
    }

    #[test]
    fn test_unreadable_config_is_an_error() {
        let missing = test_path("does-not-exist.json");
        let err = read_config_or_default::<GraphConfig, _>("graph config", Some(&missing))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open graph config file"));

        let invalid = test_path("invalid-graph.json");
        std::fs::write(&invalid, r#"{"max_nodes": "many"}"#).unwrap();
        let err = read_config_or_default::<GraphConfig, _>("graph config", Some(&invalid))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse graph config JSON file"));
        std::fs::remove_file(&invalid).unwrap();
    }

    #[test]
    fn test_vectors_with_text_values_load() {
        let path = test_path("text-vectors.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","features":{"x":1,"note":"vip"}},{"id":"b","features":{"x":5}}]"#,
        )
        .unwrap();
        let vectors = read_vectors_file(&path).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].value("note"), None);
        std::fs::remove_file(&path).unwrap();
    }
}
