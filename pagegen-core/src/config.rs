//! Build configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields a working config that reads `ids.txt`, `props.txt` and
//! `template.txt` from the current directory and writes pages next to them.
//!
//! ```yaml
//! ids_file: data/ids.txt
//! content_dir: data/content
//! output_dir: public
//! concurrency: 8
//! task_timeout_ms: 5000
//! substitution: simultaneous
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::SubstitutionMode;

/// Inputs, outputs and scheduling knobs for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Entity ID list, one per line.
    pub ids_file: PathBuf,
    /// Attribute-name list, one per line.
    pub props_file: PathBuf,
    /// The shared template.
    pub template_file: PathBuf,
    /// Directory holding `<entity>-<attribute>.<content_extension>` files.
    pub content_dir: PathBuf,
    pub content_extension: String,
    /// Directory rendered pages are written to; created if absent.
    pub output_dir: PathBuf,
    pub output_extension: String,
    /// Upper bound on in-flight tasks per phase. `None` means available
    /// parallelism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    /// Per-task timeout in milliseconds. `None` disables timeouts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_timeout_ms: Option<u64>,
    pub substitution: SubstitutionMode,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            ids_file: PathBuf::from("ids.txt"),
            props_file: PathBuf::from("props.txt"),
            template_file: PathBuf::from("template.txt"),
            content_dir: PathBuf::from("."),
            content_extension: "txt".to_string(),
            output_dir: PathBuf::from("."),
            output_extension: "html".to_string(),
            concurrency: None,
            task_timeout_ms: None,
            substitution: SubstitutionMode::default(),
        }
    }
}

impl BuildConfig {
    /// Load a config from a YAML file at `path`.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: BuildConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot drive a build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == Some(0) {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.task_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("task_timeout_ms must be at least 1".into()));
        }
        if self.output_extension.is_empty() {
            return Err(ConfigError::Invalid("output_extension must not be empty".into()));
        }
        Ok(())
    }

    /// Effective worker limit: the configured value, else available
    /// parallelism, else 1.
    pub fn worker_limit(&self) -> NonZeroUsize {
        self.concurrency
            .and_then(NonZeroUsize::new)
            .or_else(|| std::thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN)
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_document_yields_defaults() {
        let config: BuildConfig = serde_yaml::from_str("{}").expect("parse");
        assert_eq!(config, BuildConfig::default());
        assert_eq!(config.output_extension, "html");
        assert_eq!(config.content_extension, "txt");
    }

    #[test]
    fn load_partial_file_overrides_only_given_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pagegen.yaml");
        std::fs::write(
            &path,
            "output_dir: public\nconcurrency: 3\nsubstitution: sequential\n",
        )
        .unwrap();

        let config = BuildConfig::load_at(&path).expect("load");
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.worker_limit().get(), 3);
        assert_eq!(config.substitution, SubstitutionMode::Sequential);
        assert_eq!(config.ids_file, PathBuf::from("ids.txt"));
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pagegen.yaml");
        std::fs::write(&path, "output_directory: public\n").unwrap();
        let err = BuildConfig::load_at(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_concurrency_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pagegen.yaml");
        std::fs::write(&path, "concurrency: 0\n").unwrap();
        let err = BuildConfig::load_at(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn worker_limit_defaults_to_at_least_one() {
        assert!(BuildConfig::default().worker_limit().get() >= 1);
    }

    #[test]
    fn task_timeout_converts_millis() {
        let config = BuildConfig {
            task_timeout_ms: Some(250),
            ..BuildConfig::default()
        };
        assert_eq!(config.task_timeout(), Some(Duration::from_millis(250)));
    }
}
