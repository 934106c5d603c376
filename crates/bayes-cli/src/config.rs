use bayes_core::Evidence;
use bayes_core::inference::Backend;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use crate::source::NetworkSource;

const DEFAULT_TELEMETRY_PATH: &str = "out/{run_id}/telemetry.jsonl";
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// A batch of queries against one network, loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunConfig {
    pub run_id: String,
    pub network: NetworkSource,
    #[serde(default)]
    pub backend: Backend,
    pub queries: Vec<QueryConfig>,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RunConfig {
    /// Load configuration from a YAML file on disk. A relative network path is taken relative to
    /// the configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: RunConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        if let Some(base) = path.parent() {
            cfg.network = cfg.network.relative_to(base);
        }
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_queries(&self.queries)?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize()?;
        Ok(())
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let telemetry = self
            .outputs
            .telemetry
            .as_deref()
            .unwrap_or(DEFAULT_TELEMETRY_PATH);
        ResolvedOutputs {
            results: self
                .outputs
                .results
                .as_deref()
                .map(|template| resolve_template(&self.run_id, template)),
            telemetry: resolve_template(&self.run_id, telemetry),
        }
    }
}

/// One query: a point probability when `value` is set, otherwise the full posterior.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryConfig {
    pub name: String,
    pub variable: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub evidence: BTreeMap<String, String>,
}

impl QueryConfig {
    pub fn evidence(&self) -> Evidence {
        Evidence::from(self.evidence.clone())
    }
}

/// Output artifact configuration. Paths may contain `{run_id}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OutputsConfig {
    /// JSONL file receiving one row per query.
    #[serde(default)]
    pub results: Option<String>,
    /// Structured log file, used when `logging.enable_structured` is set.
    #[serde(default)]
    pub telemetry: Option<String>,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.results", &self.results),
            ("outputs.telemetry", &self.telemetry),
        ] {
            let Some(value) = value else { continue };
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) -> Result<(), ValidationError> {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_queries(queries: &[QueryConfig]) -> Result<(), ValidationError> {
    if queries.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "queries".to_string(),
            message: "at least one query must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for query in queries {
        if query.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "queries.name".to_string(),
                message: "query name must not be empty".to_string(),
            });
        }

        if !seen.insert(query.name.as_str()) {
            return Err(ValidationError::InvalidField {
                field: "queries".to_string(),
                message: format!("query name '{}' defined more than once", query.name),
            });
        }

        if query.variable.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("queries[{}].variable", query.name),
                message: "query variable must not be empty".to_string(),
            });
        }

        if query.value.as_deref().is_some_and(|value| value.trim().is_empty()) {
            return Err(ValidationError::InvalidField {
                field: format!("queries[{}].value", query.name),
                message: "value must not be empty when given".to_string(),
            });
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub results: Option<PathBuf>,
    pub telemetry: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
