use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bayes_core::networks::{self, random};
use bayes_core::{BayesNetwork, BuildError, NetworkDefinition};
use serde::Deserialize;
use thiserror::Error;

const BUILTIN_PREFIX: &str = "builtin:";
const RANDOM_PREFIX: &str = "random:";

/// Where a network comes from: a bundled network, a seeded random one, or a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum NetworkSource {
    Builtin(String),
    Random(u64),
    File(PathBuf),
}

impl NetworkSource {
    /// Anchors a relative file path at `base`. Other sources are unchanged.
    pub fn relative_to(self, base: &Path) -> Self {
        match self {
            NetworkSource::File(path) if path.is_relative() => NetworkSource::File(base.join(path)),
            other => other,
        }
    }

    /// Builds and model-checks the network.
    pub fn load(&self) -> Result<BayesNetwork, SourceError> {
        match self {
            NetworkSource::Builtin(name) => match networks::builtin(name) {
                Some(result) => result.map_err(|source| SourceError::Build {
                    network: self.to_string(),
                    source,
                }),
                None => Err(SourceError::UnknownBuiltin {
                    name: name.clone(),
                    available: networks::names().collect::<Vec<_>>().join(", "),
                }),
            },
            NetworkSource::Random(seed) => random::generate(*seed, random::RandomShape::default())
                .map_err(|source| SourceError::Build {
                    network: self.to_string(),
                    source,
                }),
            NetworkSource::File(_) => {
                self.definition()?
                    .build()
                    .map_err(|source| SourceError::Build {
                        network: self.to_string(),
                        source,
                    })
            }
        }
    }

    /// The network as a definition document. Files are returned as parsed, without building.
    pub fn definition(&self) -> Result<NetworkDefinition, SourceError> {
        match self {
            NetworkSource::File(path) => read_definition(path),
            _ => self.load().map(|network| NetworkDefinition::from_network(&network)),
        }
    }
}

fn read_definition(path: &Path) -> Result<NetworkDefinition, SourceError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let yaml = match extension.as_deref() {
        Some("yaml" | "yml") => true,
        Some("json") => false,
        _ => {
            return Err(SourceError::UnsupportedExtension {
                path: path.to_path_buf(),
            });
        }
    };
    let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if yaml {
        serde_yaml::from_str(&text).map_err(|source| SourceError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        NetworkDefinition::from_json(&text).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FromStr for NetworkSource {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(name) = s.strip_prefix(BUILTIN_PREFIX) {
            return Ok(NetworkSource::Builtin(name.to_string()));
        }
        if let Some(seed) = s.strip_prefix(RANDOM_PREFIX) {
            return seed
                .parse()
                .map(NetworkSource::Random)
                .map_err(|_| SourceError::InvalidSeed {
                    value: seed.to_string(),
                });
        }
        if s.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(NetworkSource::File(PathBuf::from(s)))
    }
}

impl TryFrom<String> for NetworkSource {
    type Error = SourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for NetworkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkSource::Builtin(name) => write!(f, "{BUILTIN_PREFIX}{name}"),
            NetworkSource::Random(seed) => write!(f, "{RANDOM_PREFIX}{seed}"),
            NetworkSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network source must not be empty")]
    Empty,
    #[error("unknown builtin network '{name}' (available: {available})")]
    UnknownBuiltin { name: String, available: String },
    #[error("invalid random seed '{value}'")]
    InvalidSeed { value: String },
    #[error("failed to read network {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse network {path:?}: {source}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("failed to parse network {path:?}: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("network file {path:?} must end in .yaml, .yml or .json")]
    UnsupportedExtension { path: PathBuf },
    #[error("network {network} is invalid: {source}")]
    Build {
        network: String,
        #[source]
        source: BuildError,
    },
}
