pub mod definition;
pub mod error;
pub mod inference;
pub mod model;
pub mod networks;

pub use definition::NetworkDefinition;
pub use error::{BuildError, EvidenceIssue, InferenceError};
pub use inference::{Backend, CancelToken, InferenceEngine, Posterior};
pub use model::{BayesNetwork, Evidence, NetworkBuilder, TabularCpd};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "bayes-query"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "bayes-query");
        assert!(!AppInfo::version().is_empty());
    }
}
