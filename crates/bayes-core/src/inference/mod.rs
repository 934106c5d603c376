//! Exact posterior inference.
//!
//! Every backend implements [`InferenceEngine::weighted_totals`], the unnormalized mass of each
//! query state with the evidence fixed. Validation, the observed-query short circuit and
//! normalization are shared by the provided trait methods so all backends fail identically.

mod cancel;
mod elimination;
mod enumeration;
mod factor;
mod posterior;

pub use cancel::CancelToken;
pub use elimination::EliminationEngine;
pub use enumeration::EnumerationEngine;
pub use posterior::Posterior;

use crate::error::InferenceError;
use crate::model::{Assignment, BayesNetwork, DomainRegistry, Evidence, VariableId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Selects the algorithm answering a query. Both produce the same posteriors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Sums the full joint over every hidden assignment.
    #[default]
    Enumeration,
    /// Multiplies table factors and sums hidden variables out one at a time.
    VariableElimination,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Enumeration, Backend::VariableElimination];

    pub const fn as_str(self) -> &'static str {
        match self {
            Backend::Enumeration => "enumeration",
            Backend::VariableElimination => "variable_elimination",
        }
    }

    pub fn engine(self) -> Box<dyn InferenceEngine> {
        match self {
            Backend::Enumeration => Box::new(EnumerationEngine::new()),
            Backend::VariableElimination => Box::new(EliminationEngine::new()),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend '{0}' (expected enumeration or variable_elimination)")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "enumeration" | "enum" | "exact" => Ok(Backend::Enumeration),
            "variable_elimination" | "elimination" | "ve" => Ok(Backend::VariableElimination),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// A query resolved against a network's registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    target: VariableId,
    evidence: Assignment,
}

impl PreparedQuery {
    /// Resolves the query variable and the evidence; the variable is checked first.
    pub fn new(
        network: &BayesNetwork,
        variable: &str,
        evidence: &Evidence,
    ) -> Result<Self, InferenceError> {
        let target = network.domains().id_of(variable)?;
        let evidence = evidence.resolve(network.domains())?;
        Ok(Self { target, evidence })
    }

    pub fn target(&self) -> VariableId {
        self.target
    }

    pub fn evidence(&self) -> &Assignment {
        &self.evidence
    }

    /// State of the query variable when it is itself observed.
    pub fn observed_target(&self) -> Option<usize> {
        self.evidence.get(self.target)
    }

    /// Variables neither queried nor observed, in registry order.
    pub fn hidden(&self, domains: &DomainRegistry) -> Vec<VariableId> {
        domains
            .ids()
            .filter(|id| *id != self.target && !self.evidence.contains(*id))
            .collect()
    }
}

/// Exact inference over a validated network.
pub trait InferenceEngine: Send + Sync {
    fn backend(&self) -> Backend;

    /// Unnormalized `P(target = s, evidence)` for every state `s` of the query variable, in
    /// declared state order. Only called when the query variable is not observed.
    fn weighted_totals(
        &self,
        network: &BayesNetwork,
        query: &PreparedQuery,
        cancel: &CancelToken,
    ) -> Result<Vec<f64>, InferenceError>;

    /// `P(variable = value | evidence)`.
    fn query_probability(
        &self,
        network: &BayesNetwork,
        variable: &str,
        value: &str,
        evidence: &Evidence,
    ) -> Result<f64, InferenceError> {
        self.query_probability_with(network, variable, value, evidence, &CancelToken::new())
    }

    fn query_probability_with(
        &self,
        network: &BayesNetwork,
        variable: &str,
        value: &str,
        evidence: &Evidence,
        cancel: &CancelToken,
    ) -> Result<f64, InferenceError> {
        let domains = network.domains();
        let target = domains.id_of(variable)?;
        let state =
            domains
                .state_index(target, value)
                .ok_or_else(|| InferenceError::InvalidQueryValue {
                    variable: variable.to_string(),
                    value: value.to_string(),
                })?;
        let query = PreparedQuery::new(network, variable, evidence)?;
        if let Some(observed) = query.observed_target() {
            return Ok(if observed == state { 1.0 } else { 0.0 });
        }

        let totals = self.weighted_totals(network, &query, cancel)?;
        let denominator = evidence_mass(&totals)?;
        Ok(totals[state] / denominator)
    }

    /// Posterior over every state of `variable`.
    fn query_distribution(
        &self,
        network: &BayesNetwork,
        variable: &str,
        evidence: &Evidence,
    ) -> Result<Posterior, InferenceError> {
        self.query_distribution_with(network, variable, evidence, &CancelToken::new())
    }

    fn query_distribution_with(
        &self,
        network: &BayesNetwork,
        variable: &str,
        evidence: &Evidence,
        cancel: &CancelToken,
    ) -> Result<Posterior, InferenceError> {
        let query = PreparedQuery::new(network, variable, evidence)?;
        let states = network.domains().variable(query.target()).states().to_vec();
        let probabilities = match query.observed_target() {
            Some(observed) => (0..states.len())
                .map(|state| if state == observed { 1.0 } else { 0.0 })
                .collect(),
            None => {
                let totals = self.weighted_totals(network, &query, cancel)?;
                let denominator = evidence_mass(&totals)?;
                totals.iter().map(|total| total / denominator).collect()
            }
        };
        Ok(Posterior::new(variable.to_string(), states, probabilities))
    }
}

/// `P(evidence)`, folded in state order so repeated queries are bit-identical. Every total must
/// be finite and non-negative, and their sum positive.
fn evidence_mass(totals: &[f64]) -> Result<f64, InferenceError> {
    if totals.iter().any(|total| !total.is_finite() || *total < 0.0) {
        return Err(InferenceError::InvalidProbabilityMass);
    }
    let denominator = totals.iter().fold(0.0, |acc, total| acc + total);
    if !denominator.is_finite() {
        return Err(InferenceError::InvalidProbabilityMass);
    }
    if denominator == 0.0 {
        return Err(InferenceError::ZeroEvidenceProbability);
    }
    Ok(denominator)
}
