//! Error types for network construction and inference.

use std::fmt;
use thiserror::Error;

/// Failures surfaced by a query. None of them is transient, so callers should not retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },
    #[error("'{value}' is not a state of query variable '{variable}'")]
    InvalidQueryValue { variable: String, value: String },
    #[error("invalid evidence {variable}={value}: {issue}")]
    InvalidEvidenceValue {
        variable: String,
        value: String,
        issue: EvidenceIssue,
    },
    #[error("'{value}' is not a state of '{variable}'")]
    InvalidStateValue { variable: String, value: String },
    #[error("table for '{variable}' needs a value for parent '{parent}'")]
    MissingParentValue { variable: String, parent: String },
    #[error("table for '{variable}' expects {expected} parent values but {found} were supplied")]
    ParentArity {
        variable: String,
        expected: usize,
        found: usize,
    },
    #[error("table for '{variable}' has no entry for parent states ({combination})")]
    UndefinedCombination {
        variable: String,
        combination: String,
    },
    #[error("assignment has no value for '{variable}'")]
    IncompleteAssignment { variable: String },
    #[error("evidence has zero probability under the network")]
    ZeroEvidenceProbability,
    #[error("evidence probability is negative or not finite; the network tables are malformed")]
    InvalidProbabilityMass,
    #[error("query cancelled")]
    Cancelled,
}

impl InferenceError {
    /// Stable identifier for the failure kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::UnknownVariable { .. } => "UnknownVariable",
            InferenceError::InvalidQueryValue { .. } => "InvalidQueryValue",
            InferenceError::InvalidEvidenceValue { .. } => "InvalidEvidenceValue",
            InferenceError::InvalidStateValue { .. } => "InvalidStateValue",
            InferenceError::MissingParentValue { .. } => "MissingParentValue",
            InferenceError::ParentArity { .. } => "ParentArity",
            InferenceError::UndefinedCombination { .. } => "UndefinedCombination",
            InferenceError::IncompleteAssignment { .. } => "IncompleteAssignment",
            InferenceError::ZeroEvidenceProbability => "ZeroEvidenceProbability",
            InferenceError::InvalidProbabilityMass => "InvalidProbabilityMass",
            InferenceError::Cancelled => "Cancelled",
        }
    }
}

/// Why an observation was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceIssue {
    NotInDomain,
    Conflicting { observed: String },
}

impl fmt::Display for EvidenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceIssue::NotInDomain => f.write_str("value is not a state of the variable"),
            EvidenceIssue::Conflicting { observed } => {
                write!(f, "variable was already observed as '{observed}'")
            }
        }
    }
}

/// Structural problems found while building or checking a network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("variable '{name}' declared more than once")]
    DuplicateVariable { name: String },
    #[error("variable '{name}' needs at least 2 states, found {found}")]
    TooFewStates { name: String, found: usize },
    #[error("variable '{name}' lists state '{state}' more than once")]
    DuplicateState { name: String, state: String },
    #[error("table refers to unknown variable '{name}'")]
    UnknownVariable { name: String },
    #[error("table for '{variable}' refers to unknown parent '{parent}'")]
    UnknownParent { variable: String, parent: String },
    #[error("variable '{variable}' lists itself as a parent")]
    SelfParent { variable: String },
    #[error("table for '{variable}' lists parent '{parent}' more than once")]
    DuplicateParent { variable: String, parent: String },
    #[error("rows for '{variable}' disagree on the parent list")]
    ConflictingParents { variable: String },
    #[error("variable '{variable}' has more than one table")]
    DuplicateTable { variable: String },
    #[error("table for '{variable}' defines parent states ({combination}) twice")]
    DuplicateRow {
        variable: String,
        combination: String,
    },
    #[error("'{state}' is not a state of '{variable}'")]
    UnknownState { variable: String, state: String },
    #[error("table for '{variable}': expected {expected} {what}, found {found}")]
    ShapeMismatch {
        variable: String,
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("table for '{variable}' must use either column values or rows")]
    TableLayout { variable: String },
    #[error("variable '{variable}' has no conditional table")]
    MissingTable { variable: String },
    #[error("'{variable}' given ({combination}) holds {value}, outside [0, 1]")]
    ProbabilityOutOfRange {
        variable: String,
        combination: String,
        value: f64,
    },
    #[error("distribution of '{variable}' given ({combination}) sums to {sum}")]
    RowSum {
        variable: String,
        combination: String,
        sum: f64,
    },
    #[error("table for '{variable}' has no entry for parent states ({combination})")]
    MissingCombination {
        variable: String,
        combination: String,
    },
    #[error("network contains a cycle through {}", variables.join(", "))]
    Cycle { variables: Vec<String> },
}
