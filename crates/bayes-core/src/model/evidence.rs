use super::assignment::Assignment;
use super::variable::DomainRegistry;
use crate::error::{EvidenceIssue, InferenceError};
use core::fmt;
use std::collections::BTreeMap;

/// Observed `variable = value` pairs, kept in the order they were supplied.
///
/// Repeating an observation with the same value is harmless; repeating it with a different value
/// is rejected when the evidence is resolved against a network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    observations: Vec<(String, String)>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.observe(variable, value);
        self
    }

    pub fn observe(&mut self, variable: impl Into<String>, value: impl Into<String>) {
        self.observations.push((variable.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.observations
            .iter()
            .map(|(variable, value)| (variable.as_str(), value.as_str()))
    }

    /// Value observed for `variable`, if any (first observation wins).
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.iter()
            .find(|(name, _)| *name == variable)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Maps every observation onto state indices of `registry`.
    pub fn resolve(&self, registry: &DomainRegistry) -> Result<Assignment, InferenceError> {
        let mut assignment = Assignment::new(registry.len());
        for (variable, value) in self.iter() {
            let id = registry.id_of(variable)?;
            let state = registry.state_index(id, value).ok_or_else(|| {
                InferenceError::InvalidEvidenceValue {
                    variable: variable.to_string(),
                    value: value.to_string(),
                    issue: EvidenceIssue::NotInDomain,
                }
            })?;
            match assignment.get(id) {
                Some(previous) if previous != state => {
                    return Err(InferenceError::InvalidEvidenceValue {
                        variable: variable.to_string(),
                        value: value.to_string(),
                        issue: EvidenceIssue::Conflicting {
                            observed: registry.label(id, previous).to_string(),
                        },
                    });
                }
                _ => assignment.set(id, state),
            }
        }
        Ok(assignment)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Evidence {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut evidence = Evidence::new();
        for (variable, value) in iter {
            evidence.observe(variable, value);
        }
        evidence
    }
}

impl From<BTreeMap<String, String>> for Evidence {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (variable, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable}={value}")?;
        }
        Ok(())
    }
}
