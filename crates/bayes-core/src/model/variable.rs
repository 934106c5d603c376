use crate::error::{BuildError, InferenceError};
use core::fmt;
use std::collections::{HashMap, HashSet};

/// Dense index of a variable inside the registry that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(usize);

impl VariableId {
    pub(crate) const fn new(index: usize) -> Self {
        VariableId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A discrete random variable and its ordered state labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    states: Vec<String>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn cardinality(&self) -> usize {
        self.states.len()
    }

    pub fn state_index(&self, label: &str) -> Option<usize> {
        self.states.iter().position(|state| state == label)
    }

    pub fn state(&self, index: usize) -> Option<&str> {
        self.states.get(index).map(String::as_str)
    }
}

/// Ordered state labels per variable. Read-only once the network is built.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    variables: Vec<Variable>,
    by_name: HashMap<String, VariableId>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable; ids are handed out in declaration order.
    pub fn register<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        states: impl IntoIterator<Item = S>,
    ) -> Result<VariableId, BuildError> {
        let name = name.into();
        let states: Vec<String> = states.into_iter().map(Into::into).collect();

        if self.by_name.contains_key(&name) {
            return Err(BuildError::DuplicateVariable { name });
        }
        if states.len() < 2 {
            return Err(BuildError::TooFewStates {
                name,
                found: states.len(),
            });
        }
        let mut seen = HashSet::new();
        for state in &states {
            if !seen.insert(state.as_str()) {
                return Err(BuildError::DuplicateState {
                    name,
                    state: state.clone(),
                });
            }
        }

        let id = VariableId::new(self.variables.len());
        self.by_name.insert(name.clone(), id);
        self.variables.push(Variable { name, states });
        Ok(id)
    }

    /// Ordered state labels of `name`.
    pub fn states_of(&self, name: &str) -> Result<&[String], InferenceError> {
        self.id_of(name).map(|id| self.variables[id.index()].states())
    }

    pub fn id_of(&self, name: &str) -> Result<VariableId, InferenceError> {
        self.lookup(name)
            .ok_or_else(|| InferenceError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn lookup(&self, name: &str) -> Option<VariableId> {
        self.by_name.get(name).copied()
    }

    /// Panics if `id` was minted by a different registry.
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn name(&self, id: VariableId) -> &str {
        self.variable(id).name()
    }

    pub fn cardinality(&self, id: VariableId) -> usize {
        self.variable(id).cardinality()
    }

    pub fn state_index(&self, id: VariableId, label: &str) -> Option<usize> {
        self.variable(id).state_index(label)
    }

    /// Label of `state`, or `"?"` when out of range.
    pub fn label(&self, id: VariableId, state: usize) -> &str {
        self.variable(id).state(state).unwrap_or("?")
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = VariableId> + '_ {
        (0..self.variables.len()).map(VariableId::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, variable)| (VariableId::new(index), variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DomainRegistry {
        let mut registry = DomainRegistry::new();
        registry.register("Rain", ["No", "Yes"]).unwrap();
        registry
            .register("Train", ["OnTime", "Delayed", "Cancelled"])
            .unwrap();
        registry
    }

    #[test]
    fn ids_follow_declaration_order() {
        let registry = registry();
        assert_eq!(registry.id_of("Rain").unwrap().index(), 0);
        assert_eq!(registry.id_of("Train").unwrap().index(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn states_keep_declared_order() {
        let registry = registry();
        assert_eq!(
            registry.states_of("Train").unwrap(),
            ["OnTime", "Delayed", "Cancelled"]
        );
        let train = registry.id_of("Train").unwrap();
        assert_eq!(registry.state_index(train, "Delayed"), Some(1));
        assert_eq!(registry.label(train, 2), "Cancelled");
        assert_eq!(registry.label(train, 9), "?");
    }

    #[test]
    fn unknown_variable_is_reported() {
        let registry = registry();
        assert_eq!(
            registry.states_of("Snow"),
            Err(InferenceError::UnknownVariable {
                name: "Snow".to_string()
            })
        );
    }

    #[test]
    fn rejects_malformed_domains() {
        let mut registry = registry();
        assert!(matches!(
            registry.register("Rain", ["a", "b"]),
            Err(BuildError::DuplicateVariable { .. })
        ));
        assert!(matches!(
            registry.register("Coin", ["Heads"]),
            Err(BuildError::TooFewStates { found: 1, .. })
        ));
        assert!(matches!(
            registry.register("Die", ["1", "2", "1"]),
            Err(BuildError::DuplicateState { state, .. }) if state == "1"
        ));
        assert_eq!(registry.len(), 2);
    }
}
