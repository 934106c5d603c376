use super::assignment::Assignment;
use super::joint::JointFactorizer;
use super::table::{Distribution, TableStore};
use super::validate;
use super::variable::{DomainRegistry, VariableId};
use crate::error::{BuildError, InferenceError};

/// An immutable discrete Bayesian network: domains plus one conditional table per variable.
///
/// Built once through [`NetworkBuilder`](super::NetworkBuilder) or a
/// [`NetworkDefinition`](crate::definition::NetworkDefinition); shared read-only across queries.
#[derive(Debug, Clone)]
pub struct BayesNetwork {
    name: String,
    domains: DomainRegistry,
    tables: TableStore,
    order: Option<Vec<VariableId>>,
}

impl BayesNetwork {
    pub(crate) fn from_parts(name: String, domains: DomainRegistry, tables: TableStore) -> Self {
        let order = validate::topological_order(&domains, &tables).ok();
        Self {
            name,
            domains,
            tables,
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domains(&self) -> &DomainRegistry {
        &self.domains
    }

    pub fn tables(&self) -> &TableStore {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn states_of(&self, variable: &str) -> Result<&[String], InferenceError> {
        self.domains.states_of(variable)
    }

    /// Parent names of `variable`, in table order.
    pub fn parents_of(&self, variable: &str) -> Result<Vec<&str>, InferenceError> {
        let id = self.domains.id_of(variable)?;
        Ok(self
            .tables
            .parents_of(id)
            .iter()
            .map(|parent| self.domains.name(*parent))
            .collect())
    }

    pub fn distribution_of(
        &self,
        variable: &str,
        parent_values: &[&str],
    ) -> Result<Distribution<'_>, InferenceError> {
        self.tables
            .distribution_of(&self.domains, variable, parent_values)
    }

    /// Parents-before-children order, or `None` when the tables form a cycle
    /// (only possible for unchecked builds).
    pub fn topological_order(&self) -> Option<&[VariableId]> {
        self.order.as_deref()
    }

    /// Re-runs the structural checks applied by
    /// [`NetworkBuilder::build`](super::NetworkBuilder::build).
    pub fn check(&self) -> Result<(), BuildError> {
        validate::check_model(self)
    }

    pub fn empty_assignment(&self) -> Assignment {
        Assignment::new(self.domains.len())
    }

    /// Builds an assignment from `(variable, label)` pairs; later pairs overwrite earlier ones.
    pub fn assignment_of(&self, pairs: &[(&str, &str)]) -> Result<Assignment, InferenceError> {
        let mut assignment = self.empty_assignment();
        for (variable, value) in pairs {
            let id = self.domains.id_of(variable)?;
            let state = self.domains.state_index(id, value).ok_or_else(|| {
                InferenceError::InvalidStateValue {
                    variable: variable.to_string(),
                    value: value.to_string(),
                }
            })?;
            assignment.set(id, state);
        }
        Ok(assignment)
    }

    pub fn joint_probability(&self, assignment: &Assignment) -> Result<f64, InferenceError> {
        JointFactorizer::new(self).joint_probability(assignment)
    }

    pub fn joint_probability_of(&self, pairs: &[(&str, &str)]) -> Result<f64, InferenceError> {
        let assignment = self.assignment_of(pairs)?;
        self.joint_probability(&assignment)
    }
}
