//! Evaluation of the factored joint distribution.

use super::assignment::Assignment;
use super::network::BayesNetwork;
use super::table::TableStore;
use super::variable::{DomainRegistry, VariableId};
use crate::error::InferenceError;

/// Computes `P(x_1, ..., x_n) = Π P(x_i | parents(x_i))` for complete assignments.
#[derive(Debug, Clone, Copy)]
pub struct JointFactorizer<'a> {
    domains: &'a DomainRegistry,
    tables: &'a TableStore,
}

impl<'a> JointFactorizer<'a> {
    pub fn new(network: &'a BayesNetwork) -> Self {
        Self {
            domains: network.domains(),
            tables: network.tables(),
        }
    }

    /// Raw joint probability of a complete assignment. No normalization is applied.
    pub fn joint_probability(&self, assignment: &Assignment) -> Result<f64, InferenceError> {
        let mut product = 1.0;
        for id in self.domains.ids() {
            product *= self.conditional(id, assignment)?;
        }
        Ok(product)
    }

    /// `P(id = assignment[id] | parents = assignment[parents])`.
    pub fn conditional(
        &self,
        id: VariableId,
        assignment: &Assignment,
    ) -> Result<f64, InferenceError> {
        let state = assignment.get(id).ok_or_else(|| self.incomplete(id))?;
        let table = self.tables.table(id);
        let row = table
            .row_for(assignment)
            .map_err(|parent| self.incomplete(parent))?;
        let probabilities =
            table
                .row(row)
                .ok_or_else(|| InferenceError::UndefinedCombination {
                    variable: self.domains.name(id).to_string(),
                    combination: table.describe_row(self.domains, row),
                })?;
        probabilities
            .get(state)
            .copied()
            .ok_or_else(|| InferenceError::InvalidStateValue {
                variable: self.domains.name(id).to_string(),
                value: state.to_string(),
            })
    }

    fn incomplete(&self, id: VariableId) -> InferenceError {
        InferenceError::IncompleteAssignment {
            variable: self.domains.name(id).to_string(),
        }
    }
}
