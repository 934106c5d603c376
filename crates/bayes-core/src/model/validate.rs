//! Structural checks applied to a network before it is handed to an engine.

use super::network::BayesNetwork;
use super::table::TableStore;
use super::variable::{DomainRegistry, VariableId};
use crate::error::BuildError;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Maximum deviation from 1.0 tolerated when summing a conditional distribution.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Verifies every table row exists, holds probabilities in [0, 1] summing to one, and that the
/// parent graph is acyclic.
pub fn check_model(network: &BayesNetwork) -> Result<(), BuildError> {
    check_rows(network, true)?;
    topological_order(network.domains(), network.tables()).map(|_| ())
}

/// Range and sum checks over the rows a table defines. Missing rows are allowed.
pub fn check_defined_rows(network: &BayesNetwork) -> Result<(), BuildError> {
    check_rows(network, false)
}

fn check_rows(network: &BayesNetwork, require_complete: bool) -> Result<(), BuildError> {
    let domains = network.domains();
    for table in network.tables().iter() {
        let variable = domains.name(table.variable());
        for (row, probabilities) in table.rows() {
            let Some(probabilities) = probabilities else {
                if !require_complete {
                    continue;
                }
                return Err(BuildError::MissingCombination {
                    variable: variable.to_string(),
                    combination: table.describe_row(domains, row),
                });
            };
            // NaN fails the range test too.
            if let Some(value) = probabilities
                .iter()
                .copied()
                .find(|value| !(0.0..=1.0).contains(value))
            {
                return Err(BuildError::ProbabilityOutOfRange {
                    variable: variable.to_string(),
                    combination: table.describe_row(domains, row),
                    value,
                });
            }
            let sum: f64 = probabilities.iter().sum();
            if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
                return Err(BuildError::RowSum {
                    variable: variable.to_string(),
                    combination: table.describe_row(domains, row),
                    sum,
                });
            }
        }
    }
    Ok(())
}

/// Kahn's algorithm; among ready variables the lowest id goes first.
pub fn topological_order(
    domains: &DomainRegistry,
    tables: &TableStore,
) -> Result<Vec<VariableId>, BuildError> {
    let mut in_degree = vec![0usize; domains.len()];
    let mut children: Vec<Vec<VariableId>> = vec![Vec::new(); domains.len()];
    for table in tables.iter() {
        for parent in table.parents() {
            in_degree[table.variable().index()] += 1;
            children[parent.index()].push(table.variable());
        }
    }

    let mut ready: BinaryHeap<Reverse<VariableId>> = domains
        .ids()
        .filter(|id| in_degree[id.index()] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(domains.len());

    while let Some(Reverse(id)) = ready.pop() {
        order.push(id);
        for child in &children[id.index()] {
            in_degree[child.index()] -= 1;
            if in_degree[child.index()] == 0 {
                ready.push(Reverse(*child));
            }
        }
    }

    if order.len() != domains.len() {
        let variables = domains
            .ids()
            .filter(|id| in_degree[id.index()] > 0)
            .map(|id| domains.name(id).to_string())
            .collect();
        return Err(BuildError::Cycle { variables });
    }

    Ok(order)
}
