use super::factor::Factor;
use super::{Backend, CancelToken, InferenceEngine, PreparedQuery};
use crate::error::InferenceError;
use crate::model::{BayesNetwork, DomainRegistry, VariableId};
use tracing::{Level, event};

/// Variable elimination with a greedy min-size order.
///
/// Each step eliminates the hidden variable whose merged factor would be smallest; ties go to the
/// variable registered first. The result agrees with enumeration up to floating-point
/// reassociation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EliminationEngine;

impl EliminationEngine {
    pub fn new() -> Self {
        Self
    }
}

impl InferenceEngine for EliminationEngine {
    fn backend(&self) -> Backend {
        Backend::VariableElimination
    }

    fn weighted_totals(
        &self,
        network: &BayesNetwork,
        query: &PreparedQuery,
        cancel: &CancelToken,
    ) -> Result<Vec<f64>, InferenceError> {
        let domains = network.domains();
        let mut factors = domains
            .ids()
            .map(|id| Factor::from_table(network, id, query.evidence()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut hidden = query.hidden(domains);
        let mut order = Vec::with_capacity(hidden.len());
        let mut largest = factors.iter().map(Factor::len).max().unwrap_or(1);

        while !hidden.is_empty() {
            cancel.check()?;
            let Some(pos) = hidden
                .iter()
                .enumerate()
                .min_by_key(|(_, var)| merged_size(&factors, **var, domains))
                .map(|(pos, _)| pos)
            else {
                break;
            };
            let var = hidden.remove(pos);

            let (touching, rest): (Vec<Factor>, Vec<Factor>) =
                factors.into_iter().partition(|factor| factor.contains(var));
            factors = rest;
            let merged = touching
                .iter()
                .fold(Factor::scalar(1.0), |acc, factor| acc.product(factor));
            largest = largest.max(merged.len());
            factors.push(merged.sum_out(var));
            order.push(domains.name(var));
        }
        cancel.check()?;

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "bayes_core::elimination",
                Level::DEBUG,
                network = network.name(),
                variable = domains.name(query.target()),
                order = ?order,
                largest_factor = largest,
            );
        }

        let joint = factors
            .iter()
            .fold(Factor::scalar(1.0), |acc, factor| acc.product(factor));
        let target = query.target();
        let mut at = query.evidence().clone();
        let mut totals = Vec::with_capacity(domains.cardinality(target));
        for state in 0..domains.cardinality(target) {
            at.set(target, state);
            let value = joint
                .value_at(&at)
                .ok_or_else(|| InferenceError::IncompleteAssignment {
                    variable: joint
                        .scope()
                        .iter()
                        .find(|var| !at.contains(**var))
                        .map(|var| domains.name(*var).to_string())
                        .unwrap_or_default(),
                })?;
            totals.push(value);
        }
        Ok(totals)
    }
}

/// Entry count of the factor produced by multiplying every factor mentioning `var`.
fn merged_size(factors: &[Factor], var: VariableId, domains: &DomainRegistry) -> u128 {
    let mut scope: Vec<VariableId> = Vec::new();
    for factor in factors.iter().filter(|factor| factor.contains(var)) {
        for member in factor.scope() {
            if !scope.contains(member) {
                scope.push(*member);
            }
        }
    }
    scope.iter().fold(1u128, |acc, member| {
        acc.saturating_mul(domains.cardinality(*member) as u128)
    })
}
