use super::factor::advance;
use super::{Backend, CancelToken, InferenceEngine, PreparedQuery};
use crate::error::InferenceError;
use crate::model::{BayesNetwork, JointFactorizer};
use tracing::{Level, event};

/// Assignments visited between cancellation checks.
const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Inference by enumeration: sums the full joint over every completion of the hidden variables.
///
/// Hidden variables are walked in registry order with the last one varying fastest, each domain
/// in declared state order. Accumulation order is therefore fixed, and repeated queries return
/// bit-identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerationEngine;

impl EnumerationEngine {
    pub fn new() -> Self {
        Self
    }
}

impl InferenceEngine for EnumerationEngine {
    fn backend(&self) -> Backend {
        Backend::Enumeration
    }

    fn weighted_totals(
        &self,
        network: &BayesNetwork,
        query: &PreparedQuery,
        cancel: &CancelToken,
    ) -> Result<Vec<f64>, InferenceError> {
        let domains = network.domains();
        let factorizer = JointFactorizer::new(network);
        let target = query.target();
        let hidden = query.hidden(domains);
        let cards: Vec<usize> = hidden.iter().map(|id| domains.cardinality(*id)).collect();

        if tracing::enabled!(Level::DEBUG) {
            let space = cards
                .iter()
                .fold(1u128, |acc, card| acc.saturating_mul(*card as u128));
            event!(
                target: "bayes_core::enumeration",
                Level::DEBUG,
                network = network.name(),
                variable = domains.name(target),
                hidden = hidden.len(),
                assignments_per_state = %space,
            );
        }

        let mut totals = Vec::with_capacity(domains.cardinality(target));
        let mut scratch = query.evidence().clone();
        let mut visited: u64 = 0;

        for state in 0..domains.cardinality(target) {
            scratch.set(target, state);
            let mut counters = vec![0usize; hidden.len()];
            let mut total = 0.0;
            loop {
                if visited % CANCEL_POLL_INTERVAL == 0 {
                    cancel.check()?;
                }
                visited += 1;
                for (id, counter) in hidden.iter().zip(&counters) {
                    scratch.set(*id, *counter);
                }
                total += factorizer.joint_probability(&scratch)?;
                if !advance(&mut counters, &cards) {
                    break;
                }
            }
            event!(
                target: "bayes_core::enumeration",
                Level::TRACE,
                state = domains.label(target, state),
                total,
            );
            totals.push(total);
        }

        Ok(totals)
    }
}
