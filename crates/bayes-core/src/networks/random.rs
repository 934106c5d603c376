//! Seeded random networks for property tests and benchmarks.

use crate::error::BuildError;
use crate::model::{BayesNetwork, NetworkBuilder, TabularCpd};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Size limits for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomShape {
    pub variables: usize,
    pub max_parents: usize,
    /// Upper bound on states per variable; values below 2 are raised to 2.
    pub max_states: usize,
}

impl Default for RandomShape {
    fn default() -> Self {
        Self {
            variables: 8,
            max_parents: 3,
            max_states: 3,
        }
    }
}

/// Builds a valid network `X0..Xn` whose parents are always drawn from earlier variables, so the
/// registry order is already topological. The same seed and shape give the same network.
pub fn generate(seed: u64, shape: RandomShape) -> Result<BayesNetwork, BuildError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let max_states = shape.max_states.max(2);
    let mut builder = NetworkBuilder::new(format!("random_{seed}"));

    let mut cards = Vec::with_capacity(shape.variables);
    for index in 0..shape.variables {
        let card = rng.gen_range(2..=max_states);
        builder = builder.variable(name(index), (0..card).map(|state| format!("s{state}")));
        cards.push(card);
    }

    for (index, card) in cards.iter().copied().enumerate() {
        let count = rng.gen_range(0..=shape.max_parents.min(index));
        let mut parents = rand::seq::index::sample(&mut rng, index, count).into_vec();
        parents.sort_unstable();

        let columns: usize = parents.iter().map(|parent| cards[*parent]).product();
        let mut values = vec![Vec::with_capacity(columns); card];
        for _ in 0..columns {
            let weights: Vec<f64> = (0..card).map(|_| rng.gen_range(0.05..1.0)).collect();
            let total: f64 = weights.iter().sum();
            for (state, weight) in weights.iter().enumerate() {
                values[state].push(weight / total);
            }
        }
        builder = builder.cpd(
            TabularCpd::new(name(index), values)
                .with_parents(parents.iter().map(|parent| name(*parent))),
        );
    }

    builder.build()
}

fn name(index: usize) -> String {
    format!("X{index}")
}
