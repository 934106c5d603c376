//! Dense factors over discrete variables, laid out with the last scope variable varying fastest.

use crate::error::InferenceError;
use crate::model::{Assignment, BayesNetwork, JointFactorizer, VariableId};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Factor {
    scope: Vec<VariableId>,
    cards: Vec<usize>,
    values: Vec<f64>,
}

impl Factor {
    pub(crate) fn scalar(value: f64) -> Self {
        Self {
            scope: Vec::new(),
            cards: Vec::new(),
            values: vec![value],
        }
    }

    /// Conditional table of `id` with every observed variable fixed to its evidence state.
    pub(crate) fn from_table(
        network: &BayesNetwork,
        id: VariableId,
        evidence: &Assignment,
    ) -> Result<Self, InferenceError> {
        let domains = network.domains();
        let factorizer = JointFactorizer::new(network);
        let table = network.tables().table(id);

        let scope: Vec<VariableId> = table
            .parents()
            .iter()
            .copied()
            .chain(std::iter::once(id))
            .filter(|var| !evidence.contains(*var))
            .collect();
        let cards: Vec<usize> = scope.iter().map(|var| domains.cardinality(*var)).collect();

        let mut values = Vec::with_capacity(cards.iter().product());
        let mut states = vec![0usize; scope.len()];
        let mut scratch = evidence.clone();
        loop {
            for (var, state) in scope.iter().zip(&states) {
                scratch.set(*var, *state);
            }
            values.push(factorizer.conditional(id, &scratch)?);
            if !advance(&mut states, &cards) {
                break;
            }
        }

        Ok(Self {
            scope,
            cards,
            values,
        })
    }

    pub(crate) fn scope(&self) -> &[VariableId] {
        &self.scope
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn contains(&self, var: VariableId) -> bool {
        self.scope.contains(&var)
    }

    /// Pointwise product over the union of both scopes. `self`'s variables keep their positions.
    pub(crate) fn product(&self, other: &Factor) -> Factor {
        let mut scope = self.scope.clone();
        let mut cards = self.cards.clone();
        let left_axes: Vec<usize> = (0..self.scope.len()).collect();
        let mut right_axes = Vec::with_capacity(other.scope.len());
        for (var, card) in other.scope.iter().zip(&other.cards) {
            match scope.iter().position(|existing| existing == var) {
                Some(axis) => right_axes.push(axis),
                None => {
                    right_axes.push(scope.len());
                    scope.push(*var);
                    cards.push(*card);
                }
            }
        }

        let left_strides = strides(&self.cards);
        let right_strides = strides(&other.cards);
        let mut values = Vec::with_capacity(cards.iter().product());
        let mut states = vec![0usize; scope.len()];
        loop {
            let left = offset(&states, &left_axes, &left_strides);
            let right = offset(&states, &right_axes, &right_strides);
            values.push(self.values[left] * other.values[right]);
            if !advance(&mut states, &cards) {
                break;
            }
        }

        Factor {
            scope,
            cards,
            values,
        }
    }

    /// Marginalizes `var` away. Returns a copy when `var` is not in scope.
    pub(crate) fn sum_out(&self, var: VariableId) -> Factor {
        let Some(axis) = self.scope.iter().position(|existing| *existing == var) else {
            return self.clone();
        };
        let mut scope = self.scope.clone();
        let mut cards = self.cards.clone();
        scope.remove(axis);
        cards.remove(axis);

        let kept_axes: Vec<usize> = (0..self.scope.len()).filter(|i| *i != axis).collect();
        let kept_strides = strides(&cards);
        let mut values = vec![0.0; cards.iter().product()];
        let mut states = vec![0usize; self.scope.len()];
        for value in &self.values {
            values[offset(&states, &kept_axes, &kept_strides)] += value;
            advance(&mut states, &self.cards);
        }

        Factor {
            scope,
            cards,
            values,
        }
    }

    /// Value at the states `assignment` gives the scope, or `None` when one is unassigned.
    pub(crate) fn value_at(&self, assignment: &Assignment) -> Option<f64> {
        let strides = strides(&self.cards);
        let mut index = 0;
        for (var, stride) in self.scope.iter().zip(&strides) {
            index += assignment.get(*var)? * stride;
        }
        self.values.get(index).copied()
    }
}

/// Steps `states` like an odometer, last position fastest. Returns `false` after wrapping past
/// the final combination.
pub(crate) fn advance(states: &mut [usize], cards: &[usize]) -> bool {
    for pos in (0..states.len()).rev() {
        states[pos] += 1;
        if states[pos] < cards[pos] {
            return true;
        }
        states[pos] = 0;
    }
    false
}

fn strides(cards: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; cards.len()];
    for pos in (0..cards.len().saturating_sub(1)).rev() {
        strides[pos] = strides[pos + 1] * cards[pos + 1];
    }
    strides
}

fn offset(states: &[usize], axes: &[usize], strides: &[usize]) -> usize {
    axes.iter()
        .zip(strides)
        .map(|(axis, stride)| states[*axis] * stride)
        .sum()
}
