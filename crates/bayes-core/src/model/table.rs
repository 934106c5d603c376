//! Conditional probability tables keyed by a flattened parent-state index.

use super::assignment::Assignment;
use super::variable::{DomainRegistry, VariableId};
use crate::error::InferenceError;

/// `P(variable | parents)` with one optional row per parent-state combination.
///
/// Rows are addressed by `Σ state(parent_i) · stride_i`, where the last parent varies fastest.
/// A missing row means the table was built without that combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalTable {
    variable: VariableId,
    cardinality: usize,
    parents: Vec<VariableId>,
    parent_cards: Vec<usize>,
    strides: Vec<usize>,
    rows: Vec<Option<Vec<f64>>>,
}

impl ConditionalTable {
    /// Creates a table with every row undefined.
    pub(crate) fn new(
        variable: VariableId,
        cardinality: usize,
        parents: Vec<(VariableId, usize)>,
    ) -> Self {
        let parent_cards: Vec<usize> = parents.iter().map(|(_, card)| *card).collect();
        let mut strides = vec![1; parent_cards.len()];
        for idx in (0..parent_cards.len().saturating_sub(1)).rev() {
            strides[idx] = strides[idx + 1] * parent_cards[idx + 1];
        }
        let combinations = parent_cards.iter().product::<usize>();
        Self {
            variable,
            cardinality,
            parents: parents.into_iter().map(|(id, _)| id).collect(),
            parent_cards,
            strides,
            rows: vec![None; combinations],
        }
    }

    /// Stores a row, returning the one it replaced.
    pub(crate) fn set_row(&mut self, row: usize, probabilities: Vec<f64>) -> Option<Vec<f64>> {
        self.rows.get_mut(row).and_then(|slot| slot.replace(probabilities))
    }

    pub fn variable(&self) -> VariableId {
        self.variable
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn parents(&self) -> &[VariableId] {
        &self.parents
    }

    pub fn parent_cardinalities(&self) -> &[usize] {
        &self.parent_cards
    }

    /// Number of parent-state combinations (1 for a root).
    pub fn combinations(&self) -> usize {
        self.rows.len()
    }

    /// Flattened index of a parent-state tuple given in parent order.
    pub fn row_index(&self, parent_states: &[usize]) -> Option<usize> {
        if parent_states.len() != self.parents.len() {
            return None;
        }
        let mut index = 0;
        for ((state, card), stride) in parent_states
            .iter()
            .zip(&self.parent_cards)
            .zip(&self.strides)
        {
            if state >= card {
                return None;
            }
            index += state * stride;
        }
        Some(index)
    }

    /// Row index for the parent states held in `assignment`; `Err` names the first unassigned
    /// parent.
    pub fn row_for(&self, assignment: &Assignment) -> Result<usize, VariableId> {
        let mut index = 0;
        for (parent, stride) in self.parents.iter().zip(&self.strides) {
            let state = assignment.get(*parent).ok_or(*parent)?;
            index += state * stride;
        }
        Ok(index)
    }

    /// Inverse of [`row_index`](Self::row_index).
    pub fn parent_states(&self, row: usize) -> Vec<usize> {
        self.parent_cards
            .iter()
            .zip(&self.strides)
            .map(|(card, stride)| (row / stride) % card)
            .collect()
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.rows.get(row).and_then(|slot| slot.as_deref())
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, Option<&[f64]>)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx, row.as_deref()))
    }

    /// Renders a row's parent states as `Parent=label, ...` for diagnostics.
    pub fn describe_row(&self, registry: &DomainRegistry, row: usize) -> String {
        self.parents
            .iter()
            .zip(self.parent_states(row))
            .map(|(parent, state)| {
                format!("{}={}", registry.name(*parent), registry.label(*parent, state))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One table per registered variable, indexed by [`VariableId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStore {
    tables: Vec<ConditionalTable>,
}

impl TableStore {
    /// Tables must be ordered by the id of the variable they describe.
    pub(crate) fn from_tables(tables: Vec<ConditionalTable>) -> Self {
        debug_assert!(
            tables
                .iter()
                .enumerate()
                .all(|(idx, table)| table.variable().index() == idx)
        );
        Self { tables }
    }

    pub fn table(&self, id: VariableId) -> &ConditionalTable {
        &self.tables[id.index()]
    }

    pub fn parents_of(&self, id: VariableId) -> &[VariableId] {
        self.table(id).parents()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionalTable> {
        self.tables.iter()
    }

    /// Looks up the distribution of `variable` given parent labels in parent order.
    pub fn distribution_of<'a>(
        &'a self,
        registry: &'a DomainRegistry,
        variable: &str,
        parent_values: &[&str],
    ) -> Result<Distribution<'a>, InferenceError> {
        let id = registry.id_of(variable)?;
        let table = self.table(id);
        let parents = table.parents();

        if parent_values.len() < parents.len() {
            return Err(InferenceError::MissingParentValue {
                variable: variable.to_string(),
                parent: registry.name(parents[parent_values.len()]).to_string(),
            });
        }
        if parent_values.len() > parents.len() {
            return Err(InferenceError::ParentArity {
                variable: variable.to_string(),
                expected: parents.len(),
                found: parent_values.len(),
            });
        }

        let mut states = Vec::with_capacity(parents.len());
        for (parent, value) in parents.iter().zip(parent_values) {
            let state = registry.state_index(*parent, value).ok_or_else(|| {
                InferenceError::InvalidStateValue {
                    variable: registry.name(*parent).to_string(),
                    value: value.to_string(),
                }
            })?;
            states.push(state);
        }

        let undefined = || InferenceError::UndefinedCombination {
            variable: variable.to_string(),
            combination: parent_values.join(", "),
        };
        let row = table.row_index(&states).ok_or_else(undefined)?;
        let probabilities = table.row(row).ok_or_else(undefined)?;
        Ok(Distribution {
            labels: registry.variable(id).states(),
            probabilities,
        })
    }
}

/// Borrowed view of one table row: state label to probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution<'a> {
    labels: &'a [String],
    probabilities: &'a [f64],
}

impl<'a> Distribution<'a> {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|state| state == label)
            .and_then(|idx| self.probabilities.get(idx).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        let labels = self.labels;
        let probabilities = self.probabilities;
        labels
            .iter()
            .map(String::as_str)
            .zip(probabilities.iter().copied())
    }

    pub fn probabilities(&self) -> &'a [f64] {
        self.probabilities
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}
