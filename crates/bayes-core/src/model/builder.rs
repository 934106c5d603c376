//! Explicit construction of networks from column- or row-layout tables.

use super::network::BayesNetwork;
use super::table::{ConditionalTable, TableStore};
use super::validate;
use super::variable::{DomainRegistry, VariableId};
use crate::error::BuildError;

/// A conditional table in column layout.
///
/// `values[s][c]` is the probability of the variable's state `s` under parent combination `c`.
/// Columns enumerate the Cartesian product of the parents' states in parent order, with the
/// last parent varying fastest. A root has a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularCpd {
    variable: String,
    parents: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl TabularCpd {
    pub fn new(variable: impl Into<String>, values: Vec<Vec<f64>>) -> Self {
        Self {
            variable: variable.into(),
            parents: Vec::new(),
            values,
        }
    }

    pub fn with_parents<S: Into<String>>(mut self, parents: impl IntoIterator<Item = S>) -> Self {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}

#[derive(Debug, Clone)]
struct RowEntry {
    variable: String,
    parents: Vec<String>,
    given: Vec<String>,
    probabilities: Vec<f64>,
}

enum Source {
    Columns(Vec<Vec<f64>>),
    Rows(Vec<(Vec<String>, Vec<f64>)>),
}

struct Pending {
    parents: Vec<String>,
    source: Source,
}

/// Collects variables and tables, then resolves them into a [`BayesNetwork`].
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    name: String,
    variables: Vec<(String, Vec<String>)>,
    columns: Vec<TabularCpd>,
    rows: Vec<RowEntry>,
}

impl NetworkBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn variable<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        states: impl IntoIterator<Item = S>,
    ) -> Self {
        self.variables
            .push((name.into(), states.into_iter().map(Into::into).collect()));
        self
    }

    /// Unconditional distribution of a root variable.
    pub fn prior(
        self,
        variable: impl Into<String>,
        probabilities: impl IntoIterator<Item = f64>,
    ) -> Self {
        let values = probabilities.into_iter().map(|p| vec![p]).collect();
        self.cpd(TabularCpd::new(variable, values))
    }

    pub fn cpd(mut self, cpd: TabularCpd) -> Self {
        self.columns.push(cpd);
        self
    }

    /// One row of a table in row layout: the distribution of `variable` when its parents take
    /// the `given` labels. All rows of a variable must list the same parents.
    pub fn row<P, G>(
        mut self,
        variable: impl Into<String>,
        parents: impl IntoIterator<Item = P>,
        given: impl IntoIterator<Item = G>,
        probabilities: impl IntoIterator<Item = f64>,
    ) -> Self
    where
        P: Into<String>,
        G: Into<String>,
    {
        self.rows.push(RowEntry {
            variable: variable.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            given: given.into_iter().map(Into::into).collect(),
            probabilities: probabilities.into_iter().collect(),
        });
        self
    }

    /// Resolves every reference and runs the full model check.
    pub fn build(self) -> Result<BayesNetwork, BuildError> {
        let network = self.assemble(true)?;
        validate::check_model(&network)?;
        Ok(network)
    }

    /// Resolves references and checks the values of the rows that are present. Missing tables
    /// and rows are allowed: a variable without a table gets an empty root table, and a query
    /// that reaches a gap fails with `UndefinedCombination`. Cycles are not checked.
    pub fn build_unchecked(self) -> Result<BayesNetwork, BuildError> {
        let network = self.assemble(false)?;
        validate::check_defined_rows(&network)?;
        Ok(network)
    }

    fn assemble(self, require_tables: bool) -> Result<BayesNetwork, BuildError> {
        let mut registry = DomainRegistry::new();
        for (name, states) in self.variables {
            registry.register(name, states)?;
        }

        let mut pending: Vec<Option<Pending>> = (0..registry.len()).map(|_| None).collect();

        for cpd in self.columns {
            let id = lookup(&registry, &cpd.variable)?;
            let slot = &mut pending[id.index()];
            if slot.is_some() {
                return Err(BuildError::DuplicateTable {
                    variable: cpd.variable,
                });
            }
            *slot = Some(Pending {
                parents: cpd.parents,
                source: Source::Columns(cpd.values),
            });
        }

        for entry in self.rows {
            let id = lookup(&registry, &entry.variable)?;
            let slot = &mut pending[id.index()];
            match slot.as_mut() {
                None => {}
                Some(Pending {
                    parents,
                    source: Source::Rows(rows),
                }) => {
                    if *parents != entry.parents {
                        return Err(BuildError::ConflictingParents {
                            variable: entry.variable,
                        });
                    }
                    rows.push((entry.given, entry.probabilities));
                    continue;
                }
                Some(Pending {
                    source: Source::Columns(_),
                    ..
                }) => {
                    return Err(BuildError::DuplicateTable {
                        variable: entry.variable,
                    });
                }
            }
            *slot = Some(Pending {
                parents: entry.parents,
                source: Source::Rows(vec![(entry.given, entry.probabilities)]),
            });
        }

        let mut tables = Vec::with_capacity(registry.len());
        for id in registry.ids() {
            let table = match pending[id.index()].take() {
                Some(entry) => resolve_table(&registry, id, entry)?,
                None if require_tables => {
                    return Err(BuildError::MissingTable {
                        variable: registry.name(id).to_string(),
                    });
                }
                None => ConditionalTable::new(id, registry.cardinality(id), Vec::new()),
            };
            tables.push(table);
        }

        Ok(BayesNetwork::from_parts(
            self.name,
            registry,
            TableStore::from_tables(tables),
        ))
    }
}

fn lookup(registry: &DomainRegistry, name: &str) -> Result<VariableId, BuildError> {
    registry
        .lookup(name)
        .ok_or_else(|| BuildError::UnknownVariable {
            name: name.to_string(),
        })
}

fn resolve_table(
    registry: &DomainRegistry,
    id: VariableId,
    entry: Pending,
) -> Result<ConditionalTable, BuildError> {
    let variable = registry.name(id).to_string();
    let cardinality = registry.cardinality(id);

    let mut parents: Vec<(VariableId, usize)> = Vec::with_capacity(entry.parents.len());
    for parent in &entry.parents {
        let parent_id = registry
            .lookup(parent)
            .ok_or_else(|| BuildError::UnknownParent {
                variable: variable.clone(),
                parent: parent.clone(),
            })?;
        if parent_id == id {
            return Err(BuildError::SelfParent { variable });
        }
        if parents.iter().any(|(existing, _)| *existing == parent_id) {
            return Err(BuildError::DuplicateParent {
                variable,
                parent: parent.clone(),
            });
        }
        parents.push((parent_id, registry.cardinality(parent_id)));
    }

    let mut table = ConditionalTable::new(id, cardinality, parents);

    match entry.source {
        Source::Columns(values) => {
            if values.len() != cardinality {
                return Err(BuildError::ShapeMismatch {
                    variable,
                    what: "state rows",
                    expected: cardinality,
                    found: values.len(),
                });
            }
            let columns = table.combinations();
            if let Some(bad) = values.iter().find(|row| row.len() != columns) {
                return Err(BuildError::ShapeMismatch {
                    variable,
                    what: "parent-state columns",
                    expected: columns,
                    found: bad.len(),
                });
            }
            for column in 0..columns {
                let probabilities = values.iter().map(|row| row[column]).collect();
                table.set_row(column, probabilities);
            }
        }
        Source::Rows(rows) => {
            for (given, probabilities) in rows {
                if given.len() != table.parents().len() {
                    return Err(BuildError::ShapeMismatch {
                        variable,
                        what: "parent values per row",
                        expected: table.parents().len(),
                        found: given.len(),
                    });
                }
                if probabilities.len() != cardinality {
                    return Err(BuildError::ShapeMismatch {
                        variable,
                        what: "probabilities per row",
                        expected: cardinality,
                        found: probabilities.len(),
                    });
                }
                let mut states = Vec::with_capacity(given.len());
                for (label, parent) in given.iter().zip(table.parents()) {
                    let state = registry.state_index(*parent, label).ok_or_else(|| {
                        BuildError::UnknownState {
                            variable: registry.name(*parent).to_string(),
                            state: label.clone(),
                        }
                    })?;
                    states.push(state);
                }
                let row = table.row_index(&states).ok_or_else(|| BuildError::ShapeMismatch {
                    variable: variable.clone(),
                    what: "parent values per row",
                    expected: table.parents().len(),
                    found: states.len(),
                })?;
                if table.set_row(row, probabilities).is_some() {
                    return Err(BuildError::DuplicateRow {
                        variable,
                        combination: given.join(", "),
                    });
                }
            }
        }
    }

    Ok(table)
}
