//! Serializable network definitions.
//!
//! A definition mirrors [`NetworkBuilder`] input: an ordered variable list and one table per
//! variable, in either column layout (`values`) or row layout (`rows`). It is the on-disk format
//! read by the command-line tools (YAML or JSON).

use crate::error::BuildError;
use crate::model::{BayesNetwork, NetworkBuilder, TabularCpd};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub name: String,
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub states: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub variable: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    /// Column layout: `values[state][parent combination]`, last parent fastest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<RowDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDefinition {
    #[serde(default)]
    pub given: Vec<String>,
    pub probabilities: Vec<f64>,
}

impl NetworkDefinition {
    /// Translates the definition into builder calls. Each table must use exactly one layout.
    pub fn builder(&self) -> Result<NetworkBuilder, BuildError> {
        let mut builder = NetworkBuilder::new(self.name.clone());
        for variable in &self.variables {
            builder = builder.variable(variable.name.clone(), variable.states.iter().cloned());
        }
        for table in &self.tables {
            builder = match (&table.values, table.rows.is_empty()) {
                (Some(values), true) => builder.cpd(
                    TabularCpd::new(table.variable.clone(), values.clone())
                        .with_parents(table.parents.iter().cloned()),
                ),
                (None, false) => table.rows.iter().fold(builder, |builder, row| {
                    builder.row(
                        table.variable.clone(),
                        table.parents.iter().cloned(),
                        row.given.iter().cloned(),
                        row.probabilities.iter().copied(),
                    )
                }),
                _ => {
                    return Err(BuildError::TableLayout {
                        variable: table.variable.clone(),
                    });
                }
            };
        }
        Ok(builder)
    }

    pub fn build(&self) -> Result<BayesNetwork, BuildError> {
        self.builder()?.build()
    }

    pub fn build_unchecked(&self) -> Result<BayesNetwork, BuildError> {
        self.builder()?.build_unchecked()
    }

    /// Exports a network. Complete tables use column layout; tables with gaps list only the rows
    /// they define.
    pub fn from_network(network: &BayesNetwork) -> Self {
        let domains = network.domains();
        let variables = domains
            .iter()
            .map(|(_, variable)| VariableDefinition {
                name: variable.name().to_string(),
                states: variable.states().to_vec(),
            })
            .collect();

        let tables = network
            .tables()
            .iter()
            .map(|table| {
                let parents: Vec<String> = table
                    .parents()
                    .iter()
                    .map(|parent| domains.name(*parent).to_string())
                    .collect();
                let complete = table.rows().all(|(_, row)| row.is_some());
                let mut definition = TableDefinition {
                    variable: domains.name(table.variable()).to_string(),
                    parents,
                    values: None,
                    rows: Vec::new(),
                };
                if complete {
                    let mut values =
                        vec![Vec::with_capacity(table.combinations()); table.cardinality()];
                    for (_, row) in table.rows() {
                        for (state, p) in row.unwrap_or_default().iter().enumerate() {
                            values[state].push(*p);
                        }
                    }
                    definition.values = Some(values);
                } else {
                    definition.rows = table
                        .rows()
                        .filter_map(|(index, row)| {
                            let probabilities = row?.to_vec();
                            let given = table
                                .parents()
                                .iter()
                                .zip(table.parent_states(index))
                                .map(|(parent, state)| domains.label(*parent, state).to_string())
                                .collect();
                            Some(RowDefinition {
                                given,
                                probabilities,
                            })
                        })
                        .collect();
                }
                definition
            })
            .collect();

        Self {
            name: network.name().to_string(),
            variables,
            tables,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
