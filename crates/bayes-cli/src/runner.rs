use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use bayes_core::inference::{InferenceEngine, PreparedQuery};
use bayes_core::{BayesNetwork, InferenceError, Posterior};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{QueryConfig, ResolvedOutputs, RunConfig};
use crate::source::SourceError;

/// Executes the queries of a [`RunConfig`] in order against one network.
pub struct QueryRunner {
    config: RunConfig,
    outputs: ResolvedOutputs,
    network: BayesNetwork,
    engine: Box<dyn InferenceEngine>,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub queries_run: usize,
    pub rows_written: usize,
    pub results_path: Option<PathBuf>,
}

/// Answer to one configured query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Probability { value: String, probability: f64 },
    Distribution(Posterior),
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    run_id: &'a str,
    query: &'a str,
    network: &'a str,
    backend: &'static str,
    variable: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    evidence: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distribution: Option<BTreeMap<&'a str, f64>>,
    elapsed_us: u128,
}

impl QueryRunner {
    /// Loads the network and resolves every query against it, so naming mistakes surface before
    /// any inference runs.
    pub fn new(config: RunConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let network = config.network.load()?;
        for query in &config.queries {
            precheck(&network, query).map_err(|source| RunnerError::Query {
                name: query.name.clone(),
                source,
            })?;
        }
        let engine = config.backend.engine();
        Ok(Self {
            config,
            outputs,
            network,
            engine,
        })
    }

    pub fn network(&self) -> &BayesNetwork {
        &self.network
    }

    /// Runs every query, printing results to `out` and streaming JSONL rows when configured.
    /// The first failing query halts the run.
    pub fn run(&self, out: &mut impl Write) -> Result<RunSummary, RunnerError> {
        let mut writer = match &self.outputs.results {
            Some(path) => {
                ensure_parent(path.parent())?;
                Some(BufWriter::new(File::create(path)?))
            }
            None => None,
        };

        let mut rows_written = 0usize;
        for query in &self.config.queries {
            let started = Instant::now();
            let outcome = self.run_query(query).map_err(|source| {
                event!(
                    target: "bayes_cli::runner",
                    Level::ERROR,
                    run_id = %self.config.run_id,
                    query = %query.name,
                    kind = source.kind(),
                    error = %source,
                );
                RunnerError::Query {
                    name: query.name.clone(),
                    source,
                }
            })?;
            let elapsed_us = started.elapsed().as_micros();

            event!(
                target: "bayes_cli::runner",
                Level::INFO,
                run_id = %self.config.run_id,
                query = %query.name,
                backend = self.engine.backend().as_str(),
                elapsed_us = elapsed_us as u64,
            );

            print_outcome(out, query, &outcome)?;
            if let Some(writer) = writer.as_mut() {
                write_row(writer, &self.config, query, &outcome, elapsed_us)?;
                rows_written += 1;
            }
        }

        if let Some(writer) = writer.as_mut() {
            writer.flush()?;
        }

        event!(
            target: "bayes_cli::runner",
            Level::INFO,
            run_id = %self.config.run_id,
            network = self.network.name(),
            queries = self.config.queries.len(),
            rows_written,
        );

        Ok(RunSummary {
            queries_run: self.config.queries.len(),
            rows_written,
            results_path: self.outputs.results.clone(),
        })
    }

    pub fn run_query(&self, query: &QueryConfig) -> Result<QueryOutcome, InferenceError> {
        let evidence = query.evidence();
        match &query.value {
            Some(value) => {
                let probability = self.engine.query_probability(
                    &self.network,
                    &query.variable,
                    value,
                    &evidence,
                )?;
                Ok(QueryOutcome::Probability {
                    value: value.clone(),
                    probability,
                })
            }
            None => self
                .engine
                .query_distribution(&self.network, &query.variable, &evidence)
                .map(QueryOutcome::Distribution),
        }
    }
}

fn precheck(network: &BayesNetwork, query: &QueryConfig) -> Result<(), InferenceError> {
    let prepared = PreparedQuery::new(network, &query.variable, &query.evidence())?;
    if let Some(value) = &query.value {
        if network.domains().state_index(prepared.target(), value).is_none() {
            return Err(InferenceError::InvalidQueryValue {
                variable: query.variable.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

/// `P(variable=value | evidence)` with the evidence omitted when empty.
pub fn describe(
    variable: &str,
    value: Option<&str>,
    evidence: &BTreeMap<String, String>,
) -> String {
    let head = match value {
        Some(value) => format!("{variable}={value}"),
        None => variable.to_string(),
    };
    if evidence.is_empty() {
        return format!("P({head})");
    }
    let given: Vec<String> = evidence
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!("P({head} | {})", given.join(", "))
}

fn print_outcome(
    out: &mut impl Write,
    query: &QueryConfig,
    outcome: &QueryOutcome,
) -> std::io::Result<()> {
    match outcome {
        QueryOutcome::Probability { value, probability } => writeln!(
            out,
            "{}: {} = {probability:.6}",
            query.name,
            describe(&query.variable, Some(value), &query.evidence)
        ),
        QueryOutcome::Distribution(posterior) => {
            writeln!(
                out,
                "{}: {}",
                query.name,
                describe(&query.variable, None, &query.evidence)
            )?;
            write!(out, "{posterior}")
        }
    }
}

fn write_row(
    writer: &mut BufWriter<File>,
    config: &RunConfig,
    query: &QueryConfig,
    outcome: &QueryOutcome,
    elapsed_us: u128,
) -> Result<(), RunnerError> {
    let (probability, distribution) = match outcome {
        QueryOutcome::Probability { probability, .. } => (Some(*probability), None),
        QueryOutcome::Distribution(posterior) => (None, Some(posterior.iter().collect())),
    };
    let network = config.network.to_string();
    let row = ResultRow {
        run_id: &config.run_id,
        query: &query.name,
        network: &network,
        backend: config.backend.as_str(),
        variable: &query.variable,
        value: query.value.as_deref(),
        evidence: &query.evidence,
        probability,
        distribution,
        elapsed_us,
    };
    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Source(#[from] SourceError),
    #[error("query '{name}' failed ({}): {source}", .source.kind())]
    Query {
        name: String,
        #[source]
        source: InferenceError,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize result row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
