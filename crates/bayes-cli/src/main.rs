use std::io;
use std::path::PathBuf;

use anyhow::{Context, bail};
use bayes_core::inference::Backend;
use bayes_core::{Evidence, NetworkDefinition};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use bayes_cli::config::{ResolvedOutputs, RunConfig};
use bayes_cli::logging::{init_logging, init_stderr};
use bayes_cli::runner::{QueryRunner, describe};
use bayes_cli::source::NetworkSource;

/// Exact inference over discrete Bayesian networks.
#[derive(Debug, Parser)]
#[command(
    name = "bayes-query",
    author,
    version,
    about = "Exact posterior queries over discrete Bayesian networks"
)]
struct Cli {
    /// Log inference events to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a batch of queries from a YAML configuration file.
    Run {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Override the run identifier (substitutes {run_id} templates).
        #[arg(long, value_name = "RUN_ID")]
        run_id: Option<String>,

        /// Override the inference backend.
        #[arg(long, value_name = "BACKEND")]
        backend: Option<Backend>,

        /// Exit after validating the configuration and resolving every query.
        #[arg(long)]
        validate_only: bool,
    },
    /// Answer a single query.
    Query {
        /// `builtin:NAME`, `random:SEED` or a .yaml/.yml/.json definition file.
        #[arg(short, long, value_name = "SRC")]
        network: NetworkSource,

        /// Query variable, optionally with a state (`VAR` or `VAR=VALUE`).
        #[arg(short, long, value_name = "VAR[=VALUE]")]
        target: String,

        /// Observed variable (repeatable).
        #[arg(short, long = "given", value_name = "VAR=VALUE", value_parser = parse_observation)]
        given: Vec<(String, String)>,

        #[arg(long, value_name = "BACKEND", default_value_t = Backend::Enumeration)]
        backend: Backend,

        /// Print the answer as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Build and model-check a network, then print its structure.
    Check {
        #[arg(short, long, value_name = "SRC")]
        network: NetworkSource,
    },
    /// Print a network as a definition document.
    Export {
        #[arg(short, long, value_name = "SRC")]
        network: NetworkSource,

        #[arg(long, value_enum, default_value_t = ExportFormat::Yaml)]
        format: ExportFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Yaml,
    Json,
}

fn parse_observation(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((variable, value)) if !variable.trim().is_empty() && !value.trim().is_empty() => {
            Ok((variable.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected VAR=VALUE, got '{raw}'")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        init_stderr(Level::DEBUG);
    }

    match cli.command {
        Command::Run {
            config,
            run_id,
            backend,
            validate_only,
        } => run(config, run_id, backend, validate_only),
        Command::Query {
            network,
            target,
            given,
            backend,
            json,
        } => query(network, &target, given, backend, json),
        Command::Check { network } => check(network),
        Command::Export { network, format } => export(network, format),
    }
}

fn run(
    path: PathBuf,
    run_id: Option<String>,
    backend: Option<Backend>,
    validate_only: bool,
) -> anyhow::Result<()> {
    let mut config = RunConfig::from_path(&path)?;

    if let Some(run_id) = run_id {
        config.run_id = run_id;
    }

    if let Some(backend) = backend {
        config.backend = backend;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let query_count = config.queries.len();
    let run_id = config.run_id.clone();

    println!(
        "Loaded configuration '{run_id}' with {query_count} quer{} against {} ({})",
        if query_count == 1 { "y" } else { "ies" },
        config.network,
        config.backend
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = QueryRunner::new(config, outputs)?;

    if validate_only {
        println!("Validation-only mode: query execution skipped.");
        return Ok(());
    }

    let stdout = io::stdout();
    let summary = runner.run(&mut stdout.lock())?;
    println!(
        "Run complete for '{run_id}': {} queries answered",
        summary.queries_run
    );
    if let Some(path) = summary.results_path.as_ref() {
        println!("Results: {} rows at {}", summary.rows_written, path.display());
    }

    Ok(())
}

fn query(
    source: NetworkSource,
    target: &str,
    given: Vec<(String, String)>,
    backend: Backend,
    json: bool,
) -> anyhow::Result<()> {
    let network = source.load()?;
    let engine = backend.engine();
    let (variable, value) = match target.split_once('=') {
        Some((variable, value)) => (variable.trim(), Some(value.trim())),
        None => (target.trim(), None),
    };
    if variable.is_empty() {
        bail!("query target must name a variable");
    }
    let evidence: Evidence = given.iter().cloned().collect();
    let shown = given.into_iter().collect();

    match value {
        Some(value) => {
            let probability = engine
                .query_probability(&network, variable, value, &evidence)
                .with_context(|| format!("querying {}", describe(variable, Some(value), &shown)))?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "variable": variable,
                        "value": value,
                        "evidence": shown,
                        "probability": probability,
                    })
                );
            } else {
                println!("{} = {probability:.6}", describe(variable, Some(value), &shown));
            }
        }
        None => {
            let posterior = engine
                .query_distribution(&network, variable, &evidence)
                .with_context(|| format!("querying {}", describe(variable, None, &shown)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posterior)?);
            } else {
                println!("{}", describe(variable, None, &shown));
                print!("{posterior}");
            }
        }
    }
    Ok(())
}

fn check(source: NetworkSource) -> anyhow::Result<()> {
    let network = source.load()?;
    let domains = network.domains();
    println!(
        "Network '{}' is valid: {} variables",
        network.name(),
        network.len()
    );
    for (id, variable) in domains.iter() {
        let parents: Vec<&str> = network
            .tables()
            .parents_of(id)
            .iter()
            .map(|parent| domains.name(*parent))
            .collect();
        if parents.is_empty() {
            println!("  {} [{}]", variable.name(), variable.states().join(", "));
        } else {
            println!(
                "  {} [{}] <- {}",
                variable.name(),
                variable.states().join(", "),
                parents.join(", ")
            );
        }
    }
    if let Some(order) = network.topological_order() {
        let names: Vec<&str> = order.iter().map(|id| domains.name(*id)).collect();
        println!("Topological order: {}", names.join(" -> "));
    }
    Ok(())
}

fn export(source: NetworkSource, format: ExportFormat) -> anyhow::Result<()> {
    let definition: NetworkDefinition = source.definition()?;
    let text = match format {
        ExportFormat::Yaml => serde_yaml::to_string(&definition)?,
        ExportFormat::Json => definition.to_json()?,
    };
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}
