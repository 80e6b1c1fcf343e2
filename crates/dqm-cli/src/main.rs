//! AutoDQM CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod input;
mod response;
mod sweep;
mod timing;

use dqm_compare::ComparatorRegistry;
use dqm_core::ComparisonResult;
use dqm_viz::{Figure, SummaryArtifact};
use input::RunConfig;
use response::{Payload, Query, RequestClock};
use timing::Timings;

#[derive(Parser)]
#[command(name = "autodqm")]
#[command(about = "AutoDQM - statistical comparison of data and reference histograms")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run comparators over histogram pairs
    Compare {
        /// Histogram pairs (JSON, `{"pairs": [...]}`)
        #[arg(short, long)]
        input: PathBuf,

        /// Run configuration (YAML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run only this comparator
        #[arg(long)]
        comparator: Option<String>,

        /// Threads (0 = auto). Use 1 to run on the main thread.
        #[arg(long, default_value = "0")]
        threads: usize,

        /// Output file for the response (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include figure descriptions in the payload
        #[arg(long)]
        figures: bool,
    },

    /// List registered comparators
    Comparators,

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(cli.log_level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compare { input, config, comparator, threads, output, figures } => {
            let args = CompareArgs { input, config, comparator, threads, figures };
            cmd_compare(&args, output.as_ref())
        }
        Commands::Comparators => {
            for name in ComparatorRegistry::builtin().names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Version => {
            println!("autodqm {}", dqm_core::VERSION);
            Ok(())
        }
    }
}

struct CompareArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    comparator: Option<String>,
    threads: usize,
    figures: bool,
}

struct CompareOutput {
    results: Vec<ComparisonResult>,
    summary: SummaryArtifact,
    figures: Option<Vec<Option<Figure>>>,
}

fn cmd_compare(args: &CompareArgs, output: Option<&PathBuf>) -> Result<()> {
    let clock = RequestClock::start();
    let query = Query {
        input: args.input.display().to_string(),
        config: args.config.as_ref().map(|p| p.display().to_string()),
        comparator: args.comparator.clone(),
        threads: args.threads,
    };
    let mut times = Timings::new();

    match run_compare(args, &mut times) {
        Ok(out) => {
            let payload = Payload {
                results: out.results,
                summary: Some(out.summary),
                figures: out.figures,
                times,
            };
            write_json(output, serde_json::to_value(clock.success(query, payload))?)
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "compare failed");
            let envelope = clock.fail(query, format!("{e:#}"), times);
            write_json(output, serde_json::to_value(envelope)?)?;
            Err(e)
        }
    }
}

fn run_compare(args: &CompareArgs, times: &mut Timings) -> Result<CompareOutput> {
    let registry = ComparatorRegistry::builtin();
    let mut run = match &args.config {
        Some(path) => times.time("load_config", || RunConfig::load(path))?,
        None => RunConfig::default(),
    };
    if let Some(name) = &args.comparator {
        run.comparators = Some(vec![name.clone()]);
    }
    run.validate(&registry)?;

    let pairs = times.time("load_pairs", || input::load_pairs(&args.input))?;
    let names = run.comparator_names(&registry);
    let results = sweep::sweep(&registry, &names, &run, &pairs, args.threads, times)?;

    let summary = times.time("summary", || dqm_viz::summary_artifact(&results))?;
    let figures = args.figures.then(|| {
        times.time("figures", || results.iter().map(dqm_viz::figure_for).collect::<Vec<_>>())
    });

    Ok(CompareOutput { results, summary, figures })
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
