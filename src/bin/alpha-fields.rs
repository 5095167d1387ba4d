//! alpha-fields: which data fields does an alpha use, and which other alphas
//! use them too.
//!
//! ```bash
//! # fields of a single expression
//! alpha-fields check --operators operators.json "rank(ts_corr(close, volume, 10))"
//!
//! # fields of a submitted alpha, plus every other alpha sharing one
//! alpha-fields check --operators operators.json --alphas alphas.json \
//!     https://platform.worldquantbrain.com/alpha/1Y5Nj28K
//! alpha-fields check --operators operators.json --alphas alphas.json 1Y5Nj28K
//!
//! # reverse lookup
//! alpha-fields lookup --operators operators.json --alphas alphas.json close volume
//! ```

use alpha_field_engine::{
    check, lookup, parse_alpha_listing, CheckReport, EngineConfig, ExtractionContext,
    OperatorCatalog,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alpha-fields")]
#[command(version)]
#[command(about = "Find the data fields an alpha expression references", long_about = None)]
struct Cli {
    /// Operator listing as returned by the platform (JSON array)
    #[arg(long, global = true, env = "ALPHA_FIELDS_OPERATORS")]
    operators: Option<PathBuf>,

    /// Alpha listing page or array (JSON) to index
    #[arg(long, global = true, env = "ALPHA_FIELDS_ALPHAS")]
    alphas: Option<PathBuf>,

    /// TOML config with max_depth, platform_addr and override rules
    #[arg(long, global = true, env = "ALPHA_FIELDS_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the fields of an expression, alpha id or alpha URL
    Check {
        /// Expression text, alpha id listed in --alphas, or platform alpha URL
        input: String,
    },
    /// List alphas that use any of the given fields
    Lookup {
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    }
    .with_env_overrides();

    let Some(operators_path) = &cli.operators else {
        bail!("--operators is required (or set ALPHA_FIELDS_OPERATORS)");
    };
    let catalog = OperatorCatalog::from_json_str(&read(operators_path)?)
        .with_context(|| format!("loading operators from {}", operators_path.display()))?;
    let ctx = ExtractionContext::from_catalog(&catalog, &config);
    info!(
        operators = catalog.len(),
        rules = ctx.rules().len(),
        max_depth = ctx.max_depth(),
        "extraction context ready"
    );

    let alphas = match &cli.alphas {
        Some(path) => Some(
            parse_alpha_listing(&read(path)?)
                .with_context(|| format!("loading alphas from {}", path.display()))?,
        ),
        None => None,
    };

    match &cli.command {
        Commands::Check { input } => {
            let report = check(&config, &ctx, alphas.as_deref(), input);
            if cli.json {
                print_json(&report)
            } else {
                print_check(&config, &report);
                Ok(())
            }
        }
        Commands::Lookup { fields } => {
            let Some(alphas) = alphas.as_deref() else {
                bail!("lookup needs --alphas");
            };
            let report = lookup(&ctx, alphas, fields);
            if cli.json {
                print_json(&report)
            } else {
                print_matches(&config, &report.matching_alphas, None);
                Ok(())
            }
        }
    }
}

fn print_check(config: &EngineConfig, report: &CheckReport) {
    if let Some(id) = &report.alpha_id {
        println!("alpha {id}");
    }
    println!("{} field(s):", report.fields.len());
    for field in &report.fields {
        println!("  {field}");
    }
    if let Some(matches) = &report.matching_alphas {
        print_matches(config, matches, report.alpha_id.as_deref());
    }
}

fn print_matches(config: &EngineConfig, matches: &BTreeSet<String>, current: Option<&str>) {
    if matches.is_empty() {
        match current {
            Some(id) => println!("No other alpha uses these fields (current: {id})"),
            None => println!("No alpha uses these fields"),
        }
        return;
    }
    println!("Alphas using these fields:");
    for id in matches {
        println!("  {id}  {}/alpha/{id}", config.platform_addr.trim_end_matches('/'));
    }
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
