use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chart_plugins::chart::{ChartOutput, Registry, WaterfallChart, WeightedTreeChart};
use chart_plugins::config::load_config_path;
use chart_plugins::fields::QueryFields;
use chart_plugins::waterfall::BarTable;

#[derive(Parser)]
#[command(version, about = "Run the dashboard chart transforms over a query export")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compute waterfall bars
    Waterfall {
        /// Query export: {"fields": {...}, "data": [...]}
        #[arg(long, value_name = "FILE")]
        query: PathBuf,
        /// Chart options (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Compute the weighted tree
    Tree {
        #[arg(long, value_name = "FILE")]
        query: PathBuf,
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Print the chart definitions the host registers
    Definitions,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(Deserialize)]
struct QueryExport {
    fields: QueryFields,
    data: Value,
}

fn read_query(path: &PathBuf) -> Result<QueryExport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read query export {}", path.display()))?;
    serde_json::from_str(&text).context("failed to parse query export JSON")
}

fn read_options(path: Option<&PathBuf>) -> Result<Value> {
    match path {
        Some(p) => load_config_path(p),
        None => Ok(Value::Null),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Registry::with_builtin();

    match cli.cmd {
        Cmd::Waterfall {
            query,
            config,
            format,
        } => {
            let export = read_query(&query)?;
            let options = read_options(config.as_ref())?;
            let out = registry.update(WaterfallChart::ID, &export.fields, &export.data, &options)?;
            let ChartOutput::Waterfall(wf) = out else {
                bail!("waterfall chart returned a non-waterfall output");
            };
            info!(bars = wf.bars.len(), "waterfall computed");
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&wf)?),
                Format::Table => print!("{}", BarTable(&wf.bars)),
            }
        }
        Cmd::Tree { query, config } => {
            let export = read_query(&query)?;
            let options = read_options(config.as_ref())?;
            let out =
                registry.update(WeightedTreeChart::ID, &export.fields, &export.data, &options)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Cmd::Definitions => {
            let defs: Vec<_> = registry
                .ids()
                .filter_map(|id| registry.get(id))
                .map(|c| c.definition())
                .collect();
            println!("{}", serde_json::to_string_pretty(&defs)?);
        }
    }

    Ok(())
}
