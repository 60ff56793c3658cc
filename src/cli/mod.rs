//! Command-line interface: argument definitions and command dispatch.

pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use crate::collector::{Collector, CollectorOptions, FailureMode, FetchOptions};
use crate::config::AppConfig;
use crate::error::{GameInsightsError, Result};
use crate::model;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "game-insights",
    version,
    about = "Aggregate Steam game data from multiple sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collect data for one or more appids/steamids
    Collect(CollectArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CollectMode {
    /// Merged game records from all sources
    #[default]
    Games,
    /// Month-by-month active player data (SteamCharts only)
    ActivePlayer,
    /// Recent reviews for the first appid
    Reviews,
    /// User profiles and libraries (identifiers are steamids)
    User,
}

#[derive(Debug, clap::Args)]
pub struct CollectArgs {
    /// Appid (or steamid in user mode); repeatable
    #[arg(long = "appid", value_name = "ID")]
    pub appids: Vec<String>,

    /// What to collect
    #[arg(long, value_enum, default_value_t = CollectMode::Games)]
    pub mode: CollectMode,

    /// Return the reduced recap projection instead of full records
    #[arg(long)]
    pub recap: bool,

    /// Fail on the first primary-source error instead of collecting
    /// partial data
    #[arg(long)]
    pub strict: bool,

    /// Report per-identifier outcomes on stderr after the batch
    #[arg(long)]
    pub include_failures: bool,

    /// Restrict id-keyed sources by name (e.g. steamstore); repeatable
    #[arg(long = "source", value_name = "NAME")]
    pub sources: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Region for store requests
    #[arg(long)]
    pub region: Option<String>,

    /// Language for store requests
    #[arg(long)]
    pub language: Option<String>,

    /// Steam Web API key
    #[arg(long, value_name = "KEY")]
    pub steam_api_key: Option<String>,

    /// Gamalytic API key
    #[arg(long, value_name = "KEY")]
    pub gamalytic_api_key: Option<String>,

    /// Config file path (default: ./game-insights.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Exclude free games from user libraries (user mode)
    #[arg(long)]
    pub exclude_free_games: bool,
}

/// Resolve collector options from the config file and flag overrides.
fn resolve_options(args: &CollectArgs) -> Result<CollectorOptions> {
    let mut options = CollectorOptions::default();
    AppConfig::load(args.config.as_deref())?.apply(&mut options);

    if let Some(region) = &args.region {
        options.region = region.clone();
    }
    if let Some(language) = &args.language {
        options.language = language.clone();
    }
    if let Some(key) = &args.steam_api_key {
        options.steam_api_key = Some(key.clone());
    }
    if let Some(key) = &args.gamalytic_api_key {
        options.gamalytic_api_key = Some(key.clone());
    }
    Ok(options)
}

/// Execute the parsed command.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Collect(args) => collect(args),
    }
}

fn collect(args: CollectArgs) -> Result<()> {
    if args.appids.is_empty() {
        return Err(GameInsightsError::invalid_request("No appids supplied"));
    }

    info!("Collecting data for {} appid(s)...", args.appids.len());

    let options = resolve_options(&args)?;
    let mut collector = Collector::new(options)?;
    if !args.sources.is_empty() {
        let names: Vec<&str> = args.sources.iter().map(String::as_str).collect();
        collector.retain_id_sources(&names);
    }

    let fetch_options = FetchOptions {
        recap: args.recap,
        mode: if args.strict {
            FailureMode::Propagate
        } else {
            FailureMode::Absorb
        },
    };

    let (records, columns) = match args.mode {
        CollectMode::Games => {
            let declared: Vec<String> = if args.recap {
                model::RECAP_FIELDS.iter().map(|f| f.to_string()).collect()
            } else {
                model::FIELD_ORDER.iter().map(|f| f.to_string()).collect()
            };
            if args.include_failures {
                let (records, outcomes) =
                    collector.get_games_data_with_outcomes(&args.appids, &fetch_options)?;
                for outcome in outcomes.iter().filter(|outcome| !outcome.success) {
                    warn!(
                        "appid {} failed: {}",
                        outcome.identifier,
                        outcome.error.as_deref().unwrap_or("unknown error")
                    );
                }
                (records, declared)
            } else {
                (collector.get_games_data(&args.appids, &fetch_options)?, declared)
            }
        }
        CollectMode::ActivePlayer => {
            let records = collector.get_games_active_player_data(&args.appids, -1)?;
            let columns = output::infer_columns(&records);
            (records, columns)
        }
        CollectMode::Reviews => {
            let records = collector.get_game_review(&args.appids[0], true)?;
            let columns = output::infer_columns(&records);
            (records, columns)
        }
        CollectMode::User => {
            let records = collector.get_user_data(&args.appids, !args.exclude_free_games)?;
            let columns = output::infer_columns(&records);
            (records, columns)
        }
    };

    let rendered = match args.format {
        OutputFormat::Json => output::render_json(&records)?,
        OutputFormat::Csv => output::render_csv(&records, &columns)?,
    };
    output::emit(&rendered, args.output.as_deref())?;

    collector.close();
    Ok(())
}
