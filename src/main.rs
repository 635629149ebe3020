use chrono::{DateTime, Utc};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use titleforge::config::Config;
use titleforge::item::{loader, Item};
use titleforge::TfResult;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/items.csv")]
    items: String,

    /// JSON config file; flags typed on the command line still win.
    #[arg(global = true, long)]
    config: Option<String>,

    /// Reference time for item ages (RFC 3339). Defaults to now.
    #[arg(global = true, long)]
    as_of: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Analyze(cmd::analyze::AnalyzeArgs),
    Optimize(cmd::optimize::OptimizeArgs),
    Readability(cmd::readability::ReadabilityArgs),
}

/// Shared inputs resolved once before a subcommand runs.
pub struct Context {
    pub items: Vec<Item>,
    pub as_of: DateTime<Utc>,
    pub config: Config,
    pub json: bool,
}

fn resolve_config(cli: &Cli, cli_config: &Config, sub_matches: &ArgMatches) -> TfResult<Config> {
    match &cli.config {
        Some(path) => {
            info!("⚖️  Loading Config from: {}", path);
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            config.validate()?;
            Ok(config)
        }
        None => {
            cli_config.validate()?;
            Ok(cli_config.clone())
        }
    }
}

fn resolve_as_of(raw: Option<&str>) -> TfResult<DateTime<Utc>> {
    match raw {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| titleforge::TitleForgeError::invalid(format!("--as-of '{}': {}", s, e))),
        None => Ok(Utc::now()),
    }
}

fn build_context(cli: &Cli, cli_config: &Config, sub_matches: &ArgMatches) -> TfResult<Context> {
    let config = resolve_config(cli, cli_config, sub_matches)?;
    let as_of = resolve_as_of(cli.as_of.as_deref())?;
    let items = loader::load_items(&cli.items)?;
    if items.is_empty() {
        warn!("⚠️  No items loaded; every statistic will be neutral.");
    }
    Ok(Context {
        items,
        as_of,
        config,
        json: cli.json,
    })
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing TitleForge...");

    let result = match (&cli.command, matches.subcommand()) {
        (Commands::Readability(args), _) => cmd::readability::run(args, cli.json),
        (Commands::Analyze(args), Some((_, sub))) => {
            build_context(&cli, &args.config, sub).and_then(|ctx| cmd::analyze::run(args, &ctx))
        }
        (Commands::Optimize(args), Some((_, sub))) => {
            build_context(&cli, &args.config, sub).and_then(|ctx| cmd::optimize::run(args, &ctx))
        }
        (_, None) => unreachable!("clap requires a subcommand"),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
