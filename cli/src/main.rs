//! `tcr`: inspect registry configurations and replay scripted registry games.

mod script;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tcr_factory::{RegistryFactory, TcrConfig};
use tcr_nullables::NullClock;
use tcr_types::{Address, ParamKey};
use tcr_utils::{format_duration, LogFormat};

#[derive(Parser)]
#[command(name = "tcr", about = "Token-curated registry tooling")]
struct Cli {
    /// Log output format: "text" or "json".
    #[arg(long, default_value = "text", env = "TCR_LOG_FORMAT")]
    log_format: String,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info", env = "TCR_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the parameters a configuration deploys with.
    Params {
        /// Deployment configuration (`.toml` or `.json`).
        #[arg(long, env = "TCR_CONFIG")]
        config: PathBuf,
    },

    /// Deploy a configuration on a manual clock and replay a script against it.
    Simulate {
        /// Deployment configuration (`.toml` or `.json`).
        #[arg(long, env = "TCR_CONFIG")]
        config: PathBuf,

        /// TOML script of registry actions.
        #[arg(long)]
        script: PathBuf,

        /// Deployment creator; receives the supply not given to token holders.
        #[arg(long, default_value = "creator")]
        creator: String,

        /// Clock reading at deployment, in seconds.
        #[arg(long, default_value_t = 0)]
        start_time: u64,
    },
}

fn parse_log_format(s: &str) -> LogFormat {
    match s.to_lowercase().as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tcr_utils::init_tracing(parse_log_format(&cli.log_format), &cli.log_level);

    match cli.command {
        Command::Params { config } => {
            let config = TcrConfig::load(&config)?;
            config.validate()?;
            println!("{} ({})", config.name, config.token.symbol);
            for key in ParamKey::ALL {
                let value = config.param_defaults.get(key);
                if key.is_stage_length() {
                    let secs = u64::try_from(value).unwrap_or(u64::MAX);
                    println!("  {:<20} {value} ({})", key.name(), format_duration(secs));
                } else {
                    println!("  {:<20} {value}", key.name());
                }
            }
        }
        Command::Simulate {
            config,
            script,
            creator,
            start_time,
        } => {
            let config = TcrConfig::load(&config)?;
            let source = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read {}", script.display()))?;
            let script = script::Script::from_toml_str(&source)?;

            let clock = Arc::new(NullClock::new(start_time));
            let creator = Address::new(creator);
            let deployment = RegistryFactory::from_config(&creator, &config, clock.clone())?;
            tracing::info!(name = %config.name, steps = script.steps.len(), "simulation starting");

            let mut sim = script::Simulation::new(deployment, clock, &config);
            sim.run(&script)?;
            print!("{}", sim.report());
        }
    }

    Ok(())
}
