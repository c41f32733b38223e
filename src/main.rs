use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parking_lot::Mutex;

use toppings::config::{Config, Overrides};
use toppings::logging::init_tracing;
use toppings::render::RenderGeneration;
use toppings::replay::{replay, ReplayStep};
use toppings::toppings::{build, ControllerContext, Strategy, Topping};
use toppings::ui::runtime::{run, DialogOutcome};

#[derive(Parser, Debug)]
#[command(name = "toppings", version)]
#[command(about = "Pick pizza toppings in a terminal dialog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: <config dir>/toppings/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Change-detection engine
    #[arg(long, global = true, value_enum)]
    strategy: Option<Strategy>,

    /// Topping checked when the dialog opens (repeatable)
    #[arg(long = "select", global = true, value_name = "NAME")]
    select: Vec<String>,

    /// Catalog file (.toml or .json) instead of the built-in list
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive dialog (default)
    Run,

    /// Apply scripted steps headlessly and print a JSON report
    Replay {
        /// toggle:NAME, untoggle:NAME, all:on, all:off or confirm
        #[arg(required = true)]
        steps: Vec<ReplayStep>,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            strategy: self.strategy,
            select: self.select.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?
    .with_overrides(cli.overrides());
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_dialog(&config).await,
        Commands::Replay { steps } => {
            let report = replay(
                config.defaults.strategy,
                config.source(),
                config.defaults.initial_selection.clone(),
                &steps,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn run_dialog(config: &Config) -> Result<()> {
    let confirmed: Arc<Mutex<Option<Vec<Topping>>>> = Arc::default();
    let sink = {
        let confirmed = Arc::clone(&confirmed);
        Arc::new(move |chosen: Vec<Topping>| *confirmed.lock() = Some(chosen))
    };
    let ctx = ControllerContext::new(config.source(), sink)
        .with_initial_selection(config.defaults.initial_selection.clone());
    let generation = RenderGeneration::new();
    let actions = build(config.defaults.strategy, &ctx, Arc::new(generation.clone()));

    let outcome = run(actions, generation).await?;
    match (outcome, confirmed.lock().take()) {
        (DialogOutcome::Confirmed, Some(chosen)) => {
            println!("{}", serde_json::to_string_pretty(&chosen)?);
        }
        _ => eprintln!("No toppings confirmed."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_is_the_default_command() {
        let cli = Cli::try_parse_from(["toppings"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.select.is_empty());
    }

    #[test]
    fn global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "toppings",
            "replay",
            "toggle:cheese",
            "--strategy",
            "intercept",
            "--select",
            "meat",
            "--select",
            "bacon",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.strategy, Some(Strategy::Intercept));
        assert_eq!(overrides.select, vec!["meat", "bacon"]);
        assert!(matches!(cli.command, Some(Commands::Replay { ref steps }) if steps.len() == 1));
    }

    #[test]
    fn replay_rejects_bad_steps() {
        assert!(Cli::try_parse_from(["toppings", "replay", "toggle"]).is_err());
        assert!(Cli::try_parse_from(["toppings", "replay"]).is_err());
    }
}
