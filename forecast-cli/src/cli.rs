use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, ControllerSettings, ResponsePolicy, ViewController, client_from_config,
};
use inquire::{CustomType, Select, Text};
use tracing::info;

use crate::session::Session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather prediction client")]
pub struct Cli {
    /// Base URL of the prediction service for this run, e.g. "http://localhost:5000".
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Which overlapping response wins for this run: "last-arrival" or "latest-issued".
    #[arg(long, global = true, value_parser = parse_policy)]
    pub policy: Option<ResponsePolicy>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the prediction service and screen behaviour.
    Configure,

    /// Request a prediction for one location and print it.
    Predict {
        /// Address or location name, sent as typed.
        location: String,
    },

    /// Open the interactive prediction screen (default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?
            .with_endpoint_override(self.endpoint)
            .with_policy_override(self.policy);

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config)?,
            Command::Predict { location } => predict(&config, location).await?,
            Command::Interactive => {
                let controller = controller_for(&config)?;
                Session::new(controller).run().await?;
            }
        }

        Ok(())
    }
}

fn parse_policy(value: &str) -> Result<ResponsePolicy, String> {
    ResponsePolicy::try_from(value).map_err(|e| e.to_string())
}

fn controller_for(config: &Config) -> anyhow::Result<ViewController> {
    let client = client_from_config(config)?;
    info!(endpoint = %config.endpoint, policy = %config.response_policy, "prediction client ready");
    Ok(ViewController::new(client, ControllerSettings::from(config)))
}

async fn predict(config: &Config, location: String) -> anyhow::Result<()> {
    let mut controller = controller_for(config)?;

    controller.on_text_change(location);
    controller.on_submit();
    controller.settle().await;

    print!("{}", controller.render());

    let state = controller.state();
    if state.has_error() {
        bail!("{}", state.error_message);
    }
    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    config.endpoint = Text::new("Prediction service URL:")
        .with_default(&config.endpoint)
        .with_help_message("Requests are sent to <URL>/predict")
        .prompt()
        .context("Failed to read prediction service URL")?;

    config.notification_timeout_ms = CustomType::<u64>::new("Notification timeout (ms):")
        .with_default(config.notification_timeout_ms)
        .with_error_message("Please type a whole number of milliseconds")
        .prompt()
        .context("Failed to read notification timeout")?;

    let policies = ResponsePolicy::all().to_vec();
    let current = policies
        .iter()
        .position(|p| *p == config.response_policy)
        .unwrap_or(0);
    config.response_policy = Select::new("When requests overlap, show:", policies)
        .with_starting_cursor(current)
        .with_help_message("last-arrival: latest response to arrive; latest-issued: newest request only")
        .prompt()
        .context("Failed to read response policy")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
