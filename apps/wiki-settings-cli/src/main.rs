mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use wiki_settings::{ButtonRadius, LogoKind, PrimaryButtonStyle, SettingsMode, SettingsPatch};

use crate::config::AppConfig;

/// Inspect and edit the appearance settings of the design wiki
#[derive(Parser)]
#[command(name = "wiki-settings")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Act as this signed-in user instead of an anonymous visitor
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Override the configured settings mode (local_only, user_scoped, global_only)
    #[arg(long, global = true, value_parser = parse_choice::<SettingsMode>)]
    mode: Option<SettingsMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings that govern the UI (default)
    Show {
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the accent theme as CSS custom properties
    Theme,
    /// Update one or more fields of the current record
    Set(SetArgs),
    /// List the accent color presets
    Presets,
    /// Validate configuration, print it and exit
    Check,
}

#[derive(Args)]
struct SetArgs {
    #[arg(long)]
    app_name: Option<String>,
    /// default, plus, swatch or cube
    #[arg(long, value_parser = parse_choice::<LogoKind>)]
    logo: Option<LogoKind>,
    /// Six-digit hex color, e.g. #4f46e5
    #[arg(long)]
    primary_color: Option<String>,
    /// none, small, medium, large or full
    #[arg(long, value_parser = parse_choice::<ButtonRadius>)]
    button_radius: Option<ButtonRadius>,
    /// filled or outline
    #[arg(long, value_parser = parse_choice::<PrimaryButtonStyle>)]
    button_style: Option<PrimaryButtonStyle>,
}

impl From<SetArgs> for SettingsPatch {
    fn from(args: SetArgs) -> Self {
        Self {
            app_name: args.app_name,
            logo: args.logo,
            primary_color: args.primary_color,
            button_radius: args.button_radius,
            primary_button_style: args.button_style,
        }
    }
}

/// Parse a CLI value using the same spelling as stored documents.
fn parse_choice<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned()))
        .map_err(|_| format!("unsupported value '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_verbosity(cli.verbose);
    if let Some(mode) = cli.mode {
        config.settings.mode = mode;
    }
    logging::init(&config.logging);

    match cli.command.unwrap_or(Commands::Show { json: false }) {
        Commands::Check => commands::check(&config),
        Commands::Presets => {
            commands::presets();
            Ok(())
        }
        Commands::Show { json } => {
            let store = commands::open_store(&config, cli.user.as_deref()).await?;
            commands::show(&store, json)
        }
        Commands::Theme => {
            let store = commands::open_store(&config, cli.user.as_deref()).await?;
            commands::theme(&store)
        }
        Commands::Set(args) => {
            let store = commands::open_store(&config, cli.user.as_deref()).await?;
            commands::set(&store, args.into()).await
        }
    }
}
