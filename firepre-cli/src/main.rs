//! Firepre CLI - wildfire risk scoring tool

#![deny(warnings)]

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use firepre_core::config;
use firepre_core::model;
use firepre_core::{render_json, render_text, RiskEngine, RiskInput};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "firepre")]
#[command(about = "Wildfire risk scoring from weather and environmental readings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one set of readings
    Predict {
        /// JSON input file ("-" for stdin); overrides the individual flags
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,

        /// Air temperature in °C
        #[arg(long, allow_hyphen_values = true)]
        temperature: Option<f64>,

        /// Relative humidity in percent
        #[arg(long)]
        humidity: Option<f64>,

        /// Wind speed in km/h
        #[arg(long)]
        wind_speed: Option<f64>,

        /// Precipitation in mm
        #[arg(long)]
        precipitation: Option<f64>,

        /// Vegetation density in [0,1] (default 0.5)
        #[arg(long)]
        vegetation_density: Option<f64>,

        /// Elevation in meters (default 300)
        #[arg(long)]
        elevation: Option<f64>,

        /// Drought index in [0,1] (default 0.3)
        #[arg(long)]
        drought_index: Option<f64>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect the model artifact discovery
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without scoring
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Report which model artifact discovery would load
    Status {
        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            input,
            latitude,
            longitude,
            temperature,
            humidity,
            wind_speed,
            precipitation,
            vegetation_density,
            elevation,
            drought_index,
            format,
            config,
        } => {
            let risk_input = match input {
                Some(path) => read_input(&path)?,
                None => build_input(
                    latitude,
                    longitude,
                    temperature,
                    humidity,
                    wind_speed,
                    precipitation,
                    vegetation_density,
                    elevation,
                    drought_index,
                )?,
            };

            let resolved = config::load_and_resolve(Path::new("."), config.as_deref())?;
            let engine = RiskEngine::new(resolved);
            let result = engine.score(&risk_input);

            match format {
                OutputFormat::Text => print!("{}", render_text(&result)),
                OutputFormat::Json => println!("{}", render_json(&result)),
            }
        }
        Commands::Config {
            action: ConfigAction::Validate { config },
        } => {
            let resolved = config::load_and_resolve(Path::new("."), config.as_deref())?;
            match &resolved.config_path {
                Some(path) => println!("Config valid: {}", path.display()),
                None => println!("No config file found; defaults are in effect"),
            }
        }
        Commands::Model {
            action: ModelAction::Status { config },
        } => {
            let resolved = config::load_and_resolve(Path::new("."), config.as_deref())?;
            match model::discover_model(&resolved.models_dir) {
                Some(path) => println!("Model artifact: {}", path.display()),
                None => println!(
                    "No model artifact under {}; predictions will use the mock fallback",
                    resolved.models_dir.display()
                ),
            }
        }
    }

    Ok(())
}

/// Parse a RiskInput from a JSON file or stdin
fn read_input(path: &Path) -> anyhow::Result<RiskInput> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read input from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file: {}", path.display()))?
    };
    serde_json::from_str(&content).context("failed to parse input JSON")
}

#[allow(clippy::too_many_arguments)]
fn build_input(
    latitude: Option<f64>,
    longitude: Option<f64>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    precipitation: Option<f64>,
    vegetation_density: Option<f64>,
    elevation: Option<f64>,
    drought_index: Option<f64>,
) -> anyhow::Result<RiskInput> {
    let require = |value: Option<f64>, flag: &str| {
        value.ok_or_else(|| anyhow::anyhow!("--{} is required unless --input is given", flag))
    };

    Ok(RiskInput {
        latitude: require(latitude, "latitude")?,
        longitude: require(longitude, "longitude")?,
        temperature: require(temperature, "temperature")?,
        humidity: require(humidity, "humidity")?,
        wind_speed: require(wind_speed, "wind-speed")?,
        precipitation: require(precipitation, "precipitation")?,
        vegetation_density,
        elevation,
        drought_index,
    })
}
