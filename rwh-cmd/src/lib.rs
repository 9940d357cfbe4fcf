//! Command implementations for RWH CLI.
//!
//! Provides subcommands for estimating one site, estimating a CSV of sites,
//! and listing the reference data the estimator uses.

use clap::{Args, Subcommand};
use log::info;
use rwh_estimate::EstimatorConfig;
use rwh_site::site_input::RawSiteInput;
use std::path::{Path, PathBuf};

pub mod batch;
pub mod catalog;
pub mod estimate;

/// Site form values; every field is optional raw text, coerced like the UI form.
#[derive(Args, Debug, Clone, Default)]
pub struct SiteArgs {
    /// Place name used for the aquifer lookup
    #[arg(short = 'l', long)]
    pub location: Option<String>,

    /// Roof catchment area in square meters
    #[arg(short = 'a', long)]
    pub roof_area: Option<String>,

    /// Number of occupants
    #[arg(short = 'd', long)]
    pub dwellers: Option<String>,

    /// Open ground area in square meters
    #[arg(short = 's', long)]
    pub open_space: Option<String>,

    /// Roof runoff coefficient in [0, 1] (defaults from the config)
    #[arg(short = 'c', long)]
    pub runoff_coefficient: Option<String>,

    /// Rainfall depth in millimeters
    #[arg(short = 'r', long)]
    pub rainfall: Option<String>,
}

impl SiteArgs {
    pub fn to_raw(&self) -> RawSiteInput {
        RawSiteInput {
            location: self.location.clone(),
            roof_area: self.roof_area.clone(),
            dwellers: self.dwellers.clone(),
            open_space: self.open_space.clone(),
            runoff_coefficient: self.runoff_coefficient.clone(),
            rainfall_mm: self.rainfall.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate harvesting feasibility for one site
    Estimate {
        #[command(flatten)]
        site: SiteArgs,

        /// Path to a JSON estimator config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the metrics as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Hold the result back this many milliseconds before publishing
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },

    /// Estimate every site in a CSV and write one metrics row per site
    Batch {
        /// Input CSV with location,roof_area,dwellers,open_space,runoff_coefficient,rainfall_mm
        #[arg(short = 'i', long)]
        input_csv: String,

        /// Output path for the metrics CSV
        #[arg(short = 'o', long)]
        output_csv: String,

        /// Path to a JSON estimator config
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the embedded location table
    Locations,

    /// Show how a rainfall depth spreads over the months
    Climatology {
        /// Rainfall depth in millimeters (defaults to the reference total)
        #[arg(short = 'r', long)]
        rainfall: Option<String>,

        /// Path to a JSON estimator config
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Load the estimator config from `path`, or the defaults without one.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EstimatorConfig> {
    match path {
        Some(path) => {
            info!("Loading estimator config from {}", path.display());
            EstimatorConfig::from_path(path)
        }
        None => Ok(EstimatorConfig::default()),
    }
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Estimate {
            site,
            config,
            json,
            delay_ms,
        } => {
            let config = load_config(config.as_deref())?;
            estimate::run_estimate(&site, config, json, delay_ms).await
        }
        Command::Batch {
            input_csv,
            output_csv,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            batch::run_batch(&input_csv, &output_csv, config)
        }
        Command::Locations => catalog::run_locations(),
        Command::Climatology { rainfall, config } => {
            let config = load_config(config.as_deref())?;
            catalog::run_climatology(rainfall.as_deref(), &config)
        }
    }
}
