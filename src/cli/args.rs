use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::TargetVariable;
use crate::satellite::SatelliteProduct;
use crate::writers::OutputFormat;

#[derive(Parser)]
#[command(name = "bottle-prep")]
#[command(about = "Prepare bottle carbonate data with atmospheric CO2 and co-located satellite fields")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress bars")]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: bottle-prep.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the DIC and TA datasets
    Prepare {
        #[arg(long, help = "Bottle observations CSV")]
        bottle_file: Option<PathBuf>,

        #[arg(long, help = "NOAA annual-mean atmospheric CO2 CSV")]
        co2_file: Option<PathBuf>,

        #[arg(short, long, help = "Directory for the prepared datasets")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        #[arg(short, long, help = "Parquet compression (snappy, gzip, lz4, zstd, none)")]
        compression: Option<String>,

        #[arg(long, help = "Do not read satellite grids")]
        skip_satellite: bool,

        #[arg(long, help = "Log and skip unreadable satellite files instead of aborting")]
        skip_malformed: bool,

        #[arg(long, help = "Reopen the grid file for every row")]
        no_grid_cache: bool,

        #[arg(long, help = "Write the run report as JSON")]
        report: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = TargetChoice::Both)]
        target: TargetChoice,
    },

    /// Show which satellite files would be used for a date
    Locate {
        #[arg(short, long, value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Display a satellite grid's axes and the nearest value to a point
    Inspect {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, value_parser = parse_product)]
        product: SatelliteProduct,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetChoice {
    Dic,
    Talk,
    Both,
}

impl TargetChoice {
    pub fn targets(&self) -> Vec<TargetVariable> {
        match self {
            TargetChoice::Dic => vec![TargetVariable::Dic],
            TargetChoice::Talk => vec![TargetVariable::Talk],
            TargetChoice::Both => TargetVariable::ALL.to_vec(),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("{} (expected YYYY-MM-DD)", e))
}

fn parse_product(value: &str) -> Result<SatelliteProduct, String> {
    value.parse::<SatelliteProduct>().map_err(|e| e.to_string())
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value.parse::<OutputFormat>().map_err(|e| e.to_string())
}
