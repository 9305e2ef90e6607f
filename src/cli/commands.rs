use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::Pipeline;
use crate::satellite::{
    default_opener, sample_nearest, MalformedPolicy, ProductLocator, SatelliteProduct,
};
use crate::utils::coordinates::{haversine_distance, validate_coordinates};
use chrono::{Local, NaiveDate};
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use validator::Validate;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli)?;

    let mut config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Prepare {
            bottle_file,
            co2_file,
            output_dir,
            format,
            compression,
            skip_satellite,
            skip_malformed,
            no_grid_cache,
            report,
            target,
        } => {
            println!(
                "Last updated on {}",
                Local::now().format("%a %b %e %H:%M:%S %Y")
            );

            if let Some(path) = bottle_file {
                config.input.bottle_file = path;
            }
            if let Some(path) = co2_file {
                config.input.co2_file = path;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if let Some(compression) = compression {
                config.output.compression = compression;
            }
            if skip_satellite {
                config.satellite.enabled = false;
            }
            if skip_malformed {
                config.satellite.on_malformed = MalformedPolicy::Skip;
            }
            if no_grid_cache {
                config.satellite.grid_cache = false;
            }
            config.validate()?;

            println!("Bottle file: {}", config.input.bottle_file.display());
            println!("CO2 file: {}", config.input.co2_file.display());
            println!("Output directory: {}", config.output.dir.display());

            let pipeline = Pipeline::new(config)
                .with_targets(target.targets())
                .with_quiet(cli.quiet);
            let run_report = pipeline.run()?;

            println!("\n{}", run_report.generate_summary());

            if let Some(path) = report {
                run_report.write_json(&path)?;
                println!("Report written to {}", path.display());
            }

            println!("Processing complete!");
        }

        Commands::Locate { date } => {
            locate(&config, date)?;
        }

        Commands::Inspect {
            file,
            product,
            lon,
            lat,
        } => {
            let position = lon.zip(lat);
            inspect(&file, product, position)?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        match cli.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ProcessingError::Config(format!("Failed to install logger: {}", e)))?;

    info!(level = %level, "Logging initialised");
    Ok(())
}

fn locate(config: &PipelineConfig, date: NaiveDate) -> Result<()> {
    println!("Satellite files for {}:", date.format("%Y-%m-%d"));

    for (product, source) in config.satellite.sources() {
        let locator = ProductLocator::new(product, source.dir.clone(), source.path_template());
        match locator.resolve(date)? {
            Some(path) => println!("  {:<6} {}", product.label(), path.display()),
            None => println!(
                "  {:<6} missing (looked for {})",
                product.label(),
                locator.expected_path(date).display()
            ),
        }
    }

    Ok(())
}

fn inspect(file: &Path, product: SatelliteProduct, position: Option<(f64, f64)>) -> Result<()> {
    let opener = default_opener()?;
    let grid = opener.open(file, product.axes())?;

    println!("Grid: {} ({})", file.display(), product);
    let axes = product.axes();
    println!("  {}", axis_summary(axes.longitude, grid.longitudes()));
    println!("  {}", axis_summary(axes.latitude, grid.latitudes()));

    let Some((longitude, latitude)) = position else {
        return Ok(());
    };
    validate_coordinates(longitude, latitude)?;

    let query_lon = product.longitude_convention().normalize(longitude);
    let transform = product.transform();
    println!(
        "Nearest cells to ({:.4}, {:.4}), queried at longitude {:.4}:",
        longitude, latitude, query_lon
    );

    for (variable, column) in product.variables() {
        match sample_nearest(grid.as_ref(), variable, query_lon, latitude)? {
            Some(sample) => {
                let distance = haversine_distance(
                    latitude,
                    query_lon,
                    sample.grid_latitude,
                    sample.grid_longitude,
                );
                let value = sample
                    .value
                    .map(|v| format!("{:.4}", transform.apply(v)))
                    .unwrap_or_else(|| "masked".to_string());
                println!(
                    "  {:<10} {} at ({:.4}, {:.4}) [{}, {}], {:.2} km away",
                    column.header(),
                    value,
                    sample.grid_longitude,
                    sample.grid_latitude,
                    sample.lon_index,
                    sample.lat_index,
                    distance
                );
            }
            None => println!("  {:<10} no cell for this position", column.header()),
        }
    }

    Ok(())
}

fn axis_summary(name: &str, values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });

    if values.is_empty() {
        format!("{}: empty", name)
    } else {
        format!("{}: {} points, {:.4} to {:.4}", name, values.len(), min, max)
    }
}
