use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use afforestation_impact::{
    io::{self, InMemoryRepository, WorldClimLookup},
    models::{ClimateSample, ProjectionResult},
    visualization::{
        print_climate_table, print_comparison_chart, print_comparison_table,
        print_cumulative_chart, print_projection_table, print_species_list,
    },
    AppConfig, Projector,
};

#[derive(Parser)]
#[command(
    name = "afforest",
    about = "Afforestation Impact - CO₂ sequestration estimates for tree planting",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Growth-curve table (CSV or Excel), overriding the configured dataset
    #[arg(long, global = true)]
    growth: Option<PathBuf>,

    /// Species master table (CSV or Excel), overriding the configured dataset
    #[arg(long, global = true)]
    species_master: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List species available for projection
    Species,

    /// Project sequestration for a single species
    Simulate {
        /// Species identifier, e.g. "Tectona grandis"
        #[arg(short, long)]
        species: String,

        /// Planning horizon in years
        #[arg(short, long)]
        years: Option<u32>,

        /// Number of trees planted
        #[arg(short, long)]
        trees: Option<u32>,

        /// Latitude of the planting site (samples the climate grids)
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the planting site
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Mean annual temperature in °C, instead of a grid lookup
        #[arg(long, requires = "precip_mm", conflicts_with = "lat", allow_negative_numbers = true)]
        temp_c: Option<f64>,

        /// Annual precipitation in mm, instead of a grid lookup
        #[arg(long, requires = "temp_c", conflicts_with = "lat")]
        precip_mm: Option<f64>,

        /// Show a cumulative bar chart
        #[arg(long)]
        chart: bool,
    },

    /// Compare several species planted under the same scenario
    Compare {
        /// Species identifiers
        #[arg(short, long, num_args = 1.., required = true)]
        species: Vec<String>,

        /// Planning horizon in years
        #[arg(short, long)]
        years: Option<u32>,

        /// Number of trees planted per species
        #[arg(short, long)]
        trees: Option<u32>,
    },

    /// Write projections to CSV, JSON, or Excel
    Export {
        /// Species identifiers
        #[arg(short, long, num_args = 1.., required = true)]
        species: Vec<String>,

        /// Output file path (.csv, .json, or .xlsx)
        #[arg(short, long)]
        output: PathBuf,

        /// Planning horizon in years
        #[arg(short, long)]
        years: Option<u32>,

        /// Number of trees planted per species
        #[arg(short, long)]
        trees: Option<u32>,

        /// Latitude of the planting site
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the planting site
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Start the HTTP API server
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => Ok(AppConfig::load(path)?),
        None => Ok(AppConfig::default()),
    }
}

fn load_repository(cli: &Cli, config: &AppConfig) -> Result<InMemoryRepository> {
    let growth = cli
        .growth
        .clone()
        .unwrap_or_else(|| config.data.growth_curves_path());
    let species = cli
        .species_master
        .clone()
        .unwrap_or_else(|| config.data.species_master_path());
    Ok(io::load_repository(&growth, &species)?)
}

fn print_result(result: &ProjectionResult, trees: u32, years: u32, chart: bool) {
    if let Some(debug) = &result.climate_debug {
        print_climate_table(debug);
    }
    print_projection_table(result);
    if chart {
        print_cumulative_chart(result);
    }
    println!("{}", result.summary(trees, years).bold());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let repository = load_repository(&cli, &config)?;
    let projector = Projector::new(&repository);

    match cli.command {
        Commands::Species => {
            print_species_list(&projector.species_ids());
        }

        Commands::Simulate {
            ref species,
            years,
            trees,
            lat,
            lon,
            temp_c,
            precip_mm,
            chart,
        } => {
            let years = years.unwrap_or(config.defaults.years);
            let trees = trees.unwrap_or(config.defaults.trees);

            println!(
                "\n{}",
                format!("Sequestration Projection: {species} ({trees} trees, {years} years)")
                    .bold()
                    .cyan()
            );

            let result = match (lat, lon, temp_c, precip_mm) {
                (Some(lat), Some(lon), _, _) => {
                    let lookup = WorldClimLookup::from_config(&config.climate);
                    let result = projector.project_at(species, years, trees, &lookup, lat, lon);
                    lookup.close();
                    result?
                }
                (_, _, Some(t), Some(p)) => {
                    let sample = ClimateSample::new(t, p);
                    projector.project(species, years, trees, Some(&sample))?
                }
                _ => projector.project(species, years, trees, None)?,
            };

            print_result(&result, trees, years, chart);
        }

        Commands::Compare {
            ref species,
            years,
            trees,
        } => {
            let years = years.unwrap_or(config.defaults.years);
            let trees = trees.unwrap_or(config.defaults.trees);

            println!(
                "\n{}",
                format!("Species Comparison: {trees} trees each, {years} years")
                    .bold()
                    .cyan()
            );

            let (results, totals) = projector.compare(species.as_slice(), years, trees)?;
            print_comparison_table(&results, &totals);
            print_comparison_chart(&results);
        }

        Commands::Export {
            ref species,
            ref output,
            years,
            trees,
            lat,
            lon,
            pretty,
        } => {
            let years = years.unwrap_or(config.defaults.years);
            let trees = trees.unwrap_or(config.defaults.trees);

            let out_ext = output
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            let Some(writer) = io::writer_for_extension(&out_ext, pretty) else {
                anyhow::bail!("Unsupported output format: .{out_ext}. Use .csv, .json, or .xlsx");
            };

            let results = match (lat, lon) {
                (Some(lat), Some(lon)) => {
                    let lookup = WorldClimLookup::from_config(&config.climate);
                    let results = species
                        .iter()
                        .map(|s| projector.project_at(s, years, trees, &lookup, lat, lon))
                        .collect::<Result<Vec<_>, _>>();
                    lookup.close();
                    results?
                }
                _ => projector.project_many(species.as_slice(), years, trees)?,
            };

            writer.write(&results, output)?;

            println!(
                "{} Wrote {} projection(s) -> {}",
                "Success:".green().bold(),
                results.len(),
                output.display()
            );
        }

        #[cfg(feature = "web")]
        Commands::Serve { ref host, port } => {
            use std::sync::Arc;

            use afforestation_impact::web::{start_server, AppState};

            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState::new(
                Arc::new(repository.clone()),
                Arc::new(WorldClimLookup::from_config(&config.climate)),
                config.defaults.clone(),
            );

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(state, &host, port))?;
        }
    }

    Ok(())
}
