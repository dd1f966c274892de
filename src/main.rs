use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};

use sig_nusantara::common::types::FeatureCollection;
use sig_nusantara::observability::{init_logging, metrics};
use sig_nusantara::registry::CITIES;
use sig_nusantara::{Config, MagnitudeClass, MapSummary, Normalizers};

#[derive(Parser)]
#[command(name = "sig-nusantara")]
#[command(about = "Indonesian earthquake and weather feeds as GeoJSON")]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Geojson, global = true)]
    format: OutputFormat,

    /// Directory for the rotating JSON log file
    #[arg(long, default_value = "logs", global = true)]
    log_dir: String,

    /// Only fetch weather for the first N registry cities
    #[arg(long, global = true)]
    limit: Option<usize>,

    /// Render Prometheus metrics to stderr after the command finishes
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both feeds concurrently
    Snapshot,
    /// Recent significant earthquakes
    Seismic,
    /// The most recent earthquake
    Latest,
    /// Current weather for every province capital
    Weather,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Geojson,
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_logging(&cli.log_dir);

    let metrics_handle = if cli.print_metrics {
        match metrics::init() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    } else {
        None
    };

    let config = Config::load().context("loading configuration")?;
    let mut normalizers = Normalizers::from_config(&config).context("building HTTP client")?;
    if let Some(limit) = cli.limit {
        let cities = &CITIES[..limit.min(CITIES.len())];
        info!("Limiting weather to {} cities", cities.len());
        normalizers.weather = normalizers.weather.with_cities(cities);
    }

    match cli.command {
        Commands::Snapshot => {
            info!("Fetching map snapshot");
            let snapshot = normalizers.snapshot().await;
            match cli.format {
                OutputFormat::Geojson => {
                    let seismic = snapshot.seismic.to_geojson();
                    let weather = snapshot.weather.to_geojson();
                    let out = serde_json::json!({
                        "seismic": seismic,
                        "weather": weather,
                        "summary": snapshot.summary,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                OutputFormat::Summary => {
                    print_summary(&snapshot.summary);
                    print_seismic(&snapshot.seismic);
                }
            }
        }
        Commands::Seismic => {
            let features = normalizers.seismic.fetch_significant_events().await;
            if features.is_empty() {
                error!("No seismic events available");
            }
            emit(&features, cli.format, print_seismic)?;
        }
        Commands::Latest => {
            let features = normalizers.seismic.fetch_latest_event().await;
            emit(&features, cli.format, print_seismic)?;
        }
        Commands::Weather => {
            let features = normalizers.weather.fetch_current_weather().await;
            emit(&features, cli.format, print_weather)?;
        }
    }

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }
    Ok(())
}

fn emit(
    features: &FeatureCollection,
    format: OutputFormat,
    summary: fn(&FeatureCollection),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Geojson => println!("{}", features.to_geojson_string()?),
        OutputFormat::Summary => summary(features),
    }
    Ok(())
}

fn print_summary(summary: &MapSummary) {
    println!("📊 Snapshot");
    println!("   Seismic events: {}", summary.total_seismic);
    println!("   Major (M5.0+): {}", summary.major_seismic);
    println!("   Weather stations: {}", summary.total_weather);
    println!("   Provinces covered: {}", summary.provinces_covered);
}

fn print_seismic(features: &FeatureCollection) {
    use sig_nusantara::pipeline::normalize::seismic::attr;
    for f in features {
        let magnitude = f.attr(attr::MAGNITUDE).unwrap_or("-");
        let marker = match MagnitudeClass::from_attribute(magnitude) {
            MagnitudeClass::Major => "🔴",
            MagnitudeClass::Minor => "🟡",
        };
        println!(
            "{} M{} {} ({})",
            marker,
            magnitude,
            f.attr(attr::LOCATION).unwrap_or("-"),
            f.attr(attr::TIME).unwrap_or("-")
        );
    }
}

fn print_weather(features: &FeatureCollection) {
    use sig_nusantara::pipeline::normalize::weather::attr;
    for f in features {
        println!(
            "{} {:<20} {:>5} {:>4} {} [{}]",
            f.attr(attr::ICON).unwrap_or("-"),
            f.attr(attr::NAME).unwrap_or("-"),
            f.attr(attr::TEMPERATURE).unwrap_or("-"),
            f.attr(attr::HUMIDITY).unwrap_or("-"),
            f.attr(attr::CONDITION).unwrap_or("-"),
            f.provenance
        );
    }
}
