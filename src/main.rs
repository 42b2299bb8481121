use std::path::PathBuf;

use clap::{Parser, Subcommand, arg};
use itertools::Itertools;
use log::{error, info};

use canary::autocomplete::DEFAULT_MAX_ROWS;
use canary::dataset::{DatasetConsumer, JsonLinesConsumer, dataset_description};
use canary::geocoding::PlaceSearch;
use canary::session::DEFAULT_RADIUS_MILES;
use canary::{
    ApiConfig, CanaryError, GeoapifyClient, GeonamesClient, PurpleAirClient, SessionState,
    collect_air_quality, search_location,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for candidate place names by prefix
    Search {
        query: String,

        #[arg(short, long, default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,
    },
    /// Resolve a coordinate to the nearest known place name
    Locate {
        latitude: f64,
        longitude: f64,
    },
    /// Fetch sensor readings for a location and date range
    Fetch {
        /// Free-form "city, state" query
        #[arg(short, long)]
        location: String,

        /// First day of the range, YYYY-MM-DD
        #[arg(long)]
        start_date: String,

        /// Last day of the range, inclusive, YYYY-MM-DD
        #[arg(long)]
        end_date: String,

        /// Search radius around the located city, in miles
        #[arg(short, long, default_value_t = DEFAULT_RADIUS_MILES)]
        radius: f64,

        /// Averaging bucket size in minutes
        #[arg(short, long, default_value_t = 60)]
        average: u32,

        /// Cap on discovered sensors; 0 fetches all of them
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Write records to this file as JSON lines instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the dataset schema handed to the host environment
    Schema,
}

async fn search(query: &str, max_rows: usize) -> Result<(), CanaryError> {
    let config = ApiConfig::from_local_file().unwrap_or_default();
    let client = GeonamesClient::new(&config.geonames_username);

    let candidates = client.search(query, max_rows).await?;
    if candidates.is_empty() {
        println!("No matching places");
        return Ok(());
    }
    println!(
        "{}",
        candidates
            .iter()
            .map(|place| format!(
                "{} ({:.4}, {:.4})",
                place.name, place.latitude, place.longitude
            ))
            .join("\n")
    );
    Ok(())
}

async fn locate(latitude: f64, longitude: f64) -> Result<(), CanaryError> {
    let config = ApiConfig::from_local_file().unwrap_or_default();
    let client = GeonamesClient::new(&config.geonames_username);

    match client.find_nearby(latitude, longitude).await? {
        Some(place) => println!("{}", place.name),
        None => println!("No known place near ({latitude}, {longitude})"),
    }
    Ok(())
}

async fn fetch(
    location: &str,
    start_date: String,
    end_date: String,
    radius: f64,
    average: u32,
    limit: usize,
    output: Option<PathBuf>,
) -> Result<(), CanaryError> {
    let config = ApiConfig::from_local_file().unwrap_or_default();

    let mut session = SessionState::initialize();
    session.radius_miles = radius;
    session.start_date = start_date;
    session.end_date = end_date;
    session.averaging_minutes = average;
    session.sensor_limit = limit;

    let geoapify = GeoapifyClient::new(&config.geoapify_api_key);
    let fix = search_location(&geoapify, &mut session, location).await?;
    info!(
        "located {}, {} at ({}, {})",
        fix.city, fix.region, fix.latitude, fix.longitude
    );

    let purple_air = PurpleAirClient::new(&config.purple_air_api_key);
    let records = collect_air_quality(&purple_air, &purple_air, &session).await?;
    info!("collected {} measurement record(s)", records.len());

    match output {
        Some(path) => {
            let mut consumer = JsonLinesConsumer::create(&path)?;
            consumer.submit(&records)?;
            info!("records written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut consumer = JsonLinesConsumer::new(stdout.lock());
            consumer.submit(&records)?;
        }
    }
    Ok(())
}

fn schema() {
    let rendered = serde_json::to_string_pretty(&dataset_description())
        .expect("could not serialize dataset schema");
    println!("{rendered}");
}

fn main() {
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("could not start async runtime");

    let result = match cli.command {
        Commands::Search { query, max_rows } => runtime.block_on(search(&query, max_rows)),
        Commands::Locate {
            latitude,
            longitude,
        } => runtime.block_on(locate(latitude, longitude)),
        Commands::Fetch {
            location,
            start_date,
            end_date,
            radius,
            average,
            limit,
            output,
        } => runtime.block_on(fetch(
            &location, start_date, end_date, radius, average, limit, output,
        )),
        Commands::Schema => {
            schema();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(
            "{e}\n\nPlease try again - if the error persists - open an issue with a copy of this message at https://github.com/canary-aq/canary/issues"
        );
        std::process::exit(1);
    }
}
