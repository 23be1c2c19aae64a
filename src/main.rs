use clap::{Parser, Subcommand};
use foodcart::application::back_office::BackOffice;
use foodcart::application::geocode_cache::GeocodeCache;
use foodcart::domain::catalog::RestaurantId;
use foodcart::domain::order::OrderId;
use foodcart::domain::ports::{GeocoderBox, PlaceStoreBox};
use foodcart::infrastructure::in_memory::{InMemoryOrderStore, InMemoryPlaceStore, StaticGeocoder};
use foodcart::infrastructure::yandex::YandexGeocoder;
use foodcart::interfaces::csv::coordinates_reader::CoordinatesReader;
use foodcart::interfaces::csv::ranking_writer::RankingWriter;
use foodcart::interfaces::json::order_reader::read_submission;
use foodcart::interfaces::json::snapshot_reader::SnapshotReader;
use miette::{IntoDiagnostic, Result};
use secrecy::SecretString;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog and orders snapshot (JSON)
    #[arg(long, env = "FOODCART_SNAPSHOT")]
    snapshot: PathBuf,

    /// Path to persistent geocode cache (optional). If provided, uses RocksDB.
    #[arg(long, env = "FOODCART_DB_PATH")]
    db_path: Option<PathBuf>,

    /// CSV table of `address,lat,lon` answering geocode requests instead of Yandex
    #[arg(long)]
    coordinates: Option<PathBuf>,

    /// Yandex geocoder API key
    #[arg(long, env = "YANDEX_GEOCODER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Timeout for a single geocoder request
    #[arg(long, env = "FOODCART_GEOCODER_TIMEOUT_SECS", default_value_t = 10)]
    geocoder_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List products offered by at least one restaurant (JSON)
    Products,
    /// List all orders with their total cost (JSON)
    Orders,
    /// Register an order from a JSON submission
    Register { order: PathBuf },
    /// Rank restaurants able to cook an order by distance (CSV)
    Candidates { order_id: u64 },
    /// Assign an order to a restaurant
    Assign { order_id: u64, restaurant_id: u64 },
    /// Change an order's delivery address
    Address { order_id: u64, address: String },
    /// Look up coordinates for an address through the cache
    Geocode {
        address: String,
        /// Ask the geocoder again even if coordinates are cached
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "foodcart=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (catalog, orders) = SnapshotReader::new(File::open(&cli.snapshot).into_diagnostic()?)
        .read()
        .into_diagnostic()?;
    let cache = GeocodeCache::new(
        place_store(cli.db_path.as_deref())?,
        geocoder(&cli)?,
    );
    let office = BackOffice::new(
        catalog,
        Box::new(InMemoryOrderStore::with_orders(orders)),
        cache,
    );

    let stdout = io::stdout();
    match cli.command {
        Command::Products => write_json(stdout.lock(), &office.available_products())?,
        Command::Orders => write_json(stdout.lock(), &office.orders().await.into_diagnostic()?)?,
        Command::Register { order } => {
            let submission =
                read_submission(File::open(order).into_diagnostic()?).into_diagnostic()?;
            let order = office.register_order(submission).await.into_diagnostic()?;
            write_json(stdout.lock(), &order)?;
        }
        Command::Candidates { order_id } => {
            let ranking = office
                .candidate_restaurants(OrderId(order_id))
                .await
                .into_diagnostic()?;
            RankingWriter::new(stdout.lock())
                .write_ranking(&ranking)
                .into_diagnostic()?;
        }
        Command::Assign {
            order_id,
            restaurant_id,
        } => {
            let order = office
                .assign_restaurant(OrderId(order_id), RestaurantId(restaurant_id))
                .await
                .into_diagnostic()?;
            let ranking = office.candidate_restaurants(order.id).await.into_diagnostic()?;
            RankingWriter::new(stdout.lock())
                .write_ranking(&ranking)
                .into_diagnostic()?;
        }
        Command::Address { order_id, address } => {
            let order = office
                .update_address(OrderId(order_id), &address)
                .await
                .into_diagnostic()?;
            write_json(stdout.lock(), &order)?;
        }
        Command::Geocode { address, refresh } => {
            let found = if refresh {
                office.refresh_coordinates(&address).await
            } else {
                office.coordinates_for(&address).await
            };
            let mut out = stdout.lock();
            let written = match found.into_diagnostic()? {
                Some(c) => writeln!(out, "{},{}", c.lat, c.lon),
                None => writeln!(out, "unknown"),
            };
            written.into_diagnostic()?;
        }
    }

    Ok(())
}

fn place_store(db_path: Option<&Path>) -> Result<PlaceStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            use foodcart::infrastructure::rocksdb::RocksDBPlaceStore;
            info!(path = %path.display(), "using persistent geocode cache");
            Ok(Box::new(RocksDBPlaceStore::open(path).into_diagnostic()?))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
            Ok(Box::new(InMemoryPlaceStore::new()))
        }
        None => Ok(Box::new(InMemoryPlaceStore::new())),
    }
}

fn geocoder(cli: &Cli) -> Result<GeocoderBox> {
    if let Some(path) = &cli.coordinates {
        let entries = CoordinatesReader::new(File::open(path).into_diagnostic()?)
            .entries()
            .collect::<foodcart::error::Result<Vec<_>>>()
            .into_diagnostic()?;
        info!(entries = entries.len(), "using fixed coordinates table");
        return Ok(Box::new(StaticGeocoder::new(entries)));
    }
    if let Some(key) = &cli.api_key {
        let geocoder = YandexGeocoder::new(
            SecretString::from(key.clone()),
            Duration::from_secs(cli.geocoder_timeout_secs),
        )
        .into_diagnostic()?;
        return Ok(Box::new(geocoder));
    }
    warn!("No geocoder configured; addresses without cached coordinates stay unknown");
    Ok(Box::new(StaticGeocoder::default()))
}

fn write_json<W: Write, T: Serialize>(mut out: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value).into_diagnostic()?;
    writeln!(out).into_diagnostic()
}
