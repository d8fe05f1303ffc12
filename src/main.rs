//! Pokestore service binary.
//!
//! Wires the SQLite store, the PokeAPI client, the TTL cache, and the
//! coordinator together, then serves the REST API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pokestore::error::{Error, Result};
use pokestore::{PokeApi, PokeApiConfig, PokemonService, SqliteStore, TtlCache};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Pokestore - Pokedex record service over the PokeAPI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTTP bind address
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind_addr: String,

    /// PokeAPI pokemon endpoint base URL
    #[arg(
        long,
        env = "POKEAPI_URL",
        default_value = "https://pokeapi.co/api/v2/pokemon"
    )]
    pokeapi_url: String,

    /// SQLite database path (":memory:" for an ephemeral store)
    #[arg(long, env = "DATABASE_PATH", default_value = "pokestore.db")]
    database_path: String,

    /// Cache entry lifetime in seconds
    #[arg(long, env = "CACHE_TTL_SECONDS", default_value = "600")]
    cache_ttl_seconds: u64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECONDS", default_value = "10")]
    provider_timeout_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting pokestore");
    info!("  Bind address: {}", args.bind_addr);
    info!("  PokeAPI URL: {}", args.pokeapi_url);
    info!("  Database path: {}", args.database_path);
    info!("  Cache TTL: {}s", args.cache_ttl_seconds);
    info!("  Provider timeout: {}s", args.provider_timeout_seconds);

    let addr: SocketAddr = args
        .bind_addr
        .parse()
        .map_err(|e| Error::Config(format!("invalid bind address: {}", e)))?;

    let store = SqliteStore::open(&args.database_path)?;
    info!("SQLite store ready at {}", args.database_path);

    let provider = PokeApi::new(PokeApiConfig {
        base_url: args.pokeapi_url.clone(),
        timeout: Duration::from_secs(args.provider_timeout_seconds),
    })?;

    let cache = TtlCache::with_ttl(Duration::from_secs(args.cache_ttl_seconds));

    let service = Arc::new(PokemonService::new(
        Arc::new(store),
        Arc::new(provider),
        cache,
    ));

    pokestore::http::serve(addr, service).await
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().expect("static directive"))
        .add_directive("reqwest=info".parse().expect("static directive"));

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
