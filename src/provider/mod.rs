//! PokeAPI client.
//!
//! Implements the `PokemonProvider` port over HTTPS. Only the slice of the
//! upstream payload the service consumes is deserialized: id, name, the move
//! list and the type list. Every request is bounded by the client timeout so
//! a slow upstream surfaces as `ProviderUnavailable` instead of starving the
//! coordinator's flight gate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::{PokemonProvider, RawPokemon};
use crate::error::{Error, Result};
use crate::metrics;

/// Default public PokeAPI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct WirePokemon {
    id: i64,
    name: String,
    #[serde(default)]
    moves: Vec<WireMoveSlot>,
    #[serde(default)]
    types: Vec<WireTypeSlot>,
}

#[derive(Debug, Deserialize)]
struct WireMoveSlot {
    #[serde(rename = "move")]
    move_ref: WireNamed,
}

#[derive(Debug, Deserialize)]
struct WireTypeSlot {
    #[serde(rename = "type")]
    type_ref: WireNamed,
}

#[derive(Debug, Deserialize)]
struct WireNamed {
    name: String,
}

impl From<WirePokemon> for RawPokemon {
    fn from(wire: WirePokemon) -> Self {
        RawPokemon {
            id: wire.id,
            name: wire.name,
            moves: wire.moves.into_iter().map(|m| m.move_ref.name).collect(),
            types: wire.types.into_iter().map(|t| t.type_ref.name).collect(),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Configuration for the PokeAPI client.
#[derive(Debug, Clone)]
pub struct PokeApiConfig {
    /// Base URL of the upstream `pokemon` endpoint (no trailing slash)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for PokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP adapter for the `PokemonProvider` port.
pub struct PokeApi {
    config: PokeApiConfig,
    client: Client,
}

impl PokeApi {
    /// Create a new client. Fails only if the underlying TLS/HTTP stack
    /// cannot be initialized.
    pub fn new(config: PokeApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn lookup_url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(name)
        )
    }
}

impl std::fmt::Debug for PokeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeApi")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[async_trait]
impl PokemonProvider for PokeApi {
    #[instrument(skip(self))]
    async fn fetch(&self, name: &str) -> Result<RawPokemon> {
        let url = self.lookup_url(name);
        debug!("querying PokeAPI: {}", url);
        metrics::PROVIDER_REQUESTS.inc();

        let response = self.client.get(&url).send().await.map_err(|e| {
            metrics::PROVIDER_ERRORS.with_label_values(&["unavailable"]).inc();
            Error::provider(e)
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                metrics::PROVIDER_ERRORS.with_label_values(&["not_found"]).inc();
                Err(Error::ProviderNotFound {
                    name: name.to_string(),
                })
            }
            status if !status.is_success() => {
                metrics::PROVIDER_ERRORS.with_label_values(&["unavailable"]).inc();
                Err(Error::ProviderUnavailable(format!(
                    "PokeAPI answered with status {}",
                    status
                )))
            }
            _ => {
                let wire: WirePokemon = response.json().await.map_err(|e| {
                    metrics::PROVIDER_ERRORS.with_label_values(&["unavailable"]).inc();
                    Error::ProviderUnavailable(format!("undecodable PokeAPI body: {}", e))
                })?;
                Ok(wire.into())
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
