//! PokeAPI client: wire shapes and the HTTP source behind [`PokeApi`].
//!
//! Every response type is lenient: missing fields, `null`s and values of the
//! wrong shape fall back to defaults instead of failing the whole request.

use async_trait::async_trait;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("response parse error: {0}")]
    Parse(String),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiResource {
    pub url: String,
}

// ============================================================================
// Listing
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListResponse {
    pub results: Vec<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub next: Option<String>,
}

// ============================================================================
// Pokemon
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PokemonResponse {
    pub name: String,
    /// Decimeters.
    #[serde(deserialize_with = "lenient")]
    pub height: u32,
    /// Hectograms.
    #[serde(deserialize_with = "lenient")]
    pub weight: u32,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatSlot>,
    pub sprites: serde_json::Value,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_info: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatSlot {
    #[serde(deserialize_with = "lenient")]
    pub base_stat: u32,
    pub stat: NamedResource,
}

// ============================================================================
// Species
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeciesResponse {
    pub name: String,
    pub color: NamedResource,
    #[serde(deserialize_with = "lenient")]
    pub evolution_chain: Option<ApiResource>,
    pub genera: Vec<GenusEntry>,
    pub egg_groups: Vec<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub hatch_counter: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub gender_rate: Option<i32>,
    pub pokedex_numbers: Vec<PokedexNumber>,
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenusEntry {
    pub genus: String,
    pub language: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PokedexNumber {
    #[serde(deserialize_with = "lenient")]
    pub entry_number: u32,
    pub pokedex: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
    pub version: NamedResource,
}

// ============================================================================
// Evolution chain
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvolutionChainResponse {
    #[serde(deserialize_with = "lenient")]
    pub id: u32,
    pub chain: ChainLink,
}

/// One node of the evolution tree.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChainLink {
    pub species: NamedResource,
    pub evolves_to: Vec<ChainLink>,
    pub evolution_details: Vec<EvolutionDetail>,
}

/// Conditions for one way of reaching a chain node. Most fields are rarely
/// populated; the flattener only reads `min_level`, `trigger` and `item`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvolutionDetail {
    #[serde(deserialize_with = "lenient")]
    pub min_level: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub trigger: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub item: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub gender: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub held_item: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub known_move: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub known_move_type: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub min_affection: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub min_beauty: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub min_happiness: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub needs_overworld_rain: bool,
    #[serde(deserialize_with = "lenient")]
    pub party_species: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub party_type: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub relative_physical_stats: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub time_of_day: String,
    #[serde(deserialize_with = "lenient")]
    pub trade_species: Option<NamedResource>,
    #[serde(deserialize_with = "lenient")]
    pub turn_upside_down: bool,
}

/// Read-only source of catalog data.
#[async_trait]
pub trait PokeApi: Send + Sync {
    async fn pokemon_page(&self, limit: u32, offset: u32) -> Result<ListResponse, ApiError>;
    async fn pokemon(&self, name: &str) -> Result<PokemonResponse, ApiError>;
    async fn species(&self, name: &str) -> Result<SpeciesResponse, ApiError>;
    async fn evolution_chain(&self, id: u32) -> Result<EvolutionChainResponse, ApiError>;
}

pub struct HttpPokeApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPokeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ApiError::Request(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Request(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Parse(err.to_string()))
    }
}

impl Default for HttpPokeApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[async_trait]
impl PokeApi for HttpPokeApi {
    async fn pokemon_page(&self, limit: u32, offset: u32) -> Result<ListResponse, ApiError> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url);
        self.get_json(&url).await
    }

    async fn pokemon(&self, name: &str) -> Result<PokemonResponse, ApiError> {
        let url = format!("{}/pokemon/{name}", self.base_url);
        self.get_json(&url).await
    }

    async fn species(&self, name: &str) -> Result<SpeciesResponse, ApiError> {
        let url = format!("{}/pokemon-species/{name}", self.base_url);
        self.get_json(&url).await
    }

    async fn evolution_chain(&self, id: u32) -> Result<EvolutionChainResponse, ApiError> {
        let url = format!("{}/evolution-chain/{id}", self.base_url);
        self.get_json(&url).await
    }
}

/// Field-level fallback: anything that does not decode as `T` becomes `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
