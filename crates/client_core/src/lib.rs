use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::{
    domain::{page_offset, ListingOrder, PageResult, Pokemon, PokemonId, SearchKind},
    error::{ApiError, ErrorCode},
    protocol::{GraphQlRequest, GraphQlResponse, PokemonListData, PokemonPageData},
};
use thiserror::Error;
use tracing::{debug, warn};

pub mod cache;
pub mod detail;
pub mod orchestrator;
pub mod pagination;
pub mod queries;
pub mod validation;
pub mod view_state;

pub use cache::EntityCache;
pub use detail::{DetailNavigation, PokemonDetail};
pub use orchestrator::{DerivedView, FetchOutcome, FetchTicket, QueryDispatcher, ViewOrchestrator};
pub use pagination::{page_window, PageLink, PageNav};
pub use validation::{normalize_search_term, parse_pokemon_number, validate_search, SearchRejection};
pub use view_state::{QueryKey, ViewState};

pub const DEFAULT_GRAPHQL_URL: &str = "https://beta.pokeapi.co/graphql/v1beta";

#[derive(Debug, Error)]
pub enum GraphQlClientError {
    #[error("graphql transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("graphql endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("graphql error: {message}")]
    GraphQl { message: String },
    #[error("graphql response carried no data")]
    MissingData,
}

/// Maps a collaborator failure onto the record the view displays.
pub fn classify_query_error(err: &anyhow::Error) -> ApiError {
    let code = match err.downcast_ref::<GraphQlClientError>() {
        Some(GraphQlClientError::Http(_)) => ErrorCode::Transport,
        Some(GraphQlClientError::Status { status: 404 }) => ErrorCode::NotFound,
        Some(GraphQlClientError::Status { .. }) => ErrorCode::Transport,
        Some(GraphQlClientError::GraphQl { .. } | GraphQlClientError::MissingData) => {
            ErrorCode::GraphQl
        }
        None => ErrorCode::Internal,
    };
    ApiError::new(code, format!("{err:#}"))
}

/// Ordered page of the full catalogue.
#[async_trait]
pub trait ListingQuery: Send + Sync {
    async fn fetch_page(
        &self,
        page: i64,
        order: ListingOrder,
        page_size: u64,
    ) -> Result<PageResult>;
}

/// Page of entities matching a committed search term. Number terms are an
/// exact id match, name and type terms a case-insensitive substring match.
#[async_trait]
pub trait SearchQuery: Send + Sync {
    async fn search_page(
        &self,
        term: &str,
        kind: SearchKind,
        page: i64,
        page_size: u64,
    ) -> Result<PageResult>;
}

#[async_trait]
pub trait PokemonLookup: Send + Sync {
    async fn pokemon_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>>;
    async fn pokemons_by_ids(&self, ids: &[PokemonId]) -> Result<Vec<Pokemon>>;
}

#[derive(Clone)]
pub struct PokeApiClient {
    http: Client,
    endpoint: String,
}

impl PokeApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> std::result::Result<T, GraphQlClientError> {
        let res = self
            .http
            .post(&self.endpoint)
            .json(&GraphQlRequest {
                query: query.to_string(),
                variables,
            })
            .send()
            .await
            .map_err(|error| {
                warn!(endpoint = %self.endpoint, %error, "graphql request failed");
                error
            })?;

        let status = res.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "graphql endpoint rejected request");
            return Err(GraphQlClientError::Status {
                status: status.as_u16(),
            });
        }

        let body: GraphQlResponse<T> = res.json().await?;
        if let Some(first) = body.errors.and_then(|errors| errors.into_iter().next()) {
            warn!(message = %first.message, "graphql query returned errors");
            return Err(GraphQlClientError::GraphQl {
                message: first.message,
            });
        }

        body.data.ok_or(GraphQlClientError::MissingData)
    }

    async fn execute_page(&self, query: &str, variables: Value) -> Result<PageResult> {
        let data: PokemonPageData = self.execute(query, variables).await?;
        let total_count = data.total_count();
        Ok(PageResult {
            items: data
                .pokemon_v2_pokemon
                .into_iter()
                .map(Pokemon::from)
                .collect(),
            total_count,
        })
    }
}

fn order_by(order: ListingOrder) -> Value {
    match order {
        ListingOrder::Name => json!([{ "name": "asc" }, { "id": "asc" }]),
        ListingOrder::Number => json!([{ "id": "asc" }]),
    }
}

#[async_trait]
impl ListingQuery for PokeApiClient {
    async fn fetch_page(
        &self,
        page: i64,
        order: ListingOrder,
        page_size: u64,
    ) -> Result<PageResult> {
        debug!(page, ?order, "fetching listing page");
        self.execute_page(
            queries::LIST_POKEMONS_PAGINATED,
            json!({
                "limit": page_size,
                "offset": page_offset(page, page_size),
                "orderBy": order_by(order),
            }),
        )
        .await
    }
}

#[async_trait]
impl SearchQuery for PokeApiClient {
    async fn search_page(
        &self,
        term: &str,
        kind: SearchKind,
        page: i64,
        page_size: u64,
    ) -> Result<PageResult> {
        debug!(term, ?kind, page, "fetching search page");
        let offset = page_offset(page, page_size);
        match kind {
            SearchKind::Name => {
                self.execute_page(
                    queries::SEARCH_POKEMONS_BY_NAME_PAGINATED,
                    json!({
                        "name": format!("%{term}%"),
                        "limit": page_size,
                        "offset": offset,
                    }),
                )
                .await
            }
            SearchKind::Number => {
                let Some(id) = parse_pokemon_number(term) else {
                    debug!(term, "number term names no valid id; empty result");
                    return Ok(PageResult::default());
                };
                self.execute_page(
                    queries::SEARCH_POKEMONS_BY_ID_PAGINATED,
                    json!({
                        "id": id.0,
                        "limit": page_size,
                        "offset": offset,
                    }),
                )
                .await
            }
            SearchKind::Type => {
                self.execute_page(
                    queries::SEARCH_POKEMONS_BY_TYPE_PAGINATED,
                    json!({
                        "typeName": format!("%{}%", term.to_lowercase()),
                        "limit": page_size,
                        "offset": offset,
                    }),
                )
                .await
            }
        }
    }
}

#[async_trait]
impl PokemonLookup for PokeApiClient {
    async fn pokemon_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>> {
        let data: PokemonListData = self
            .execute(queries::GET_POKEMON, json!({ "id": id.0 }))
            .await?;
        Ok(data.pokemon_v2_pokemon.into_iter().next().map(Pokemon::from))
    }

    async fn pokemons_by_ids(&self, ids: &[PokemonId]) -> Result<Vec<Pokemon>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let data: PokemonListData = self
            .execute(queries::GET_POKEMONS_BY_IDS, json!({ "ids": ids }))
            .await?;
        Ok(data
            .pokemon_v2_pokemon
            .into_iter()
            .map(Pokemon::from)
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
