use std::sync::Arc;

use anyhow::Result;
use client_core::{
    DerivedView, DetailNavigation, EntityCache, ListingQuery, PokemonDetail, PokemonLookup,
    SearchQuery, ViewOrchestrator,
};
use shared::domain::{ListingOrder, PokemonId};
use storage::FavoritesStore;
use tracing::{debug, info};

use crate::render;

/// Everything one client run works with: the grid orchestrator, the entity
/// cache shared by the detail and favorites views, and the favorites mirror.
pub struct Session {
    orchestrator: ViewOrchestrator,
    listing: Arc<dyn ListingQuery>,
    lookup: Arc<dyn PokemonLookup>,
    cache: EntityCache,
    favorites: FavoritesStore,
    catalogue_size: Option<u64>,
    last_total_pages: u64,
}

impl Session {
    pub fn new(
        listing: Arc<dyn ListingQuery>,
        search: Arc<dyn SearchQuery>,
        lookup: Arc<dyn PokemonLookup>,
        favorites: FavoritesStore,
        page_size: u64,
    ) -> Self {
        Self {
            orchestrator: ViewOrchestrator::with_page_size(listing.clone(), search, page_size),
            listing,
            lookup,
            cache: EntityCache::new(),
            favorites,
            catalogue_size: None,
            last_total_pages: 0,
        }
    }

    pub fn orchestrator(&self) -> &ViewOrchestrator {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut ViewOrchestrator {
        &mut self.orchestrator
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn last_total_pages(&self) -> u64 {
        self.last_total_pages
    }

    /// Fetches the current query if needed and returns the settled view.
    pub async fn view(&mut self) -> DerivedView {
        let view = self.orchestrator.refresh().await;
        self.cache.extend(view.items.iter().cloned());
        // a failed or pending query has no known page count
        self.last_total_pages = view.total_pages;
        if view.error.is_none() && !view.is_loading && !self.orchestrator.state().is_searching() {
            self.catalogue_size = Some(view.total_count);
        }
        view
    }

    pub async fn render_grid(&mut self) -> String {
        let view = self.view().await;
        render::grid(&view, self.orchestrator.state(), &self.favorites)
    }

    /// Detail page text, or `None` when the id is unknown.
    pub async fn render_detail(&mut self, id: PokemonId) -> Result<Option<String>> {
        let Some(pokemon) = self.cache.resolve(self.lookup.as_ref(), id).await? else {
            info!(%id, "pokemon not found");
            return Ok(None);
        };
        let catalogue_size = self.catalogue_size().await?;
        let detail = PokemonDetail::from(&pokemon);
        let navigation = DetailNavigation::new(id, catalogue_size);
        Ok(Some(render::detail(
            &detail,
            &navigation,
            self.favorites.is_favorite(id),
        )))
    }

    pub async fn render_favorites(&mut self) -> Result<String> {
        let ids = self.favorites.ids().to_vec();
        let pokemons = self.cache.resolve_many(self.lookup.as_ref(), &ids).await?;
        Ok(render::favorites_list(&pokemons))
    }

    pub async fn toggle_favorite(&mut self, id: PokemonId) -> Result<bool> {
        let now_favorite = self.favorites.toggle(id).await?;
        info!(%id, favorite = now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    async fn catalogue_size(&mut self) -> Result<u64> {
        if let Some(size) = self.catalogue_size {
            return Ok(size);
        }
        debug!("fetching catalogue size");
        let page = self.listing.fetch_page(1, ListingOrder::Number, 1).await?;
        self.cache.extend(page.items);
        self.catalogue_size = Some(page.total_count);
        Ok(page.total_count)
    }
}
