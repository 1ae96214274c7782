use std::collections::HashMap;

use anyhow::Result;
use shared::domain::{Pokemon, PokemonId};
use tracing::debug;

use crate::PokemonLookup;

/// Every entity seen in a fetched page, by id. Detail and favorites views
/// read from here before going to the network.
#[derive(Debug, Default)]
pub struct EntityCache {
    entries: HashMap<PokemonId, Pokemon>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I>(&mut self, pokemons: I)
    where
        I: IntoIterator<Item = Pokemon>,
    {
        for pokemon in pokemons {
            self.entries.insert(pokemon.id, pokemon);
        }
    }

    pub fn get(&self, id: PokemonId) -> Option<&Pokemon> {
        self.entries.get(&id)
    }

    pub fn missing(&self, ids: &[PokemonId]) -> Vec<PokemonId> {
        ids.iter()
            .copied()
            .filter(|id| !self.entries.contains_key(id))
            .collect()
    }

    pub async fn resolve(
        &mut self,
        lookup: &dyn PokemonLookup,
        id: PokemonId,
    ) -> Result<Option<Pokemon>> {
        if let Some(cached) = self.get(id) {
            return Ok(Some(cached.clone()));
        }

        let fetched = lookup.pokemon_by_id(id).await?;
        if let Some(pokemon) = &fetched {
            self.entries.insert(pokemon.id, pokemon.clone());
        }
        Ok(fetched)
    }

    /// Cached entities plus a single batched fetch of the missing ones,
    /// sorted by id. Ids the API does not know are dropped.
    pub async fn resolve_many(
        &mut self,
        lookup: &dyn PokemonLookup,
        ids: &[PokemonId],
    ) -> Result<Vec<Pokemon>> {
        let missing = self.missing(ids);
        if !missing.is_empty() {
            debug!(count = missing.len(), "fetching uncached entities");
            let fetched = lookup.pokemons_by_ids(&missing).await?;
            self.extend(fetched);
        }

        let mut resolved: Vec<Pokemon> = ids
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect();
        resolved.sort_by_key(|pokemon| pokemon.id);
        resolved.dedup_by_key(|pokemon| pokemon.id);
        Ok(resolved)
    }
}
