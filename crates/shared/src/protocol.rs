//! GraphQL wire envelope and the PokeAPI row shapes the client decodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BaseStat, Pokemon, PokemonId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonListData {
    pub pokemon_v2_pokemon: Vec<PokemonRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonPageData {
    pub pokemon_v2_pokemon: Vec<PokemonRow>,
    #[serde(default)]
    pub pokemon_v2_pokemon_aggregate: Option<AggregateEnvelope>,
}

impl PokemonPageData {
    pub fn total_count(&self) -> u64 {
        self.pokemon_v2_pokemon_aggregate
            .as_ref()
            .map(|envelope| envelope.aggregate.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateEnvelope {
    pub aggregate: AggregateCount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateCount {
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonRow {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub pokemon_v2_pokemontypes: Vec<TypeSlotRow>,
    #[serde(default)]
    pub pokemon_v2_pokemonsprites: Vec<SpriteRow>,
    #[serde(default)]
    pub pokemon_v2_pokemonstats: Vec<StatRow>,
    #[serde(default)]
    pub pokemon_v2_pokemonmoves: Vec<MoveSlotRow>,
    #[serde(default)]
    pub pokemon_v2_pokemonspecy: Option<SpeciesRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRow {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlotRow {
    pub pokemon_v2_type: NamedRow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveSlotRow {
    pub pokemon_v2_move: NamedRow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatRow {
    pub base_stat: u32,
    pub pokemon_v2_stat: NamedRow,
}

/// `sprites` is a jsonb column; some API versions serialize it as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteRow {
    #[serde(default)]
    pub sprites: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesRow {
    #[serde(default)]
    pub pokemon_v2_pokemonspeciesflavortexts: Vec<FlavorTextRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorTextRow {
    pub flavor_text: String,
}

impl SpriteRow {
    pub fn official_artwork(&self) -> Option<String> {
        let parsed;
        let sprites = match &self.sprites {
            Value::String(raw) => {
                parsed = serde_json::from_str::<Value>(raw).ok()?;
                &parsed
            }
            other => other,
        };

        sprites
            .pointer("/other/official-artwork/front_default")
            .and_then(Value::as_str)
            .or_else(|| sprites.get("front_default").and_then(Value::as_str))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

impl From<PokemonRow> for Pokemon {
    fn from(row: PokemonRow) -> Self {
        let sprite_url = row
            .pokemon_v2_pokemonsprites
            .first()
            .and_then(SpriteRow::official_artwork);
        let flavor_text = row
            .pokemon_v2_pokemonspecy
            .and_then(|species| {
                species
                    .pokemon_v2_pokemonspeciesflavortexts
                    .into_iter()
                    .next()
            })
            .map(|entry| entry.flavor_text);

        Pokemon {
            id: PokemonId(row.id),
            name: row.name,
            types: row
                .pokemon_v2_pokemontypes
                .into_iter()
                .map(|slot| slot.pokemon_v2_type.name)
                .collect(),
            sprite_url,
            height: row.height.unwrap_or_default(),
            weight: row.weight.unwrap_or_default(),
            stats: row
                .pokemon_v2_pokemonstats
                .into_iter()
                .map(|stat| BaseStat {
                    name: stat.pokemon_v2_stat.name,
                    value: stat.base_stat,
                })
                .collect(),
            moves: row
                .pokemon_v2_pokemonmoves
                .into_iter()
                .map(|slot| slot.pokemon_v2_move.name)
                .collect(),
            flavor_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bulbasaur_row(sprites: Value) -> Value {
        json!({
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "pokemon_v2_pokemontypes": [
                { "pokemon_v2_type": { "name": "grass" } },
                { "pokemon_v2_type": { "name": "poison" } }
            ],
            "pokemon_v2_pokemonsprites": [{ "sprites": sprites }],
            "pokemon_v2_pokemonstats": [
                { "base_stat": 45, "pokemon_v2_stat": { "name": "hp" } }
            ],
            "pokemon_v2_pokemonmoves": [
                { "pokemon_v2_move": { "name": "razor-wind" } }
            ],
            "pokemon_v2_pokemonspecy": {
                "pokemon_v2_pokemonspeciesflavortexts": [
                    { "flavor_text": "A strange seed was\nplanted on its back." }
                ]
            }
        })
    }

    #[test]
    fn converts_row_into_entity() {
        let row: PokemonRow = serde_json::from_value(bulbasaur_row(json!({
            "other": { "official-artwork": { "front_default": "https://img/1.png" } }
        })))
        .expect("row");

        let pokemon = Pokemon::from(row);
        assert_eq!(pokemon.id, PokemonId(1));
        assert_eq!(pokemon.types, vec!["grass", "poison"]);
        assert_eq!(pokemon.sprite_url.as_deref(), Some("https://img/1.png"));
        assert_eq!(pokemon.stats[0].name, "hp");
        assert_eq!(pokemon.moves, vec!["razor-wind"]);
        assert_eq!(
            pokemon.flavor_text.as_deref(),
            Some("A strange seed was\nplanted on its back.")
        );
    }

    #[test]
    fn reads_sprites_serialized_as_string() {
        let encoded = json!({
            "other": { "official-artwork": { "front_default": "https://img/encoded.png" } }
        })
        .to_string();
        let row: PokemonRow =
            serde_json::from_value(bulbasaur_row(Value::String(encoded))).expect("row");

        assert_eq!(
            Pokemon::from(row).sprite_url.as_deref(),
            Some("https://img/encoded.png")
        );
    }

    #[test]
    fn missing_sprites_leave_url_empty() {
        let row: PokemonRow = serde_json::from_value(json!({ "id": 9, "name": "blastoise" }))
            .expect("minimal row");
        let pokemon = Pokemon::from(row);
        assert_eq!(pokemon.sprite_url, None);
        assert!(pokemon.types.is_empty());
    }

    #[test]
    fn aggregate_defaults_to_zero_when_absent() {
        let data: PokemonPageData =
            serde_json::from_value(json!({ "pokemon_v2_pokemon": [] })).expect("page");
        assert_eq!(data.total_count(), 0);

        let data: PokemonPageData = serde_json::from_value(json!({
            "pokemon_v2_pokemon": [],
            "pokemon_v2_pokemon_aggregate": { "aggregate": { "count": 42 } }
        }))
        .expect("page");
        assert_eq!(data.total_count(), 42);
    }

    #[test]
    fn envelope_without_data_key_decodes_as_none() {
        let body: GraphQlResponse<PokemonListData> =
            serde_json::from_value(json!({ "errors": [{ "message": "boom" }] })).expect("envelope");
        assert!(body.data.is_none());
        assert_eq!(body.errors.expect("errors")[0].message, "boom");
    }
}
