//! Presentation model for the single-entity detail page.

use serde::Serialize;
use shared::domain::{Pokemon, PokemonId};

const DEFAULT_TYPE_COLOR: &str = "#AAA67F";
const DEFAULT_THEME_COLOR: &str = "#74CB48";
const MAX_STAT_VALUE: u32 = 255;
const MAX_MOVES: usize = 2;
const NO_DESCRIPTION: &str = "No description available.";

fn type_color(type_name: &str) -> &'static str {
    match type_name {
        "grass" => "#74CB48",
        "poison" => "#A43E9E",
        "fire" => "#F57D31",
        "water" => "#6493EB",
        "bug" => "#A7B723",
        "normal" => "#AAA67F",
        "electric" => "#F9CF30",
        "ground" => "#DEC16B",
        "fairy" => "#E69EAC",
        "fighting" => "#C12239",
        "psychic" => "#FB5584",
        "rock" => "#B69E31",
        "ghost" => "#70559B",
        "ice" => "#9AD6DF",
        "dragon" => "#7037FF",
        "dark" => "#75574C",
        "steel" => "#B7B9D0",
        "flying" => "#A891EC",
        _ => DEFAULT_TYPE_COLOR,
    }
}

fn stat_label(stat_name: &str) -> String {
    match stat_name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        other => other.to_uppercase(),
    }
}

pub fn artwork_fallback_url(id: PokemonId) -> String {
    format!(
        "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{}.png",
        id.0
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBadge {
    pub name: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatBar {
    pub label: String,
    pub value: u32,
    pub max_value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PokemonDetail {
    pub id: PokemonId,
    pub name: String,
    pub image: String,
    pub types: Vec<TypeBadge>,
    pub weight: u32,
    pub height: u32,
    pub moves: Vec<String>,
    pub description: String,
    pub stats: Vec<StatBar>,
    pub theme_color: &'static str,
}

impl From<&Pokemon> for PokemonDetail {
    fn from(pokemon: &Pokemon) -> Self {
        let types: Vec<TypeBadge> = pokemon
            .types
            .iter()
            .map(|name| TypeBadge {
                name: name.clone(),
                color: type_color(name),
            })
            .collect();
        let theme_color = types
            .first()
            .map(|badge| badge.color)
            .unwrap_or(DEFAULT_THEME_COLOR);

        let description = pokemon
            .flavor_text
            .as_deref()
            .map(|text| text.replace(['\u{c}', '\n'], " "))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Self {
            id: pokemon.id,
            name: pokemon.name.clone(),
            image: pokemon
                .sprite_url
                .clone()
                .unwrap_or_else(|| artwork_fallback_url(pokemon.id)),
            types,
            weight: pokemon.weight,
            height: pokemon.height,
            moves: pokemon
                .moves
                .iter()
                .take(MAX_MOVES)
                .map(|name| name.replace('-', " "))
                .collect(),
            description,
            stats: pokemon
                .stats
                .iter()
                .map(|stat| StatBar {
                    label: stat_label(&stat.name),
                    value: stat.value,
                    max_value: MAX_STAT_VALUE,
                })
                .collect(),
            theme_color,
        }
    }
}

/// Previous/next targets on the detail page, bounded by the catalogue size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailNavigation {
    pub previous: Option<PokemonId>,
    pub next: Option<PokemonId>,
}

impl DetailNavigation {
    pub fn new(id: PokemonId, catalogue_size: u64) -> Self {
        Self {
            previous: (id.0 > 1).then(|| PokemonId(id.0 - 1)),
            next: (id.0 < catalogue_size as i64).then(|| PokemonId(id.0 + 1)),
        }
    }
}
