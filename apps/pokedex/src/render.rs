//! Plain-text rendering of the grid, page strip, detail and favorites views.

use std::fmt::Write;

use client_core::{
    page_window, DerivedView, DetailNavigation, PageLink, PageNav, PokemonDetail, ViewState,
};
use shared::domain::Pokemon;
use storage::FavoritesStore;

const FAVORITE_MARK: &str = "★";
const STAT_BAR_WIDTH: u32 = 20;

pub fn card_line(pokemon: &Pokemon, favorite: bool) -> String {
    let mark = if favorite { FAVORITE_MARK } else { " " };
    format!(
        "{mark} {:<6} {:<24} {}",
        pokemon.id.to_string(),
        pokemon.name,
        pokemon.types.join("/")
    )
}

pub fn page_strip(current: i64, total_pages: u64) -> String {
    if total_pages == 0 {
        return String::new();
    }

    let nav = PageNav::new(current, total_pages);
    let arrow = |target: Option<i64>, symbol: &str| {
        if target.is_some() {
            symbol.to_string()
        } else {
            " ".repeat(symbol.chars().count())
        }
    };

    let pages: Vec<String> = page_window(current, total_pages)
        .into_iter()
        .map(|link| match link {
            PageLink::Page(page) if page == current => format!("[{page}]"),
            PageLink::Page(page) => page.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect();

    format!(
        "{} {} {} {} {}",
        arrow(nav.first, "<<"),
        arrow(nav.previous, "<"),
        pages.join(" "),
        arrow(nav.next, ">"),
        arrow(nav.last, ">>")
    )
}

pub fn grid(view: &DerivedView, state: &ViewState, favorites: &FavoritesStore) -> String {
    let mut out = String::new();
    let _ = write!(out, "Sort: {}", state.sort_kind().label());
    if state.is_searching() {
        let _ = write!(out, " | Search: {}", state.committed_search_term());
    }
    out.push('\n');

    if view.is_loading {
        out.push_str("Loading...\n");
        return out;
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {}", error.message);
        if error.is_retryable() {
            out.push_str("Type :retry to try again.\n");
        }
        return out;
    }
    if view.is_empty() {
        out.push_str("No Pokémon found.\n");
        return out;
    }

    for pokemon in &view.items {
        let _ = writeln!(out, "{}", card_line(pokemon, favorites.is_favorite(pokemon.id)));
    }
    let _ = writeln!(
        out,
        "{}  ({} results)",
        page_strip(view.current_page, view.total_pages),
        view.total_count
    );
    out
}

pub fn detail(detail: &PokemonDetail, navigation: &DetailNavigation, favorite: bool) -> String {
    let mut out = String::new();
    let mark = if favorite { FAVORITE_MARK } else { "" };
    let _ = writeln!(out, "{} {} {mark}", detail.id, detail.name);
    let types: Vec<&str> = detail.types.iter().map(|badge| badge.name.as_str()).collect();
    let _ = writeln!(out, "Types:  {}", types.join(", "));
    let _ = writeln!(
        out,
        "Weight: {:.1} kg   Height: {:.1} m",
        f64::from(detail.weight) / 10.0,
        f64::from(detail.height) / 10.0
    );
    let _ = writeln!(out, "Moves:  {}", detail.moves.join(", "));
    let _ = writeln!(out, "Image:  {}", detail.image);
    let _ = writeln!(out, "{}", detail.description);
    for stat in &detail.stats {
        let filled = (stat.value.min(stat.max_value) * STAT_BAR_WIDTH / stat.max_value) as usize;
        let _ = writeln!(
            out,
            "{:<5} {:>3} {}{}",
            stat.label,
            stat.value,
            "#".repeat(filled),
            ".".repeat(STAT_BAR_WIDTH as usize - filled)
        );
    }

    let previous = navigation
        .previous
        .map(|id| format!("< {id}"))
        .unwrap_or_default();
    let next = navigation
        .next
        .map(|id| format!("{id} >"))
        .unwrap_or_default();
    let _ = writeln!(out, "{previous:<10}{next:>10}");
    out
}

pub fn favorites_list(pokemons: &[Pokemon]) -> String {
    if pokemons.is_empty() {
        return "No favorites yet.\n".to_string();
    }
    let mut out = String::new();
    for pokemon in pokemons {
        let _ = writeln!(out, "{}", card_line(pokemon, true));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::PokemonId;

    fn pikachu() -> Pokemon {
        Pokemon {
            id: PokemonId(25),
            name: "pikachu".to_string(),
            types: vec!["electric".to_string()],
            sprite_url: None,
            height: 4,
            weight: 60,
            stats: Vec::new(),
            moves: Vec::new(),
            flavor_text: None,
        }
    }

    #[test]
    fn card_marks_favorites() {
        assert!(card_line(&pikachu(), true).starts_with("★ #025"));
        assert!(card_line(&pikachu(), false).contains("electric"));
    }

    #[test]
    fn strip_highlights_current_page_and_disables_edges() {
        assert_eq!(page_strip(1, 3), "     [1] 2 3 > >>");
        assert_eq!(page_strip(30, 66), "<< < 1 ... 28 29 [30] 31 32 ... 66 > >>");
        assert_eq!(page_strip(1, 0), "");
    }

    #[test]
    fn empty_favorites_have_placeholder() {
        assert_eq!(favorites_list(&[]), "No favorites yet.\n");
    }

    #[test]
    fn detail_shows_metric_units_and_navigation() {
        let view = PokemonDetail::from(&pikachu());
        let text = detail(&view, &DetailNavigation::new(PokemonId(25), 1302), false);
        assert!(text.contains("Weight: 6.0 kg   Height: 0.4 m"));
        assert!(text.contains("< #024"));
        assert!(text.contains("#026 >"));
        assert!(text.contains("No description available."));
    }
}
