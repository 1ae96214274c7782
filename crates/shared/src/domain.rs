use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(PokemonId);

impl std::fmt::Display for PokemonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

/// Number of entities per page shared by the listing and search queries.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// User-selected ordering of the default listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKind {
    #[default]
    ByName,
    ByNumber,
    ByType,
}

impl SortKind {
    pub fn search_kind(self) -> SearchKind {
        match self {
            SortKind::ByName => SearchKind::Name,
            SortKind::ByNumber => SearchKind::Number,
            SortKind::ByType => SearchKind::Type,
        }
    }

    /// The listing query only knows two orderings. Type sorting has no
    /// server-side ordering, so it lists by number and relies on type search.
    pub fn listing_order(self) -> ListingOrder {
        match self {
            SortKind::ByName => ListingOrder::Name,
            SortKind::ByNumber | SortKind::ByType => ListingOrder::Number,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKind::ByName => "name",
            SortKind::ByNumber => "number",
            SortKind::ByType => "type",
        }
    }
}

impl std::str::FromStr for SortKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" | "by_name" => Ok(SortKind::ByName),
            "number" | "by_number" | "id" => Ok(SortKind::ByNumber),
            "type" | "by_type" => Ok(SortKind::ByType),
            other => Err(format!(
                "unknown sort kind '{other}' (expected name, number or type)"
            )),
        }
    }
}

/// Field a committed search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Name,
    Number,
    Type,
}

impl SearchKind {
    pub fn min_length(self) -> usize {
        match self {
            SearchKind::Name | SearchKind::Type => 3,
            SearchKind::Number => 1,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SearchKind::Name => "Search by name...",
            SearchKind::Number => "Search by number (e.g. 001 or #025)...",
            SearchKind::Type => "Search by type (e.g. water, fire, poison)...",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            SearchKind::Name => "Press Enter to search by name",
            SearchKind::Number => "Press Enter to search by number",
            SearchKind::Type => "Press Enter to search by type",
        }
    }
}

/// Orderings supported by the listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrder {
    Name,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: String,
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_url: Option<String>,
    pub height: u32,
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<BaseStat>,
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<Pokemon>,
    pub total_count: u64,
}

impl PageResult {
    pub fn total_pages(&self, page_size: u64) -> u64 {
        total_pages(self.total_count, page_size)
    }
}

/// `ceil(total_count / page_size)`; zero results means zero pages.
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Row offset of `page` (1-based). Pages below 1 yield negative offsets;
/// results past `i64` saturate.
pub fn page_offset(page: i64, page_size: u64) -> i64 {
    let page_size = i64::try_from(page_size).unwrap_or(i64::MAX);
    page.saturating_sub(1).saturating_mul(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_kinds_map_to_search_kinds_one_to_one() {
        assert_eq!(SortKind::ByName.search_kind(), SearchKind::Name);
        assert_eq!(SortKind::ByNumber.search_kind(), SearchKind::Number);
        assert_eq!(SortKind::ByType.search_kind(), SearchKind::Type);
    }

    #[test]
    fn type_sort_lists_by_number() {
        assert_eq!(SortKind::ByName.listing_order(), ListingOrder::Name);
        assert_eq!(SortKind::ByNumber.listing_order(), ListingOrder::Number);
        assert_eq!(SortKind::ByType.listing_order(), ListingOrder::Number);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(1302, 20), 66);
    }

    #[test]
    fn offsets_are_not_clamped() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(page_offset(0, 20), -20);
    }

    #[test]
    fn extreme_pages_saturate_instead_of_overflowing() {
        assert_eq!(page_offset(i64::MAX, 20), i64::MAX);
        assert_eq!(page_offset(i64::MIN, 20), i64::MIN);
        assert_eq!(page_offset(2, u64::MAX), i64::MAX);
        assert_eq!(page_offset(1, u64::MAX), 0);
    }

    #[test]
    fn parses_sort_kind_labels() {
        assert_eq!("Name".parse::<SortKind>(), Ok(SortKind::ByName));
        assert_eq!("number".parse::<SortKind>(), Ok(SortKind::ByNumber));
        assert_eq!(" type ".parse::<SortKind>(), Ok(SortKind::ByType));
        assert!("height".parse::<SortKind>().is_err());
    }

    #[test]
    fn pokemon_id_displays_zero_padded() {
        assert_eq!(PokemonId(7).to_string(), "#007");
        assert_eq!(PokemonId(1025).to_string(), "#1025");
    }
}
