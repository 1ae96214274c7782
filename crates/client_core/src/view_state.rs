//! Browse state as an immutable value with pure transitions.

use shared::domain::{ListingOrder, SearchKind, SortKind};

use crate::validation::{normalize_search_term, validate_search, SearchRejection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    sort_kind: SortKind,
    committed_search_term: String,
    raw_input_buffer: String,
    current_page: i64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort_kind: SortKind::default(),
            committed_search_term: String::new(),
            raw_input_buffer: String::new(),
            current_page: 1,
        }
    }
}

/// Identity of the query whose result the view renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Listing {
        page: i64,
        order: ListingOrder,
    },
    Search {
        term: String,
        kind: SearchKind,
        page: i64,
    },
}

impl QueryKey {
    pub fn page(&self) -> i64 {
        match self {
            QueryKey::Listing { page, .. } | QueryKey::Search { page, .. } => *page,
        }
    }
}

impl ViewState {
    pub fn sort_kind(&self) -> SortKind {
        self.sort_kind
    }

    pub fn committed_search_term(&self) -> &str {
        &self.committed_search_term
    }

    pub fn raw_input_buffer(&self) -> &str {
        &self.raw_input_buffer
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn search_kind(&self) -> SearchKind {
        self.sort_kind.search_kind()
    }

    pub fn listing_order(&self) -> ListingOrder {
        self.sort_kind.listing_order()
    }

    pub fn is_searching(&self) -> bool {
        !self.committed_search_term.is_empty()
    }

    pub fn query_key(&self) -> QueryKey {
        if self.is_searching() {
            QueryKey::Search {
                term: self.committed_search_term.clone(),
                kind: self.search_kind(),
                page: self.current_page,
            }
        } else {
            QueryKey::Listing {
                page: self.current_page,
                order: self.listing_order(),
            }
        }
    }

    /// Sorting and searching are exclusive: a new sort drops the search.
    pub fn changed_sort(&self, sort_kind: SortKind) -> Self {
        Self {
            sort_kind,
            committed_search_term: String::new(),
            raw_input_buffer: String::new(),
            current_page: 1,
        }
    }

    pub fn with_raw_input(&self, value: impl Into<String>) -> Self {
        Self {
            raw_input_buffer: value.into(),
            ..self.clone()
        }
    }

    /// Validates `candidate` for the current search kind and, when accepted,
    /// commits its normalized form and returns to page 1. A blank candidate
    /// commits the empty term, which ends the search.
    pub fn committed(&self, candidate: &str) -> Result<Self, SearchRejection> {
        let kind = self.search_kind();
        validate_search(candidate, kind)?;

        Ok(Self {
            committed_search_term: normalize_search_term(candidate, kind),
            current_page: 1,
            ..self.clone()
        })
    }

    pub fn search_cleared(&self) -> Self {
        Self {
            sort_kind: self.sort_kind,
            committed_search_term: String::new(),
            raw_input_buffer: String::new(),
            current_page: 1,
        }
    }

    /// No bounds check: the pagination controls only offer reachable pages.
    pub fn at_page(&self, page: i64) -> Self {
        Self {
            current_page: page,
            ..self.clone()
        }
    }
}
