//! Drives which collaborator answers for the current view and keeps late
//! responses from older states out of it.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use anyhow::Result;
use shared::{
    domain::{PageResult, Pokemon, SortKind, DEFAULT_PAGE_SIZE},
    error::ApiError,
};
use tracing::debug;

use crate::{
    classify_query_error,
    validation::SearchRejection,
    view_state::{QueryKey, ViewState},
    ListingQuery, SearchQuery,
};

#[derive(Debug, Clone, PartialEq)]
enum QuerySlot {
    Loading,
    Ready(PageResult),
    Failed(ApiError),
}

/// What the grid renders for the current state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedView {
    pub items: Vec<Pokemon>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: i64,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

impl DerivedView {
    pub fn is_empty(&self) -> bool {
        !self.is_loading && self.error.is_none() && self.items.is_empty()
    }
}

/// A fetch issued for one state; its result only lands while that state's
/// query is still the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: QueryKey,
}

impl FetchTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

#[derive(Clone)]
pub struct QueryDispatcher {
    listing: Arc<dyn ListingQuery>,
    search: Arc<dyn SearchQuery>,
    page_size: u64,
}

impl QueryDispatcher {
    pub async fn run(&self, ticket: &FetchTicket) -> Result<PageResult> {
        match &ticket.key {
            QueryKey::Listing { page, order } => {
                self.listing.fetch_page(*page, *order, self.page_size).await
            }
            QueryKey::Search { term, kind, page } => {
                self.search
                    .search_page(term, *kind, *page, self.page_size)
                    .await
            }
        }
    }
}

/// Settled results kept for revisiting before the oldest is dropped.
pub const MAX_SETTLED_QUERIES: usize = 16;

pub struct ViewOrchestrator {
    state: ViewState,
    slots: HashMap<QueryKey, QuerySlot>,
    // settled keys, least recently completed first
    settled: VecDeque<QueryKey>,
    dispatcher: QueryDispatcher,
}

impl ViewOrchestrator {
    pub fn new(listing: Arc<dyn ListingQuery>, search: Arc<dyn SearchQuery>) -> Self {
        Self::with_page_size(listing, search, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(
        listing: Arc<dyn ListingQuery>,
        search: Arc<dyn SearchQuery>,
        page_size: u64,
    ) -> Self {
        Self {
            state: ViewState::default(),
            slots: HashMap::new(),
            settled: VecDeque::new(),
            dispatcher: QueryDispatcher {
                listing,
                search,
                page_size,
            },
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn page_size(&self) -> u64 {
        self.dispatcher.page_size
    }

    pub fn dispatcher(&self) -> QueryDispatcher {
        self.dispatcher.clone()
    }

    pub fn change_sort(&mut self, sort_kind: SortKind) {
        self.state = self.state.changed_sort(sort_kind);
    }

    pub fn update_raw_input(&mut self, value: impl Into<String>) {
        self.state = self.state.with_raw_input(value);
    }

    /// On rejection nothing changes; the caller shows the message and the
    /// raw buffer stays as typed.
    pub fn commit_search(&mut self, candidate: &str) -> Result<(), SearchRejection> {
        self.state = self.state.committed(candidate)?;
        Ok(())
    }

    pub fn clear_search(&mut self) {
        self.state = self.state.search_cleared();
    }

    /// Precondition: `1 <= page <= total_pages` whenever there are pages.
    pub fn go_to_page(&mut self, page: i64) {
        self.state = self.state.at_page(page);
    }

    pub fn derive_view(&self) -> DerivedView {
        let mut view = DerivedView {
            current_page: self.state.current_page(),
            ..DerivedView::default()
        };

        match self.slots.get(&self.state.query_key()) {
            Some(QuerySlot::Loading) => view.is_loading = true,
            Some(QuerySlot::Ready(result)) => {
                view.items = result.items.clone();
                view.total_count = result.total_count;
                view.total_pages = result.total_pages(self.page_size());
            }
            Some(QuerySlot::Failed(error)) => view.error = Some(error.clone()),
            None => {}
        }

        view
    }

    /// Marks the current query in flight. Returns `None` when it already has
    /// a result or is being fetched.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let key = self.state.query_key();
        if self.slots.contains_key(&key) {
            return None;
        }

        debug!(?key, "issuing fetch for current view");
        self.slots.insert(key.clone(), QuerySlot::Loading);
        Some(FetchTicket { key })
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<PageResult>,
    ) -> FetchOutcome {
        if ticket.key != self.state.query_key() {
            debug!(key = ?ticket.key, "discarding response for superseded view");
            if matches!(self.slots.get(&ticket.key), Some(QuerySlot::Loading)) {
                self.slots.remove(&ticket.key);
            }
            return FetchOutcome::Stale;
        }

        let slot = match result {
            Ok(page) => QuerySlot::Ready(page),
            Err(err) => QuerySlot::Failed(classify_query_error(&err)),
        };
        self.remember_settled(&ticket.key);
        self.slots.insert(ticket.key, slot);
        FetchOutcome::Applied
    }

    fn remember_settled(&mut self, key: &QueryKey) {
        self.settled.retain(|settled| settled != key);
        self.settled.push_back(key.clone());
        while self.settled.len() > MAX_SETTLED_QUERIES {
            let Some(oldest) = self.settled.pop_front() else {
                break;
            };
            debug!(key = ?oldest, "evicting settled result");
            self.slots.remove(&oldest);
        }
    }

    /// Forgets a failed result for the current query so the next
    /// `begin_fetch` reissues it.
    pub fn retry(&mut self) -> bool {
        let key = self.state.query_key();
        if matches!(self.slots.get(&key), Some(QuerySlot::Failed(_))) {
            self.slots.remove(&key);
            self.settled.retain(|settled| settled != &key);
            return true;
        }
        false
    }

    pub async fn refresh(&mut self) -> DerivedView {
        if let Some(ticket) = self.begin_fetch() {
            let result = self.dispatcher.run(&ticket).await;
            self.complete_fetch(ticket, result);
        }
        self.derive_view()
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
