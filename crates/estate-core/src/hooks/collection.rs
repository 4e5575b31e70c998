// ── Collection hook ──
//
// List state for one resource plus its CRUD actions. Mutations patch the
// local list with what the server returned instead of re-fetching.

use estate_api::Listing;

use super::state::{HookCell, HookState, StateWatch};
use crate::error::CoreError;
use crate::filter::{DEFAULT_LIMIT, DEFAULT_PAGE, ListQuery};
use crate::service::{Collection, Identified};

/// The data half of a collection hook's state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T, F> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub filter: F,
}

impl<T, F: Default> Default for ListState<T, F> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            filter: F::default(),
        }
    }
}

impl<T, F: Clone> ListState<T, F> {
    fn query(&self) -> ListQuery<F> {
        ListQuery {
            page: self.page,
            limit: self.limit,
            filter: self.filter.clone(),
        }
    }

    fn apply(&mut self, listing: Listing<T>) {
        self.items = listing.items;
        self.total = listing.total;
        self.page = listing.page;
        self.limit = listing.limit;
    }
}

pub type CollectionState<S> =
    ListState<<S as Collection>::Item, <S as Collection>::Filter>;

/// Stateful list of `S::Item` with pagination, filtering and CRUD.
pub struct CollectionHook<S: Collection> {
    service: S,
    cell: HookCell<CollectionState<S>>,
}

impl<S: Collection> CollectionHook<S> {
    pub fn new(service: S) -> Self {
        Self::with_limit(service, DEFAULT_LIMIT)
    }

    pub fn with_limit(service: S, limit: u32) -> Self {
        Self {
            service,
            cell: HookCell::new(ListState {
                limit,
                ..ListState::default()
            }),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> HookState<CollectionState<S>> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> StateWatch<CollectionState<S>> {
        self.cell.subscribe()
    }

    /// Load the page selected by the current page, limit and filter.
    pub async fn fetch(&self) -> Result<(), CoreError> {
        let query = self.cell.read(ListState::query);
        self.load(query).await
    }

    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.fetch().await
    }

    /// Go to `page`. No request when it is already selected.
    pub async fn set_page(&self, page: u32) -> Result<(), CoreError> {
        if self.cell.read(|s| s.page == page) {
            return Ok(());
        }
        let query = self.cell.read(|s| ListQuery { page, ..s.query() });
        self.load(query).await
    }

    /// Change the page size; back to page 1. No request when unchanged.
    pub async fn set_limit(&self, limit: u32) -> Result<(), CoreError> {
        if self.cell.read(|s| s.limit == limit) {
            return Ok(());
        }
        let query = self.cell.read(|s| ListQuery {
            page: DEFAULT_PAGE,
            limit,
            filter: s.filter.clone(),
        });
        self.load(query).await
    }

    /// Replace the filter; back to page 1. No request when unchanged.
    pub async fn set_filter(&self, filter: S::Filter) -> Result<(), CoreError> {
        if self.cell.read(|s| s.filter == filter) {
            return Ok(());
        }
        let query = self.cell.read(|s| ListQuery {
            page: DEFAULT_PAGE,
            limit: s.limit,
            filter,
        });
        self.load(query).await
    }

    /// Fetch `query` and, only once it succeeds, adopt its paging and
    /// filter together with the items.
    async fn load(&self, query: ListQuery<S::Filter>) -> Result<(), CoreError> {
        self.cell
            .run(self.service.list(&query), |state, listing| {
                state.filter = query.filter.clone();
                state.apply(listing.clone());
            })
            .await
            .map(|_| ())
    }

    /// Create and append the server's copy.
    pub async fn create(&self, draft: S::Draft) -> Result<S::Item, CoreError> {
        self.cell
            .run(self.service.create(draft), |state, item| {
                state.items.push(item.clone());
                state.total += 1;
            })
            .await
    }

    /// Update and replace the matching item with the server's copy.
    pub async fn update(&self, id: &str, patch: S::Patch) -> Result<S::Item, CoreError> {
        self.cell
            .run(self.service.update(id, patch), |state, item| {
                if let Some(slot) = state.items.iter_mut().find(|i| i.id() == item.id()) {
                    *slot = item.clone();
                }
            })
            .await
    }

    /// Delete and drop the matching item.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.cell
            .run(self.service.delete(id), |state, _| {
                let before = state.items.len();
                state.items.retain(|i| i.id() != id);
                if state.items.len() < before {
                    state.total = state.total.saturating_sub(1);
                }
            })
            .await
    }

    pub fn clear_error(&self) {
        self.cell.clear_error();
    }
}
