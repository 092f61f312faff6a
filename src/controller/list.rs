//! Paginated, searchable, filterable list state shared by every resource page.
//!
//! The controller owns the last fetched page and the query inputs. Fetches are
//! tagged with a [`FetchTicket`]; a result is applied only when its ticket is
//! the latest one handed out, so a superseded fetch can never overwrite the
//! state of a newer one.

use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::lead::{Lead, LeadStatus};
use crate::domain::user::{User, UserRole};
use crate::repository::errors::ApiResult;
use crate::repository::{DEFAULT_PAGE_SIZE, ListQuery, Page};

/// Describes a record kind the list controller can manage.
pub trait ListResource {
    type Record: Clone;
    type Filter: Copy + PartialEq + Serialize + DeserializeOwned;

    /// Session key under which the list state is persisted.
    const STATE_KEY: &'static str;

    fn record_id(record: &Self::Record) -> &str;

    /// Case-insensitive match of `term` (already lowercased) against the
    /// record's searchable text fields.
    fn matches_search(record: &Self::Record, term: &str) -> bool;

    fn matches_filter(record: &Self::Record, filter: Self::Filter) -> bool;
}

pub struct LeadList;

impl ListResource for LeadList {
    type Record = Lead;
    type Filter = LeadStatus;

    const STATE_KEY: &'static str = "leads_list";

    fn record_id(record: &Lead) -> &str {
        &record.id
    }

    fn matches_search(record: &Lead, term: &str) -> bool {
        [&record.first_name, &record.email, &record.work_email]
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }

    fn matches_filter(record: &Lead, filter: LeadStatus) -> bool {
        record.status == filter
    }
}

pub struct UserList;

impl ListResource for UserList {
    type Record = User;
    type Filter = UserRole;

    const STATE_KEY: &'static str = "users_list";

    fn record_id(record: &User) -> &str {
        &record.id
    }

    fn matches_search(record: &User, term: &str) -> bool {
        [&record.first_name, &record.last_name, &record.email]
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }

    fn matches_filter(record: &User, filter: UserRole) -> bool {
        record.role == filter
    }
}

/// List inputs and counters persisted between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListState<F> {
    pub search: String,
    pub filter: Option<F>,
    pub page: usize,
    pub page_size: usize,
    pub total: Option<usize>,
    pub total_pages: usize,
}

impl<F> Default for ListState<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: None,
            total_pages: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was started; the result was dropped.
    Stale,
    /// The backend rejected the session.
    Unauthorized,
    Failed(String),
}

pub struct ListController<R: ListResource> {
    state: ListState<R::Filter>,
    items: Vec<R::Record>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    _resource: PhantomData<R>,
}

impl<R: ListResource> Default for ListController<R> {
    fn default() -> Self {
        Self::from_state(ListState::default())
    }
}

impl<R: ListResource> ListController<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a controller from persisted state. Items are not persisted
    /// and must be fetched again.
    pub fn from_state(state: ListState<R::Filter>) -> Self {
        let mut state = state;
        state.page = state.page.max(1);
        state.page_size = state.page_size.max(1);
        Self {
            state,
            items: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
            _resource: PhantomData,
        }
    }

    pub fn state(&self) -> &ListState<R::Filter> {
        &self.state
    }

    pub fn into_state(self) -> ListState<R::Filter> {
        self.state
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn into_items(self) -> Vec<R::Record> {
        self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.state.search
    }

    pub fn filter(&self) -> Option<R::Filter> {
        self.state.filter
    }

    pub fn page(&self) -> usize {
        self.state.page
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn total(&self) -> Option<usize> {
        self.state.total
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages
    }

    /// Updates the search term. Returns `true` when it changed, in which case
    /// the page is reset to 1.
    pub fn set_search(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term == self.state.search {
            return false;
        }
        self.state.search = term.to_string();
        self.state.page = 1;
        true
    }

    /// Updates the categorical filter. Returns `true` when it changed, in
    /// which case the page is reset to 1.
    pub fn set_filter(&mut self, filter: Option<R::Filter>) -> bool {
        if filter == self.state.filter {
            return false;
        }
        self.state.filter = filter;
        self.state.page = 1;
        true
    }

    /// Moves to `page`, clamped to the known page range.
    pub fn go_to_page(&mut self, page: usize) {
        let mut page = page.max(1);
        if self.state.total_pages > 0 {
            page = page.min(self.state.total_pages);
        }
        self.state.page = page;
    }

    pub fn next_page(&mut self) {
        if self.can_go_next() {
            self.state.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.can_go_previous() {
            self.state.page -= 1;
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.state.page < self.state.total_pages
    }

    /// Backend query for the current inputs.
    pub fn query(&self) -> ListQuery<R::Filter> {
        ListQuery::new()
            .search(self.state.search.as_str())
            .filter(self.state.filter)
            .paginate(self.state.page, self.state.page_size)
    }

    /// Marks a fetch as started and supersedes every earlier ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.generation)
    }

    /// Applies the result of the fetch identified by `ticket`.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: ApiResult<Page<R::Record>>,
    ) -> FetchOutcome {
        if ticket.0 != self.generation {
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.state.total = page.total;
                self.state.total_pages = match page.total {
                    Some(total) => total.div_ceil(self.state.page_size),
                    None => page.total_pages,
                };
                self.items = page.items;
                FetchOutcome::Applied
            }
            Err(err) if err.is_unauthorized() => {
                self.error = Some(err.to_string());
                FetchOutcome::Unauthorized
            }
            Err(err) => {
                let message = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                self.error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Fetches the current page with `fetch` and applies the result.
    pub async fn load<F, Fut>(&mut self, fetch: F) -> FetchOutcome
    where
        F: FnOnce(ListQuery<R::Filter>) -> Fut,
        Fut: Future<Output = ApiResult<Page<R::Record>>>,
    {
        let ticket = self.begin_fetch();
        let result = fetch(self.query()).await;
        self.apply_fetch(ticket, result)
    }

    /// Items to render. With `local_filter` the search term and filter are
    /// re-applied to the fetched page.
    pub fn visible_items(&self, local_filter: bool) -> Vec<&R::Record> {
        if !local_filter {
            return self.items.iter().collect();
        }
        let term = self.state.search.to_lowercase();
        self.items
            .iter()
            .filter(|record| term.is_empty() || R::matches_search(record, &term))
            .filter(|record| {
                self.state
                    .filter
                    .is_none_or(|filter| R::matches_filter(record, filter))
            })
            .collect()
    }

    fn recount(&mut self, total: usize) {
        self.state.total = Some(total);
        self.state.total_pages = total.div_ceil(self.state.page_size);
    }

    /// Optimistically shows a newly created record at the top of the page.
    pub fn apply_created(&mut self, record: R::Record) {
        self.items.insert(0, record);
        self.items.truncate(self.state.page_size);
        if let Some(total) = self.state.total {
            self.recount(total + 1);
        }
    }

    /// Optimistically replaces a record in place.
    pub fn apply_updated(&mut self, record: R::Record) {
        let id = R::record_id(&record).to_string();
        if let Some(slot) = self.items.iter_mut().find(|r| R::record_id(r) == id) {
            *slot = record;
        }
    }

    /// Removes a deleted record and keeps the page within range. A known
    /// total is decremented even when the record is not among the loaded
    /// items, since the backend already confirmed the delete.
    pub fn apply_deleted(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|record| R::record_id(record) != id);
        let removed = before != self.items.len();

        match self.state.total {
            Some(total) => {
                self.recount(total.saturating_sub(1));
                self.state.page = self.state.page.min(self.state.total_pages.max(1));
            }
            None => {
                if removed && self.items.is_empty() && self.state.page > 1 {
                    self.state.page -= 1;
                }
            }
        }
    }
}
