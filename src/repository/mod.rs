use serde::Deserialize;

use crate::domain::lead::{Lead, LeadPayload, LeadStatus};
use crate::domain::session::{Credentials, LoginResponse};
use crate::domain::types::RecordId;
use crate::domain::user::{NewUser, UpdateUser, User, UserRole};
use crate::repository::errors::ApiResult;
use crate::repository::http::HttpClient;

pub mod auth;
pub mod errors;
pub mod http;
pub mod lead;
#[cfg(feature = "test-mocks")]
pub mod mock;
#[cfg(test)]
pub mod test;
pub mod user;

/// Page size used when a query does not request one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// List request shared by every resource; `F` is the resource's filter
/// (lead status or user role).
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub search: Option<String>,
    pub filter: Option<F>,
    pub pagination: Option<Pagination>,
}

pub type LeadListQuery = ListQuery<LeadStatus>;
pub type UserListQuery = ListQuery<UserRole>;

impl<F> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            search: None,
            filter: None,
            pagination: None,
        }
    }
}

impl<F> ListQuery<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term; blank terms are dropped.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_string();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn filter(mut self, filter: Option<F>) -> Self {
        self.filter = filter;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination {
            page: page.max(1),
            per_page: per_page.max(1),
        });
        self
    }

    pub fn page(&self) -> Pagination {
        self.pagination.unwrap_or_default()
    }
}

impl<F: std::fmt::Display> ListQuery<F> {
    /// Query-string pairs understood by the backend; `filter_key` is
    /// `status` for leads and `role` for users.
    pub fn to_params(&self, filter_key: &'static str) -> Vec<(&'static str, String)> {
        let Pagination { page, per_page } = self.page();
        let mut params = vec![("page", page.to_string()), ("limit", per_page.to_string())];
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(filter) = &self.filter {
            params.push((filter_key, filter.to_string()));
        }
        params
    }
}

/// One page of records regardless of the envelope the backend used.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of matching records, when the backend reports it.
    pub total: Option<usize>,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Some(0),
            total_pages: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListMeta {
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    total_pages: Option<usize>,
}

/// Shapes a list endpoint may answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Data {
        data: Vec<T>,
        #[serde(default)]
        meta: Option<ListMeta>,
    },
    Users {
        users: Vec<T>,
        #[serde(default, rename = "totalPages")]
        total_pages: Option<usize>,
        #[serde(default)]
        total: Option<usize>,
    },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    /// Normalises the envelope into a page. A bare array is treated as the
    /// complete result set and sliced locally.
    pub(crate) fn into_page(self, pagination: Pagination) -> Page<T> {
        let per_page = pagination.per_page.max(1);
        match self {
            ListEnvelope::Data { data, meta } => {
                let meta = meta.unwrap_or_default();
                let total_pages = meta
                    .total_pages
                    .or_else(|| meta.total.map(|t| t.div_ceil(per_page)))
                    .unwrap_or(usize::from(!data.is_empty()));
                Page {
                    items: data,
                    total: meta.total,
                    total_pages,
                }
            }
            ListEnvelope::Users {
                users,
                total_pages,
                total,
            } => {
                let total_pages = total_pages
                    .or_else(|| total.map(|t| t.div_ceil(per_page)))
                    .unwrap_or(usize::from(!users.is_empty()));
                Page {
                    items: users,
                    total,
                    total_pages,
                }
            }
            ListEnvelope::Bare(all) => {
                let total = all.len();
                let start = (pagination.page.max(1) - 1).saturating_mul(per_page);
                let items = all.into_iter().skip(start).take(per_page).collect();
                Page {
                    items,
                    total: Some(total),
                    total_pages: total.div_ceil(per_page),
                }
            }
        }
    }
}

/// Shapes a single-record endpoint may answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecordEnvelope<T> {
    Data { data: T },
    User { user: T },
    Bare(T),
}

impl<T> RecordEnvelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            RecordEnvelope::Data { data } => data,
            RecordEnvelope::User { user } => user,
            RecordEnvelope::Bare(record) => record,
        }
    }
}

/// Backend-backed implementation of every repository trait.
///
/// Cheap to clone; bind it to the caller's session with
/// [`HttpClient::with_session`] before constructing.
#[derive(Clone, Debug)]
pub struct RestRepository {
    http: HttpClient,
}

impl RestRepository {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[allow(async_fn_in_trait)]
pub trait LeadReader {
    async fn list_leads(&self, query: LeadListQuery) -> ApiResult<Page<Lead>>;
    async fn get_lead(&self, id: &RecordId) -> ApiResult<Lead>;
}

#[allow(async_fn_in_trait)]
pub trait LeadWriter {
    async fn create_lead(&self, payload: &LeadPayload) -> ApiResult<Lead>;
    async fn update_lead(&self, id: &RecordId, payload: &LeadPayload) -> ApiResult<Lead>;
    async fn delete_lead(&self, id: &RecordId) -> ApiResult<()>;
}

#[allow(async_fn_in_trait)]
pub trait UserReader {
    async fn list_users(&self, query: UserListQuery) -> ApiResult<Page<User>>;
    async fn get_user(&self, id: &RecordId) -> ApiResult<User>;
}

#[allow(async_fn_in_trait)]
pub trait UserWriter {
    async fn register_user(&self, new_user: &NewUser) -> ApiResult<User>;
    async fn update_user(&self, id: &RecordId, updates: &UpdateUser) -> ApiResult<User>;
    async fn delete_user(&self, id: &RecordId) -> ApiResult<()>;
}

#[allow(async_fn_in_trait)]
pub trait AuthGateway {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;
    /// Ends the backend session and returns the server's message.
    async fn logout(&self) -> ApiResult<String>;
}
