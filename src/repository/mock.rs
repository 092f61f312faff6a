//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::session::{Credentials, LoginResponse};
use crate::domain::types::RecordId;
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::ApiResult;
use crate::repository::{
    AuthGateway, LeadListQuery, LeadReader, LeadWriter, Page, UserListQuery, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl LeadReader for Repository {
        async fn list_leads(&self, query: LeadListQuery) -> ApiResult<Page<Lead>>;
        async fn get_lead(&self, id: &RecordId) -> ApiResult<Lead>;
    }

    impl LeadWriter for Repository {
        async fn create_lead(&self, payload: &LeadPayload) -> ApiResult<Lead>;
        async fn update_lead(&self, id: &RecordId, payload: &LeadPayload) -> ApiResult<Lead>;
        async fn delete_lead(&self, id: &RecordId) -> ApiResult<()>;
    }

    impl UserReader for Repository {
        async fn list_users(&self, query: UserListQuery) -> ApiResult<Page<User>>;
        async fn get_user(&self, id: &RecordId) -> ApiResult<User>;
    }

    impl UserWriter for Repository {
        async fn register_user(&self, new_user: &NewUser) -> ApiResult<User>;
        async fn update_user(&self, id: &RecordId, updates: &UpdateUser) -> ApiResult<User>;
        async fn delete_user(&self, id: &RecordId) -> ApiResult<()>;
    }

    impl AuthGateway for Repository {
        async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;
        async fn logout(&self) -> ApiResult<String>;
    }
}
