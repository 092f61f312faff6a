use crate::domain::types::RecordId;
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::ApiResult;
use crate::repository::{
    ListEnvelope, Page, RecordEnvelope, RestRepository, UserListQuery, UserReader, UserWriter,
};

/// Backend collection holding admin accounts.
pub const USER_RESOURCE: &str = "auth";

/// Account creation lives outside the plain CRUD path.
pub const REGISTER_PATH: &str = "auth/register";

impl UserReader for RestRepository {
    async fn list_users(&self, query: UserListQuery) -> ApiResult<Page<User>> {
        let envelope: ListEnvelope<User> = self
            .http()
            .get_all(USER_RESOURCE, &query.to_params("role"))
            .await?;

        Ok(envelope.into_page(query.page()))
    }

    async fn get_user(&self, id: &RecordId) -> ApiResult<User> {
        let envelope: RecordEnvelope<User> =
            self.http().get_by_id(USER_RESOURCE, id.as_str()).await?;
        Ok(envelope.into_inner())
    }
}

impl UserWriter for RestRepository {
    async fn register_user(&self, new_user: &NewUser) -> ApiResult<User> {
        let envelope: RecordEnvelope<User> = self.http().post(REGISTER_PATH, Some(new_user)).await?;
        Ok(envelope.into_inner())
    }

    async fn update_user(&self, id: &RecordId, updates: &UpdateUser) -> ApiResult<User> {
        let envelope: RecordEnvelope<User> = self
            .http()
            .update(USER_RESOURCE, id.as_str(), updates)
            .await?;
        Ok(envelope.into_inner())
    }

    async fn delete_user(&self, id: &RecordId) -> ApiResult<()> {
        let _: serde_json::Value = self.http().remove(USER_RESOURCE, id.as_str()).await?;
        Ok(())
    }
}
