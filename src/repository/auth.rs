use serde::Deserialize;

use crate::domain::session::{Credentials, LoginResponse};
use crate::repository::errors::ApiResult;
use crate::repository::{AuthGateway, RestRepository};

pub const LOGIN_PATH: &str = "auth";

/// Logout posts to the login collection with a trailing slash.
pub const LOGOUT_PATH: &str = "auth/";

#[derive(Deserialize)]
#[serde(untagged)]
enum LoginEnvelope {
    Data { data: LoginResponse },
    Flat(LoginResponse),
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

impl AuthGateway for RestRepository {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let envelope: LoginEnvelope = self.http().post(LOGIN_PATH, Some(credentials)).await?;
        Ok(match envelope {
            LoginEnvelope::Data { data } => data,
            LoginEnvelope::Flat(response) => response,
        })
    }

    async fn logout(&self) -> ApiResult<String> {
        let body: Option<MessageBody> = self.http().post::<(), _>(LOGOUT_PATH, None).await?;
        Ok(body
            .and_then(|b| b.message)
            .unwrap_or_else(|| "Logged out".to_string()))
    }
}
