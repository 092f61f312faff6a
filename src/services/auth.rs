use crate::domain::session::{Credentials, LoginResponse, SessionToken};
use crate::forms::auth::LoginForm;
use crate::repository::AuthGateway;
use crate::services::{ServiceError, ServiceResult};

/// Signed-in session: the token and the account id new leads are assigned to.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: SessionToken,
    pub user_id: Option<String>,
}

/// Validates the sign-in form and exchanges the credentials for a token.
pub async fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<SignedIn>
where
    R: AuthGateway + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    let LoginResponse { token, user } = repo.login(&credentials).await.map_err(|err| {
        log::error!("Failed to sign in {}: {err}", credentials.email);
        match err {
            err if err.is_unauthorized() => {
                ServiceError::Form(err.server_message().unwrap_or("Invalid credentials").to_string())
            }
            err => ServiceError::from(err),
        }
    })?;

    let token = SessionToken::new(token).map_err(|_| {
        log::error!("Backend returned an empty session token");
        ServiceError::Internal("empty session token".to_string())
    })?;

    Ok(SignedIn {
        token,
        user_id: user.map(|u| u.id).filter(|id| !id.is_empty()),
    })
}

/// Ends the backend session. The caller clears the local token whatever the
/// outcome.
pub async fn logout<R>(repo: &R) -> ServiceResult<String>
where
    R: AuthGateway + ?Sized,
{
    repo.logout().await.map_err(|err| {
        log::error!("Failed to log out: {err}");
        ServiceError::from(err)
    })
}
