//! The signed-in session as seen by route handlers.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, error};

use crate::domain::session::SessionToken;

/// Session key holding the id of the signed-in account.
pub const USER_ID_KEY: &str = "user_id";

/// Extracted from requests carrying a session token. Requests without one are
/// rejected with `401`, which the redirect middleware turns into a trip to the
/// login page.
pub struct SessionUser {
    pub identity: Identity,
    pub token: SessionToken,
    /// Owner assigned to leads created in this session.
    pub user_id: Option<String>,
}

impl SessionUser {
    /// Forgets the token and everything stored in the session.
    pub fn sign_out(self) {
        self.identity.logout();
    }
}

impl FromRequest for SessionUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(session_user(req))
    }
}

fn session_user(req: &HttpRequest) -> Result<SessionUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|_| error::ErrorUnauthorized("not signed in"))?;

    let token = identity
        .id()
        .ok()
        .and_then(|id| SessionToken::new(id).ok())
        .ok_or_else(|| error::ErrorUnauthorized("invalid session"))?;

    let user_id = req
        .get_session()
        .get::<String>(USER_ID_KEY)
        .unwrap_or_else(|err| {
            log::warn!("Failed to read the session user id: {err}");
            None
        });

    Ok(SessionUser {
        identity,
        token,
        user_id,
    })
}
