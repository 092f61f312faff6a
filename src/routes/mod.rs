//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::controller::confirm::{DeleteConfirmation, PENDING_DELETE_KEY};
use crate::controller::list::{ListResource, ListState};
use crate::forms::FieldErrors;
use crate::middleware::LOGIN_PATH;
use crate::models::auth::SessionUser;
use crate::repository::RestRepository;
use crate::repository::http::HttpClient;
use crate::services::ServiceError;

pub mod api;
pub mod auth;
pub mod leads;
pub mod main;
pub mod users;

pub const NETWORK_ERROR: &str = "Network error. Check your connection and try again.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Maps a flash message level to the Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

/// Context every page starts from: pending alerts and the active nav entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    signed_in: bool,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("signed_in", &signed_in);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Repository bound to the caller's session token.
pub fn repository(http: &HttpClient, user: &SessionUser) -> RestRepository {
    RestRepository::new(http.with_session(Some(user.token.clone())))
}

/// The backend rejected the token: clear it and send the user to log in.
pub fn session_expired(user: SessionUser) -> HttpResponse {
    user.sign_out();
    FlashMessage::warning(SESSION_EXPIRED).send();
    redirect(LOGIN_PATH)
}

/// Stored list state of `R`, or a fresh one with the configured page size.
pub fn load_list_state<R: ListResource>(session: &Session, page_size: usize) -> ListState<R::Filter> {
    match session.get::<ListState<R::Filter>>(R::STATE_KEY) {
        Ok(Some(state)) => state,
        Ok(None) => ListState {
            page_size,
            ..ListState::default()
        },
        Err(err) => {
            log::warn!("Discarding unreadable list state '{}': {err}", R::STATE_KEY);
            ListState {
                page_size,
                ..ListState::default()
            }
        }
    }
}

pub fn store_list_state<R: ListResource>(session: &Session, state: &ListState<R::Filter>) {
    if let Err(err) = session.insert(R::STATE_KEY, state) {
        log::error!("Failed to store list state '{}': {err}", R::STATE_KEY);
    }
}

pub fn load_confirmation(session: &Session) -> DeleteConfirmation {
    let pending = session.get(PENDING_DELETE_KEY).unwrap_or_else(|err| {
        log::warn!("Discarding unreadable pending delete: {err}");
        None
    });
    DeleteConfirmation::from_pending(pending)
}

pub fn store_confirmation(session: &Session, confirmation: DeleteConfirmation) {
    match confirmation.into_pending() {
        Some(pending) => {
            if let Err(err) = session.insert(PENDING_DELETE_KEY, pending) {
                log::error!("Failed to store pending delete: {err}");
            }
        }
        None => {
            session.remove(PENDING_DELETE_KEY);
        }
    }
}

/// Errors shown on a re-rendered form. Anything else is returned for the
/// caller to handle.
pub fn form_errors(err: ServiceError) -> Result<FieldErrors, ServiceError> {
    match err {
        ServiceError::Validation(errors) | ServiceError::Conflict(errors) => Ok(errors),
        ServiceError::Form(message) => Ok(FieldErrors::form(message)),
        ServiceError::Network(_) => Ok(FieldErrors::form(NETWORK_ERROR)),
        err => Err(err),
    }
}
