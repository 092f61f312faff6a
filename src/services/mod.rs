//! Use cases behind the routes. Services talk to the repository traits only,
//! so they run against the REST backend in production and against fakes or
//! mocks in tests.

use std::future::Future;

use thiserror::Error;

use crate::controller::list::{FetchOutcome, ListController, ListResource};
use crate::forms::{FieldErrors, FieldHints, FormError, conflict_errors, field_from_message};
use crate::repository::errors::{ApiError, ApiResult};
use crate::repository::{ListQuery, Page};

pub mod auth;
pub mod leads;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("session is missing or expired")]
    Unauthorized,

    #[error("record not found")]
    NotFound,

    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("duplicate record: {0:?}")]
    Conflict(FieldErrors),

    #[error("{0}")]
    Form(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("deletion was not confirmed")]
    NotConfirmed,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        match err {
            err if err.is_unauthorized() => ServiceError::Unauthorized,
            err if err.is_not_found() => ServiceError::NotFound,
            ApiError::Server { message, .. } => ServiceError::Form(message),
            ApiError::Network(message) => ServiceError::Network(message),
            ApiError::Decode(message) | ApiError::InvalidRequest(message) => {
                ServiceError::Internal(message)
            }
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Fields(errors) => ServiceError::Validation(errors),
            FormError::Validation(errors) => {
                ServiceError::Validation(FieldErrors::from_validation(&errors))
            }
            FormError::Constraint(err) => ServiceError::Validation(FieldErrors::form(err.to_string())),
        }
    }
}

/// Maps a failed create/update request onto the submitted form.
///
/// A 409 marks the duplicated field(s); any other server message naming a
/// known field becomes that field's error.
pub(crate) fn submit_error(
    err: ApiError,
    hints: FieldHints,
    duplicate_fields: &[&'static str],
) -> ServiceError {
    if err.is_conflict() {
        let message = err.server_message().unwrap_or_default();
        return ServiceError::Conflict(conflict_errors(message, hints, duplicate_fields));
    }

    if !err.is_unauthorized() && !err.is_not_found() {
        if let Some(message) = err.server_message() {
            if let Some(field) = field_from_message(message, hints) {
                let mut errors = FieldErrors::new();
                errors.insert(field, message);
                return ServiceError::Validation(errors);
            }
        }
    }

    ServiceError::from(err)
}

/// Loads the current page of `list`. When the requested page came back
/// empty although earlier pages exist, steps back once and reloads.
///
/// Returns the error message of a failed fetch so the page can still render.
pub(crate) async fn load_list<R, F, Fut>(
    list: &mut ListController<R>,
    fetch: F,
) -> ServiceResult<Option<String>>
where
    R: ListResource,
    F: Fn(ListQuery<R::Filter>) -> Fut,
    Fut: Future<Output = ApiResult<Page<R::Record>>>,
{
    let mut outcome = list.load(&fetch).await;

    if outcome == FetchOutcome::Applied && list.items().is_empty() && list.page() > 1 {
        let target = list.total_pages().clamp(1, list.page() - 1);
        list.go_to_page(target);
        outcome = list.load(&fetch).await;
    }

    match outcome {
        FetchOutcome::Applied | FetchOutcome::Stale => Ok(None),
        FetchOutcome::Unauthorized => Err(ServiceError::Unauthorized),
        FetchOutcome::Failed(message) => {
            log::error!("Failed to load list: {message}");
            Ok(Some(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HINTS: FieldHints = &[("phone", "phone_number"), ("email", "email")];

    fn server(status: u16, message: &str) -> ApiError {
        ApiError::Server {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn conflict_marks_duplicate_fields() {
        match submit_error(server(409, "Duplicate record"), HINTS, &["email", "phone_number"]) {
            ServiceError::Conflict(errors) => {
                assert!(errors.contains("email"));
                assert!(errors.contains("phone_number"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_request_naming_a_field_sets_field_error() {
        match submit_error(server(400, "email is malformed"), HINTS, &[]) {
            ServiceError::Validation(errors) => {
                assert_eq!(errors.get("email"), Some("email is malformed"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_errors_fall_back_to_form_message() {
        assert!(matches!(
            submit_error(server(500, "Something broke"), HINTS, &[]),
            ServiceError::Form(message) if message == "Something broke"
        ));
        assert!(matches!(
            submit_error(server(401, "email token expired"), HINTS, &[]),
            ServiceError::Unauthorized
        ));
        assert!(matches!(
            submit_error(ApiError::Network("refused".into()), HINTS, &[]),
            ServiceError::Network(_)
        ));
    }
}
