use crate::controller::confirm::{Decision, DeleteConfirmation, PendingDelete};
use crate::controller::list::{ListController, ListState, UserList};
use crate::domain::types::RecordId;
use crate::domain::user::{User, UserRole};
use crate::dto::ListParams;
use crate::dto::users::{UserFormData, UsersPageData};
use crate::forms::user::{USER_DUPLICATE_FIELDS, USER_FIELD_HINTS, UserForm};
use crate::forms::{FieldErrors, FormMode};
use crate::pagination::Paginated;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, load_list, submit_error};

/// Resource name used in panel URLs and pending deletions.
pub const USERS: &str = "users";

fn parse_id(id: &str) -> ServiceResult<RecordId> {
    RecordId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Applies the request's search, role and page to the stored list state and
/// loads the matching page.
pub async fn load_users_page<R>(
    repo: &R,
    state: ListState<UserRole>,
    params: ListParams,
    local_filter: bool,
) -> ServiceResult<UsersPageData>
where
    R: UserReader + ?Sized,
{
    let mut list = ListController::<UserList>::from_state(state);

    let mut changed = false;
    if let Some(search) = params.search.as_deref() {
        changed |= list.set_search(search);
    }
    if let Some(raw) = params.filter.as_deref() {
        let role = UserRole::parse_filter(raw).unwrap_or_else(|err| {
            log::warn!("Ignoring user role filter: {err}");
            None
        });
        changed |= list.set_filter(role);
    }
    if !changed {
        if let Some(page) = params.page {
            list.go_to_page(page);
        }
    }

    let error = load_list(&mut list, |query| repo.list_users(query))
        .await
        .map_err(|err| {
            log::error!("Failed to list users: {err}");
            err
        })?;

    Ok(UsersPageData {
        items: Paginated::from_list(&list, local_filter),
        state: list.into_state(),
        error,
    })
}

/// Loads an account into the edit drawer.
pub async fn load_user_form<R>(repo: &R, id: &str) -> ServiceResult<UserFormData>
where
    R: UserReader + ?Sized,
{
    let record_id = parse_id(id)?;
    let user = repo.get_user(&record_id).await.map_err(|err| {
        log::error!("Failed to load user {id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(UserFormData::edit(UserForm::from_user(&user), user.id))
}

/// Validates and registers a new account.
pub async fn create_user<R>(repo: &R, form: &UserForm) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let new_user = form.to_new_user()?;

    repo.register_user(&new_user).await.map_err(|err| {
        log::error!("Failed to register user: {err}");
        submit_error(err, USER_FIELD_HINTS, USER_DUPLICATE_FIELDS)
    })
}

/// Validates and saves an edited account. The password is never sent.
pub async fn update_user<R>(repo: &R, id: &str, form: &UserForm) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let record_id = parse_id(id)?;
    let updates = form.to_update_user()?;

    repo.update_user(&record_id, &updates).await.map_err(|err| {
        log::error!("Failed to update user {id}: {err}");
        submit_error(err, USER_FIELD_HINTS, USER_DUPLICATE_FIELDS)
    })
}

/// First delete step for an account.
pub async fn request_user_delete<R>(
    repo: &R,
    confirmation: &mut DeleteConfirmation,
    id: &str,
) -> ServiceResult<PendingDelete>
where
    R: UserReader + ?Sized,
{
    let record_id = parse_id(id)?;
    let user = repo.get_user(&record_id).await.map_err(|err| {
        log::error!("Failed to load user {id} for deletion: {err}");
        ServiceError::from(err)
    })?;

    let label = match user.full_name() {
        name if name.is_empty() => user.email.clone(),
        name => name,
    };
    Ok(confirmation.request(USERS, user.id, label).clone())
}

/// Second delete step for an account. See [`super::leads::delete_lead`].
pub async fn delete_user<R>(
    repo: &R,
    confirmation: &mut DeleteConfirmation,
    id: &str,
    decision: Decision,
) -> ServiceResult<bool>
where
    R: UserWriter + ?Sized,
{
    let Some(pending) = confirmation.decide(decision, USERS, id) else {
        return match decision {
            Decision::Cancel => Ok(false),
            Decision::Confirm => Err(ServiceError::NotConfirmed),
        };
    };

    let record_id = parse_id(&pending.id)?;
    repo.delete_user(&record_id).await.map_err(|err| {
        log::error!("Failed to delete user {id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(true)
}

/// Keeps the stored list consistent after a confirmed delete.
pub fn after_user_deleted(state: ListState<UserRole>, id: &str) -> ListState<UserRole> {
    let mut list = ListController::<UserList>::from_state(state);
    list.apply_deleted(id);
    list.into_state()
}

/// On-change validation for the given drawer mode.
pub fn validate_user_form(form: &UserForm, mode: FormMode, field: Option<&str>) -> FieldErrors {
    let errors = form.field_errors(mode);
    match field {
        Some(field) => errors.only(field),
        None => errors,
    }
}
