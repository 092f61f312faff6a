use crate::controller::confirm::{Decision, DeleteConfirmation, PendingDelete};
use crate::controller::list::{LeadList, ListController, ListState};
use crate::domain::lead::{Lead, LeadStatus};
use crate::domain::types::RecordId;
use crate::dto::leads::{LeadFormData, LeadsPageData};
use crate::dto::ListParams;
use crate::forms::FieldErrors;
use crate::forms::lead::{LEAD_DUPLICATE_FIELDS, LEAD_FIELD_HINTS, LeadForm};
use crate::pagination::Paginated;
use crate::repository::{LeadReader, LeadWriter};
use crate::services::{ServiceError, ServiceResult, load_list, submit_error};

/// Resource name used in panel URLs and pending deletions.
pub const LEADS: &str = "leads";

fn parse_id(id: &str) -> ServiceResult<RecordId> {
    RecordId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Applies the request's search, status and page to the stored list state
/// and loads the matching page.
pub async fn load_leads_page<R>(
    repo: &R,
    state: ListState<LeadStatus>,
    params: ListParams,
    local_filter: bool,
) -> ServiceResult<LeadsPageData>
where
    R: LeadReader + ?Sized,
{
    let mut list = ListController::<LeadList>::from_state(state);

    let mut changed = false;
    if let Some(search) = params.search.as_deref() {
        changed |= list.set_search(search);
    }
    if let Some(raw) = params.filter.as_deref() {
        let status = LeadStatus::parse_filter(raw).unwrap_or_else(|err| {
            log::warn!("Ignoring lead status filter: {err}");
            None
        });
        changed |= list.set_filter(status);
    }
    if !changed {
        if let Some(page) = params.page {
            list.go_to_page(page);
        }
    }

    let error = load_list(&mut list, |query| repo.list_leads(query))
        .await
        .map_err(|err| {
            log::error!("Failed to list leads: {err}");
            err
        })?;

    Ok(LeadsPageData {
        items: Paginated::from_list(&list, local_filter),
        state: list.into_state(),
        error,
    })
}

/// Loads a lead into the edit drawer.
pub async fn load_lead_form<R>(repo: &R, id: &str) -> ServiceResult<LeadFormData>
where
    R: LeadReader + ?Sized,
{
    let record_id = parse_id(id)?;
    let lead = repo.get_lead(&record_id).await.map_err(|err| {
        log::error!("Failed to load lead {id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(LeadFormData::edit(LeadForm::from_lead(&lead), lead.id))
}

/// Parses an owning user id. A malformed one is logged and left out of the
/// payload.
fn owner_id(owner: Option<&str>) -> Option<RecordId> {
    let owner = owner?;
    match RecordId::new(owner) {
        Ok(id) => Some(id),
        Err(err) => {
            log::warn!("Ignoring lead owner `{owner}`: {err}");
            None
        }
    }
}

/// Validates and creates a lead owned by `owner`. No request is sent while
/// any field is invalid.
pub async fn create_lead<R>(repo: &R, form: &LeadForm, owner: Option<&str>) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    let payload = form.to_payload(owner_id(owner))?;

    repo.create_lead(&payload).await.map_err(|err| {
        log::error!("Failed to create lead: {err}");
        submit_error(err, LEAD_FIELD_HINTS, LEAD_DUPLICATE_FIELDS)
    })
}

/// Validates and saves an edited lead. The lead keeps the owner carried by
/// the form; an unowned lead is assigned to `fallback_owner`.
pub async fn update_lead<R>(
    repo: &R,
    id: &str,
    form: &LeadForm,
    fallback_owner: Option<&str>,
) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    let record_id = parse_id(id)?;
    let carried = Some(form.user_id.as_str()).filter(|owner| !owner.trim().is_empty());
    let owner = owner_id(carried).or_else(|| owner_id(fallback_owner));
    let payload = form.to_payload(owner)?;

    repo.update_lead(&record_id, &payload).await.map_err(|err| {
        log::error!("Failed to update lead {id}: {err}");
        submit_error(err, LEAD_FIELD_HINTS, LEAD_DUPLICATE_FIELDS)
    })
}

/// First delete step: remembers the lead as pending and returns what the
/// confirmation dialog shows.
pub async fn request_lead_delete<R>(
    repo: &R,
    confirmation: &mut DeleteConfirmation,
    id: &str,
) -> ServiceResult<PendingDelete>
where
    R: LeadReader + ?Sized,
{
    let record_id = parse_id(id)?;
    let lead = repo.get_lead(&record_id).await.map_err(|err| {
        log::error!("Failed to load lead {id} for deletion: {err}");
        ServiceError::from(err)
    })?;

    let label = if lead.first_name.is_empty() {
        lead.email.clone()
    } else {
        lead.first_name.clone()
    };
    Ok(confirmation.request(LEADS, lead.id, label).clone())
}

/// Second delete step. Returns `Ok(false)` when the user cancelled and
/// `NotConfirmed` when no matching confirmation is pending; the backend is
/// called only for a confirmed candidate.
pub async fn delete_lead<R>(
    repo: &R,
    confirmation: &mut DeleteConfirmation,
    id: &str,
    decision: Decision,
) -> ServiceResult<bool>
where
    R: LeadWriter + ?Sized,
{
    let Some(pending) = confirmation.decide(decision, LEADS, id) else {
        return match decision {
            Decision::Cancel => Ok(false),
            Decision::Confirm => Err(ServiceError::NotConfirmed),
        };
    };

    let record_id = parse_id(&pending.id)?;
    repo.delete_lead(&record_id).await.map_err(|err| {
        log::error!("Failed to delete lead {id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(true)
}

/// Keeps the stored list consistent after a confirmed delete.
pub fn after_lead_deleted(state: ListState<LeadStatus>, id: &str) -> ListState<LeadStatus> {
    let mut list = ListController::<LeadList>::from_state(state);
    list.apply_deleted(id);
    list.into_state()
}

/// On-change validation. With `field` set only that field's error is kept.
pub fn validate_lead_form(form: &LeadForm, field: Option<&str>) -> FieldErrors {
    let errors = form.field_errors();
    match field {
        Some(field) => errors.only(field),
        None => errors,
    }
}
