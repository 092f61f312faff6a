use crate::domain::lead::{Lead, LeadPriority, LeadStatus};
use crate::dto::{FormPageData, ListPageData, SelectOption};
use crate::forms::lead::LeadForm;

pub type LeadsPageData = ListPageData<Lead, LeadStatus>;

pub type LeadFormData = FormPageData<LeadForm>;

/// Options of the status filter on the list page.
pub fn status_filter_options() -> Vec<SelectOption> {
    LeadStatus::ALL
        .into_iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

/// Options of the status select in the add/edit drawer. A `current` status
/// outside the form choices is kept so an unchanged save does not rewrite it.
pub fn status_form_options(current: LeadStatus) -> Vec<SelectOption> {
    let mut statuses = LeadStatus::FORM_CHOICES.to_vec();
    if !statuses.contains(&current) {
        statuses.push(current);
    }
    statuses
        .into_iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

pub fn priority_options() -> Vec<SelectOption> {
    LeadPriority::ALL
        .into_iter()
        .map(|priority| SelectOption {
            value: priority.as_str(),
            label: priority.label(),
        })
        .collect()
}
