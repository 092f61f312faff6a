//! DTO modules that bridge services with templates and APIs.

use serde::{Deserialize, Serialize};

use crate::controller::list::ListState;
use crate::forms::{FieldErrors, FormMode};
use crate::pagination::Paginated;

pub mod leads;
pub mod users;

/// Query parameters accepted by the list pages. Absent values keep the
/// stored list state.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    /// `status` on the leads page, `role` on the users page.
    #[serde(alias = "status", alias = "role")]
    pub filter: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render a resource list page.
#[derive(Debug)]
pub struct ListPageData<T, F> {
    pub items: Paginated<T>,
    pub state: ListState<F>,
    /// Message of a failed fetch; the page renders with an empty table.
    pub error: Option<String>,
}

/// Data required to render an add/edit drawer.
#[derive(Debug)]
pub struct FormPageData<T> {
    pub form: T,
    pub errors: FieldErrors,
    pub mode: FormMode,
    /// Record being edited; `None` in create mode.
    pub id: Option<String>,
}

impl<T> FormPageData<T> {
    pub fn create(form: T) -> Self {
        Self {
            form,
            errors: FieldErrors::new(),
            mode: FormMode::Create,
            id: None,
        }
    }

    pub fn edit(form: T, id: impl Into<String>) -> Self {
        Self {
            form,
            errors: FieldErrors::new(),
            mode: FormMode::Edit,
            id: Some(id.into()),
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }
}

/// `<option>` entry of a select box.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}
