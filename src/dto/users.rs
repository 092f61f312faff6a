use crate::domain::user::{User, UserRole};
use crate::dto::{FormPageData, ListPageData, SelectOption};
use crate::forms::user::UserForm;

pub type UsersPageData = ListPageData<User, UserRole>;

pub type UserFormData = FormPageData<UserForm>;

fn select_options(roles: impl IntoIterator<Item = UserRole>) -> Vec<SelectOption> {
    roles
        .into_iter()
        .map(|role| SelectOption {
            value: role.as_str(),
            label: role.label(),
        })
        .collect()
}

/// Roles offered by the list filter.
pub fn role_options() -> Vec<SelectOption> {
    select_options(UserRole::FORM_CHOICES)
}

/// Roles offered by the add/edit drawer, plus `current` when it is a legacy
/// role so that saving without touching the select keeps it.
pub fn role_form_options(current: UserRole) -> Vec<SelectOption> {
    let mut roles = UserRole::FORM_CHOICES.to_vec();
    if !roles.contains(&current) {
        roles.push(current);
    }
    select_options(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_options_keep_a_legacy_role() {
        let values: Vec<_> = role_form_options(UserRole::Manager)
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec!["Admin", "SuperAdmin", "Manager"]);

        assert_eq!(role_form_options(UserRole::SuperAdmin), role_options());
    }
}
