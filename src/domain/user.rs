use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::de::{is_unfiltered, lenient_datetime, string_or_number};
use crate::domain::types::{EmailAddress, Password, PersonName, PhoneNumber, TypeConstraintError};

fn default_active() -> bool {
    true
}

/// Admin account as returned by the backend. The password is never part of it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_active", rename = "isActive", alias = "active")]
    pub active: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Account role. `Manager` and `User` are accepted from older backends but
/// are not offered in forms.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    #[default]
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin,
    #[serde(
        alias = "Superadmin",
        alias = "superadmin",
        alias = "SUPERADMIN",
        alias = "super_admin"
    )]
    SuperAdmin,
    #[serde(alias = "manager")]
    Manager,
    #[serde(alias = "user")]
    User,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::SuperAdmin,
        UserRole::Manager,
        UserRole::User,
    ];

    /// Roles selectable in the add/edit form and the list filter.
    pub const FORM_CHOICES: [UserRole; 2] = [UserRole::Admin, UserRole::SuperAdmin];

    pub const fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::SuperAdmin => "SuperAdmin",
            UserRole::Manager => "Manager",
            UserRole::User => "User",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::SuperAdmin => "Super Admin",
            UserRole::Manager => "Manager",
            UserRole::User => "User",
        }
    }

    /// Parses a list filter value; `"all"` and blank mean no filter.
    pub fn parse_filter(value: &str) -> Result<Option<Self>, TypeConstraintError> {
        if is_unfiltered(value) {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['_', ' '], "");
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown role `{s}`")))
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub password: Password,
    pub role: UserRole,
}

/// Body of `PUT /auth/:id`. The password is write-once and never resent.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub role: UserRole,
    #[serde(rename = "isActive")]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_role_drift_values() {
        for (raw, expected) in [
            ("Admin", UserRole::Admin),
            ("admin", UserRole::Admin),
            ("Superadmin", UserRole::SuperAdmin),
            ("SuperAdmin", UserRole::SuperAdmin),
            ("manager", UserRole::Manager),
            ("user", UserRole::User),
        ] {
            let user: User = serde_json::from_value(json!({ "_id": "u", "role": raw })).unwrap();
            assert_eq!(user.role, expected, "role {raw}");
        }
    }

    #[test]
    fn active_defaults_to_true() {
        let user: User = serde_json::from_value(json!({ "id": "u" })).unwrap();
        assert!(user.active);
        let user: User =
            serde_json::from_value(json!({ "id": "u", "isActive": false })).unwrap();
        assert!(!user.active);
    }

    #[test]
    fn role_filter_parsing_is_case_insensitive() {
        assert_eq!(UserRole::parse_filter("ALL"), Ok(None));
        assert_eq!(
            UserRole::parse_filter("super admin"),
            Ok(Some(UserRole::SuperAdmin))
        );
        assert_eq!(UserRole::parse_filter("admin"), Ok(Some(UserRole::Admin)));
        assert!(UserRole::parse_filter("owner").is_err());
    }

    #[test]
    fn update_payload_never_carries_password() {
        let payload = UpdateUser {
            first_name: PersonName::new("Ravi").unwrap(),
            last_name: PersonName::new("Kumar").unwrap(),
            email: EmailAddress::new("ravi@example.com").unwrap(),
            phone_number: PhoneNumber::new("9876543210").unwrap(),
            role: UserRole::SuperAdmin,
            active: true,
        };

        let value = serde_json::to_value(&payload).unwrap();

        assert!(value.get("password").is_none());
        assert_eq!(value["role"], "SuperAdmin");
        assert_eq!(value["phoneNumber"], "9876543210");
    }

    #[test]
    fn full_name_skips_missing_last_name() {
        let user = User {
            first_name: "Ravi".into(),
            ..User::default()
        };
        assert_eq!(user.full_name(), "Ravi");
    }
}
