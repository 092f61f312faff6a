use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::types::{
    EmailAddress, PHONE_DIGITS, Password, PersonName, PhoneNumber, is_digit_string,
    is_email_shaped, is_strong_password,
};
use crate::domain::user::{NewUser, UpdateUser, User, UserRole};
use crate::forms::{FieldErrors, FieldHints, FormError, FormMode, field_error, require};

/// Keywords in backend error messages and the user field they point at.
pub const USER_FIELD_HINTS: FieldHints = &[
    ("phone", "phone_number"),
    ("password", "password"),
    ("first", "first_name"),
    ("last", "last_name"),
    ("role", "role"),
    ("email", "email"),
];

/// Fields marked when a 409 does not say which one is duplicated.
pub const USER_DUPLICATE_FIELDS: &[&str] = &["email", "phone_number"];

const PASSWORD_RULE: &str = "Password must be at least 6 characters and include an uppercase letter, a lowercase letter, a number and a special character";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
/// Add/edit admin account form.
pub struct UserForm {
    #[serde(default)]
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    /// Only read in create mode.
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    /// Checkbox value; absent when unchecked.
    #[serde(default)]
    pub active: Option<String>,
}

fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    require(value, "First Name is required")
}

fn validate_last_name(value: &str) -> Result<(), ValidationError> {
    require(value, "Last Name is required")
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    require(value, "Email is required")?;
    if !is_email_shaped(value.trim()) {
        return Err(field_error("email", "Email is invalid"));
    }
    Ok(())
}

fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    require(value, "Phone number is required")?;
    let value = value.trim();
    if !is_digit_string(value) || value.len() != PHONE_DIGITS {
        return Err(field_error("phone", "Phone number must be exactly 10 digits"));
    }
    Ok(())
}

impl UserForm {
    /// Pre-fills the edit form. The password is never pre-filled.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            password: String::new(),
            role: user.role,
            active: user.active.then(|| "on".to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
            .as_deref()
            .is_some_and(|v| matches!(v, "on" | "true" | "1"))
    }

    /// Runs every field rule for the given mode. The password is checked
    /// on creation only.
    pub fn field_errors(&self, mode: FormMode) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(err) => FieldErrors::from_validation(&err),
        };

        if mode == FormMode::Create {
            if self.password.is_empty() {
                errors.insert("password", "Password is required");
            } else if !is_strong_password(&self.password) {
                errors.insert("password", PASSWORD_RULE);
            }
        }

        errors
    }

    fn ensure_valid(&self, mode: FormMode) -> Result<(), FormError> {
        let errors = self.field_errors(mode);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Fields(errors))
        }
    }

    pub fn to_new_user(&self) -> Result<NewUser, FormError> {
        self.ensure_valid(FormMode::Create)?;
        Ok(NewUser {
            first_name: PersonName::new(self.first_name.as_str())?,
            last_name: PersonName::new(self.last_name.as_str())?,
            email: EmailAddress::new(self.email.as_str())?,
            phone_number: PhoneNumber::new(self.phone_number.as_str())?,
            password: Password::new(self.password.as_str())?,
            role: self.role,
        })
    }

    pub fn to_update_user(&self) -> Result<UpdateUser, FormError> {
        self.ensure_valid(FormMode::Edit)?;
        Ok(UpdateUser {
            first_name: PersonName::new(self.first_name.as_str())?,
            last_name: PersonName::new(self.last_name.as_str())?,
            email: EmailAddress::new(self.email.as_str())?,
            phone_number: PhoneNumber::new(self.phone_number.as_str())?,
            role: self.role,
            active: self.is_active(),
        })
    }
}
