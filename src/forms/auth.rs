use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::session::Credentials;
use crate::domain::types::is_email_shaped;
use crate::forms::{FieldErrors, FormError, field_error, require};

#[derive(Deserialize, Validate)]
/// Sign-in form.
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    require(value, "Email is required")?;
    if !is_email_shaped(value.trim()) {
        return Err(field_error("email", "Email is invalid"));
    }
    Ok(())
}

fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(field_error("required", "Password is required"));
    }
    Ok(())
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        if let Err(err) = form.validate() {
            return Err(FormError::Fields(FieldErrors::from_validation(&err)));
        }
        Ok(Credentials {
            email: form.email.trim().to_string(),
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            email: String::new(),
            password: String::new(),
        };
        match Credentials::try_from(form) {
            Err(FormError::Fields(errors)) => {
                assert_eq!(errors.get("email"), Some("Email is required"));
                assert_eq!(errors.get("password"), Some("Password is required"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn login_trims_email() {
        let form = LoginForm {
            email: " admin@example.com ".into(),
            password: "pw".into(),
        };
        let credentials = Credentials::try_from(form).unwrap();
        assert_eq!(credentials.email, "admin@example.com");
    }
}
