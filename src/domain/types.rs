//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce the client-side invariants of the admin panel
//! (non-empty required fields, email shape, digit-count phone numbers, password
//! strength) so that once a value reaches a create/update payload it can be
//! sent to the backend as-is.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of digits accepted for a WhatsApp number.
pub const WHATSAPP_MIN_DIGITS: usize = 10;

/// Exact number of digits accepted for a user phone number.
pub const PHONE_DIGITS: usize = 10;

/// Minimum password length accepted on account creation.
pub const PASSWORD_MIN_LENGTH: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape pattern is valid")
});

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided email does not look like `local@domain.tld`.
    #[error("invalid email address")]
    InvalidEmail,
    /// WhatsApp number is not a digit string of sufficient length.
    #[error("WhatsApp number must be at least {WHATSAPP_MIN_DIGITS} digits")]
    InvalidWhatsApp,
    /// Phone number is not exactly ten digits.
    #[error("phone number must be exactly {PHONE_DIGITS} digits")]
    InvalidPhone,
    /// Password misses one of the required character classes or is too short.
    #[error("password is too weak")]
    WeakPassword,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Returns `true` when the value has the `local@domain.tld` shape.
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Returns `true` when the value is non-empty and made of ASCII digits only.
pub fn is_digit_string(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Returns `true` when the password has lowercase, uppercase, digit and symbol
/// characters and meets the minimum length.
pub fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_LENGTH
        && value.chars().any(|c| c.is_lowercase())
        && value.chars().any(|c| c.is_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| !c.is_alphanumeric())
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! constrained_string_newtype {
    ($name:ident, $doc:expr, $check:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed value, rejecting inputs that break the invariant.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?.into_inner();
                let check: fn(&str) -> Result<(), TypeConstraintError> = $check;
                check(&inner)?;
                Ok(Self(inner))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

fn any_value(_: &str) -> Result<(), TypeConstraintError> {
    Ok(())
}

constrained_string_newtype!(
    RecordId,
    "Opaque server-assigned record identifier.",
    any_value
);

constrained_string_newtype!(
    PersonName,
    "First or last name enforcing trimmed, non-empty values.",
    any_value
);

constrained_string_newtype!(
    Industry,
    "Industry label enforcing trimmed, non-empty values.",
    any_value
);

constrained_string_newtype!(
    WebUrl,
    "Website or social-profile URL enforcing trimmed, non-empty values.",
    any_value
);

constrained_string_newtype!(
    EmailAddress,
    "Email address with the `local@domain.tld` shape.",
    |value| {
        if is_email_shaped(value) {
            Ok(())
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }
);

constrained_string_newtype!(
    WhatsAppNumber,
    "Digit-only WhatsApp number with at least ten digits.",
    |value| {
        if is_digit_string(value) && value.len() >= WHATSAPP_MIN_DIGITS {
            Ok(())
        } else {
            Err(TypeConstraintError::InvalidWhatsApp)
        }
    }
);

constrained_string_newtype!(
    PhoneNumber,
    "Digit-only phone number with exactly ten digits.",
    |value| {
        if is_digit_string(value) && value.len() == PHONE_DIGITS {
            Ok(())
        } else {
            Err(TypeConstraintError::InvalidPhone)
        }
    }
);

/// Write-only account password.
///
/// `Debug` is redacted so the value never ends up in logs.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Accepts the password only when it satisfies the strength rules.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !is_strong_password(&value) {
            return Err(TypeConstraintError::WeakPassword);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
