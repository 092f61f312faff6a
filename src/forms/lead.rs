use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::lead::{Lead, LeadPayload, LeadPriority, LeadStatus};
use crate::domain::types::{
    EmailAddress, Industry, PersonName, RecordId, WHATSAPP_MIN_DIGITS, WebUrl, WhatsAppNumber,
    is_digit_string, is_email_shaped,
};
use crate::forms::{FieldErrors, FieldHints, FormError, field_error, require};

/// Keywords in backend error messages and the lead field they point at.
pub const LEAD_FIELD_HINTS: FieldHints = &[
    ("whats", "whats_up_number"),
    ("work email", "work_email"),
    ("workemail", "work_email"),
    ("work_email", "work_email"),
    ("linkedin", "linkedin_url"),
    ("linkdin", "linkedin_url"),
    ("website", "website_url"),
    ("industry", "industry"),
    ("name", "first_name"),
    ("email", "email"),
];

/// Fields marked when a 409 does not say which one is duplicated.
pub const LEAD_DUPLICATE_FIELDS: &[&str] = &["email", "whats_up_number"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
/// Add/edit lead form. Field names match the HTML inputs.
pub struct LeadForm {
    #[serde(default)]
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_work_email"))]
    pub work_email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_website_url"))]
    pub website_url: String,
    #[serde(default)]
    #[validate(custom(function = "validate_linkedin_url"))]
    pub linkedin_url: String,
    #[serde(default)]
    #[validate(custom(function = "validate_industry"))]
    pub industry: String,
    #[serde(default)]
    #[validate(custom(function = "validate_whats_up_number"))]
    pub whats_up_number: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub priority: LeadPriority,
    /// Owning user, carried through the edit form as a hidden input.
    #[serde(default)]
    pub user_id: String,
}

fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    require(value, "First Name is required")
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    require(value, "Email is required")?;
    if !is_email_shaped(value.trim()) {
        return Err(field_error("email", "Email is invalid"));
    }
    Ok(())
}

fn validate_work_email(value: &str) -> Result<(), ValidationError> {
    require(value, "Work Email is required")?;
    if !is_email_shaped(value.trim()) {
        return Err(field_error("email", "Work Email is invalid"));
    }
    Ok(())
}

fn validate_website_url(value: &str) -> Result<(), ValidationError> {
    require(value, "Website URL is required")
}

fn validate_linkedin_url(value: &str) -> Result<(), ValidationError> {
    require(value, "LinkedIn URL is required")
}

fn validate_industry(value: &str) -> Result<(), ValidationError> {
    require(value, "Industry is required")
}

fn validate_whats_up_number(value: &str) -> Result<(), ValidationError> {
    require(value, "WhatsApp number is required")?;
    let value = value.trim();
    if !is_digit_string(value) || value.len() < WHATSAPP_MIN_DIGITS {
        return Err(field_error(
            "whatsapp",
            "WhatsApp number must be at least 10 digits",
        ));
    }
    Ok(())
}

impl LeadForm {
    /// Pre-fills the edit form from a fetched record.
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            first_name: lead.first_name.clone(),
            email: lead.email.clone(),
            work_email: lead.work_email.clone(),
            website_url: lead.website_url.clone(),
            linkedin_url: lead.linkedin_url.clone(),
            industry: lead.industry.clone(),
            whats_up_number: lead.whats_up_number.clone(),
            status: lead.status,
            priority: lead.priority,
            user_id: lead.user_id.clone().unwrap_or_default(),
        }
    }

    /// Runs every field rule and collects the messages per field.
    pub fn field_errors(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(err) => FieldErrors::from_validation(&err),
        }
    }

    /// Validates the form and builds the request body. `owner` becomes the
    /// lead's `userId`.
    pub fn to_payload(&self, owner: Option<RecordId>) -> Result<LeadPayload, FormError> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(FormError::Fields(errors));
        }

        Ok(LeadPayload {
            first_name: PersonName::new(self.first_name.as_str())?,
            email: EmailAddress::new(self.email.as_str())?,
            work_email: EmailAddress::new(self.work_email.as_str())?,
            website_url: WebUrl::new(self.website_url.as_str())?,
            linkedin_url: WebUrl::new(self.linkedin_url.as_str())?,
            industry: Industry::new(self.industry.as_str())?,
            whats_up_number: WhatsAppNumber::new(self.whats_up_number.as_str())?,
            status: self.status,
            priority: self.priority,
            user_id: owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> LeadForm {
        LeadForm {
            first_name: "Asha".into(),
            email: "asha@example.com".into(),
            work_email: "asha@corp.example.com".into(),
            website_url: "https://corp.example.com".into(),
            linkedin_url: "https://linkedin.com/in/asha".into(),
            industry: "Retail".into(),
            whats_up_number: "9876543210".into(),
            status: LeadStatus::Active,
            priority: LeadPriority::High,
            user_id: String::new(),
        }
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(valid_form().field_errors().is_empty());
        assert!(valid_form().to_payload(None).is_ok());
    }

    #[test]
    fn short_whatsapp_number_is_rejected() {
        let form = LeadForm {
            whats_up_number: "12345".into(),
            ..valid_form()
        };

        let errors = form.field_errors();

        assert_eq!(
            errors.get("whats_up_number"),
            Some("WhatsApp number must be at least 10 digits")
        );
        assert!(matches!(form.to_payload(None), Err(FormError::Fields(_))));
    }

    #[test]
    fn empty_required_fields_are_marked() {
        let errors = LeadForm::default().field_errors();

        assert_eq!(errors.get("first_name"), Some("First Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("work_email"), Some("Work Email is required"));
        assert_eq!(errors.get("website_url"), Some("Website URL is required"));
        assert_eq!(errors.get("linkedin_url"), Some("LinkedIn URL is required"));
        assert_eq!(errors.get("industry"), Some("Industry is required"));
        assert_eq!(
            errors.get("whats_up_number"),
            Some("WhatsApp number is required")
        );
    }

    #[test]
    fn malformed_emails_are_invalid() {
        let form = LeadForm {
            email: "asha@example".into(),
            work_email: "asha.corp.example.com".into(),
            ..valid_form()
        };

        let errors = form.field_errors();

        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("work_email"), Some("Work Email is invalid"));
    }

    #[test]
    fn unchanged_edit_reproduces_the_record_payload() {
        let lead = Lead {
            id: "66a1".into(),
            first_name: "Asha".into(),
            email: "asha@example.com".into(),
            work_email: "asha@corp.example.com".into(),
            website_url: "https://corp.example.com".into(),
            linkedin_url: "https://linkedin.com/in/asha".into(),
            industry: "Retail".into(),
            whats_up_number: "9876543210".into(),
            status: LeadStatus::Inactive,
            priority: LeadPriority::Low,
            user_id: Some("u1".into()),
            created_at: None,
        };

        let from_form = LeadForm::from_lead(&lead)
            .to_payload(Some(RecordId::new("u1").unwrap()))
            .unwrap();

        assert_eq!(from_form, LeadPayload::try_from(&lead).unwrap());
    }

    #[test]
    fn backend_messages_map_to_fields() {
        use crate::forms::field_from_message;

        assert_eq!(
            field_from_message("Work email already used", LEAD_FIELD_HINTS),
            Some("work_email")
        );
        assert_eq!(
            field_from_message("Invalid whatsUpNumber", LEAD_FIELD_HINTS),
            Some("whats_up_number")
        );
        assert_eq!(
            field_from_message("email must be unique", LEAD_FIELD_HINTS),
            Some("email")
        );
    }

    #[test]
    fn generic_failures_do_not_land_on_work_email() {
        use crate::forms::field_from_message;

        assert_eq!(field_from_message("Network timeout", LEAD_FIELD_HINTS), None);
        assert_eq!(field_from_message("worker failed", LEAD_FIELD_HINTS), None);
        assert_eq!(
            field_from_message("workEmail must be an email", LEAD_FIELD_HINTS),
            Some("work_email")
        );
    }

    #[test]
    fn edit_form_carries_the_owner() {
        let lead = Lead {
            user_id: Some("u7".into()),
            ..Lead::default()
        };

        assert_eq!(LeadForm::from_lead(&lead).user_id, "u7");
        assert_eq!(LeadForm::from_lead(&Lead::default()).user_id, "");
    }
}
