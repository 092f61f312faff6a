use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::de::{is_unfiltered, lenient_datetime, string_or_number};
use crate::domain::types::{
    EmailAddress, Industry, PersonName, RecordId, TypeConstraintError, WebUrl, WhatsAppNumber,
};

/// Lead as returned by the backend.
///
/// Fields are kept as plain strings: the server owns the data and the client
/// only displays it or pre-fills the edit form from it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub work_email: String,
    #[serde(default, rename = "websiteURL")]
    pub website_url: String,
    #[serde(default, rename = "linkdinURL")]
    pub linkedin_url: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub whats_up_number: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub priority: LeadPriority,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadStatus {
    #[default]
    #[serde(alias = "active", alias = "Active")]
    Active,
    #[serde(alias = "inactive", alias = "Inactive")]
    Inactive,
    #[serde(alias = "new", alias = "New")]
    New,
    #[serde(alias = "contacted", alias = "Contacted")]
    Contacted,
    #[serde(alias = "qualified", alias = "Qualified")]
    Qualified,
    #[serde(alias = "converted", alias = "Converted")]
    Converted,
    #[serde(alias = "lost", alias = "Lost")]
    Lost,
}

impl LeadStatus {
    /// Every status the list filter offers.
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::Active,
        LeadStatus::Inactive,
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Converted,
        LeadStatus::Lost,
    ];

    /// Statuses selectable in the add/edit form.
    pub const FORM_CHOICES: [LeadStatus; 2] = [LeadStatus::Active, LeadStatus::Inactive];

    pub const fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Active => "ACTIVE",
            LeadStatus::Inactive => "INACTIVE",
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Converted => "CONVERTED",
            LeadStatus::Lost => "LOST",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::Active => "Active",
            LeadStatus::Inactive => "Inactive",
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Converted => "Converted",
            LeadStatus::Lost => "Lost",
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

impl Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown lead status `{s}`")))
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadPriority {
    #[default]
    #[serde(alias = "high", alias = "High")]
    High,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "low", alias = "Low")]
    Low,
}

impl LeadPriority {
    pub const ALL: [LeadPriority; 3] = [LeadPriority::High, LeadPriority::Medium, LeadPriority::Low];

    pub const fn as_str(self) -> &'static str {
        match self {
            LeadPriority::High => "HIGH",
            LeadPriority::Medium => "MEDIUM",
            LeadPriority::Low => "LOW",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LeadPriority::High => "High",
            LeadPriority::Medium => "Medium",
            LeadPriority::Low => "Low",
        }
    }
}

impl Display for LeadPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadPriority {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LeadPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                TypeConstraintError::InvalidValue(format!("unknown lead priority `{s}`"))
            })
    }
}

/// Body of lead create and full-update requests.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub first_name: PersonName,
    pub email: EmailAddress,
    pub work_email: EmailAddress,
    #[serde(rename = "websiteURL")]
    pub website_url: WebUrl,
    #[serde(rename = "linkdinURL")]
    pub linkedin_url: WebUrl,
    pub industry: Industry,
    pub whats_up_number: WhatsAppNumber,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,
}

impl TryFrom<&Lead> for LeadPayload {
    type Error = TypeConstraintError;

    /// Rebuilds the payload that would reproduce `lead` unchanged.
    fn try_from(lead: &Lead) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: PersonName::new(lead.first_name.as_str())?,
            email: EmailAddress::new(lead.email.as_str())?,
            work_email: EmailAddress::new(lead.work_email.as_str())?,
            website_url: WebUrl::new(lead.website_url.as_str())?,
            linkedin_url: WebUrl::new(lead.linkedin_url.as_str())?,
            industry: Industry::new(lead.industry.as_str())?,
            whats_up_number: WhatsAppNumber::new(lead.whats_up_number.as_str())?,
            status: lead.status,
            priority: lead.priority,
            user_id: lead
                .user_id
                .as_deref()
                .map(RecordId::new)
                .transpose()?,
        })
    }
}
