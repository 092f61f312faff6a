//! In-memory repository used by unit tests.
//!
//! Records every call so tests can assert that no request was issued.

use std::cell::RefCell;

use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::session::{Credentials, LoginResponse};
use crate::domain::types::RecordId;
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::{ApiError, ApiResult};
use crate::repository::{
    AuthGateway, LeadListQuery, LeadReader, LeadWriter, ListEnvelope, Page, UserListQuery,
    UserReader, UserWriter,
};

#[derive(Default)]
pub struct TestRepository {
    pub leads: RefCell<Vec<Lead>>,
    pub users: RefCell<Vec<User>>,
    pub calls: RefCell<Vec<String>>,
    /// When set, the next call fails with this error.
    pub fail_next: RefCell<Option<ApiError>>,
}

impl TestRepository {
    pub fn with_leads(count: usize) -> Self {
        let leads = (1..=count)
            .map(|n| Lead {
                id: format!("lead-{n}"),
                first_name: format!("Lead #{n}"),
                email: format!("lead{n}@example.com"),
                work_email: format!("lead{n}@corp.example.com"),
                website_url: format!("https://lead{n}.example.com"),
                linkedin_url: format!("https://linkedin.com/in/lead{n}"),
                industry: "Retail".to_string(),
                whats_up_number: format!("98765432{n:02}"),
                ..Lead::default()
            })
            .collect();
        Self {
            leads: RefCell::new(leads),
            ..Self::default()
        }
    }

    pub fn with_users(count: usize) -> Self {
        let users = (1..=count)
            .map(|n| User {
                id: format!("user-{n}"),
                first_name: format!("User #{n}"),
                last_name: "Admin".to_string(),
                email: format!("user{n}@example.com"),
                phone_number: format!("55500000{n:02}"),
                active: true,
                ..User::default()
            })
            .collect();
        Self {
            users: RefCell::new(users),
            ..Self::default()
        }
    }

    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) -> ApiResult<()> {
        self.calls.borrow_mut().push(call.into());
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Server {
            status: 404,
            message: "Not Found".to_string(),
        }
    }
}

fn lead_from_payload(id: String, payload: &LeadPayload) -> Lead {
    Lead {
        id,
        first_name: payload.first_name.to_string(),
        email: payload.email.to_string(),
        work_email: payload.work_email.to_string(),
        website_url: payload.website_url.to_string(),
        linkedin_url: payload.linkedin_url.to_string(),
        industry: payload.industry.to_string(),
        whats_up_number: payload.whats_up_number.to_string(),
        status: payload.status,
        priority: payload.priority,
        user_id: payload.user_id.as_ref().map(ToString::to_string),
        created_at: None,
    }
}

impl LeadReader for TestRepository {
    async fn list_leads(&self, query: LeadListQuery) -> ApiResult<Page<Lead>> {
        self.record("list_leads")?;
        let term = query.search.as_deref().unwrap_or("").to_lowercase();
        let matching: Vec<Lead> = self
            .leads
            .borrow()
            .iter()
            .filter(|lead| query.filter.is_none_or(|status| lead.status == status))
            .filter(|lead| term.is_empty() || lead.first_name.to_lowercase().contains(&term))
            .cloned()
            .collect();
        Ok(ListEnvelope::Bare(matching).into_page(query.page()))
    }

    async fn get_lead(&self, id: &RecordId) -> ApiResult<Lead> {
        self.record(format!("get_lead:{id}"))?;
        self.leads
            .borrow()
            .iter()
            .find(|lead| lead.id == id.as_str())
            .cloned()
            .ok_or_else(Self::not_found)
    }
}

impl LeadWriter for TestRepository {
    async fn create_lead(&self, payload: &LeadPayload) -> ApiResult<Lead> {
        self.record("create_lead")?;
        let id = format!("lead-{}", self.leads.borrow().len() + 1);
        let lead = lead_from_payload(id, payload);
        self.leads.borrow_mut().insert(0, lead.clone());
        Ok(lead)
    }

    async fn update_lead(&self, id: &RecordId, payload: &LeadPayload) -> ApiResult<Lead> {
        self.record(format!("update_lead:{id}"))?;
        let mut leads = self.leads.borrow_mut();
        let slot = leads
            .iter_mut()
            .find(|lead| lead.id == id.as_str())
            .ok_or_else(Self::not_found)?;
        *slot = lead_from_payload(id.to_string(), payload);
        Ok(slot.clone())
    }

    async fn delete_lead(&self, id: &RecordId) -> ApiResult<()> {
        self.record(format!("delete_lead:{id}"))?;
        self.leads.borrow_mut().retain(|lead| lead.id != id.as_str());
        Ok(())
    }
}

impl UserReader for TestRepository {
    async fn list_users(&self, query: UserListQuery) -> ApiResult<Page<User>> {
        self.record("list_users")?;
        let matching: Vec<User> = self
            .users
            .borrow()
            .iter()
            .filter(|user| query.filter.is_none_or(|role| user.role == role))
            .cloned()
            .collect();
        Ok(ListEnvelope::Bare(matching).into_page(query.page()))
    }

    async fn get_user(&self, id: &RecordId) -> ApiResult<User> {
        self.record(format!("get_user:{id}"))?;
        self.users
            .borrow()
            .iter()
            .find(|user| user.id == id.as_str())
            .cloned()
            .ok_or_else(Self::not_found)
    }
}

impl UserWriter for TestRepository {
    async fn register_user(&self, new_user: &NewUser) -> ApiResult<User> {
        self.record("register_user")?;
        let user = User {
            id: format!("user-{}", self.users.borrow().len() + 1),
            first_name: new_user.first_name.to_string(),
            last_name: new_user.last_name.to_string(),
            email: new_user.email.to_string(),
            phone_number: new_user.phone_number.to_string(),
            role: new_user.role,
            active: true,
            created_at: None,
        };
        self.users.borrow_mut().insert(0, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &RecordId, updates: &UpdateUser) -> ApiResult<User> {
        self.record(format!("update_user:{id}"))?;
        let mut users = self.users.borrow_mut();
        let slot = users
            .iter_mut()
            .find(|user| user.id == id.as_str())
            .ok_or_else(Self::not_found)?;
        slot.first_name = updates.first_name.to_string();
        slot.last_name = updates.last_name.to_string();
        slot.email = updates.email.to_string();
        slot.phone_number = updates.phone_number.to_string();
        slot.role = updates.role;
        slot.active = updates.active;
        Ok(slot.clone())
    }

    async fn delete_user(&self, id: &RecordId) -> ApiResult<()> {
        self.record(format!("delete_user:{id}"))?;
        self.users.borrow_mut().retain(|user| user.id != id.as_str());
        Ok(())
    }
}

impl AuthGateway for TestRepository {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.record(format!("login:{}", credentials.email))?;
        Ok(LoginResponse {
            token: "test-token".to_string(),
            user: self.users.borrow().first().cloned(),
        })
    }

    async fn logout(&self) -> ApiResult<String> {
        self.record("logout")?;
        Ok("Logged out".to_string())
    }
}
