use actix_web::{HttpResponse, Responder, post, web};
use serde::Deserialize;

use crate::forms::FormMode;
use crate::forms::lead::LeadForm;
use crate::forms::user::UserForm;
use crate::services::{leads as leads_service, users as users_service};

#[derive(Deserialize)]
struct ValidateQueryParams {
    /// Restrict the answer to one input.
    field: Option<String>,
    #[serde(default)]
    mode: FormMode,
}

/// On-change validation for the lead drawer. Answers with the field errors.
#[post("/validate/lead")]
pub async fn validate_lead(
    params: web::Query<ValidateQueryParams>,
    web::Form(form): web::Form<LeadForm>,
) -> impl Responder {
    let errors = leads_service::validate_lead_form(&form, params.field.as_deref());
    HttpResponse::Ok().json(errors)
}

#[post("/validate/user")]
pub async fn validate_user(
    params: web::Query<ValidateQueryParams>,
    web::Form(form): web::Form<UserForm>,
) -> impl Responder {
    let errors = users_service::validate_user_form(&form, params.mode, params.field.as_deref());
    HttpResponse::Ok().json(errors)
}
