use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::controller::confirm::Decision;
use crate::controller::list::LeadList;
use crate::dto::ListParams;
use crate::dto::leads::{
    LeadFormData, priority_options, status_filter_options, status_form_options,
};
use crate::forms::lead::LeadForm;
use crate::models::auth::SessionUser;
use crate::models::config::ServerConfig;
use crate::repository::http::HttpClient;
use crate::routes::{
    NETWORK_ERROR, base_context, form_errors, load_confirmation, load_list_state, redirect,
    render_template, repository, session_expired, store_confirmation, store_list_state,
};
use crate::services::{ServiceError, leads as leads_service};

#[derive(Deserialize)]
pub struct DecisionForm {
    pub decision: Decision,
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    data: &LeadFormData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "leads", true);
    context.insert("form", &data.form);
    context.insert("errors", &data.errors);
    context.insert("mode", &data.mode);
    context.insert("id", &data.id);
    context.insert("status_options", &status_form_options(data.form.status));
    context.insert("priority_options", &priority_options());
    render_template(tera, "leads/form.html", &context)
}

#[get("/leads")]
pub async fn leads(
    params: web::Query<ListParams>,
    user: SessionUser,
    session: Session,
    http: web::Data<HttpClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let state = load_list_state::<LeadList>(&session, server_config.page_size);

    match leads_service::load_leads_page(
        &repo,
        state,
        params.into_inner(),
        server_config.local_filter,
    )
    .await
    {
        Ok(data) => {
            store_list_state::<LeadList>(&session, &data.state);

            let mut context = base_context(&flash_messages, "leads", true);
            context.insert("leads", &data.items);
            context.insert("state", &data.state);
            context.insert("error", &data.error);
            context.insert("status_options", &status_filter_options());

            render_template(&tera, "leads/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(user),
        Err(err) => {
            log::error!("Failed to render leads: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/leads/new")]
pub async fn new_lead(
    _user: SessionUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(&tera, &flash_messages, &LeadFormData::create(LeadForm::default()))
}

#[post("/leads/new")]
pub async fn create_lead(
    user: SessionUser,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LeadForm>,
) -> impl Responder {
    let repo = repository(&http, &user);

    match leads_service::create_lead(&repo, &form, user.user_id.as_deref()).await {
        Ok(lead) => {
            FlashMessage::success(format!("Lead {} created.", lead.first_name)).send();
            redirect("/leads")
        }
        Err(err) => match form_errors(err) {
            Ok(errors) => render_form(
                &tera,
                &flash_messages,
                &LeadFormData::create(form).with_errors(errors),
            ),
            Err(ServiceError::Unauthorized) => session_expired(user),
            Err(err) => {
                log::error!("Failed to create lead: {err}");
                FlashMessage::error("Failed to create the lead.").send();
                redirect("/leads")
            }
        },
    }
}

#[get("/leads/{id}/edit")]
pub async fn edit_lead(
    id: web::Path<String>,
    user: SessionUser,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repository(&http, &user);

    match leads_service::load_lead_form(&repo, &id).await {
        Ok(data) => render_form(&tera, &flash_messages, &data),
        Err(ServiceError::Unauthorized) => session_expired(user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Lead not found.").send();
            redirect("/leads")
        }
        Err(ServiceError::Network(_)) => {
            FlashMessage::error(NETWORK_ERROR).send();
            redirect("/leads")
        }
        Err(err) => {
            log::error!("Failed to open lead {id}: {err}");
            FlashMessage::error("Failed to load the lead.").send();
            redirect("/leads")
        }
    }
}

#[post("/leads/{id}/edit")]
pub async fn update_lead(
    id: web::Path<String>,
    user: SessionUser,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LeadForm>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let id = id.into_inner();

    match leads_service::update_lead(&repo, &id, &form, user.user_id.as_deref()).await {
        Ok(lead) => {
            FlashMessage::success(format!("Lead {} updated.", lead.first_name)).send();
            redirect("/leads")
        }
        Err(err) => match form_errors(err) {
            Ok(errors) => render_form(
                &tera,
                &flash_messages,
                &LeadFormData::edit(form, id).with_errors(errors),
            ),
            Err(ServiceError::Unauthorized) => session_expired(user),
            Err(ServiceError::NotFound) => {
                FlashMessage::error("Lead not found.").send();
                redirect("/leads")
            }
            Err(err) => {
                log::error!("Failed to update lead {id}: {err}");
                FlashMessage::error("Failed to update the lead.").send();
                redirect("/leads")
            }
        },
    }
}

#[get("/leads/{id}/delete")]
pub async fn confirm_delete_lead(
    id: web::Path<String>,
    user: SessionUser,
    session: Session,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let mut confirmation = load_confirmation(&session);

    match leads_service::request_lead_delete(&repo, &mut confirmation, &id).await {
        Ok(pending) => {
            store_confirmation(&session, confirmation);

            let mut context = base_context(&flash_messages, "leads", true);
            context.insert("pending", &pending);
            context.insert("action", &format!("/leads/{}/delete", pending.id));
            context.insert("cancel_url", "/leads");
            render_template(&tera, "confirm_delete.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Lead not found.").send();
            redirect("/leads")
        }
        Err(err) => {
            log::error!("Failed to prepare deletion of lead {id}: {err}");
            FlashMessage::error("Failed to load the lead.").send();
            redirect("/leads")
        }
    }
}

#[post("/leads/{id}/delete")]
pub async fn delete_lead(
    id: web::Path<String>,
    user: SessionUser,
    session: Session,
    http: web::Data<HttpClient>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<DecisionForm>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let mut confirmation = load_confirmation(&session);

    let result = leads_service::delete_lead(&repo, &mut confirmation, &id, form.decision).await;
    store_confirmation(&session, confirmation);

    match result {
        Ok(true) => {
            let state = load_list_state::<LeadList>(&session, server_config.page_size);
            store_list_state::<LeadList>(&session, &leads_service::after_lead_deleted(state, &id));
            FlashMessage::success("Lead deleted.").send();
        }
        Ok(false) => {}
        Err(ServiceError::Unauthorized) => return session_expired(user),
        Err(ServiceError::NotConfirmed) => {
            FlashMessage::warning("Deletion was not confirmed.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Lead not found.").send();
        }
        Err(ServiceError::Network(_)) => {
            FlashMessage::error(NETWORK_ERROR).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to delete lead {id}: {err}");
            FlashMessage::error("Failed to delete the lead.").send();
        }
    }

    redirect("/leads")
}
