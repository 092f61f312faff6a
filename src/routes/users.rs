use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::controller::list::UserList;
use crate::dto::ListParams;
use crate::dto::users::{UserFormData, role_form_options, role_options};
use crate::forms::user::UserForm;
use crate::models::auth::SessionUser;
use crate::models::config::ServerConfig;
use crate::repository::http::HttpClient;
use crate::routes::leads::DecisionForm;
use crate::routes::{
    NETWORK_ERROR, base_context, form_errors, load_confirmation, load_list_state, redirect,
    render_template, repository, session_expired, store_confirmation, store_list_state,
};
use crate::services::{ServiceError, users as users_service};

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    data: &UserFormData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "users", true);
    context.insert("form", &data.form);
    context.insert("active", &data.form.is_active());
    context.insert("errors", &data.errors);
    context.insert("mode", &data.mode);
    context.insert("id", &data.id);
    context.insert("role_options", &role_form_options(data.form.role));
    render_template(tera, "users/form.html", &context)
}

#[get("/users")]
pub async fn users(
    params: web::Query<ListParams>,
    user: SessionUser,
    session: Session,
    http: web::Data<HttpClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let state = load_list_state::<UserList>(&session, server_config.page_size);

    match users_service::load_users_page(
        &repo,
        state,
        params.into_inner(),
        server_config.local_filter,
    )
    .await
    {
        Ok(data) => {
            store_list_state::<UserList>(&session, &data.state);

            let mut context = base_context(&flash_messages, "users", true);
            context.insert("users", &data.items);
            context.insert("state", &data.state);
            context.insert("error", &data.error);
            context.insert("role_options", &role_options());

            render_template(&tera, "users/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(user),
        Err(err) => {
            log::error!("Failed to render users: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/users/new")]
pub async fn new_user(
    _user: SessionUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form = UserForm {
        active: Some("on".to_string()),
        ..UserForm::default()
    };
    render_form(&tera, &flash_messages, &UserFormData::create(form))
}

#[post("/users/new")]
pub async fn create_user(
    user: SessionUser,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<UserForm>,
) -> impl Responder {
    let repo = repository(&http, &user);

    match users_service::create_user(&repo, &form).await {
        Ok(created) => {
            FlashMessage::success(format!("User {} registered.", created.email)).send();
            redirect("/users")
        }
        Err(err) => match form_errors(err) {
            Ok(errors) => {
                let form = UserForm {
                    password: String::new(),
                    ..form
                };
                render_form(
                    &tera,
                    &flash_messages,
                    &UserFormData::create(form).with_errors(errors),
                )
            }
            Err(ServiceError::Unauthorized) => session_expired(user),
            Err(err) => {
                log::error!("Failed to register user: {err}");
                FlashMessage::error("Failed to register the user.").send();
                redirect("/users")
            }
        },
    }
}

#[get("/users/{id}/edit")]
pub async fn edit_user(
    id: web::Path<String>,
    user: SessionUser,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repository(&http, &user);

    match users_service::load_user_form(&repo, &id).await {
        Ok(data) => render_form(&tera, &flash_messages, &data),
        Err(ServiceError::Unauthorized) => session_expired(user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("User not found.").send();
            redirect("/users")
        }
        Err(ServiceError::Network(_)) => {
            FlashMessage::error(NETWORK_ERROR).send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to open user {id}: {err}");
            FlashMessage::error("Failed to load the user.").send();
            redirect("/users")
        }
    }
}

#[post("/users/{id}/edit")]
pub async fn update_user(
    id: web::Path<String>,
    user: SessionUser,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<UserForm>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let id = id.into_inner();

    match users_service::update_user(&repo, &id, &form).await {
        Ok(updated) => {
            FlashMessage::success(format!("User {} updated.", updated.email)).send();
            redirect("/users")
        }
        Err(err) => match form_errors(err) {
            Ok(errors) => render_form(
                &tera,
                &flash_messages,
                &UserFormData::edit(form, id).with_errors(errors),
            ),
            Err(ServiceError::Unauthorized) => session_expired(user),
            Err(ServiceError::NotFound) => {
                FlashMessage::error("User not found.").send();
                redirect("/users")
            }
            Err(err) => {
                log::error!("Failed to update user {id}: {err}");
                FlashMessage::error("Failed to update the user.").send();
                redirect("/users")
            }
        },
    }
}

#[get("/users/{id}/delete")]
pub async fn confirm_delete_user(
    id: web::Path<String>,
    user: SessionUser,
    session: Session,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let mut confirmation = load_confirmation(&session);

    match users_service::request_user_delete(&repo, &mut confirmation, &id).await {
        Ok(pending) => {
            store_confirmation(&session, confirmation);

            let mut context = base_context(&flash_messages, "users", true);
            context.insert("pending", &pending);
            context.insert("action", &format!("/users/{}/delete", pending.id));
            context.insert("cancel_url", "/users");
            render_template(&tera, "confirm_delete.html", &context)
        }
        Err(ServiceError::Unauthorized) => session_expired(user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("User not found.").send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to prepare deletion of user {id}: {err}");
            FlashMessage::error("Failed to load the user.").send();
            redirect("/users")
        }
    }
}

#[post("/users/{id}/delete")]
pub async fn delete_user(
    id: web::Path<String>,
    user: SessionUser,
    session: Session,
    http: web::Data<HttpClient>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<DecisionForm>,
) -> impl Responder {
    let repo = repository(&http, &user);
    let mut confirmation = load_confirmation(&session);

    let result = users_service::delete_user(&repo, &mut confirmation, &id, form.decision).await;
    store_confirmation(&session, confirmation);

    match result {
        Ok(true) => {
            let state = load_list_state::<UserList>(&session, server_config.page_size);
            store_list_state::<UserList>(&session, &users_service::after_user_deleted(state, &id));
            FlashMessage::success("User deleted.").send();
        }
        Ok(false) => {}
        Err(ServiceError::Unauthorized) => return session_expired(user),
        Err(ServiceError::NotConfirmed) => {
            FlashMessage::warning("Deletion was not confirmed.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("User not found.").send();
        }
        Err(ServiceError::Network(_)) => {
            FlashMessage::error(NETWORK_ERROR).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to delete user {id}: {err}");
            FlashMessage::error("Failed to delete the user.").send();
        }
    }

    redirect("/users")
}
