use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::FieldErrors;
use crate::forms::auth::LoginForm;
use crate::middleware::LOGIN_PATH;
use crate::models::auth::{SessionUser, USER_ID_KEY};
use crate::repository::RestRepository;
use crate::repository::http::HttpClient;
use crate::routes::{NETWORK_ERROR, base_context, redirect, render_template, repository};
use crate::services::{ServiceError, auth as auth_service};

fn render_login(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    email: &str,
    errors: &FieldErrors,
) -> actix_web::HttpResponse {
    let mut context = base_context(flash_messages, "login", false);
    context.insert("email", email);
    context.insert("errors", errors);
    render_template(tera, "login.html", &context)
}

#[get("/login")]
pub async fn show_login(
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if identity.is_some() {
        return redirect("/leads");
    }
    render_login(&tera, &flash_messages, "", &FieldErrors::new())
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    session: Session,
    http: web::Data<HttpClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let repo = RestRepository::new(http.with_session(None));
    let email = form.email.clone();

    match auth_service::login(&repo, form).await {
        Ok(signed_in) => {
            let token = signed_in.token.as_str().to_string();
            if let Err(err) = Identity::login(&request.extensions(), token) {
                log::error!("Failed to start the session: {err}");
                FlashMessage::error("Failed to start the session.").send();
                return redirect(LOGIN_PATH);
            }
            if let Some(user_id) = signed_in.user_id {
                if let Err(err) = session.insert(USER_ID_KEY, user_id) {
                    log::error!("Failed to store the user id: {err}");
                }
            }
            FlashMessage::success("Login successful.").send();
            redirect("/leads")
        }
        Err(ServiceError::Validation(errors)) => {
            render_login(&tera, &flash_messages, &email, &errors)
        }
        Err(ServiceError::Form(message)) => {
            render_login(&tera, &flash_messages, &email, &FieldErrors::form(message))
        }
        Err(ServiceError::Network(_)) => {
            render_login(&tera, &flash_messages, &email, &FieldErrors::form(NETWORK_ERROR))
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            FlashMessage::error("Something went wrong during login.").send();
            redirect(LOGIN_PATH)
        }
    }
}

/// Always clears the local session, whatever the backend answers.
#[post("/logout")]
pub async fn logout(user: SessionUser, http: web::Data<HttpClient>) -> impl Responder {
    let repo = repository(&http, &user);

    let result = auth_service::logout(&repo).await;
    user.sign_out();

    match result {
        Ok(message) => FlashMessage::success(message).send(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(format!("Logout failed: {message}")).send()
        }
        Err(_) => FlashMessage::error("Something went wrong during logout.").send(),
    }

    redirect(LOGIN_PATH)
}
