use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpResponse, HttpServer, test, web};
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::{FlashMessagesFramework, Level};
use tera::Tera;

use lead_admin::domain::session::AuthScheme;
use lead_admin::middleware::RedirectUnauthorized;
use lead_admin::models::config::ServerConfig;
use lead_admin::repository::http::HttpClient;
use lead_admin::routes::alert_level_to_str;
use lead_admin::routes::api::{validate_lead, validate_user};
use lead_admin::routes::auth::{login, show_login};
use lead_admin::routes::leads::{edit_lead, leads};
use lead_admin::routes::main::show_index;
use lead_admin::routes::users::edit_user;
use serde_json::json;

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn server_config(api_base_url: &str) -> ServerConfig {
    ServerConfig {
        domain: None,
        address: "127.0.0.1".into(),
        port: 0,
        templates_dir: "templates/**/*".into(),
        secret: "s".repeat(64),
        api_base_url: api_base_url.into(),
        request_timeout_secs: 1,
        auth_scheme: AuthScheme::Raw,
        local_filter: false,
        page_size: 10,
        secure_cookies: false,
    }
}

macro_rules! panel {
    () => {
        panel!(UNREACHABLE)
    };
    ($api:expr) => {{
        let config = server_config($api);
        let key = Key::from(config.secret.as_bytes());
        let http = HttpClient::new(
            &config.api_base_url,
            config.auth_scheme,
            Duration::from_secs(config.request_timeout_secs),
        )
        .unwrap();
        let tera = Tera::new(&config.templates_dir).unwrap();

        test::init_service(
            App::new()
                .wrap(
                    FlashMessagesFramework::builder(CookieMessageStore::builder(key.clone()).build())
                        .build(),
                )
                .wrap(IdentityMiddleware::default())
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
                .service(show_login)
                .service(login)
                .service(
                    web::scope("/api")
                        .service(validate_lead)
                        .service(validate_user),
                )
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(show_index)
                        .service(leads)
                        .service(edit_lead)
                        .service(edit_user),
                )
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(http))
                .app_data(web::Data::new(config)),
        )
        .await
    }};
}

/// Backend whose lead list always answers 401; counts the list calls.
fn start_backend() -> (String, web::Data<AtomicUsize>) {
    let list_calls = web::Data::new(AtomicUsize::new(0));
    let calls = list_calls.clone();

    let server = HttpServer::new(move || {
        App::new().app_data(calls.clone()).service(
            web::scope("/api/v1")
                .route(
                    "/auth",
                    web::post().to(|| async {
                        HttpResponse::Ok().json(json!({
                            "token": "tok-1",
                            "user": { "_id": "u1", "email": "admin@example.com", "role": "Admin" }
                        }))
                    }),
                )
                .route(
                    "/lead",
                    web::get().to(|calls: web::Data<AtomicUsize>| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        HttpResponse::Unauthorized().json(json!({ "message": "jwt expired" }))
                    }),
                )
                .route(
                    "/lead/{id}",
                    web::get().to(|| async {
                        HttpResponse::Ok().json(json!({
                            "_id": "66a1",
                            "firstName": "Asha",
                            "email": "asha@example.com",
                            "workEmail": "asha@corp.example.com",
                            "websiteURL": "https://corp.example.com",
                            "linkdinURL": "https://linkedin.com/in/asha",
                            "industry": "Retail",
                            "whatsUpNumber": "9876543210",
                            "status": "NEW",
                            "priority": "LOW",
                            "userId": "owner-7"
                        }))
                    }),
                )
                .route(
                    "/auth/{id}",
                    web::get().to(|| async {
                        HttpResponse::Ok().json(json!({
                            "_id": "u2",
                            "firstName": "Mina",
                            "lastName": "Shah",
                            "email": "mina@example.com",
                            "phoneNumber": "9876543210",
                            "role": "Manager",
                            "isActive": true
                        }))
                    }),
                ),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{addr}"), list_calls)
}

/// Logs in through the panel and returns the cookies it set.
macro_rules! sign_in {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "admin@example.com"), ("password", "Secret1!")])
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/leads");
        live_cookies(&resp)
    }};
}

fn live_cookies<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .filter(|c| !c.value().is_empty())
        .map(|c| c.into_owned())
        .collect()
}

fn get_with(uri: &str, cookies: &[Cookie<'static>]) -> test::TestRequest {
    cookies
        .iter()
        .fold(test::TestRequest::get().uri(uri), |req, c| {
            req.cookie(c.clone())
        })
}

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn anonymous_list_redirects_to_login() {
    let app = panel!();

    let req = test::TestRequest::get().uri("/leads").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_web::test]
async fn login_page_renders() {
    let app = panel!();

    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Sign in"));
}

#[actix_web::test]
async fn invalid_login_is_rendered_with_field_errors() {
    let app = panel!();

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "not-an-email"), ("password", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).into_owned();
    assert!(body.contains("Email is invalid"));
    assert!(body.contains("Password is required"));
}

#[actix_web::test]
async fn lead_validation_reports_only_the_changed_field() {
    let app = panel!();

    let req = test::TestRequest::post()
        .uri("/api/validate/lead?field=whats_up_number")
        .set_form([("whats_up_number", "12345"), ("email", "bad")])
        .to_request();
    let errors: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        errors,
        serde_json::json!({ "whats_up_number": "WhatsApp number must be at least 10 digits" })
    );
}

#[actix_web::test]
async fn user_validation_skips_password_when_editing() {
    let app = panel!();

    let form = [
        ("first_name", "Ravi"),
        ("last_name", "Kumar"),
        ("email", "ravi@example.com"),
        ("phone_number", "9876543210"),
        ("role", "Admin"),
    ];

    let req = test::TestRequest::post()
        .uri("/api/validate/user?mode=edit")
        .set_form(form)
        .to_request();
    let errors: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(errors, serde_json::json!({}));

    let req = test::TestRequest::post()
        .uri("/api/validate/user?mode=create")
        .set_form(form)
        .to_request();
    let errors: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(errors.get("password").is_some());
}

#[actix_web::test]
async fn expired_backend_session_signs_out_once() {
    let (origin, list_calls) = start_backend();
    let app = panel!(&origin);
    let cookies = sign_in!(app);

    let resp = test::call_service(&app, get_with("/leads", &cookies).to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == "id")
        .expect("session cookie is reset");
    assert!(session.value().is_empty());
    assert_eq!(list_calls.load(Ordering::SeqCst), 1);

    let remaining: Vec<_> = live_cookies(&resp)
        .into_iter()
        .filter(|c| c.name() != "id")
        .collect();
    let resp = test::call_service(&app, get_with("/login", &remaining).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).into_owned();
    assert!(body.contains("Your session has expired"));

    let resp = test::call_service(&app, get_with("/leads", &[]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(list_calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn lead_edit_form_keeps_owner_and_pipeline_status() {
    let (origin, _) = start_backend();
    let app = panel!(&origin);
    let cookies = sign_in!(app);

    let resp = test::call_service(&app, get_with("/leads/66a1/edit", &cookies).to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).into_owned();
    assert!(body.contains(r#"name="user_id" value="owner-7""#));
    assert!(body.contains(r#"<option value="NEW" selected>"#));
}

#[actix_web::test]
async fn user_edit_form_keeps_a_legacy_role() {
    let (origin, _) = start_backend();
    let app = panel!(&origin);
    let cookies = sign_in!(app);

    let resp = test::call_service(&app, get_with("/users/u2/edit", &cookies).to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).into_owned();
    assert!(body.contains(r#"<option value="Manager" selected>"#));
}
