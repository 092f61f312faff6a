//! Admin panel for leads and admin accounts kept by a remote REST backend.
//!
//! The `data` feature exposes the client layer: domain types, forms, the list
//! and delete-confirmation controllers, and the REST repositories. The
//! `server` feature adds the server-rendered panel on top of it.

#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

pub mod controller;
pub mod domain;
pub mod forms;
pub mod repository;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::http::HttpClient;
#[cfg(feature = "server")]
use crate::routes::api::{validate_lead, validate_user};
#[cfg(feature = "server")]
use crate::routes::auth::{login, logout, show_login};
#[cfg(feature = "server")]
use crate::routes::leads::{
    confirm_delete_lead, create_lead, delete_lead, edit_lead, leads, new_lead, update_lead,
};
#[cfg(feature = "server")]
use crate::routes::main::show_index;
#[cfg(feature = "server")]
use crate::routes::users::{
    confirm_delete_user, create_user, delete_user, edit_user, new_user, update_user, users,
};

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Shared backend client; each request binds it to its own session token.
    let http = HttpClient::new(
        &server_config.api_base_url,
        server_config.auth_scheme,
        Duration::from_secs(server_config.request_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build the backend client: {e}")))?;

    log::info!("Using backend at {}", http.base_url());

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid session secret: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(server_config.secure_cookies)
                    .cookie_domain(server_config.domain.as_ref().map(|d| format!(".{d}")))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
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
                    .service(new_lead)
                    .service(create_lead)
                    .service(edit_lead)
                    .service(update_lead)
                    .service(confirm_delete_lead)
                    .service(delete_lead)
                    .service(users)
                    .service(new_user)
                    .service(create_user)
                    .service(edit_user)
                    .service(update_user)
                    .service(confirm_delete_user)
                    .service(delete_user)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(http.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
