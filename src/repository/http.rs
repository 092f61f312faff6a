//! JSON client for the remote REST backend.
//!
//! Every request goes to `{api_base_url}/api/v1/{resource}` with a JSON
//! content type. When a session token is attached it is written into the
//! `Authorization` header using the configured [`AuthScheme`].

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::session::{AuthScheme, SessionToken};
use crate::repository::errors::{ApiError, ApiResult, error_message};

/// Path prefix shared by every backend endpoint.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    scheme: AuthScheme,
    token: Option<SessionToken>,
}

impl HttpClient {
    /// Builds a client without a session. `api_base_url` is the backend origin,
    /// e.g. `http://localhost:8081`.
    pub fn new(api_base_url: &str, scheme: AuthScheme, timeout: Duration) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{}{API_PREFIX}", api_base_url.trim_end_matches('/')),
            scheme,
            token: None,
        })
    }

    /// Returns a copy of the client bound to the given session.
    pub fn with_session(&self, token: Option<SessionToken>) -> Self {
        Self {
            token,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&self.scheme.header_value(token))
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid session token: {e}")))?;
            builder = builder.header(AUTHORIZATION, value);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(body).map_err(ApiError::from)
    }

    /// `GET /{resource}` with the given query pairs.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let builder = self.request(Method::GET, resource)?.query(query);
        self.send(builder).await
    }

    /// `GET /{resource}/{id}`.
    pub async fn get_by_id<T: DeserializeOwned>(&self, resource: &str, id: &str) -> ApiResult<T> {
        let builder = self.request(Method::GET, &format!("{resource}/{id}"))?;
        self.send(builder).await
    }

    /// `POST /{resource}` with a JSON body.
    pub async fn create<B, T>(&self, resource: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, resource)?.json(body);
        self.send(builder).await
    }

    /// `PUT /{resource}/{id}` with a JSON body.
    pub async fn update<B, T>(&self, resource: &str, id: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::PUT, &format!("{resource}/{id}"))?
            .json(body);
        self.send(builder).await
    }

    /// `DELETE /{resource}/{id}`.
    pub async fn remove<T: DeserializeOwned>(&self, resource: &str, id: &str) -> ApiResult<T> {
        let builder = self.request(Method::DELETE, &format!("{resource}/{id}"))?;
        self.send(builder).await
    }

    /// `POST` to an arbitrary path, used for login, logout and registration.
    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(Method::POST, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(
            "http://localhost:8081/",
            AuthScheme::Raw,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn base_url_appends_api_prefix_once() {
        assert_eq!(client().base_url(), "http://localhost:8081/api/v1");
        assert_eq!(client().url("/lead"), "http://localhost:8081/api/v1/lead");
        assert_eq!(client().url("auth/"), "http://localhost:8081/api/v1/auth/");
    }

    #[test]
    fn with_session_does_not_touch_the_original() {
        let base = client();
        let bound = base.with_session(Some(SessionToken::new("t").unwrap()));
        assert!(bound.has_session());
        assert!(!base.has_session());
    }
}
