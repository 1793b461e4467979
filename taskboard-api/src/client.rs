//! HTTP plumbing shared by the task and session services.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use taskboard_core::ServiceError;

/// Error bodies arrive as `{"erro": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    erro: Option<String>,
}

/// Success bodies carry `{"mensagem": "..."}` alongside whatever else.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    pub mensagem: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.http.patch(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Attach the bearer token, failing up front when none is stored so no
    /// request leaves the machine without credentials.
    pub(crate) fn authed(&self, rb: RequestBuilder) -> Result<RequestBuilder, ServiceError> {
        match &self.token {
            Some(token) => Ok(rb.header(AUTHORIZATION, format!("Bearer {token}"))),
            None => Err(ServiceError::not_logged_in()),
        }
    }

    /// Send and map the outcome into the error taxonomy.
    pub(crate) async fn send(&self, rb: RequestBuilder) -> Result<Response, ServiceError> {
        let resp = rb
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = error_message(resp).await;
        log::debug!("request failed: {status} {message}");
        Err(categorize(status, message))
    }
}

/// Best-effort extraction of the server's `erro` message.
async fn error_message(resp: Response) -> String {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
        Ok(ErrorBody { erro: Some(m) }) if !m.is_empty() => m,
        _ => format!("HTTP {status}"),
    }
}

/// The backend signals an invalid or expired token with 401, and 422 when
/// the JWT itself cannot be decoded; both mean "log in again".
pub(crate) fn categorize(status: StatusCode, message: String) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => ServiceError::Auth(message),
        StatusCode::NOT_FOUND => ServiceError::NotFound,
        _ => ServiceError::Server(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_the_taxonomy() {
        assert_eq!(
            categorize(StatusCode::UNAUTHORIZED, "expirado".to_string()),
            ServiceError::Auth("expirado".to_string())
        );
        assert_eq!(
            categorize(StatusCode::UNPROCESSABLE_ENTITY, "token inválido".to_string()),
            ServiceError::Auth("token inválido".to_string())
        );
        assert_eq!(
            categorize(StatusCode::NOT_FOUND, "HTTP 404".to_string()),
            ServiceError::NotFound
        );
        assert_eq!(
            categorize(StatusCode::BAD_REQUEST, "Campo obrigatório".to_string()),
            ServiceError::Server("Campo obrigatório".to_string())
        );
        assert_eq!(
            categorize(StatusCode::INTERNAL_SERVER_ERROR, "HTTP 500".to_string()),
            ServiceError::Server("HTTP 500".to_string())
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let c = ApiClient::new("http://localhost:5000/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(c.url("/tasks"), "http://localhost:5000/tasks");
    }

    #[test]
    fn authed_without_token_refuses_before_sending() {
        let c = ApiClient::new("http://localhost:5000", None, Duration::from_secs(5)).unwrap();
        let err = c.authed(c.get("/tasks")).unwrap_err();
        assert!(matches!(err, ServiceError::Auth(_)));
    }
}
