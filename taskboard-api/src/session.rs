//! Login, registration, profile and logout against the backend.

use serde::{Deserialize, Serialize};
use taskboard_core::ServiceError;

use crate::client::ApiClient;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    senha: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    nome: &'a str,
    email: &'a str,
    senha: &'a str,
    #[serde(rename = "confirmarSenha")]
    confirm_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
    mensagem: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    nome: Option<String>,
}

/// Token plus the server's human-readable confirmation.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SessionApi {
    client: ApiClient,
}

impl SessionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, ServiceError> {
        // Same normalization the login form applies.
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::Validation {
                field: "credentials",
                reason: "email and password are required".to_string(),
            });
        }

        let rb = self.client.post("/login").json(&LoginRequest {
            email: &email,
            senha: password,
        });
        let resp = self.client.send(rb).await?;
        Ok(auth_outcome(resp, "logged in").await)
    }

    /// Registration, with the same checks the signup form runs before
    /// submitting: all fields present, plausible email, password length,
    /// confirmation match.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthOutcome, ServiceError> {
        let name = name.trim();
        let email = email.trim().to_lowercase();

        let reject = |field, reason: &str| {
            Err(ServiceError::Validation {
                field,
                reason: reason.to_string(),
            })
        };
        if name.is_empty() {
            return reject("name", "name is required");
        }
        if !email.contains('@') || !email.contains('.') {
            return reject("email", "email address does not look valid");
        }
        if password.len() < 8 {
            return reject("password", "password must have at least 8 characters");
        }
        if password != confirm_password {
            return reject("password", "passwords do not match");
        }

        let rb = self.client.post("/cadastro").json(&RegisterRequest {
            nome: name,
            email: &email,
            senha: password,
            confirm_password,
        });
        let resp = self.client.send(rb).await?;
        Ok(auth_outcome(resp, "registered").await)
    }

    /// Display name of the logged-in user.
    pub async fn profile(&self) -> Result<String, ServiceError> {
        let rb = self.client.authed(self.client.get("/perfil"))?;
        let resp = self.client.send(rb).await?;
        let body: ProfileResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Network(format!("unexpected profile body: {e}")))?;
        Ok(body.nome.unwrap_or_else(|| "user".to_string()))
    }

    /// Server-side logout notification. Callers clear the local token no
    /// matter what this returns.
    pub async fn logout(&self) -> Result<(), ServiceError> {
        let rb = self.client.authed(self.client.post("/logout"))?;
        self.client.send(rb).await?;
        Ok(())
    }
}

async fn auth_outcome(resp: reqwest::Response, fallback: &str) -> AuthOutcome {
    match resp.json::<AuthResponse>().await {
        Ok(body) => AuthOutcome {
            token: body.token,
            message: body.mensagem.unwrap_or_else(|| fallback.to_string()),
        },
        Err(_) => AuthOutcome {
            token: None,
            message: fallback.to_string(),
        },
    }
}
