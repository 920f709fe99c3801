use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::core::config::IdentityConfig;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email address is already registered")]
    EmailExists,
    #[error("session token expired")]
    TokenExpired,
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IdentityError {
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Email or password is incorrect".to_string(),
            Self::EmailExists => "A user with this email address already exists".to_string(),
            Self::TokenExpired => "Your session has expired, please log in again".to_string(),
            Self::Rejected(_) | Self::Transport(_) => {
                "Authentication service is unavailable".to_string()
            }
        }
    }

    /// Identity toolkit error codes come back as e.g. `EMAIL_NOT_FOUND` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    fn from_code(code: &str) -> Self {
        let code = code.split(':').next().unwrap_or(code).trim();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" => Self::InvalidCredentials,
            "EMAIL_EXISTS" => Self::EmailExists,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "INVALID_ID_TOKEN" => Self::TokenExpired,
            other => Self::Rejected(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IdentityTokens {
    pub id_token: Secret<String>,
    pub refresh_token: Secret<String>,
    pub expires_at: DateTime<Utc>,
}

impl IdentityTokens {
    pub fn expires_within(&self, margin: Duration) -> bool {
        self.expires_at - margin <= Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: AuthUser,
    pub tokens: IdentityTokens,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &Secret<String>)
        -> Result<SignedIn, IdentityError>;

    async fn sign_up(&self, email: &str, password: &Secret<String>)
        -> Result<SignedIn, IdentityError>;

    async fn update_profile(
        &self,
        id_token: &Secret<String>,
        update: &ProfileUpdate,
    ) -> Result<AuthUser, IdentityError>;

    async fn refresh(&self, refresh_token: &Secret<String>) -> Result<IdentityTokens, IdentityError>;

    async fn lookup(&self, id_token: &Secret<String>) -> Result<AuthUser, IdentityError>;
}

pub struct FirebaseIdentity {
    http_client: reqwest::Client,
    config: IdentityConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

impl From<AccountInfo> for AuthUser {
    fn from(info: AccountInfo) -> Self {
        AuthUser {
            uid: info.local_id,
            email: info.email,
            display_name: info.display_name,
            photo_url: info.photo_url,
        }
    }
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn expiry_from(expires_in: &str) -> DateTime<Utc> {
    let seconds = expires_in.parse::<i64>().unwrap_or(3600);
    Utc::now() + Duration::seconds(seconds)
}

impl FirebaseIdentity {
    pub fn new(http_client: reqwest::Client, config: IdentityConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn accounts_url(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}",
            self.config.identity_base_url.trim_end_matches('/'),
            action
        )
    }

    async fn read<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        if response.status().is_success() {
            return Ok(response.json::<T>().await?);
        }
        let status = response.status();
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => Err(IdentityError::from_code(&envelope.error.message)),
            Err(_) => Err(IdentityError::Rejected(status.to_string())),
        }
    }

    async fn password_call(
        &self,
        action: &str,
        email: &str,
        password: &Secret<String>,
    ) -> Result<SignedIn, IdentityError> {
        let response = self
            .http_client
            .post(self.accounts_url(action))
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&PasswordRequest {
                email,
                password: password.expose_secret(),
                return_secure_token: true,
            })
            .send()
            .await?;
        let body: PasswordResponse = Self::read(response).await?;

        Ok(SignedIn {
            user: AuthUser {
                uid: body.local_id,
                email: body.email.or_else(|| Some(email.to_string())),
                display_name: body.display_name,
                photo_url: body.photo_url,
            },
            tokens: IdentityTokens {
                id_token: Secret::new(body.id_token),
                refresh_token: Secret::new(body.refresh_token),
                expires_at: expiry_from(&body.expires_in),
            },
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    #[tracing::instrument(name = "Identity sign in", skip(self, password))]
    async fn sign_in(
        &self,
        email: &str,
        password: &Secret<String>,
    ) -> Result<SignedIn, IdentityError> {
        self.password_call("signInWithPassword", email, password).await
    }

    #[tracing::instrument(name = "Identity sign up", skip(self, password))]
    async fn sign_up(
        &self,
        email: &str,
        password: &Secret<String>,
    ) -> Result<SignedIn, IdentityError> {
        self.password_call("signUp", email, password).await
    }

    #[tracing::instrument(name = "Identity profile update", skip(self, id_token))]
    async fn update_profile(
        &self,
        id_token: &Secret<String>,
        update: &ProfileUpdate,
    ) -> Result<AuthUser, IdentityError> {
        let response = self
            .http_client
            .post(self.accounts_url("update"))
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&UpdateRequest {
                id_token: id_token.expose_secret(),
                display_name: update.display_name.as_deref(),
                photo_url: update.photo_url.as_deref(),
                return_secure_token: false,
            })
            .send()
            .await?;
        let info: AccountInfo = Self::read(response).await?;
        Ok(info.into())
    }

    #[tracing::instrument(name = "Identity token refresh", skip_all)]
    async fn refresh(&self, refresh_token: &Secret<String>) -> Result<IdentityTokens, IdentityError> {
        let url = format!(
            "{}/v1/token",
            self.config.token_base_url.trim_end_matches('/')
        );
        let response = self
            .http_client
            .post(url)
            .query(&[("key", self.config.api_key.expose_secret())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.expose_secret().as_str()),
            ])
            .send()
            .await?;
        let body: RefreshResponse = Self::read(response).await?;

        Ok(IdentityTokens {
            id_token: Secret::new(body.id_token),
            refresh_token: Secret::new(body.refresh_token),
            expires_at: expiry_from(&body.expires_in),
        })
    }

    #[tracing::instrument(name = "Identity account lookup", skip_all)]
    async fn lookup(&self, id_token: &Secret<String>) -> Result<AuthUser, IdentityError> {
        let response = self
            .http_client
            .post(self.accounts_url("lookup"))
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&serde_json::json!({ "idToken": id_token.expose_secret() }))
            .send()
            .await?;
        let body: LookupResponse = Self::read(response).await?;
        body.users
            .into_iter()
            .next()
            .map(AuthUser::from)
            .ok_or(IdentityError::TokenExpired)
    }
}
