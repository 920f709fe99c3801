use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use super::errors::{ApiErrorBody, AppError};
use crate::routing::navigator::{Location, Navigator};
use crate::session::AuthSession;

/// HTTP client for the portal backend.
///
/// The secure flavour attaches the signed-in user's ID token to every
/// request and reacts to auth failures: a 401 signs the user out and sends
/// them to the login page, a 403 sends them to the forbidden page. The error
/// is returned to the caller either way.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    auth: Option<Arc<AuthSession>>,
    navigator: Arc<Navigator>,
}

impl ApiClient {
    pub fn public(http_client: reqwest::Client, base_url: &str, navigator: Arc<Navigator>) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
            navigator,
        }
    }

    pub fn secure(
        http_client: reqwest::Client,
        base_url: &str,
        auth: Arc<AuthSession>,
        navigator: Arc<Navigator>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: Some(auth),
            navigator,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let request = self.http_client.get(self.url(path));
        Self::read_json(self.send(request).await?).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http_client.get(self.url(path)).query(query);
        Self::read_json(self.send(request).await?).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http_client.post(self.url(path)).json(body);
        Self::read_json(self.send(request).await?).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http_client.patch(self.url(path)).json(body);
        Self::read_json(self.send(request).await?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let request = self.http_client.delete(self.url(path));
        Self::read_json(self.send(request).await?).await
    }

    /// Multipart upload to a third-party host; never carries the session token.
    pub async fn post_multipart_external<T, Q>(
        &self,
        url: &str,
        query: &Q,
        form: Form,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .http_client
            .post(url)
            .query(query)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::from_status(status, response.json().await.ok()));
        }
        Self::read_json(response).await
    }

    async fn send(&self, mut request: RequestBuilder) -> Result<Response, AppError> {
        if let Some(auth) = &self.auth {
            if let Some(token) = auth.id_token().await? {
                request = request.bearer_auth(token.expose_secret());
            }
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(status = %status, url = %response.url(), "backend request failed");
        if self.auth.is_some() {
            self.handle_auth_failure(status).await;
        }
        let body = response.json::<ApiErrorBody>().await.ok();
        Err(AppError::from_status(status, body))
    }

    async fn handle_auth_failure(&self, status: StatusCode) {
        let current = self.navigator.current().path;
        match status {
            StatusCode::UNAUTHORIZED => {
                if let Some(auth) = &self.auth {
                    auth.sign_out().await;
                }
                self.navigator.navigate(Location::login(Some(&current)));
            }
            StatusCode::FORBIDDEN => {
                self.navigator.navigate(Location::forbidden(Some(&current)));
            }
            _ => {}
        }
    }

    /// Mutation endpoints may answer with an empty body.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let text = response.text().await?;
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }
}
