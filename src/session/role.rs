use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{QueryCache, QueryKey};
use crate::core::{encode_segment, ApiClient};
use crate::models::Role;
use crate::session::AuthSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleState {
    pub role: Option<Role>,
    pub loading: bool,
    pub error: bool,
}

impl RoleState {
    pub fn loading() -> Self {
        Self {
            role: None,
            loading: true,
            error: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            role: None,
            loading: false,
            error: false,
        }
    }

    fn resolved(role: Option<Role>) -> Self {
        Self {
            role,
            loading: false,
            error: false,
        }
    }

    fn failed() -> Self {
        Self {
            role: None,
            loading: false,
            error: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RoleRecord {
    #[serde(default)]
    role: Option<String>,
}

pub struct RoleResolver {
    client: ApiClient,
    cache: Arc<QueryCache>,
    ttl: Duration,
}

impl RoleResolver {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>, ttl: Duration) -> Self {
        Self { client, cache, ttl }
    }

    pub fn cache_key(email: &str) -> QueryKey {
        QueryKey::new(["userRole", email])
    }

    /// Role of the signed-in user. Nothing is fetched while auth is still
    /// loading or when the session carries no email.
    pub async fn resolve(&self, auth: &AuthSession) -> RoleState {
        if auth.is_loading().await {
            return RoleState::loading();
        }
        match auth.current().await.and_then(|user| user.email) {
            Some(email) => self.role_for(&email).await,
            None => RoleState::anonymous(),
        }
    }

    /// A failed lookup yields no role and sets the error flag; it is not
    /// retried until the next call.
    #[tracing::instrument(name = "Resolve user role", skip(self))]
    pub async fn role_for(&self, email: &str) -> RoleState {
        let path = format!("/users/{}", encode_segment(email));
        let record = self
            .cache
            .fetch_with_ttl(Self::cache_key(email), self.ttl, || {
                self.client.get::<RoleRecord>(&path)
            })
            .await;

        match record {
            Ok(record) => {
                let role = record.role.as_deref().and_then(|r| r.parse::<Role>().ok());
                if role.is_none() {
                    tracing::warn!(raw_role = ?record.role, "user has no recognised role");
                }
                RoleState::resolved(role)
            }
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, error.message = %e, "Error fetching role");
                RoleState::failed()
            }
        }
    }
}
