use chrono::Duration;
use secrecy::Secret;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::cache::QueryCache;
use crate::core::AppError;
use crate::session::identity::{AuthUser, IdentityProvider, IdentityTokens, ProfileUpdate};

/// Tokens this close to expiry are refreshed before use.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    tokens: IdentityTokens,
}

impl Session {
    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }
}

struct SessionState {
    session: Option<Session>,
    loading: bool,
}

/// Authentication context for one portal instance.
///
/// Starts out loading; `initialize` settles it. Signing out tears down the
/// query cache along with the session.
pub struct AuthSession {
    identity: Arc<dyn IdentityProvider>,
    cache: Arc<QueryCache>,
    state: RwLock<SessionState>,
    changes: watch::Sender<Option<AuthUser>>,
}

impl AuthSession {
    pub fn new(identity: Arc<dyn IdentityProvider>, cache: Arc<QueryCache>) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            identity,
            cache,
            state: RwLock::new(SessionState {
                session: None,
                loading: true,
            }),
            changes,
        }
    }

    /// Settle the initial auth state, restoring a previous session when a
    /// refresh token is supplied.
    #[tracing::instrument(name = "Initialize auth session", skip_all)]
    pub async fn initialize(&self, refresh_token: Option<Secret<String>>) -> Result<(), AppError> {
        let restored = match refresh_token {
            Some(token) => {
                let restored = async {
                    let tokens = self.identity.refresh(&token).await?;
                    let user = self.identity.lookup(&tokens.id_token).await?;
                    Ok::<_, AppError>(Session { user, tokens })
                }
                .await;
                match restored {
                    Ok(session) => Some(session),
                    Err(e) => {
                        tracing::warn!(error.message = %e, "could not restore previous session");
                        None
                    }
                }
            }
            None => None,
        };

        self.replace(restored, false).await;
        Ok(())
    }

    #[tracing::instrument(name = "Sign in", skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &Secret<String>) -> Result<AuthUser, AppError> {
        self.set_loading(true).await;
        match self.identity.sign_in(email, password).await {
            Ok(signed_in) => {
                let user = signed_in.user.clone();
                self.replace(
                    Some(Session {
                        user: signed_in.user,
                        tokens: signed_in.tokens,
                    }),
                    false,
                )
                .await;
                tracing::info!(uid = %user.uid, "signed in");
                Ok(user)
            }
            Err(e) => {
                self.set_loading(false).await;
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(name = "Register identity", skip(self, password, profile))]
    pub async fn register(
        &self,
        email: &str,
        password: &Secret<String>,
        profile: ProfileUpdate,
    ) -> Result<AuthUser, AppError> {
        self.set_loading(true).await;
        let result = async {
            let signed_in = self.identity.sign_up(email, password).await?;
            let mut user = self
                .identity
                .update_profile(&signed_in.tokens.id_token, &profile)
                .await?;
            if user.email.is_none() {
                user.email = signed_in.user.email.clone();
            }
            Ok::<_, AppError>(Session {
                user,
                tokens: signed_in.tokens,
            })
        }
        .await;

        match result {
            Ok(session) => {
                let user = session.user.clone();
                self.replace(Some(session), false).await;
                Ok(user)
            }
            Err(e) => {
                self.set_loading(false).await;
                Err(e)
            }
        }
    }

    #[tracing::instrument(name = "Sign out", skip_all)]
    pub async fn sign_out(&self) {
        self.replace(None, false).await;
        self.cache.clear().await;
    }

    pub async fn current(&self) -> Option<AuthUser> {
        self.state.read().await.session.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.changes.subscribe()
    }

    /// A fresh ID token for the signed-in user, `None` when signed out.
    pub async fn id_token(&self) -> Result<Option<Secret<String>>, AppError> {
        let refresh_token = {
            let state = self.state.read().await;
            match &state.session {
                None => return Ok(None),
                Some(session)
                    if !session
                        .tokens
                        .expires_within(Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)) =>
                {
                    return Ok(Some(session.tokens.id_token.clone()))
                }
                Some(session) => session.tokens.refresh_token.clone(),
            }
        };

        let tokens = self.identity.refresh(&refresh_token).await?;
        let id_token = tokens.id_token.clone();
        if let Some(session) = self.state.write().await.session.as_mut() {
            session.tokens = tokens;
        }
        Ok(Some(id_token))
    }

    async fn set_loading(&self, loading: bool) {
        self.state.write().await.loading = loading;
    }

    async fn replace(&self, session: Option<Session>, loading: bool) {
        let user = session.as_ref().map(|s| s.user.clone());
        {
            let mut state = self.state.write().await;
            state.session = session;
            state.loading = loading;
        }
        self.changes.send_replace(user);
    }
}
