use std::sync::Arc;

use crate::cache::{remove_from_list, QueryCache, QueryKey};
use crate::core::{encode_segment, ApiClient, AppError};
use crate::models::{NewUser, Role, RoleUpdate, UserProfile, WriteResult};

pub fn all_key() -> QueryKey {
    QueryKey::root("allUsers")
}

fn user_id(user: &UserProfile) -> &str {
    &user.id
}

pub struct UsersApi {
    public: ApiClient,
    client: ApiClient,
    cache: Arc<QueryCache>,
}

impl UsersApi {
    pub fn new(public: ApiClient, client: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self {
            public,
            client,
            cache,
        }
    }

    #[tracing::instrument(name = "List users", skip(self))]
    pub async fn list(&self) -> Result<Vec<UserProfile>, AppError> {
        self.cache.fetch(all_key(), || self.client.get("/users")).await
    }

    #[tracing::instrument(name = "Get user", skip(self))]
    pub async fn get(&self, email: &str) -> Result<UserProfile, AppError> {
        let path = format!("/users/{}", encode_segment(email));
        self.client.get(&path).await
    }

    /// Backend record for a freshly registered account, sent without a token.
    #[tracing::instrument(name = "Create user record", skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: &NewUser) -> Result<WriteResult, AppError> {
        let result = self.public.post("/users", user).await?;
        self.cache.invalidate(&all_key()).await;
        Ok(result)
    }

    /// Changes a user's tier. Cached roles are dropped so every guard sees
    /// the new tier on its next check.
    #[tracing::instrument(name = "Update user role", skip(self))]
    pub async fn update_role(&self, id: &str, role: Role) -> Result<WriteResult, AppError> {
        let path = format!("/users/{}", encode_segment(id));
        let result = self.client.patch(&path, &RoleUpdate { role }).await?;
        self.cache.invalidate(&all_key()).await;
        self.cache.invalidate(&QueryKey::root("userRole")).await;
        Ok(result)
    }

    #[tracing::instrument(name = "Delete user", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<WriteResult, AppError> {
        let path = format!("/users/{}", encode_segment(id));
        remove_from_list(
            &self.cache,
            all_key(),
            id,
            user_id,
            self.client.delete::<WriteResult>(&path),
        )
        .await
    }
}
