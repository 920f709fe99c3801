use std::sync::Arc;

use crate::cache::{remove_from_list, QueryCache, QueryKey};
use crate::core::{encode_segment, ApiClient, AppError};
use crate::models::{
    Application, ApplicationDigest, ApplicationPatch, ApplicationStatus, NewApplication,
    WriteResult,
};

pub fn mine_key(email: &str) -> QueryKey {
    QueryKey::root("myApplications").with(email)
}

/// Parent of both the moderator and the admin listing.
pub fn all_key() -> QueryKey {
    QueryKey::root("allApplications")
}

pub fn review_queue_key() -> QueryKey {
    all_key().with("review")
}

pub fn admin_key() -> QueryKey {
    all_key().with("admin")
}

fn application_id(application: &Application) -> &str {
    &application.id
}

pub struct ApplicationsApi {
    client: ApiClient,
    cache: Arc<QueryCache>,
}

impl ApplicationsApi {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    #[tracing::instrument(name = "List my applications", skip(self))]
    pub async fn list_mine(&self, email: &str) -> Result<Vec<Application>, AppError> {
        let path = format!("/applications/user/{}", encode_segment(email));
        self.cache
            .fetch(mine_key(email), || self.client.get(&path))
            .await
    }

    #[tracing::instrument(name = "List all applications", skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Application>, AppError> {
        self.cache
            .fetch(review_queue_key(), || self.client.get("/applications/all"))
            .await
    }

    /// Admin listing, also behind the analytics page.
    #[tracing::instrument(name = "List applications for admin", skip(self))]
    pub async fn list_admin(&self) -> Result<Vec<Application>, AppError> {
        self.cache
            .fetch(admin_key(), || self.client.get("/applications"))
            .await
    }

    /// Same listing as [`Self::list_admin`], read leniently for analytics.
    #[tracing::instrument(name = "List application digests", skip(self))]
    pub async fn digests(&self) -> Result<Vec<ApplicationDigest>, AppError> {
        self.cache
            .fetch(all_key().with("analytics"), || self.client.get("/applications"))
            .await
    }

    #[tracing::instrument(name = "Submit application", skip(self, application), fields(scholarship_id = %application.scholarship_id))]
    pub async fn submit(&self, application: &NewApplication) -> Result<WriteResult, AppError> {
        let result: WriteResult = self.client.post("/applications", application).await?;
        if !result.inserted() {
            return Err(AppError::validation_error("Failed to save application"));
        }
        self.cache.invalidate(&mine_key(&application.user_email)).await;
        self.cache.invalidate(&all_key()).await;
        Ok(result)
    }

    #[tracing::instrument(name = "Patch application", skip(self, patch))]
    pub async fn patch(&self, id: &str, patch: &ApplicationPatch) -> Result<WriteResult, AppError> {
        let path = format!("/applications/{}", encode_segment(id));
        let result = self.client.patch(&path, patch).await?;
        self.cache.invalidate(&QueryKey::root("myApplications")).await;
        self.cache.invalidate(&all_key()).await;
        Ok(result)
    }

    /// Withdraw a pending application. It is kept as `rejected`.
    #[tracing::instrument(name = "Cancel application", skip(self, application), fields(id = %application.id))]
    pub async fn cancel(&self, application: &Application) -> Result<WriteResult, AppError> {
        application.ensure_cancellable()?;
        let patch = ApplicationPatch {
            status: Some(application.status.transition_to(ApplicationStatus::Rejected)?),
            ..Default::default()
        };
        self.patch(&application.id, &patch).await
    }

    /// Owners may delete their application while it is still pending.
    #[tracing::instrument(name = "Delete application", skip(self, application), fields(id = %application.id))]
    pub async fn delete(&self, application: &Application) -> Result<WriteResult, AppError> {
        application.ensure_cancellable()?;
        let path = format!("/applications/{}", encode_segment(&application.id));
        let result = remove_from_list(
            &self.cache,
            mine_key(&application.user_email),
            &application.id,
            application_id,
            self.client.delete::<WriteResult>(&path),
        )
        .await?;
        self.cache.invalidate(&all_key()).await;
        Ok(result)
    }
}
