use std::sync::Arc;
use validator::Validate;

use crate::cache::{remove_from_list, QueryCache, QueryKey};
use crate::core::{encode_segment, ApiClient, AppError};
use crate::models::{NewScholarship, Scholarship, ScholarshipPatch, WriteResult};

pub fn all_key() -> QueryKey {
    QueryKey::root("allScholarships")
}

pub fn top_key() -> QueryKey {
    QueryKey::root("topScholarships")
}

pub fn detail_key(id: &str) -> QueryKey {
    QueryKey::root("scholarship").with(id)
}

fn scholarship_id(scholarship: &Scholarship) -> &str {
    &scholarship.id
}

pub struct ScholarshipsApi {
    public: ApiClient,
    secure: ApiClient,
    cache: Arc<QueryCache>,
}

impl ScholarshipsApi {
    pub fn new(public: ApiClient, secure: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self {
            public,
            secure,
            cache,
        }
    }

    #[tracing::instrument(name = "List scholarships", skip(self))]
    pub async fn list(&self) -> Result<Vec<Scholarship>, AppError> {
        self.cache
            .fetch(all_key(), || self.public.get("/scholarships"))
            .await
    }

    #[tracing::instrument(name = "List top scholarships", skip(self))]
    pub async fn top(&self) -> Result<Vec<Scholarship>, AppError> {
        self.cache
            .fetch(top_key(), || self.public.get("/scholarships/top"))
            .await
    }

    #[tracing::instrument(name = "Get scholarship", skip(self))]
    pub async fn get(&self, id: &str) -> Result<Scholarship, AppError> {
        let path = format!("/scholarships/{}", encode_segment(id));
        self.cache
            .fetch(detail_key(id), || self.secure.get(&path))
            .await
    }

    #[tracing::instrument(name = "Create scholarship", skip(self, scholarship), fields(name = %scholarship.name))]
    pub async fn create(&self, scholarship: &NewScholarship) -> Result<WriteResult, AppError> {
        scholarship.validate()?;
        let result = self.secure.post("/scholarships", scholarship).await?;
        self.cache.invalidate(&all_key()).await;
        self.cache.invalidate(&top_key()).await;
        Ok(result)
    }

    #[tracing::instrument(name = "Update scholarship", skip(self, patch))]
    pub async fn update(&self, id: &str, patch: &ScholarshipPatch) -> Result<WriteResult, AppError> {
        patch.validate()?;
        let path = format!("/scholarships/{}", encode_segment(id));
        let result = self.secure.patch(&path, patch).await?;
        self.cache.invalidate(&all_key()).await;
        self.cache.invalidate(&top_key()).await;
        self.cache.invalidate(&detail_key(id)).await;
        Ok(result)
    }

    #[tracing::instrument(name = "Delete scholarship", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<WriteResult, AppError> {
        let path = format!("/scholarships/{}", encode_segment(id));
        let result = remove_from_list(
            &self.cache,
            all_key(),
            id,
            scholarship_id,
            self.secure.delete::<WriteResult>(&path),
        )
        .await?;
        self.cache.invalidate(&top_key()).await;
        self.cache.remove(&detail_key(id)).await;
        Ok(result)
    }
}
