use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::cache::{remove_from_list, QueryCache, QueryKey};
use crate::core::{encode_segment, ApiClient, AppError};
use crate::models::{NewReview, Review, ReviewPatch, WriteResult};

pub fn for_scholarship_key(scholarship_id: &str) -> QueryKey {
    QueryKey::root("reviews").with(scholarship_id)
}

pub fn all_key() -> QueryKey {
    QueryKey::root("allReviews")
}

pub fn mine_key(email: &str) -> QueryKey {
    QueryKey::root("myReviews").with(email)
}

fn review_id(review: &Review) -> &str {
    &review.id
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewFilter<'a> {
    scholarship_id: &'a str,
}

pub struct ReviewsApi {
    client: ApiClient,
    cache: Arc<QueryCache>,
}

impl ReviewsApi {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    #[tracing::instrument(name = "List scholarship reviews", skip(self))]
    pub async fn for_scholarship(&self, scholarship_id: &str) -> Result<Vec<Review>, AppError> {
        let filter = ReviewFilter { scholarship_id };
        self.cache
            .fetch(for_scholarship_key(scholarship_id), || {
                self.client.get_with_query("/reviews", &filter)
            })
            .await
    }

    #[tracing::instrument(name = "List all reviews", skip(self))]
    pub async fn all(&self) -> Result<Vec<Review>, AppError> {
        self.cache
            .fetch(all_key(), || self.client.get("/reviews/all"))
            .await
    }

    #[tracing::instrument(name = "List my reviews", skip(self))]
    pub async fn mine(&self, email: &str) -> Result<Vec<Review>, AppError> {
        let path = format!("/reviews/user/{}", encode_segment(email));
        self.cache
            .fetch(mine_key(email), || self.client.get(&path))
            .await
    }

    #[tracing::instrument(name = "Create review", skip(self, review), fields(scholarship_id = %review.scholarship_id))]
    pub async fn create(&self, review: &NewReview) -> Result<WriteResult, AppError> {
        review.validate()?;
        let result = self.client.post("/reviews", review).await?;
        self.invalidate_lists().await;
        // the average rating lives on the scholarship
        self.cache
            .invalidate(&super::scholarships::detail_key(&review.scholarship_id))
            .await;
        self.cache.invalidate(&super::scholarships::top_key()).await;
        Ok(result)
    }

    #[tracing::instrument(name = "Update review", skip(self, patch))]
    pub async fn update(&self, id: &str, patch: &ReviewPatch) -> Result<WriteResult, AppError> {
        patch.validate()?;
        let path = format!("/reviews/{}", encode_segment(id));
        let result = self.client.patch(&path, patch).await?;
        self.invalidate_lists().await;
        Ok(result)
    }

    /// Removes the review from `listing` immediately; the listing is
    /// restored if the delete fails.
    #[tracing::instrument(name = "Delete review", skip(self))]
    pub async fn delete(&self, listing: QueryKey, id: &str) -> Result<WriteResult, AppError> {
        let path = format!("/reviews/{}", encode_segment(id));
        let result = remove_from_list(
            &self.cache,
            listing,
            id,
            review_id,
            self.client.delete::<WriteResult>(&path),
        )
        .await?;
        self.invalidate_lists().await;
        Ok(result)
    }

    async fn invalidate_lists(&self) {
        self.cache.invalidate(&QueryKey::root("reviews")).await;
        self.cache.invalidate(&QueryKey::root("myReviews")).await;
        self.cache.invalidate(&all_key()).await;
    }
}
