use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::future::Future;

use super::{QueryCache, QueryKey};
use crate::core::AppError;

/// An applied-but-unconfirmed change to one cached query.
///
/// Created by [`OptimisticUpdate::apply`], which snapshots the cached value
/// and writes the optimistic one. Exactly one of `commit` or `revert` must
/// follow once the server has answered.
#[must_use = "an optimistic update must be committed or reverted"]
pub struct OptimisticUpdate {
    key: QueryKey,
    snapshot: Option<Value>,
}

impl OptimisticUpdate {
    pub async fn apply<T, F>(cache: &QueryCache, key: QueryKey, update: F) -> Result<Self, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        let snapshot = cache.raw(&key).await;
        if let Some(current) = snapshot.clone() {
            let current: T = serde_json::from_value(current)?;
            cache.set_data(key.clone(), &update(current)).await?;
        }
        Ok(Self { key, snapshot })
    }

    /// The server accepted the change; mark the query stale so the next read
    /// reflects server state.
    pub async fn commit(self, cache: &QueryCache) {
        cache.invalidate(&self.key).await;
    }

    /// The server refused the change; put the snapshot back.
    pub async fn revert(self, cache: &QueryCache) {
        match self.snapshot {
            Some(previous) => cache.put_raw(self.key, previous).await,
            None => cache.remove(&self.key).await,
        }
    }
}

pub async fn run_optimistic<T, F, Fut, R>(
    cache: &QueryCache,
    key: QueryKey,
    update: F,
    mutation: Fut,
) -> Result<R, AppError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(T) -> T,
    Fut: Future<Output = Result<R, AppError>>,
{
    let pending = OptimisticUpdate::apply(cache, key.clone(), update).await?;
    match mutation.await {
        Ok(outcome) => {
            pending.commit(cache).await;
            Ok(outcome)
        }
        Err(e) => {
            tracing::warn!(key = %key, error.message = %e, "rolling back optimistic update");
            pending.revert(cache).await;
            Err(e)
        }
    }
}

pub async fn remove_from_list<T, Fut, R>(
    cache: &QueryCache,
    key: QueryKey,
    id: &str,
    id_of: fn(&T) -> &str,
    mutation: Fut,
) -> Result<R, AppError>
where
    T: Serialize + DeserializeOwned,
    Fut: Future<Output = Result<R, AppError>>,
{
    run_optimistic(
        cache,
        key,
        |list: Vec<T>| list.into_iter().filter(|item| id_of(item) != id).collect(),
        mutation,
    )
    .await
}
