use tracing::{info, warn};

use super::{Confirm, Navigator, RowActions};
use crate::api::ProductApi;
use crate::error::MutationError;
use crate::store::PRODUCTS_KEY;
use crate::structs::ProductId;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

impl<A, C, N> RowActions<A, C, N>
where
    A: ProductApi,
    C: Confirm,
    N: Navigator,
{
    /// Asks for confirmation, deletes, then refetches the product list.
    ///
    /// A declined prompt touches nothing. A failed delete leaves the cache as
    /// it was, so the row stays visible.
    #[tracing::instrument(skip(self))]
    pub async fn request_delete(&self, id: &ProductId) -> Result<DeleteOutcome, MutationError> {
        if !self.confirm.confirm(DELETE_PROMPT) {
            info!(%id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        self.cache.api().delete(id).await.map_err(|source| {
            warn!(%id, error = %source, "delete failed");
            MutationError::Delete {
                id: id.to_string(),
                source,
            }
        })?;

        self.cache.invalidate(PRODUCTS_KEY).await;
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::cmd::testing::{product, RecordingApi, RecordingNavigator};
    use crate::store::ResourceCache;

    #[tokio::test]
    async fn test_confirmed_delete_calls_backend_then_invalidates() {
        let api = Arc::new(RecordingApi::with_rows(vec![
            product(1, "Pen"),
            product(2, "Book"),
        ]));
        let cache = ResourceCache::new(Arc::clone(&api));
        cache.load(PRODUCTS_KEY).await.unwrap();

        let asked = Cell::new(0);
        let confirm = |prompt: &str| {
            asked.set(asked.get() + 1);
            assert_eq!(prompt, DELETE_PROMPT);
            true
        };
        let actions = RowActions::new(cache.clone(), confirm, RecordingNavigator::default());

        let outcome = actions.request_delete(&ProductId::from(1)).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(asked.get(), 1);
        assert_eq!(*api.deleted.lock().unwrap(), vec![ProductId::from(1)]);

        let rows = cache.load(PRODUCTS_KEY).await.unwrap();
        assert_eq!(api.list_calls(), 2);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Book");
    }

    #[tokio::test]
    async fn test_declined_delete_has_no_side_effect() {
        let api = Arc::new(RecordingApi::with_rows(vec![product(1, "Pen")]));
        let cache = ResourceCache::new(Arc::clone(&api));
        cache.load(PRODUCTS_KEY).await.unwrap();

        let actions = RowActions::new(cache.clone(), |_: &str| false, RecordingNavigator::default());
        let outcome = actions.request_delete(&ProductId::from(1)).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(api.deleted.lock().unwrap().is_empty());
        assert_eq!(api.list_calls(), 1);
        assert!(!cache.snapshot(PRODUCTS_KEY).await.is_validating);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cache_and_reports() {
        let api = Arc::new(RecordingApi::failing(vec![product(1, "Pen")]));
        let cache = ResourceCache::new(Arc::clone(&api));
        cache.load(PRODUCTS_KEY).await.unwrap();

        let actions = RowActions::new(cache.clone(), |_: &str| true, RecordingNavigator::default());
        let err = actions
            .request_delete(&ProductId::from(1))
            .await
            .unwrap_err();

        assert!(matches!(err, MutationError::Delete { ref id, .. } if id == "1"));
        assert_eq!(api.list_calls(), 1);
        let snap = cache.snapshot(PRODUCTS_KEY).await;
        assert!(!snap.is_validating);
        assert_eq!(snap.data.unwrap()[0].name, "Pen");
    }
}
