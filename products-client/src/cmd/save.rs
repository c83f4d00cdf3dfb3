use tracing::warn;

use super::{Confirm, Navigator, Route, RowActions};
use crate::api::ProductApi;
use crate::error::MutationError;
use crate::store::PRODUCTS_KEY;
use crate::structs::{ProductId, ProductInput};

impl<A, C, N> RowActions<A, C, N>
where
    A: ProductApi,
    C: Confirm,
    N: Navigator,
{
    /// `POST /products`, then back to the refreshed list.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, input: &ProductInput) -> Result<(), MutationError> {
        self.cache.api().create(input).await.map_err(|source| {
            warn!(error = %source, "create failed");
            MutationError::Create(source)
        })?;
        self.cache.invalidate(PRODUCTS_KEY).await;
        self.navigator.navigate(Route::List);
        Ok(())
    }

    /// `PUT /products/{id}`, then back to the refreshed list.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<(), MutationError> {
        self.cache.api().update(id, input).await.map_err(|source| {
            warn!(%id, error = %source, "update failed");
            MutationError::Update {
                id: id.to_string(),
                source,
            }
        })?;
        self.cache.invalidate(PRODUCTS_KEY).await;
        self.navigator.navigate(Route::List);
        Ok(())
    }
}
