use tracing::debug;

use super::{Confirm, Navigator, Route, RowActions};
use crate::api::ProductApi;
use crate::structs::ProductId;

impl<A, C, N> RowActions<A, C, N>
where
    A: ProductApi,
    C: Confirm,
    N: Navigator,
{
    pub fn request_edit(&self, id: &ProductId) {
        debug!(%id, "navigate to edit");
        self.navigator.navigate(Route::Edit(id.clone()));
    }

    pub fn request_add(&self) {
        debug!("navigate to add");
        self.navigator.navigate(Route::Add);
    }

    pub fn back_to_list(&self) {
        self.navigator.navigate(Route::List);
    }
}
