//! Row actions: delete with confirmation, add/edit navigation, and the
//! create/update submissions behind the add/edit views.
//!
//! Every mutation that succeeds invalidates the products cache entry; a
//! failed one leaves the cache alone and is handed back to the caller.

use std::fmt;

use crate::api::ProductApi;
use crate::store::{ResourceCache, PRODUCTS_KEY};
use crate::structs::ProductId;

pub mod delete;
pub mod navigate;
pub mod save;

pub use delete::{DeleteOutcome, DELETE_PROMPT};

/// Synchronous yes/no gate in front of destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Navigation destinations of the application shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Add,
    Edit(ProductId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Add => "/add".to_string(),
            Route::Edit(id) => format!("/edit/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}

pub struct RowActions<A, C, N> {
    cache: ResourceCache<A>,
    confirm: C,
    navigator: N,
}

impl<A, C, N> RowActions<A, C, N>
where
    A: ProductApi,
    C: Confirm,
    N: Navigator,
{
    pub fn new(cache: ResourceCache<A>, confirm: C, navigator: N) -> Self {
        Self {
            cache,
            confirm,
            navigator,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// User-triggered refetch, e.g. after a failed load.
    #[tracing::instrument(skip(self))]
    pub async fn reload(&self) {
        self.cache.invalidate(PRODUCTS_KEY).await;
    }
}
