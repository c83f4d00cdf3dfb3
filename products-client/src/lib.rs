//! Client-side product table: a fetch-or-reuse cache over the products REST
//! backend, a sortable/filterable/paginated view over the cached rows, the
//! row actions (delete, add, edit), and a terminal front-end.

use std::backtrace::Backtrace;
use std::panic;
use tracing::error;

pub mod api;
pub mod cmd;
pub mod config;
pub mod error;
pub mod filter;
pub mod log;
pub mod sort;
pub mod store;
pub mod structs;
pub mod table;
pub mod ui;

pub use api::{HttpProductApi, ProductApi};
pub use cmd::{Confirm, DeleteOutcome, Navigator, Route, RowActions};
pub use config::ClientConfig;
pub use error::{ApiError, FetchError, MutationError};
pub use store::{LoadState, ResourceCache, ResourceSnapshot, PRODUCTS_KEY};
pub use structs::{Product, ProductId, ProductInput};
pub use table::{derive_view, Column, PageSize, ProductTable, TableState, TableView};

/// Logs panics with a backtrace before handing over to the previous hook.
pub fn install_panic_hook() {
    let default = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let bt = Backtrace::force_capture();
        error!(target: "panic",
               "panic: {panic_info}\n\nBacktrace:\n{bt}");
        default(panic_info);
    }));
}
