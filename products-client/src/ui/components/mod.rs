//! Reusable UI components.

mod help_bar;
mod pagination;

pub use help_bar::{draw_help_bar, list_hints};
pub use pagination::draw_pagination;
