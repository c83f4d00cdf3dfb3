//! Terminal front-end for the product list.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         session.rs                              │
//! │  input thread ──► event_loop ◄── cache snapshots (watch)        │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  app.rs: App (table state, selection, prompt) ──► Effect        │
//! │  views/: product list screen                                    │
//! │  components/: help bar, pagination                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Effects (delete, reload, navigation) are awaited by the session through
//! the row action dispatcher.

pub mod app;
pub mod colors;
pub mod components;
pub mod events;
pub mod layout;
pub mod session;
pub mod views;

pub use session::run;
