//! Colors of the list screen, named by what they mark.

use ratatui::style::{palette::tailwind, Color};

/// Title, active pagination controls, the edit action and popup borders.
pub const ACCENT: Color = tailwind::SKY.c400;
/// Fetch errors, failed mutations and the delete action.
pub const DANGER: Color = tailwind::RED.c400;
/// The "Add New" button and successful mutations.
pub const POSITIVE: Color = tailwind::EMERALD.c600;
/// "Loading...." and the revalidation marker.
pub const LOADING: Color = tailwind::PURPLE.c300;
/// Text typed into the search box.
pub const SEARCH_TEXT: Color = tailwind::AMBER.c200;
/// Placeholders, hints, borders, disabled controls.
pub const MUTED: Color = tailwind::SLATE.c500;
/// Background of the column header row and the focused search box.
pub const SURFACE: Color = tailwind::SLATE.c700;
