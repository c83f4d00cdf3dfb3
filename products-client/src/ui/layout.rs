//! Layout utilities for the list screen.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
};

/// Maximum width of the product name column.
pub const MAX_NAME_WIDTH: u16 = 60;

/// Width of the longest name (plus padding), never narrower than the header.
pub fn name_column_width<'a>(
    names: impl Iterator<Item = &'a str>,
    header: &'a str,
    padding: u16,
) -> u16 {
    names
        .chain(std::iter::once(header))
        .map(|name| Line::from(name).width() as u16 + padding)
        .max()
        .unwrap_or(1)
        .clamp(1, MAX_NAME_WIDTH)
}

/// A `width` x `height` rectangle centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}
