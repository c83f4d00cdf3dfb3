//! Pagination controls: `<< < Page N of M > >>  Show N`.

use ratatui::{
    prelude::*,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::table::TableView;
use crate::ui::colors;

fn button(label: &'static str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::MUTED)
    };
    Span::styled(format!(" {label} "), style)
}

pub fn pagination_line(view: &TableView) -> Line<'static> {
    let can_previous = view.can_previous_page();
    let can_next = view.can_next_page();
    Line::from(vec![
        button("<<", can_previous),
        button("<", can_previous),
        Span::raw(" Page "),
        Span::styled(
            format!("{} of {}", view.page_index + 1, view.page_count),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        button(">", can_next),
        button(">>", can_next),
        Span::styled(
            format!("  Show {}", view.page_size.get()),
            Style::default().fg(colors::ACCENT),
        ),
    ])
}

pub fn draw_pagination(f: &mut Frame, area: Rect, view: &TableView) {
    f.render_widget(
        Paragraph::new(pagination_line(view)).alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{derive_view, TableState};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_empty_table_reads_page_one_of_one() {
        let view = derive_view(&[], &TableState::default());
        let line = text(&pagination_line(&view));
        assert!(line.contains("Page 1 of 1"));
        assert!(line.contains("Show 5"));
    }
}
