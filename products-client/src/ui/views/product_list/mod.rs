//! Product list screen.
//!
//! Layout, top to bottom: title - search box - table - pagination - status -
//! help bar. Loading and error states replace the table body; the delete
//! prompt and the add/edit placeholders are drawn as popups on top.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{palette::tailwind, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState as SelectionState},
    Frame,
};

use crate::cmd::{Route, DELETE_PROMPT};
use crate::store::LoadState;
use crate::table::{Column, TableView};
use crate::ui::{
    app::{App, StatusLevel},
    colors,
    components::{draw_help_bar, draw_pagination, list_hints},
    events::InputMode,
    layout::{centered, name_column_width},
};

const SEARCH_PLACEHOLDER: &str = "Search product name";

pub fn draw(f: &mut Frame, app: &App) {
    let [title_area, search_area, _blank, body_area, pager_area, status_area, help_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(f.area());

    draw_title(f, title_area, app);
    draw_search(f, search_area, app);

    let view = app.view();
    match app.snapshot.state() {
        LoadState::Failed(err) => draw_message(
            f,
            body_area,
            "Error loading data...",
            Some(err.to_string()),
            colors::DANGER,
        ),
        LoadState::Loading => draw_message(f, body_area, "Loading....", None, colors::LOADING),
        LoadState::Ready(_) => {
            draw_table(f, body_area, &view, app.selected);
            draw_pagination(f, pager_area, &view);
        }
    }

    draw_status(f, status_area, app);
    draw_help_bar(f, help_area, &list_hints(app.mode));

    if app.mode == InputMode::Confirm {
        draw_popup(f, "Delete", &[DELETE_PROMPT, "", "y: yes   n: no"]);
    }
    match app.route.current() {
        Route::List => {}
        Route::Add => draw_popup(f, "Add product", &["Not available in the terminal.", "", "Esc: back to list"]),
        Route::Edit(id) => {
            let title = format!("Edit product {id}");
            draw_popup(f, &title, &["Not available in the terminal.", "", "Esc: back to list"]);
        }
    }
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            "Products",
            Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", app.route.current()), Style::default().fg(colors::MUTED)),
    ];
    if let Some(at) = app.snapshot.fetched_at {
        spans.push(Span::styled(
            format!("  updated {}", at.with_timezone(&Local).format("%H:%M:%S")),
            Style::default().fg(colors::MUTED),
        ));
    }
    if app.snapshot.is_validating {
        spans.push(Span::styled("  refreshing…", Style::default().fg(colors::LOADING)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.mode == InputMode::Filter;
    let current = if editing {
        app.filter_input.clone()
    } else {
        app.table.state().global_filter.clone().unwrap_or_default()
    };

    let value = if current.is_empty() && !editing {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(colors::MUTED))
    } else if editing {
        Span::styled(
            format!("{current}▏"),
            Style::default().fg(colors::SEARCH_TEXT).bg(colors::SURFACE),
        )
    } else {
        Span::styled(current, Style::default().fg(colors::SEARCH_TEXT))
    };

    let line = Line::from(vec![
        Span::styled(
            " Add New ",
            Style::default()
                .fg(ratatui::style::Color::White)
                .bg(colors::POSITIVE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Search: "),
        value,
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn header_label(column: Column, view: &TableView) -> String {
    let marker = match view.sort {
        Some(sort) if sort.column == column && sort.descending => " ▼",
        Some(sort) if sort.column == column => " ▲",
        _ => "",
    };
    format!("{}{}", column.header(), marker)
}

fn draw_table(f: &mut Frame, area: Rect, view: &TableView, selected: usize) {
    let header = Row::new(
        Column::ALL
            .iter()
            .map(|c| Cell::from(header_label(*c, view))),
    )
    .style(
        Style::default()
            .fg(tailwind::GRAY.c300)
            .bg(colors::SURFACE)
            .add_modifier(Modifier::BOLD),
    );

    let rows = view.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.number.to_string()),
            Cell::from(row.product.name.clone()),
            Cell::from(row.product.quantity.to_string()),
            Cell::from(row.product.price.to_string()),
            Cell::from(Line::from(vec![
                Span::styled("[e] Edit", Style::default().fg(colors::ACCENT)),
                Span::raw("  "),
                Span::styled("[d] Delete", Style::default().fg(colors::DANGER)),
            ])),
        ])
    });

    let name_width = name_column_width(
        view.rows.iter().map(|r| r.product.name.as_str()),
        &header_label(Column::Name, view),
        2,
    );
    let widths = [
        Constraint::Length(5),
        Constraint::Length(name_width),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors::MUTED)))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut selection = SelectionState::default();
    if !view.rows.is_empty() {
        selection.select(Some(selected));
    }
    f.render_stateful_widget(table, area, &mut selection);
}

fn draw_message(
    f: &mut Frame,
    area: Rect,
    headline: &str,
    detail: Option<String>,
    color: ratatui::style::Color,
) {
    let mut lines = vec![Line::styled(
        headline.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(detail) = detail {
        lines.push(Line::styled(detail, Style::default().fg(colors::MUTED)));
        lines.push(Line::styled("r: reload", Style::default().fg(colors::MUTED)));
    }
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = &app.status else {
        return;
    };
    let color = match status.level {
        StatusLevel::Info => colors::POSITIVE,
        StatusLevel::Error => colors::DANGER,
    };
    f.render_widget(
        Paragraph::new(Span::styled(status.text.clone(), Style::default().fg(color))),
        area,
    );
}

fn draw_popup(f: &mut Frame, title: &str, lines: &[&str]) {
    let width = lines
        .iter()
        .map(|l| l.chars().count() as u16)
        .max()
        .unwrap_or(0)
        .max(title.chars().count() as u16)
        + 6;
    let area = centered(f.area(), width, lines.len() as u16 + 2);
    let text: Vec<Line> = lines.iter().map(|l| Line::from(l.to_string())).collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::ACCENT)),
        ),
        area,
    );
}
