//! State of the list screen, independent of the terminal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::cmd::{Confirm, Navigator, Route};
use crate::store::{LoadState, ResourceSnapshot};
use crate::structs::ProductId;
use crate::table::{ProductTable, TableState, TableView};
use crate::ui::events::{Action, InputMode};

/// Work the session has to await on behalf of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Delete(ProductId),
    Edit(ProductId),
    Add,
    Back,
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// The answer given on the delete prompt, consumed by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct PromptAnswer(Rc<Cell<Option<bool>>>);

impl PromptAnswer {
    pub fn set(&self, yes: bool) {
        self.0.set(Some(yes));
    }
}

impl Confirm for PromptAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0.take().unwrap_or(false)
    }
}

/// Navigator that records where the shell currently is.
#[derive(Debug, Clone)]
pub struct SharedRoute(Rc<RefCell<Route>>);

impl Default for SharedRoute {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(Route::List)))
    }
}

impl SharedRoute {
    pub fn current(&self) -> Route {
        self.0.borrow().clone()
    }
}

impl Navigator for SharedRoute {
    fn navigate(&self, route: Route) {
        tracing::info!(%route, "navigate");
        *self.0.borrow_mut() = route;
    }
}

pub struct App {
    pub table: ProductTable,
    pub snapshot: ResourceSnapshot,
    pub mode: InputMode,
    pub filter_input: String,
    pub selected: usize,
    pub pending_delete: Option<ProductId>,
    pub status: Option<StatusMessage>,
    pub route: SharedRoute,
    pub answer: PromptAnswer,
    pub should_quit: bool,
}

impl App {
    pub fn new(state: TableState, route: SharedRoute, answer: PromptAnswer) -> Self {
        Self {
            table: ProductTable::new(state),
            snapshot: ResourceSnapshot::default(),
            mode: InputMode::Normal,
            filter_input: String::new(),
            selected: 0,
            pending_delete: None,
            status: None,
            route,
            answer,
            should_quit: false,
        }
    }

    pub fn view(&self) -> TableView {
        self.table.view()
    }

    /// Takes a new cache snapshot; the table only swaps rows when the cache
    /// committed a different collection.
    pub fn apply_snapshot(&mut self, snapshot: ResourceSnapshot) {
        if let Some(rows) = &snapshot.data {
            if !Arc::ptr_eq(rows, self.table.rows()) {
                self.table.set_data(Arc::clone(rows));
                self.clamp_selection();
            }
        }
        self.snapshot = snapshot;
    }

    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    fn clamp_selection(&mut self) {
        let visible = self.view().rows.len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    fn selected_id(&self) -> Option<ProductId> {
        if !matches!(self.snapshot.state(), LoadState::Ready(_)) {
            return None;
        }
        self.view()
            .rows
            .get(self.selected)
            .map(|row| row.product.id.clone())
    }

    fn apply_filter_input(&mut self) {
        self.table
            .set_global_filter(Some(self.filter_input.clone()));
        self.selected = 0;
    }

    pub fn handle(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => {
                if self.route.current() != Route::List {
                    return Some(Effect::Back);
                }
                self.status = None;
            }
            Action::StartFilter => {
                self.mode = InputMode::Filter;
                self.filter_input = self.table.state().global_filter.clone().unwrap_or_default();
            }
            Action::FilterInput(c) => {
                self.filter_input.push(c);
                self.apply_filter_input();
            }
            Action::FilterBackspace => {
                self.filter_input.pop();
                self.apply_filter_input();
            }
            Action::FilterCommit => self.mode = InputMode::Normal,
            Action::FilterCancel => {
                self.filter_input.clear();
                self.apply_filter_input();
                self.mode = InputMode::Normal;
            }
            Action::ToggleSort(column) => self.table.toggle_sort(column),
            Action::FirstPage => {
                self.table.first_page();
                self.selected = 0;
            }
            Action::PreviousPage => {
                self.table.previous_page();
                self.selected = 0;
            }
            Action::NextPage => {
                self.table.next_page();
                self.selected = 0;
            }
            Action::LastPage => {
                self.table.last_page();
                self.selected = 0;
            }
            Action::CyclePageSize => {
                let next = self.table.state().page_size.next();
                self.table.set_page_size(next);
                self.clamp_selection();
            }
            Action::SelectNext => {
                self.selected += 1;
                self.clamp_selection();
            }
            Action::SelectPrevious => self.selected = self.selected.saturating_sub(1),
            Action::Delete => {
                if let Some(id) = self.selected_id() {
                    self.pending_delete = Some(id);
                    self.mode = InputMode::Confirm;
                }
            }
            Action::Answer(yes) => {
                self.mode = InputMode::Normal;
                if let Some(id) = self.pending_delete.take() {
                    self.answer.set(yes);
                    return Some(Effect::Delete(id));
                }
            }
            Action::Edit => return self.selected_id().map(Effect::Edit),
            Action::Add => return Some(Effect::Add),
            Action::Reload => return Some(Effect::Reload),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::product;
    use crate::error::FetchError;
    use crate::store::Rows;
    use crate::table::{Column, PageSize};

    fn ready(rows: Vec<crate::structs::Product>) -> ResourceSnapshot {
        ResourceSnapshot {
            data: Some(Rows::from(rows)),
            ..ResourceSnapshot::default()
        }
    }

    fn app() -> App {
        App::new(
            TableState::default(),
            SharedRoute::default(),
            PromptAnswer::default(),
        )
    }

    fn twelve() -> Vec<crate::structs::Product> {
        (1..=12).map(|i| product(i, &format!("p{i:02}"))).collect()
    }

    #[test]
    fn test_typing_filters_live() {
        let mut app = app();
        app.apply_snapshot(ready(vec![product(1, "Pen"), product(2, "Book")]));

        app.handle(Action::StartFilter);
        assert_eq!(app.mode, InputMode::Filter);
        app.handle(Action::FilterInput('b'));
        assert_eq!(app.view().rows.len(), 1);

        app.handle(Action::FilterBackspace);
        assert_eq!(app.view().rows.len(), 2);
        assert_eq!(app.table.state().global_filter, None);
    }

    #[test]
    fn test_delete_asks_then_hands_answer_to_dispatcher() {
        let mut app = app();
        app.apply_snapshot(ready(vec![product(1, "Pen"), product(2, "Book")]));
        app.handle(Action::SelectNext);

        assert_eq!(app.handle(Action::Delete), None);
        assert_eq!(app.mode, InputMode::Confirm);

        let effect = app.handle(Action::Answer(false));
        assert_eq!(effect, Some(Effect::Delete(ProductId::from(2))));
        assert!(!app.answer.confirm("ignored"));
        // the answer is consumed
        assert!(!app.answer.confirm("ignored"));
    }

    #[test]
    fn test_no_row_actions_while_loading_or_failed() {
        let mut app = app();
        assert_eq!(app.handle(Action::Edit), None);

        app.apply_snapshot(ResourceSnapshot {
            error: Some(FetchError::Abandoned("products".into())),
            ..ResourceSnapshot::default()
        });
        app.handle(Action::Delete);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.handle(Action::Reload), Some(Effect::Reload));
    }

    #[test]
    fn test_selection_stays_on_visible_rows() {
        let mut app = app();
        app.apply_snapshot(ready(twelve()));
        for _ in 0..10 {
            app.handle(Action::SelectNext);
        }
        assert_eq!(app.selected, 4);

        app.handle(Action::LastPage);
        app.handle(Action::SelectNext);
        app.handle(Action::SelectNext);
        assert_eq!(app.selected, 1);
        assert_eq!(app.handle(Action::Edit), Some(Effect::Edit(ProductId::from(12))));
    }

    #[test]
    fn test_new_snapshot_keeps_page_valid() {
        let mut app = app();
        app.apply_snapshot(ready(twelve()));
        app.handle(Action::LastPage);
        assert_eq!(app.view().page_index, 2);

        app.apply_snapshot(ready(twelve().into_iter().take(6).collect()));
        assert_eq!(app.table.state().page_index, 1);
    }

    #[test]
    fn test_sort_and_page_size_keys() {
        let mut app = app();
        app.apply_snapshot(ready(twelve()));
        app.handle(Action::ToggleSort(Column::Name));
        app.handle(Action::ToggleSort(Column::Name));
        assert_eq!(app.view().rows[0].product.name, "p12");

        app.handle(Action::CyclePageSize);
        assert_eq!(app.table.state().page_size, PageSize::Ten);
    }

    #[test]
    fn test_back_only_leaves_add_or_edit() {
        let mut app = app();
        assert_eq!(app.handle(Action::Back), None);

        app.route.navigate(Route::Add);
        assert_eq!(app.handle(Action::Back), Some(Effect::Back));
    }
}
