//! Key handling: maps crossterm key events to table actions, and runs the
//! blocking input reader that feeds the session loop.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::table::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box.
    Filter,
    /// Waiting for y/n on the delete prompt.
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,
    StartFilter,
    FilterInput(char),
    FilterBackspace,
    FilterCommit,
    FilterCancel,
    ToggleSort(Column),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    CyclePageSize,
    SelectNext,
    SelectPrevious,
    Delete,
    Answer(bool),
    Edit,
    Add,
    Reload,
}

pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Filter => match key.code {
            KeyCode::Char(c) => Some(Action::FilterInput(c)),
            KeyCode::Backspace => Some(Action::FilterBackspace),
            KeyCode::Enter => Some(Action::FilterCommit),
            KeyCode::Esc => Some(Action::FilterCancel),
            _ => None,
        },
        InputMode::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Action::Answer(true)),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Answer(false)),
            _ => None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Char('/') => Some(Action::StartFilter),
            KeyCode::Char('1') => Some(Action::ToggleSort(Column::Name)),
            KeyCode::Char('2') => Some(Action::ToggleSort(Column::Quantity)),
            KeyCode::Char('3') => Some(Action::ToggleSort(Column::Price)),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PreviousPage),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextPage),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
            KeyCode::Char('s') => Some(Action::CyclePageSize),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::Delete),
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::Edit),
            KeyCode::Char('a') => Some(Action::Add),
            KeyCode::Char('r') => Some(Action::Reload),
            _ => None,
        },
    }
}

/// Reads terminal events on a dedicated thread and forwards key presses.
/// The thread exits once the receiving side is dropped.
pub fn spawn_input_reader() -> mpsc::UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("products-input".into())
        .spawn(move || {
            while !tx.is_closed() {
                match event::poll(Duration::from_millis(250)) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            if tx.send(key).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(err) => {
                            tracing::warn!(error = %err, "failed to read terminal event");
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to poll terminal");
                        break;
                    }
                }
            }
        })
        .map_err(|err| tracing::error!(error = %err, "failed to spawn input reader"))
        .ok();
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_sort_keys_map_to_sortable_columns() {
        assert_eq!(
            map_key(key(KeyCode::Char('1')), InputMode::Normal),
            Some(Action::ToggleSort(Column::Name))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('3')), InputMode::Normal),
            Some(Action::ToggleSort(Column::Price))
        );
    }

    #[test]
    fn test_filter_mode_captures_letters() {
        assert_eq!(
            map_key(key(KeyCode::Char('q')), InputMode::Filter),
            Some(Action::FilterInput('q'))
        );
        assert_eq!(
            map_key(key(KeyCode::Esc), InputMode::Filter),
            Some(Action::FilterCancel)
        );
    }

    #[test]
    fn test_confirm_mode_only_answers() {
        assert_eq!(
            map_key(key(KeyCode::Char('y')), InputMode::Confirm),
            Some(Action::Answer(true))
        );
        assert_eq!(
            map_key(key(KeyCode::Esc), InputMode::Confirm),
            Some(Action::Answer(false))
        );
        assert_eq!(map_key(key(KeyCode::Char('d')), InputMode::Confirm), None);
    }

    #[test]
    fn test_ctrl_c_quits_in_every_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [InputMode::Normal, InputMode::Filter, InputMode::Confirm] {
            assert_eq!(map_key(ctrl_c, mode), Some(Action::Quit));
        }
    }
}
