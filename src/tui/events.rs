// Key handling: one key press maps to one dashboard action.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PreviousTab,
    CycleFocus,
    MoveUp,
    MoveDown,
    NextValue,
    PreviousValue,
    ClearFilters,
    Export,
    JumpToTab(usize),
    Redraw,
}

pub struct EventHandler {
    poll_interval: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Non-blocking poll; None means nothing actionable happened.
    pub fn poll(&mut self) -> Result<Option<Action>> {
        if event::poll(self.poll_interval)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Self::map_key(key.code));
                }
                Event::Resize(_, _) => return Ok(Some(Action::Redraw)),
                _ => {}
            }
        }
        Ok(None)
    }

    fn map_key(code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PreviousTab),
            KeyCode::Char('f') => Some(Action::CycleFocus),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextValue),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousValue),
            KeyCode::Char('c') => Some(Action::ClearFilters),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char(c @ '1'..='6') => {
                Some(Action::JumpToTab(c as usize - '1' as usize))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(EventHandler::map_key(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(EventHandler::map_key(KeyCode::Tab), Some(Action::NextTab));
        assert_eq!(
            EventHandler::map_key(KeyCode::Char('3')),
            Some(Action::JumpToTab(2))
        );
        assert_eq!(EventHandler::map_key(KeyCode::Char('z')), None);
    }
}
