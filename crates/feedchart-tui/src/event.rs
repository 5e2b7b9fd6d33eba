//! Keyboard input handling for the dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application-level events that can trigger state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Show help overlay
    ShowHelp,
    /// Hide help overlay
    HideHelp,
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// Redraw the whole screen
    Redraw,
    /// Close the overlay, or quit when none is open
    Cancel,
    /// No action needed
    None,
}

/// Input handler for converting key events to app events.
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Whether the help overlay is open; any key closes it
    help_open: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell the handler whether the help overlay is showing.
    pub fn set_help_open(&mut self, open: bool) {
        self.help_open = open;
    }

    /// Handle a key event and return the corresponding app event.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppEvent {
        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
            return AppEvent::Redraw;
        }

        if key.code == KeyCode::Esc {
            return AppEvent::Cancel;
        }

        if self.help_open {
            return AppEvent::HideHelp;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => AppEvent::ShowHelp,
            KeyCode::Char('r') | KeyCode::Char('R') => AppEvent::Redraw,
            _ => AppEvent::None,
        }
    }
}
