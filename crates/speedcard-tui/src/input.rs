use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::ForceQuit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::EditNote => map_key_edit_note(key),
                InputMode::JumpToPage => map_key_jump(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::NextPage,
        MouseEventKind::ScrollUp => Action::PrevPage,
        MouseEventKind::Down(MouseButton::Left) => Action::ClickAt(mouse.column, mouse.row),
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('l') | KeyCode::Right => Action::NextPage,
        KeyCode::Char('h') | KeyCode::Left => Action::PrevPage,
        KeyCode::Home => Action::FirstPage,
        KeyCode::End => Action::LastPage,
        KeyCode::Char(':') => Action::StartJump,
        KeyCode::Char(' ') | KeyCode::Char('x') => Action::ToggleFlag,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Char('i') => Action::StartEditNote,
        KeyCode::Char('y') => Action::Confirm,
        KeyCode::Esc | KeyCode::Char('n') => Action::NavigateBack,
        KeyCode::Char('s') => Action::ToggleSummary,
        KeyCode::Char('e') => Action::Export,
        KeyCode::Char('f') => Action::CycleExportFormat,
        KeyCode::Char('R') => Action::Reset,
        KeyCode::Char('b') => Action::ToggleLargePager,
        KeyCode::Char('t') => Action::CycleTheme,
        KeyCode::Char('w') => Action::SavePreferences,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_edit_note(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::TextCancel,
        KeyCode::Enter => Action::TextInput('\n'),
        KeyCode::Char(c) => Action::TextInput(c),
        KeyCode::Backspace => Action::TextBackspace,
        KeyCode::Delete => Action::DeleteForward,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Home => Action::CursorHome,
        KeyCode::End => Action::CursorEnd,
        _ => Action::None,
    }
}

fn map_key_jump(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::TextCancel,
        KeyCode::Enter => Action::TextConfirm,
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => Action::TextInput(c),
        KeyCode::Backspace => Action::TextBackspace,
        _ => Action::None,
    }
}
