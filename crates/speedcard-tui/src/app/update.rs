use chrono::Local;
use ratatui::layout::Position;
use speedcard_core::config_file;
use speedcard_core::{GateMode, StoreError};

use super::{App, InputMode};
use crate::action::Action;
use crate::theme::Theme;
use crate::tui_event::{WorkerCommand, WorkerEvent};

/// Longest page number the jump prompt accepts.
const MAX_JUMP_DIGITS: usize = 6;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::ForceQuit => {
                self.should_quit = true;
                return true;
            }
            Action::Resize(..) | Action::None => return false,
            _ => {}
        }

        // Quit confirmation modal — q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit | Action::Confirm => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        // Gate dialog intercepts
        if let Some(mode) = self.session.gate().mode() {
            self.update_gate(mode, action);
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Quit => self.confirm_quit = true,
                _ => {}
            }
            return false;
        }

        match self.input_mode {
            InputMode::Normal => self.update_normal(action),
            InputMode::EditNote => self.update_edit_note(action),
            InputMode::JumpToPage => self.update_jump(action),
        }
        self.should_quit
    }

    /// Apply a message from the background worker.
    pub fn handle_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::ExportFinished(result) => {
                self.exports_in_flight = self.exports_in_flight.saturating_sub(1);
                match result {
                    Ok(artifact) => {
                        self.set_status(format!("Saved {}", artifact.path.display()));
                        self.last_export = Some(artifact.path);
                    }
                    Err(msg) => self.set_error(format!("Export failed: {msg}")),
                }
            }
        }
    }

    fn update_gate(&mut self, mode: GateMode, action: Action) {
        match (mode, action) {
            (_, Action::Quit) => self.confirm_quit = true,
            (GateMode::Reset, Action::Confirm | Action::DrillIn) => {
                if self.session.confirm().is_ok() {
                    self.input_mode = InputMode::Normal;
                    self.note_cursor = 0;
                    self.last_saved = None;
                    self.set_status("Meeting reset");
                }
            }
            (GateMode::Reset, Action::NavigateBack) => {
                self.session.cancel();
            }
            (
                GateMode::ExportBlocked,
                Action::Confirm | Action::DrillIn | Action::NavigateBack,
            ) => {
                self.session.acknowledge();
            }
            _ => {}
        }
    }

    fn update_normal(&mut self, action: Action) {
        match action {
            Action::Quit => self.confirm_quit = true,
            Action::ToggleHelp => self.show_help = true,
            Action::NextPage => {
                self.session.next_page();
            }
            Action::PrevPage => {
                self.session.prev_page();
            }
            Action::FirstPage => {
                self.session.first_page();
            }
            Action::LastPage => {
                self.session.last_page();
            }
            Action::StartJump => {
                self.jump_buffer.clear();
                self.input_mode = InputMode::JumpToPage;
            }
            Action::ToggleFlag => {
                if let Some(id) = self.session.current_entry().map(|e| e.id) {
                    let result = self.session.toggle_flag(id);
                    self.record_save(result);
                }
            }
            Action::DrillIn | Action::StartEditNote => {
                if let Some(entry) = self.session.current_entry() {
                    self.note_cursor = entry.note.len();
                    self.input_mode = InputMode::EditNote;
                }
            }
            Action::NavigateBack => {
                if self.session.summary_visible() {
                    self.session.toggle_summary();
                }
            }
            Action::ToggleSummary => {
                self.session.toggle_summary();
            }
            Action::Export => self.start_export(),
            Action::CycleExportFormat => {
                self.export_format = self.export_format.next();
                self.set_status(format!("Export format: {}", self.export_format.label()));
            }
            Action::Reset => {
                self.session.request_reset();
            }
            Action::ToggleLargePager => {
                self.large_pager = !self.large_pager;
            }
            Action::CycleTheme => {
                let name = Theme::next_name(&self.theme_name);
                self.theme = Theme::by_name(name);
                self.theme_name = name.to_string();
            }
            Action::SavePreferences => self.save_preferences(),
            Action::ClickAt(x, y) => self.handle_click(x, y),
            _ => {}
        }
    }

    fn update_edit_note(&mut self, action: Action) {
        match action {
            Action::TextCancel | Action::NavigateBack => {
                self.input_mode = InputMode::Normal;
            }
            Action::TextInput(ch) => self.edit_note(|note, cursor| {
                note.insert(*cursor, ch);
                *cursor += ch.len_utf8();
            }),
            Action::TextBackspace => self.edit_note(|note, cursor| {
                if *cursor > 0 {
                    let prev = note[..*cursor]
                        .char_indices()
                        .next_back()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    note.drain(prev..*cursor);
                    *cursor = prev;
                }
            }),
            Action::DeleteForward => self.edit_note(|note, cursor| {
                if *cursor < note.len() {
                    let next = *cursor
                        + note[*cursor..]
                            .chars()
                            .next()
                            .map(|c| c.len_utf8())
                            .unwrap_or(0);
                    note.drain(*cursor..next);
                }
            }),
            Action::CursorLeft => {
                let note = self.current_note();
                self.note_cursor = note[..self.note_cursor.min(note.len())]
                    .char_indices()
                    .next_back()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
            }
            Action::CursorRight => {
                let note = self.current_note();
                let cur = self.note_cursor.min(note.len());
                self.note_cursor = cur
                    + note[cur..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
            }
            Action::CursorHome => self.note_cursor = 0,
            Action::CursorEnd => self.note_cursor = self.current_note().len(),
            Action::ClickAt(x, y) => {
                self.input_mode = InputMode::Normal;
                self.handle_click(x, y);
            }
            _ => {}
        }
    }

    fn update_jump(&mut self, action: Action) {
        match action {
            Action::TextInput(ch) => {
                if self.jump_buffer.len() < MAX_JUMP_DIGITS {
                    self.jump_buffer.push(ch);
                }
            }
            Action::TextBackspace => {
                self.jump_buffer.pop();
            }
            Action::TextCancel | Action::NavigateBack => {
                self.jump_buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            Action::TextConfirm => {
                let buf = std::mem::take(&mut self.jump_buffer);
                self.input_mode = InputMode::Normal;
                match buf.parse::<i64>() {
                    Ok(page) => {
                        if let Err(e) = self.session.go_to_page(page) {
                            self.set_error(format!("Can't go there: {e}"));
                        }
                    }
                    Err(_) if buf.is_empty() => {}
                    Err(_) => self.set_error(format!("Not a page number: {buf}")),
                }
            }
            _ => {}
        }
    }

    fn current_note(&self) -> String {
        self.session
            .current_entry()
            .map(|e| e.note.clone())
            .unwrap_or_default()
    }

    /// Edit the current entry's note in place and save it straight away.
    fn edit_note(&mut self, edit: impl FnOnce(&mut String, &mut usize)) {
        let Some((id, mut note)) = self
            .session
            .current_entry()
            .map(|e| (e.id, e.note.clone()))
        else {
            return;
        };
        let mut cursor = self.note_cursor.min(note.len());
        if !note.is_char_boundary(cursor) {
            cursor = note.len();
        }
        edit(&mut note, &mut cursor);
        self.note_cursor = cursor;
        let result = self.session.set_note(id, &note);
        self.record_save(result);
    }

    fn record_save(&mut self, result: Result<(), StoreError>) {
        match result {
            Ok(()) => self.last_saved = Some(Local::now()),
            Err(e) => self.set_error(format!("Could not save: {e}")),
        }
    }

    fn start_export(&mut self) {
        // Nobody flagged: the session opens the gate instead.
        let Some(entries) = self.session.prepare_export() else {
            return;
        };
        let count = entries.len();
        let format = self.export_format;
        let sent = self
            .worker_tx
            .as_ref()
            .map(|tx| tx.send(WorkerCommand::Export { entries, format }).is_ok());

        match sent {
            Some(true) => {
                self.exports_in_flight += 1;
                self.set_status(format!("Exporting {count} as {}", format.label()));
            }
            Some(false) => self.set_error("Export worker stopped"),
            None => self.set_error("Export is unavailable"),
        }
    }

    /// Persist theme, pager size and export format to the config file.
    fn save_preferences(&mut self) {
        let Some(path) = self.config_path.clone() else {
            self.set_error("No config location to save to");
            return;
        };
        match config_file::save_preferences(
            &path,
            &self.theme_name,
            self.large_pager,
            self.export_format.extension(),
        ) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "preferences saved");
                self.set_status(format!("Preferences saved to {}", path.display()));
            }
            Err(e) => self.set_error(format!("Could not save preferences: {e}")),
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) {
        let pos = Position::new(x, y);
        let target = self
            .pager_hitboxes
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, page)| *page);
        if let Some(page) = target {
            let _ = self.session.go_to_page(page as i64);
        }
    }
}
