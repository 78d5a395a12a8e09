mod update;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use speedcard_core::{PersistentStore, Session};
use speedcard_reporting::ExportFormat;
use tokio::sync::mpsc;

use crate::theme::Theme;
use crate::tui_event::WorkerCommand;

/// How long a status message stays in the footer.
const STATUS_TTL: Duration = Duration::from_secs(6);

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing goes into the current entry's note.
    EditNote,
    /// Typing builds a page number.
    JumpToPage,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub at: Instant,
}

pub type AppSession = Session<Box<dyn PersistentStore>>;

pub struct App {
    pub session: AppSession,
    pub theme: Theme,
    pub theme_name: String,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// Large page buttons, all pages shown, instead of one compact row.
    pub large_pager: bool,

    /// Byte offset of the cursor in the current entry's note while editing.
    pub note_cursor: usize,
    pub jump_buffer: String,

    pub status: Option<StatusMessage>,
    /// Wall-clock time of the last successful save.
    pub last_saved: Option<DateTime<Local>>,

    pub export_format: ExportFormat,
    pub exports_in_flight: usize,
    pub last_export: Option<PathBuf>,
    /// Channel to the background worker. `None` when running without one.
    pub worker_tx: Option<mpsc::UnboundedSender<WorkerCommand>>,

    /// Where `w` writes display preferences.
    pub config_path: Option<PathBuf>,

    /// Page button areas from the last frame (for mouse click → page mapping).
    pub pager_hitboxes: Vec<(Rect, usize)>,
}

impl App {
    pub fn new(session: AppSession, theme_name: &str) -> Self {
        Self {
            session,
            theme: Theme::by_name(theme_name),
            theme_name: theme_name.to_string(),
            input_mode: InputMode::Normal,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            large_pager: false,
            note_cursor: 0,
            jump_buffer: String::new(),
            status: None,
            last_saved: None,
            export_format: ExportFormat::default(),
            exports_in_flight: 0,
            last_export: None,
            worker_tx: None,
            config_path: None,
            pager_hitboxes: Vec::new(),
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            at: Instant::now(),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
            at: Instant::now(),
        });
    }

    /// The status message, if it is recent enough to show.
    pub fn current_status(&self) -> Option<&StatusMessage> {
        self.status
            .as_ref()
            .filter(|s| s.at.elapsed() < STATUS_TTL)
    }

    fn build_header_line(&self) -> Line<'static> {
        let theme = &self.theme;
        let list = self.session.list();
        Line::from(vec![
            Span::styled(" speedcard ", theme.header_style()),
            Span::styled(
                format!(
                    " Page {}/{} ",
                    self.session.current_page(),
                    self.session.total_pages()
                ),
                Style::default().fg(theme.text),
            ),
            Span::styled(
                format!("Marked {}/{} ", list.flagged_count(), list.len()),
                Style::default().fg(theme.flagged),
            ),
        ])
    }

    fn build_footer_left(&self) -> Line<'static> {
        let theme = &self.theme;
        let key = |k: &str| {
            Span::styled(
                k.to_string(),
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let desc = |d: &str| Span::styled(d.to_string(), theme.footer_style());

        match self.input_mode {
            InputMode::Normal => Line::from(vec![
                key(" \u{2190}/\u{2192}"),
                desc(" page  "),
                key("Space"),
                desc(" mark  "),
                key("Enter"),
                desc(" note  "),
                key("s"),
                desc(" summary  "),
                key("e"),
                desc(" export  "),
                key("?"),
                desc(" help  "),
                key("q"),
                desc(" quit"),
            ]),
            InputMode::EditNote => Line::from(vec![
                desc(" Editing note, saved as you type  "),
                key("Esc"),
                desc(" done  "),
                key("Enter"),
                desc(" new line"),
            ]),
            InputMode::JumpToPage => Line::from(vec![
                desc(" Go to page: "),
                Span::styled(
                    format!("{}_", self.jump_buffer),
                    Style::default().fg(theme.text),
                ),
                desc("  "),
                key("Enter"),
                desc(" go  "),
                key("Esc"),
                desc(" cancel"),
            ]),
        }
    }

    /// Status message, or the last-saved time, right-aligned in the footer.
    fn build_footer_right(&self) -> Line<'static> {
        let theme = &self.theme;
        let mut spans = Vec::new();

        if self.exports_in_flight > 0 {
            spans.push(Span::styled(
                "exporting\u{2026} ",
                Style::default().fg(theme.warning),
            ));
        }
        match self.current_status() {
            Some(status) => {
                let color = if status.is_error {
                    theme.danger
                } else {
                    theme.text
                };
                spans.push(Span::styled(
                    format!("{} ", status.text),
                    Style::default().fg(color),
                ));
            }
            None => {
                let saved = match self.last_saved {
                    Some(at) => format!("saved {} ", at.format("%H:%M:%S")),
                    None => "not saved yet ".to_string(),
                };
                spans.push(Span::styled(saved, theme.footer_style()));
            }
        }
        spans.push(Span::styled(
            format!("[{}]", self.export_format.label()),
            Style::default().fg(theme.dim),
        ));

        Line::from(spans).alignment(Alignment::Right)
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        let pager_height = crate::view::pager::height(self, area.width);
        let [header_area, body_area, pager_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(pager_height),
            Constraint::Length(1),
        ])
        .areas(area);

        f.render_widget(Paragraph::new(self.build_header_line()), header_area);

        let card_area = if self.session.summary_visible() {
            let panel_width = (body_area.width / 3).clamp(24, 40);
            let [card, panel] =
                Layout::horizontal([Constraint::Min(30), Constraint::Length(panel_width)])
                    .areas(body_area);
            crate::view::summary::render_in(f, self, panel);
            card
        } else {
            body_area
        };

        crate::view::card::render_in(f, self, card_area);
        crate::view::pager::render_in(f, self, pager_area);

        f.render_widget(Paragraph::new(self.build_footer_left()), footer_area);
        // Painter's order: the right-aligned line overwrites the end of the hints.
        f.render_widget(Paragraph::new(self.build_footer_right()), footer_area);

        if let Some(mode) = self.session.gate().mode() {
            crate::view::gate::render(f, &self.theme, mode);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}
