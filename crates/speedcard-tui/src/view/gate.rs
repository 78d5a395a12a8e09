use ratatui::Frame;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use speedcard_core::GateMode;

use super::{key_span, render_dialog};
use crate::theme::Theme;

/// Title and message for each gate mode.
pub fn dialog_text(mode: GateMode) -> (&'static str, &'static str) {
    match mode {
        GateMode::Reset => (
            "Reset entire meeting",
            "Are you sure you want to reset everything?",
        ),
        GateMode::ExportBlocked => (
            "You haven't marked anyone yet",
            "To export you need to tag someone",
        ),
    }
}

/// Render the gate dialog as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme, mode: GateMode) {
    let (title, message) = dialog_text(mode);
    let hint = |d: &'static str| Span::styled(d, Style::default().fg(theme.dim));

    let (keys, border) = match mode {
        GateMode::Reset => (
            Line::from(vec![
                key_span("y/Enter", theme.danger),
                hint(": reset   "),
                key_span("n/Esc", theme.active),
                hint(": cancel"),
            ]),
            theme.danger,
        ),
        GateMode::ExportBlocked => (
            Line::from(vec![key_span("Enter", theme.active), hint(": ok")]),
            theme.warning,
        ),
    };

    render_dialog(f, theme, title, message, keys, border);
}
