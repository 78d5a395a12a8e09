use ratatui::Frame;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::{key_span, render_dialog};
use crate::theme::Theme;

/// Ask before leaving; `q` again confirms.
pub fn render(f: &mut Frame, theme: &Theme) {
    let dim = Style::default().fg(theme.dim);
    let keys = Line::from(vec![
        key_span("q", theme.danger),
        Span::styled(": quit   ", dim),
        key_span("Esc", theme.active),
        Span::styled(": cancel", dim),
    ]);
    render_dialog(f, theme, "Confirm Quit", "Quit speedcard?", keys, theme.danger);
}
