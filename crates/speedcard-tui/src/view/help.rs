use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::theme::Theme;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(60, 32, area);

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Pages", theme),
        key_line("\u{2190} / h", "Previous person", theme),
        key_line("\u{2192} / l", "Next person", theme),
        key_line("Home / End", "First / last person", theme),
        key_line(":", "Jump to a page number", theme),
        key_line("b", "Toggle large page buttons", theme),
        Line::from(""),
        section_header("Scorecard", theme),
        key_line("Space / x", "Mark or unmark this person", theme),
        key_line("Enter / i", "Edit notes (Esc when done)", theme),
        key_line("s", "Show / hide marked people", theme),
        Line::from(""),
        section_header("Actions", theme),
        key_line("e", "Export marked people", theme),
        key_line("f", "Cycle export format", theme),
        key_line("R", "Reset the whole meeting", theme),
        key_line("t", "Cycle color theme", theme),
        key_line("w", "Save theme, pager and format", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
        Line::from(""),
        section_header("Mouse", theme),
        key_line("Click", "Jump to a page button", theme),
        key_line("Wheel", "Previous / next person", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<14}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
