use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use speedcard_core::export::format_choice;

use super::truncate;
use crate::app::App;

/// Side panel listing everyone marked so far.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let flagged = app.session.flagged();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.active))
        .title(format!(" Marked ({}) ", flagged.len()));
    let width = block.inner(area).width.saturating_sub(2) as usize;

    let lines: Vec<Line> = if flagged.is_empty() {
        vec![Line::from(Span::styled(
            "nobody selected yet",
            Style::default()
                .fg(theme.dim)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        flagged
            .iter()
            .map(|entry| {
                let text = format_choice(entry).replace('\n', " ");
                Line::from(vec![
                    Span::styled("\u{2665} ", theme.flag_style(true)),
                    Span::styled(truncate(&text, width), Style::default().fg(theme.text)),
                ])
            })
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}
