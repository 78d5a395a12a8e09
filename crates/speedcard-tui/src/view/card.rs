use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, InputMode};

/// Render the current person: name, mark, and notes.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some(entry) = app.session.current_entry() else {
        let empty = Paragraph::new(Span::styled(
            "  The roster is empty.",
            Style::default().fg(theme.dim),
        ))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };
    let editing = app.input_mode == InputMode::EditNote;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(
            format!(" {} ", entry.name),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [mark_area, _, notes_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(inner);

    let mark = if entry.flagged {
        Line::from(vec![
            Span::styled("  \u{2665} Marked", theme.flag_style(true)),
            Span::styled("   Space to unmark", Style::default().fg(theme.dim)),
        ])
    } else {
        Line::from(vec![
            Span::styled("  \u{2661} Not marked", theme.flag_style(false)),
            Span::styled("   Space to mark", Style::default().fg(theme.dim)),
        ])
    };
    f.render_widget(Paragraph::new(mark), mark_area);

    let text_style = Style::default().fg(theme.text);
    let lines = if editing {
        note_lines(
            &entry.note,
            Some(app.note_cursor),
            text_style,
            text_style.add_modifier(Modifier::REVERSED),
        )
    } else if entry.note.is_empty() {
        vec![Line::from(Span::styled(
            "No notes yet. Press Enter to write one.",
            Style::default()
                .fg(theme.dim)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        note_lines(&entry.note, None, text_style, text_style)
    };

    let notes_border = if editing {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let notes = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(notes_border)
                .title(if editing { " Notes (editing) " } else { " Notes " }),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(notes, notes_area);
}

/// Split a note into display lines, drawing the cursor (when given) as one
/// highlighted cell at byte offset `cursor`.
pub fn note_lines(
    note: &str,
    cursor: Option<usize>,
    text: Style,
    cursor_style: Style,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in note.split('\n') {
        let end = start + raw.len();
        match cursor {
            Some(c) if c >= start && c <= end && raw.is_char_boundary(c - start) => {
                let (before, rest) = raw.split_at(c - start);
                let mut chars = rest.chars();
                let under = chars
                    .next()
                    .map(|ch| ch.to_string())
                    .unwrap_or_else(|| " ".to_string());
                let after: String = chars.collect();
                lines.push(Line::from(vec![
                    Span::styled(before.to_string(), text),
                    Span::styled(under, cursor_style),
                    Span::styled(after, text),
                ]));
            }
            _ => lines.push(Line::from(Span::styled(raw.to_string(), text))),
        }
        start = end + 1;
    }
    lines
}
