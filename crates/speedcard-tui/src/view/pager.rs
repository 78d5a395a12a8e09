//! The strip of page buttons under the card.
//!
//! Compact mode shows one row of numbers centred on the current page.
//! Large mode shows bracketed buttons on as many rows as needed (up to
//! [`MAX_LARGE_ROWS`]), which is easier to hit with a mouse.

use std::ops::RangeInclusive;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

pub const MAX_LARGE_ROWS: usize = 6;

fn digits(n: usize) -> u16 {
    n.max(1).to_string().len() as u16
}

/// Width of one button, excluding the gap after it.
pub fn cell_width(total: usize, large: bool) -> u16 {
    if large {
        digits(total) + 4
    } else {
        digits(total) + 2
    }
}

/// How many buttons fit on one row, with a one-column gap between them.
pub fn per_row(inner_width: u16, cell: u16) -> usize {
    ((inner_width as usize + 1) / (cell as usize + 1)).max(1)
}

/// Rows needed by the strip including its border.
pub fn height(app: &App, width: u16) -> u16 {
    if !app.large_pager {
        return 3;
    }
    let total = app.session.total_pages();
    let cols = per_row(width.saturating_sub(2), cell_width(total, true));
    let rows = total.div_ceil(cols).clamp(1, MAX_LARGE_ROWS);
    (rows * 2 - 1 + 2) as u16
}

/// Place one button per page, left to right then top to bottom, `row_step`
/// lines apart. Buttons that would fall below `inner` are dropped.
pub fn layout_buttons(
    inner: Rect,
    pages: RangeInclusive<usize>,
    cell: u16,
    row_step: u16,
) -> Vec<(Rect, usize)> {
    let cols = per_row(inner.width, cell);
    pages
        .enumerate()
        .filter_map(|(i, page)| {
            let row = (i / cols) as u16;
            let col = (i % cols) as u16;
            let y = inner.y + row * row_step;
            if y >= inner.y + inner.height {
                return None;
            }
            Some((Rect::new(inner.x + col * (cell + 1), y, cell, 1), page))
        })
        .collect()
}

pub fn render_in(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let total = app.session.total_pages();
    let current = app.session.current_page();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" Page {current} of {total} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cell = cell_width(total, app.large_pager);
    let cols = per_row(inner.width, cell);
    let (capacity, row_step) = if app.large_pager {
        let rows = (inner.height as usize).div_ceil(2).max(1);
        (cols * rows, 2)
    } else {
        (cols, 1)
    };

    let buttons = layout_buttons(inner, app.session.pager().window(capacity), cell, row_step);
    for (rect, page) in &buttons {
        let label = if app.large_pager {
            format!("[{:^w$}]", page, w = cell as usize - 2)
        } else {
            format!("{:^w$}", page, w = cell as usize)
        };
        let flagged = app
            .session
            .list()
            .get(*page as u32)
            .is_some_and(|e| e.flagged);
        let style = if *page == current {
            theme.highlight_style().fg(theme.active)
        } else if flagged {
            theme.flag_style(true)
        } else {
            Style::default().fg(theme.text)
        };
        f.render_widget(Paragraph::new(Span::styled(label, style)), *rect);
    }

    app.pager_hitboxes = buttons;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_grow_with_page_count() {
        assert_eq!(cell_width(9, false), 3);
        assert_eq!(cell_width(24, false), 4);
        assert_eq!(cell_width(24, true), 6);
    }

    #[test]
    fn buttons_are_laid_out_left_to_right() {
        let inner = Rect::new(1, 1, 20, 1);
        let buttons = layout_buttons(inner, 1..=5, 3, 1);
        assert_eq!(buttons.len(), 5);
        assert_eq!(buttons[2], (Rect::new(9, 1, 3, 1), 3));
    }

    #[test]
    fn overflowing_rows_are_dropped() {
        // Two buttons per row, one row available.
        let inner = Rect::new(0, 0, 7, 1);
        let buttons = layout_buttons(inner, 1..=5, 3, 2);
        let pages: Vec<usize> = buttons.iter().map(|(_, p)| *p).collect();
        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn wrapped_rows_skip_a_line() {
        let inner = Rect::new(0, 0, 7, 3);
        let buttons = layout_buttons(inner, 1..=3, 3, 2);
        assert_eq!(buttons[2].0, Rect::new(0, 2, 3, 1));
    }
}
