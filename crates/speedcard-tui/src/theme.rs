use ratatui::style::{Color, Modifier, Style};

/// Color theme for the TUI.
pub struct Theme {
    pub flagged: Color,
    pub warning: Color,
    pub danger: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    pub const NAMES: &'static [&'static str] = &["hacker", "modern"];

    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            flagged: Color::Rgb(0, 210, 0),
            warning: Color::Yellow,
            danger: Color::Red,

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Modern theme: white text, electric blue accents, dark blue header.
    pub fn modern() -> Self {
        Self {
            flagged: Color::Rgb(255, 90, 140),
            warning: Color::Rgb(255, 200, 0),
            danger: Color::Rgb(255, 80, 80),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Look a theme up by config name; unknown names get the hacker theme.
    pub fn by_name(name: &str) -> Self {
        match name {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    /// The theme name after `name` in [`Theme::NAMES`], wrapping.
    pub fn next_name(name: &str) -> &'static str {
        let idx = Self::NAMES.iter().position(|n| *n == name).unwrap_or(0);
        Self::NAMES[(idx + 1) % Self::NAMES.len()]
    }

    pub fn flag_style(&self, flagged: bool) -> Style {
        if flagged {
            Style::default()
                .fg(self.flagged)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.dim)
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_cycle() {
        assert_eq!(Theme::next_name("hacker"), "modern");
        assert_eq!(Theme::next_name("modern"), "hacker");
        assert_eq!(Theme::next_name("bogus"), "modern");
    }

    #[test]
    fn unknown_name_falls_back_to_hacker() {
        assert_eq!(Theme::by_name("nope").header_bg, Theme::hacker().header_bg);
    }
}
