//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── picker ─────────────────────────────────────────────────
    pub fn category_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn item_style() -> Style {
        Style::default().fg(Color::White)
    }

    /// Selected subcategory (alice-blue card look).
    pub fn highlighted_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Rgb(240, 248, 255))
    }

    pub fn button_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Overlay for the row under the keyboard cursor; patched onto the
    /// row's own style.
    pub fn cursor_style() -> Style {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn error_style() -> Style {
        Style::default()
            .bg(Color::Red)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }
}
