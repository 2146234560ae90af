use crate::domain::{Appearance, ColorTheme, Status};
use crate::persistence::Preferences;
use ratatui::style::{Color, Modifier, Style};

/// Colours derived from the light/dark mode and the accent theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub accent_soft: Color,
}

pub fn palette(prefs: &Preferences) -> Palette {
    let (accent, accent_soft) = match prefs.color_theme {
        ColorTheme::Amethyst => (Color::Magenta, Color::LightMagenta),
        ColorTheme::Ocean => (Color::Blue, Color::LightCyan),
        ColorTheme::Forest => (Color::Green, Color::LightGreen),
    };

    match prefs.appearance {
        Appearance::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            muted: Color::Gray,
            accent,
            accent_soft,
        },
        Appearance::Dark => Palette {
            fg: Color::White,
            bg: Color::Black,
            muted: Color::DarkGray,
            accent: accent_soft,
            accent_soft: accent,
        },
    }
}

/// Default text style
pub fn default_style(p: &Palette) -> Style {
    Style::default().fg(p.fg).bg(p.bg)
}

/// Selected row highlight style
pub fn selected_style(p: &Palette) -> Style {
    Style::default()
        .fg(p.bg)
        .bg(p.accent)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style(p: &Palette) -> Style {
    Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
}

pub fn border_style(p: &Palette) -> Style {
    Style::default().fg(p.accent_soft)
}

/// Keybinding hint and secondary text style
pub fn hint_style(p: &Palette) -> Style {
    Style::default().fg(p.muted)
}

pub fn status_style(status: Status) -> Style {
    match status {
        Status::Completed => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Status::WorkInProgress => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Status::YetToStart => Style::default().fg(Color::Red),
    }
}

/// Completed to-dos are struck through
pub fn text_style(status: Status) -> Style {
    match status {
        Status::Completed => Style::default().add_modifier(Modifier::CROSSED_OUT),
        _ => Style::default(),
    }
}

/// Inline edit field style
pub fn editing_style(p: &Palette) -> Style {
    Style::default().fg(p.accent).add_modifier(Modifier::UNDERLINED)
}

pub fn link_style(p: &Palette) -> Style {
    Style::default().fg(p.accent).add_modifier(Modifier::UNDERLINED)
}

/// Active toolbar button
pub fn toolbar_active_style(p: &Palette) -> Style {
    Style::default()
        .fg(p.bg)
        .bg(p.accent_soft)
        .add_modifier(Modifier::BOLD)
}

/// Failed action shown in the hint bar
pub fn error_style(p: &Palette) -> Style {
    Style::default().fg(Color::Red).bg(p.bg).add_modifier(Modifier::BOLD)
}

pub fn modal_bg_style(p: &Palette) -> Style {
    Style::default().bg(p.muted).fg(p.fg)
}

pub fn modal_title_style(p: &Palette) -> Style {
    Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
}
