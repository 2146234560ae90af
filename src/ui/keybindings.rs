use crate::domain::{Appearance, ColorTheme, UiMode};
use crate::ui::styles::{error_style, hint_style, Palette};
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Hint text for the current mode
pub fn hints(mode: UiMode, appearance: Appearance, theme: ColorTheme) -> String {
    match mode {
        UiMode::Normal => format!(
            " ↑/↓ select   a add   e edit   o details   Enter focus   s status   1-3 set   x delete   t {}   c {}   q quit",
            appearance.toggle_icon(),
            theme.icon()
        ),
        UiMode::AddingTodo => " Enter add   Esc cancel".to_string(),
        UiMode::EditingText => " Enter save   Esc cancel   Tab leave (keeps edit open)".to_string(),
        UiMode::EditingDetails => {
            " type to write   Ctrl+B/T/U bold/italic/underline   Enter newline   Tab leave   Esc close".to_string()
        }
        UiMode::ConfirmDelete => " y delete   n keep".to_string(),
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, appearance: Appearance, theme: ColorTheme, p: &Palette, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints(mode, appearance, theme))).style(hint_style(p));
    f.render_widget(paragraph, area);
}

/// Render an error in place of the hint bar
pub fn render_status_message(f: &mut Frame, message: &str, p: &Palette, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(format!(" {}", message))).style(error_style(p));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_mode() {
        let normal = hints(UiMode::Normal, Appearance::Light, ColorTheme::Ocean);
        assert!(normal.contains("t 🌙"));
        assert!(normal.contains("c 🌊"));
        assert!(hints(UiMode::ConfirmDelete, Appearance::Dark, ColorTheme::Forest).contains("y delete"));
    }
}
