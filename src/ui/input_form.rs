use crate::app::AppState;
use crate::domain::UiMode;
use crate::persistence::KeyValueStore;
use crate::ui::styles::{border_style, default_style, editing_style, hint_style, title_style, Palette};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the "new to-do" input bar
pub fn render_input_bar<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, p: &Palette, area: Rect) {
    let adding = app.ui_mode == UiMode::AddingTodo;

    let line = if adding {
        Line::from(vec![
            Span::raw("> "),
            Span::styled(app.input.clone(), editing_style(p)),
            Span::styled("█", editing_style(p)),
        ])
    } else {
        Line::styled("Press a to add a new to-do", hint_style(p))
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if adding { title_style(p) } else { border_style(p) })
            .title(Span::styled(" Add a to-do ", title_style(p)))
            .style(default_style(p)),
    );

    f.render_widget(paragraph, area);
}
