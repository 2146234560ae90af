use crate::app::AppState;
use crate::domain::UiMode;
use crate::persistence::KeyValueStore;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style, Palette},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the delete confirmation modal
pub fn render_delete_modal<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, p: &Palette, area: Rect) {
    if app.ui_mode != UiMode::ConfirmDelete {
        return;
    }
    let Some(text) = app.pending_delete_text() else {
        return;
    };

    let modal_area = create_modal_area(area);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw("  Are you sure you want to delete this task:"),
        Line::styled(format!("  \"{}\"", text), modal_title_style(p)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style(p)),
            Span::raw(" Delete  "),
            Span::styled("[n]", modal_title_style(p)),
            Span::raw(" Keep"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" 🗑 Delete Task ", modal_title_style(p)))
                .style(modal_bg_style(p)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
