use crate::app::AppState;
use crate::domain::{open_tags, InlineTag, UiMode};
use crate::persistence::KeyValueStore;
use crate::ui::markup_view::render_markup;
use crate::ui::styles::{
    border_style, default_style, editing_style, hint_style, link_style, title_style, toolbar_active_style,
    Palette,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Toolbar line; formats open at the end of the buffer are highlighted
pub fn toolbar_line(buffer: &str, p: &Palette) -> Line<'static> {
    let open = open_tags(buffer);
    let mut spans = Vec::new();
    for tag in InlineTag::all() {
        let style = if open.contains(tag) {
            toolbar_active_style(p)
        } else {
            hint_style(p)
        };
        spans.push(Span::styled(format!(" {} ", tag.label()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("  ^B ^T ^U format · Enter newline · Tab leave", hint_style(p)));
    Line::from(spans)
}

/// Render the details editor for the record whose details are open
pub fn render_details_pane<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, p: &Palette, area: Rect) {
    let title = match app.store.open_details_index().and_then(|i| app.store.get(i)) {
        Some(todo) => format!(" Details: {} ", todo.text),
        None => " Details ".to_string(),
    };
    let focused = app.ui_mode == UiMode::EditingDetails;

    let mut lines = vec![toolbar_line(&app.details_buffer, p), Line::raw("")];
    let mut body = render_markup(&app.details_buffer, default_style(p), link_style(p));
    if focused {
        if let Some(last) = body.last_mut() {
            last.spans.push(Span::styled("█", editing_style(p)));
        }
    }
    lines.extend(body);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused { title_style(p) } else { border_style(p) })
                .title(Span::styled(title, title_style(p)))
                .style(default_style(p)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
