use crate::app::AppState;
use crate::domain::{format_duration, format_start_time, Todo, UiMode};
use crate::persistence::KeyValueStore;
use crate::ui::styles::{
    border_style, default_style, editing_style, hint_style, selected_style, status_style, text_style,
    title_style, Palette,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the to-do list pane
pub fn render_list_pane<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, p: &Palette, area: Rect) {
    let title = format!(
        " To-dos ({}) · {} {} ",
        app.store.len(),
        app.preferences.color_theme.icon(),
        app.preferences.color_theme.name()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(p))
        .title(Span::styled(title, title_style(p)))
        .style(default_style(p));

    if app.store.is_empty() {
        let empty = Paragraph::new(Line::styled("No to-dos yet!", hint_style(p))).block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .todos()
        .iter()
        .enumerate()
        .map(|(idx, todo)| {
            let edit = todo.is_editing.then_some(app.edit_buffer.as_str());
            let focused = todo.is_editing && app.ui_mode == UiMode::EditingText && idx == app.selected_index;
            ListItem::new(create_todo_lines(todo, edit, focused, app.now_ms, p))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(selected_style(p))
        .highlight_symbol("▌");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut state);
}

/// Lines for one to-do.
///
/// Normal:  `✗ buy milk  [+]`
///          `   Started: 2024-05-01 09:30 | Duration: 2h 5m · Yet to start`
/// Editing: `✗ > buy mi█  [✓ save]`
pub fn create_todo_lines(
    todo: &Todo,
    edit: Option<&str>,
    focused: bool,
    now: i64,
    p: &Palette,
) -> Vec<Line<'static>> {
    let mut first = vec![
        Span::styled(format!("{:>2} ", todo.status.icon()), status_style(todo.status)),
    ];

    if let Some(buffer) = edit {
        first.push(Span::raw("> "));
        first.push(Span::styled(buffer.to_string(), editing_style(p)));
        if focused {
            first.push(Span::styled("█", editing_style(p)));
        }
        first.push(Span::styled("  [✓ save]", hint_style(p)));
        return vec![Line::from(first)];
    }

    first.push(Span::styled(todo.text.clone(), text_style(todo.status)));
    let details_marker = if todo.details_open() { "  [−]" } else { "  [+]" };
    first.push(Span::styled(details_marker, hint_style(p)));

    let time_info = format!(
        "   Started: {} | Duration: {} · ",
        format_start_time(todo.start_time),
        format_duration(todo.elapsed_millis(now))
    );
    let second = Line::from(vec![
        Span::styled(time_info, hint_style(p)),
        Span::styled(todo.status.label(), status_style(todo.status)),
    ]);

    vec![Line::from(first), second]
}
