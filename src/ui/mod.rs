pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod markup_view;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use crate::persistence::KeyValueStore;
use details_pane::render_details_pane;
use input_form::render_input_bar;
use keybindings::{render_keybindings, render_status_message};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_delete_modal;
use ratatui::{widgets::Block, Frame};
use styles::{default_style, palette};

/// Main render function - draws the entire UI from the current state.
/// Reads only; called after every event and on each refresh.
pub fn render<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>) {
    let size = f.size();
    let p = palette(&app.preferences);
    let show_details = app.store.open_details_index().is_some();
    let layout = create_layout(size, show_details);

    f.render_widget(Block::default().style(default_style(&p)), size);

    match &app.status_message {
        Some(message) => render_status_message(f, message, &p, layout.keybindings_area),
        None => render_keybindings(
            f,
            app.ui_mode,
            app.preferences.appearance,
            app.preferences.color_theme,
            &p,
            layout.keybindings_area,
        ),
    }
    render_input_bar(f, app, &p, layout.input_area);
    render_list_pane(f, app, &p, layout.list_area);

    if let Some(details_area) = layout.details_area {
        render_details_pane(f, app, &p, details_area);
    }

    render_delete_modal(f, app, &p, size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::store::TodoStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_render_empty_list() {
        let app = AppState::new(TodoStore::load(MemoryStorage::new()).unwrap()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        assert!(screen_text(&terminal).contains("No to-dos yet!"));
    }

    #[test]
    fn test_render_list_with_details_and_modal() {
        let mut app = AppState::new(TodoStore::load(MemoryStorage::new()).unwrap()).unwrap();
        app.store.add("buy milk").unwrap();
        app.store.add("call mom").unwrap();
        app.selected_index = 0;
        app.toggle_details_selected().unwrap();
        app.request_delete();

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("buy milk"));
        assert!(text.contains("call mom"));
        assert!(text.contains("Details: buy milk"));
        assert!(text.contains("Are you sure you want to delete this task:"));
    }

    #[test]
    fn test_status_message_replaces_hints() {
        let mut app = AppState::new(TodoStore::load(MemoryStorage::new()).unwrap()).unwrap();
        app.report_error(&anyhow::anyhow!("disk full"));

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Error: disk full"));
        assert!(!text.contains("q quit"));
    }
}
