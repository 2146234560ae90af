use crate::app::AppState;
use crate::domain::{InlineTag, Status, UiMode};
use crate::persistence::KeyValueStore;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTodo => handle_adding_mode(app, key),
        UiMode::EditingText => handle_text_editing_mode(app, key),
        UiMode::EditingDetails => handle_details_editing_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.toggle_editing_selected()?,
        KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Char(' ') => app.toggle_details_selected()?,
        KeyCode::Enter => app.focus_selected(),

        // Status
        KeyCode::Char('s') | KeyCode::Char('S') => app.cycle_status_selected()?,
        KeyCode::Char('1') => app.set_status_selected(Status::YetToStart)?,
        KeyCode::Char('2') => app.set_status_selected(Status::WorkInProgress)?,
        KeyCode::Char('3') => app.set_status_selected(Status::Completed)?,

        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.request_delete(),

        // Appearance
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_appearance()?,
        KeyCode::Char('c') | KeyCode::Char('C') => app.cycle_color_theme()?,

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while typing a new to-do
fn handle_adding_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_add()?,
        KeyCode::Esc => app.cancel_add(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.push_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while editing a to-do's text
fn handle_text_editing_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.commit_edit()?,
        KeyCode::Esc => app.cancel_edit()?,
        KeyCode::Tab => app.leave_focus(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.push_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the details editor
fn handle_details_editing_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('b') => app.toggle_inline(InlineTag::Bold),
            // Ctrl+I arrives as Tab in most terminals
            KeyCode::Char('t') => app.toggle_inline(InlineTag::Italic),
            KeyCode::Char('u') => app.toggle_inline(InlineTag::Underline),
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        // Closing commits the buffer
        KeyCode::Esc => app.close_details()?,
        KeyCode::Tab => app.leave_focus(),
        KeyCode::Enter => app.insert_line_break(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the delete confirmation modal
fn handle_confirm_delete_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete()?,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}
