use crate::domain::{autolink_urls, now_millis, open_tags, InlineTag, Status, Todo, UiMode};
use crate::persistence::{load_preferences, save_appearance, save_color_theme, KeyValueStore, Preferences};
use crate::store::{PendingEdits, TodoStore};
use crate::ticker::refresh_interval;
use anyhow::Result;
use std::time::Instant;

/// Main application state
pub struct AppState<S: KeyValueStore> {
    pub store: TodoStore<S>,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    /// Text typed into the "new to-do" input
    pub input: String,
    /// In-flight text of the record being edited
    pub edit_buffer: String,
    /// In-flight markup of the record whose details are open
    pub details_buffer: String,
    /// Record awaiting delete confirmation
    pub pending_delete: Option<usize>,
    pub preferences: Preferences,
    /// Clock snapshot used for durations; only moves on refresh
    pub now_ms: i64,
    pub last_refresh: Instant,
    /// Last failed action, shown in place of the hint bar until the next key
    pub status_message: Option<String>,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(store: TodoStore<S>) -> Result<Self> {
        let preferences = load_preferences(store.storage())?;

        let mut app = Self {
            store,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input: String::new(),
            edit_buffer: String::new(),
            details_buffer: String::new(),
            pending_delete: None,
            preferences,
            now_ms: now_millis(),
            last_refresh: Instant::now(),
            status_message: None,
        };
        app.sync_edit_buffer();
        app.sync_details_buffer();
        Ok(app)
    }

    /// Re-read the clock for the elapsed-duration display
    pub fn refresh(&mut self) {
        self.now_ms = now_millis();
        self.last_refresh = Instant::now();
    }

    /// Keep a failed action on screen instead of exiting
    pub fn report_error(&mut self, err: &anyhow::Error) {
        tracing::error!(error = %format!("{:#}", err), "action failed");
        self.status_message = Some(format!("Error: {:#}", err));
    }

    /// Refresh once the refresh interval has passed
    pub fn tick(&mut self) {
        if self.last_refresh.elapsed() >= refresh_interval() {
            self.refresh();
        }
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.store.get(self.selected_index)
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.store.len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.store.len().saturating_sub(1));
    }

    fn after_mutation(&mut self) {
        self.clamp_selection();
        self.refresh();
    }

    /// Load the edit buffer from the record being edited
    fn sync_edit_buffer(&mut self) {
        self.edit_buffer = match self.store.editing_index().and_then(|i| self.store.get(i)) {
            Some(todo) => todo.text.clone(),
            None => String::new(),
        };
    }

    /// Load the details buffer from the record whose details are open
    fn sync_details_buffer(&mut self) {
        self.details_buffer = match self.store.open_details_index().and_then(|i| self.store.get(i)) {
            Some(todo) => todo.details.clone(),
            None => String::new(),
        };
    }

    /// Buffers of open records, ready to commit. Details are trimmed and autolinked.
    pub fn pending_edits(&self) -> PendingEdits {
        PendingEdits {
            text: self.store.editing_index().map(|_| self.edit_buffer.clone()),
            details: self
                .store
                .open_details_index()
                .map(|_| autolink_urls(self.details_buffer.trim())),
        }
    }

    /// Open the "new to-do" input
    pub fn start_add(&mut self) {
        self.input.clear();
        self.ui_mode = UiMode::AddingTodo;
    }

    /// Add the typed to-do. Blank input keeps the prompt open.
    pub fn submit_add(&mut self) -> Result<()> {
        if self.store.add(&self.input)? {
            self.input.clear();
            self.selected_index = self.store.len() - 1;
            self.ui_mode = UiMode::Normal;
            self.after_mutation();
        }
        Ok(())
    }

    pub fn cancel_add(&mut self) {
        self.input.clear();
        self.ui_mode = UiMode::Normal;
    }

    /// Toggle edit mode on the selected record
    pub fn toggle_editing_selected(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Ok(());
        }
        let pending = self.pending_edits();
        // The flags move in memory even when the write fails, so buffers follow them first
        let result = self.store.toggle_editing(self.selected_index, &pending);
        self.sync_edit_buffer();
        self.sync_details_buffer();

        self.ui_mode = if self.store.editing_index() == Some(self.selected_index) {
            UiMode::EditingText
        } else {
            UiMode::Normal
        };
        self.after_mutation();
        Ok(result?)
    }

    /// Toggle the details editor on the selected record
    pub fn toggle_details_selected(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Ok(());
        }
        // Only the details buffer is committed here; an edit in progress stays open
        let pending = PendingEdits {
            text: None,
            details: self.pending_edits().details,
        };
        let result = self.store.toggle_details_open(self.selected_index, &pending);
        self.sync_details_buffer();

        self.ui_mode = if self.store.open_details_index() == Some(self.selected_index) {
            UiMode::EditingDetails
        } else {
            UiMode::Normal
        };
        self.after_mutation();
        Ok(result?)
    }

    /// Commit and close whichever details editor is open
    pub fn close_details(&mut self) -> Result<()> {
        if let Some(open) = self.store.open_details_index() {
            self.selected_index = open;
            self.toggle_details_selected()?;
        }
        self.ui_mode = UiMode::Normal;
        Ok(())
    }

    /// Return keyboard focus to whichever editor is open on the selected record
    pub fn focus_selected(&mut self) {
        let Some(todo) = self.selected_todo() else {
            return;
        };
        if todo.is_editing {
            self.ui_mode = UiMode::EditingText;
        } else if todo.details_open() {
            self.ui_mode = UiMode::EditingDetails;
        }
    }

    /// Leave an editor without closing it; its buffer stays pending
    pub fn leave_focus(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Save the edit buffer and leave edit mode
    pub fn commit_edit(&mut self) -> Result<()> {
        let result = match self.store.editing_index() {
            Some(position) => self.store.commit_edit(position, &self.edit_buffer),
            None => Ok(()),
        };
        self.sync_edit_buffer();
        self.ui_mode = UiMode::Normal;
        self.after_mutation();
        Ok(result?)
    }

    /// Drop the edit buffer and leave edit mode
    pub fn cancel_edit(&mut self) -> Result<()> {
        if let Some(position) = self.store.editing_index() {
            self.store.cancel_edit(position)?;
        }
        self.sync_edit_buffer();
        self.ui_mode = UiMode::Normal;
        Ok(())
    }

    /// Type a character into whichever buffer has focus
    pub fn push_char(&mut self, c: char) {
        match self.ui_mode {
            UiMode::AddingTodo => self.input.push(c),
            UiMode::EditingText => self.edit_buffer.push(c),
            UiMode::EditingDetails => match c {
                '<' => self.details_buffer.push_str("&lt;"),
                '>' => self.details_buffer.push_str("&gt;"),
                '&' => self.details_buffer.push_str("&amp;"),
                _ => self.details_buffer.push(c),
            },
            _ => {}
        }
    }

    /// Delete backwards in whichever buffer has focus.
    /// In details, a trailing tag or entity goes as one unit.
    pub fn pop_char(&mut self) {
        match self.ui_mode {
            UiMode::AddingTodo => {
                self.input.pop();
            }
            UiMode::EditingText => {
                self.edit_buffer.pop();
            }
            UiMode::EditingDetails => pop_markup_unit(&mut self.details_buffer),
            _ => {}
        }
    }

    /// Open or close an inline format at the end of the details buffer
    pub fn toggle_inline(&mut self, tag: InlineTag) {
        if self.ui_mode != UiMode::EditingDetails {
            return;
        }
        if open_tags(&self.details_buffer).contains(&tag) {
            self.details_buffer.push_str(tag.close());
        } else {
            self.details_buffer.push_str(tag.open());
        }
    }

    pub fn insert_line_break(&mut self) {
        if self.ui_mode == UiMode::EditingDetails {
            self.details_buffer.push_str("<br>");
        }
    }

    pub fn set_status_selected(&mut self, status: Status) -> Result<()> {
        if self.store.is_empty() {
            return Ok(());
        }
        self.store.set_status(self.selected_index, status)?;
        self.after_mutation();
        Ok(())
    }

    pub fn cycle_status_selected(&mut self) -> Result<()> {
        let Some(todo) = self.selected_todo() else {
            return Ok(());
        };
        let next = todo.status.next();
        self.set_status_selected(next)
    }

    /// Ask for confirmation before deleting the selected record
    pub fn request_delete(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.pending_delete = Some(self.selected_index);
        self.ui_mode = UiMode::ConfirmDelete;
    }

    pub fn confirm_delete(&mut self) -> Result<()> {
        let result = match self.pending_delete.take() {
            Some(position) => self.store.remove(position).map(|_| ()),
            None => Ok(()),
        };
        // Buffers of records that are gone have nothing left to commit to
        if self.store.editing_index().is_none() {
            self.edit_buffer.clear();
        }
        if self.store.open_details_index().is_none() {
            self.details_buffer.clear();
        }
        self.ui_mode = UiMode::Normal;
        self.after_mutation();
        Ok(result?)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn toggle_appearance(&mut self) -> Result<()> {
        self.preferences.appearance = self.preferences.appearance.toggled();
        save_appearance(self.store.storage_mut(), self.preferences.appearance)?;
        tracing::debug!(mode = self.preferences.appearance.as_value(), "switched appearance");
        Ok(())
    }

    pub fn cycle_color_theme(&mut self) -> Result<()> {
        self.preferences.color_theme = self.preferences.color_theme.next();
        save_color_theme(self.store.storage_mut(), self.preferences.color_theme)?;
        tracing::debug!(theme = self.preferences.color_theme.as_value(), "switched color theme");
        Ok(())
    }

    /// Text of the record awaiting delete confirmation
    pub fn pending_delete_text(&self) -> Option<&str> {
        self.pending_delete
            .and_then(|i| self.store.get(i))
            .map(|t| t.text.as_str())
    }
}

/// Entities `push_char` writes for characters typed into details
const TYPED_ENTITIES: [&str; 3] = ["&lt;", "&gt;", "&amp;"];

/// Remove the last character, or the whole trailing tag or typed entity
fn pop_markup_unit(buffer: &mut String) {
    if buffer.ends_with('>') {
        if let Some(start) = buffer.rfind('<') {
            buffer.truncate(start);
            return;
        }
    }
    if let Some(entity) = TYPED_ENTITIES.iter().find(|e| buffer.ends_with(*e)) {
        buffer.truncate(buffer.len() - entity.len());
        return;
    }
    buffer.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Appearance, ColorTheme};
    use crate::persistence::{FileStorage, MemoryStorage, TODOS_KEY};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn app_with(texts: &[&str]) -> AppState<MemoryStorage> {
        let store = TodoStore::load(MemoryStorage::new()).unwrap();
        let mut app = AppState::new(store).unwrap();
        for text in texts {
            app.start_add();
            for c in text.chars() {
                app.push_char(c);
            }
            app.submit_add().unwrap();
        }
        app
    }

    fn type_str<S: KeyValueStore>(app: &mut AppState<S>, s: &str) {
        for c in s.chars() {
            app.push_char(c);
        }
    }

    /// Storage whose next write can be made to fail
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_next: bool,
    }

    impl KeyValueStore for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
            if std::mem::take(&mut self.fail_next) {
                anyhow::bail!("disk full");
            }
            self.inner.set_item(key, value)
        }
    }

    fn flaky_app_with(texts: &[&str]) -> AppState<FlakyStorage> {
        let mut store = TodoStore::load(FlakyStorage::default()).unwrap();
        for text in texts {
            store.add(text).unwrap();
        }
        AppState::new(store).unwrap()
    }

    #[test]
    fn test_failed_details_switch_keeps_buffers_with_their_records() {
        let mut app = flaky_app_with(&["a", "b"]);
        app.selected_index = 0;
        app.toggle_details_selected().unwrap();
        type_str(&mut app, "notes for a");
        app.leave_focus();

        app.store.storage_mut().fail_next = true;
        app.selected_index = 1;
        assert!(app.toggle_details_selected().is_err());
        assert_eq!(app.store.open_details_index(), Some(1));
        assert_eq!(app.ui_mode, UiMode::EditingDetails);
        assert!(app.details_buffer.is_empty());

        app.close_details().unwrap();
        assert_eq!(app.store.get(0).unwrap().details, "notes for a");
        assert_eq!(app.store.get(1).unwrap().details, "");
    }

    #[test]
    fn test_failed_edit_switch_keeps_buffers_with_their_records() {
        let mut app = flaky_app_with(&["a", "b"]);
        app.selected_index = 0;
        app.toggle_editing_selected().unwrap();
        type_str(&mut app, " plus");
        app.leave_focus();

        app.store.storage_mut().fail_next = true;
        app.selected_index = 1;
        assert!(app.toggle_editing_selected().is_err());
        assert_eq!(app.store.editing_index(), Some(1));
        assert_eq!(app.ui_mode, UiMode::EditingText);
        assert_eq!(app.edit_buffer, "b");

        app.commit_edit().unwrap();
        assert_eq!(app.store.get(0).unwrap().text, "a plus");
        assert_eq!(app.store.get(1).unwrap().text, "b");
        let raw = app.store.storage().inner.get_item(TODOS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"a plus\""));
    }

    #[test]
    fn test_add_through_input() {
        let app = app_with(&["first", "second"]);
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_blank_add_keeps_prompt_open() {
        let mut app = app_with(&[]);
        app.start_add();
        type_str(&mut app, "   ");
        app.submit_add().unwrap();

        assert!(app.store.is_empty());
        assert_eq!(app.ui_mode, UiMode::AddingTodo);
    }

    #[test]
    fn test_edit_then_switch_commits_buffer() {
        let mut app = app_with(&["a", "b"]);
        app.selected_index = 0;
        app.toggle_editing_selected().unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingText);
        assert_eq!(app.edit_buffer, "a");

        type_str(&mut app, " plus");
        app.leave_focus();
        app.move_selection_down();
        app.toggle_editing_selected().unwrap();

        assert_eq!(app.store.get(0).unwrap().text, "a plus");
        assert_eq!(app.store.editing_index(), Some(1));
        assert_eq!(app.edit_buffer, "b");
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut app = app_with(&["keep"]);
        app.toggle_editing_selected().unwrap();
        app.pop_char();
        app.pop_char();
        app.cancel_edit().unwrap();

        assert_eq!(app.store.get(0).unwrap().text, "keep");
        assert!(!app.store.get(0).unwrap().is_editing);
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_enter_commits_edit() {
        let mut app = app_with(&["old"]);
        app.toggle_editing_selected().unwrap();
        app.edit_buffer = "new text".to_string();
        app.commit_edit().unwrap();

        assert_eq!(app.store.get(0).unwrap().text, "new text");
        assert_eq!(app.store.editing_index(), None);
    }

    #[test]
    fn test_details_switch_commits_autolinked_buffer() {
        let mut app = app_with(&["a", "b"]);
        app.selected_index = 0;
        app.toggle_details_selected().unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingDetails);

        type_str(&mut app, "see www.example.com ");
        app.leave_focus();
        app.selected_index = 1;
        app.toggle_details_selected().unwrap();

        let details = &app.store.get(0).unwrap().details;
        assert_eq!(
            details,
            "see <a href=\"https://www.example.com\" target=\"_blank\" rel=\"noopener noreferrer\">www.example.com</a>"
        );
        assert_eq!(app.store.open_details_index(), Some(1));
        assert!(app.details_buffer.is_empty());
    }

    #[test]
    fn test_details_toggle_leaves_text_edit_open() {
        let mut app = app_with(&["a", "b"]);
        app.selected_index = 0;
        app.toggle_editing_selected().unwrap();
        type_str(&mut app, "!");
        app.leave_focus();

        app.selected_index = 1;
        app.toggle_details_selected().unwrap();

        assert_eq!(app.store.editing_index(), Some(0));
        assert_eq!(app.edit_buffer, "a!");
    }

    #[test]
    fn test_inline_toggles_and_escaping() {
        let mut app = app_with(&["a"]);
        app.toggle_details_selected().unwrap();

        app.toggle_inline(InlineTag::Bold);
        type_str(&mut app, "x<y");
        app.toggle_inline(InlineTag::Bold);
        app.insert_line_break();
        assert_eq!(app.details_buffer, "<b>x&lt;y</b><br>");

        app.pop_char();
        app.pop_char();
        assert_eq!(app.details_buffer, "<b>x&lt;y");
        app.pop_char();
        app.pop_char();
        assert_eq!(app.details_buffer, "<b>x");
    }

    #[test]
    fn test_backspace_only_groups_typed_entities() {
        let mut app = app_with(&["a"]);
        app.toggle_details_selected().unwrap();

        type_str(&mut app, "a&b;");
        assert_eq!(app.details_buffer, "a&amp;b;");
        app.pop_char();
        assert_eq!(app.details_buffer, "a&amp;b");
        app.pop_char();
        app.pop_char();
        assert_eq!(app.details_buffer, "a");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app_with(&["a", "b", "c"]);
        app.selected_index = 2;

        app.request_delete();
        assert_eq!(app.pending_delete_text(), Some("c"));
        app.cancel_delete();
        assert_eq!(app.store.len(), 3);

        app.request_delete();
        app.confirm_delete().unwrap();
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_deleting_edited_record_clears_buffer() {
        let mut app = app_with(&["a", "b"]);
        app.selected_index = 0;
        app.toggle_editing_selected().unwrap();
        type_str(&mut app, "zzz");
        app.leave_focus();

        app.request_delete();
        app.confirm_delete().unwrap();
        assert!(app.edit_buffer.is_empty());
        assert_eq!(app.store.editing_index(), None);
    }

    #[test]
    fn test_cycle_status() {
        let mut app = app_with(&["a"]);
        app.cycle_status_selected().unwrap();
        assert_eq!(app.store.get(0).unwrap().status, Status::WorkInProgress);
        app.set_status_selected(Status::Completed).unwrap();
        assert_eq!(app.store.get(0).unwrap().status, Status::Completed);
    }

    #[test]
    fn test_tick_refreshes_after_interval() {
        let mut app = app_with(&[]);
        app.now_ms = 0;
        app.tick();
        assert_eq!(app.now_ms, 0);

        if let Some(past) = Instant::now().checked_sub(refresh_interval() + Duration::from_secs(1)) {
            app.last_refresh = past;
            app.tick();
            assert!(app.now_ms > 0);
        }
    }

    #[test]
    fn test_preferences_persist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let store = TodoStore::load(FileStorage::open(&path).unwrap()).unwrap();
        let mut app = AppState::new(store).unwrap();
        app.toggle_appearance().unwrap();
        app.cycle_color_theme().unwrap();
        app.cycle_color_theme().unwrap();

        let store = TodoStore::load(FileStorage::open(&path).unwrap()).unwrap();
        let reopened = AppState::new(store).unwrap();
        assert_eq!(reopened.preferences.appearance, Appearance::Dark);
        assert_eq!(reopened.preferences.color_theme, ColorTheme::Forest);
    }

    #[test]
    fn test_startup_restores_open_buffers() {
        let storage = MemoryStorage::with_item(
            TODOS_KEY,
            r#"[{"text":"mid edit","isEditing":true},{"text":"notes","details":"<u>x</u>","isDetailsOpen":true}]"#,
        );
        let app = AppState::new(TodoStore::load(storage).unwrap()).unwrap();
        assert_eq!(app.edit_buffer, "mid edit");
        assert_eq!(app.details_buffer, "<u>x</u>");
        assert_eq!(app.ui_mode, UiMode::Normal);
    }
}
