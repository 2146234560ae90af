use crate::domain::{now_millis, Status, Todo};
use crate::persistence::{load_and_migrate, KeyValueStore, TODOS_KEY};
use anyhow::Context;

/// Errors raised by store mutations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The caller addressed a record that doesn't exist; this is a bug in
    /// the caller, not something a user can trigger
    #[error("position {position} is out of bounds for {len} to-dos")]
    OutOfBounds { position: usize, len: usize },

    /// Writing the serialized sequence failed
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Uncommitted edits from whichever record is currently open.
///
/// Handed to the toggles so the open record's buffer is written back
/// before focus moves anywhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEdits {
    /// In-flight text of the record being edited
    pub text: Option<String>,
    /// In-flight details of the record whose details are open
    pub details: Option<String>,
}

/// Ordered to-do records mirrored to a key-value store.
///
/// Position is the only identity a record has, so every operation
/// re-derives positions from the current sequence. Each mutation rewrites
/// the whole sequence under the `todos` key.
pub struct TodoStore<S: KeyValueStore> {
    todos: Vec<Todo>,
    storage: S,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Load stored records and bring them up to the current schema
    pub fn load(storage: S) -> anyhow::Result<Self> {
        let todos = load_and_migrate(&storage, now_millis()).context("Failed to load to-dos")?;
        tracing::info!(count = todos.len(), "loaded to-dos");
        Ok(Self { todos, storage })
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, position: usize) -> Option<&Todo> {
        self.todos.get(position)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Position of the record being edited, if any
    pub fn editing_index(&self) -> Option<usize> {
        self.todos.iter().position(|t| t.is_editing)
    }

    /// Position of the record whose details are open, if any
    pub fn open_details_index(&self) -> Option<usize> {
        self.todos.iter().position(|t| t.details_open())
    }

    fn check(&self, position: usize) -> Result<(), StoreError> {
        if position >= self.todos.len() {
            return Err(StoreError::OutOfBounds {
                position,
                len: self.todos.len(),
            });
        }
        Ok(())
    }

    /// Serialize the whole sequence and overwrite the stored copy
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.todos).map_err(anyhow::Error::from)?;
        self.storage.set_item(TODOS_KEY, &json)?;
        tracing::debug!(count = self.todos.len(), "persisted to-dos");
        Ok(())
    }

    /// Append a new to-do. Blank text is ignored; returns whether a record was added.
    pub fn add(&mut self, text: &str) -> Result<bool, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }

        self.todos.push(Todo::new(text.to_string(), now_millis()));
        self.persist()?;
        tracing::info!(position = self.todos.len() - 1, "added to-do");
        Ok(true)
    }

    /// Delete the record at `position` and return it
    pub fn remove(&mut self, position: usize) -> Result<Todo, StoreError> {
        self.check(position)?;
        let removed = self.todos.remove(position);
        self.persist()?;
        tracing::info!(position, "removed to-do");
        Ok(removed)
    }

    pub fn set_status(&mut self, position: usize, status: Status) -> Result<(), StoreError> {
        self.check(position)?;
        self.todos[position].status = status;
        self.persist()
    }

    /// Replace the text if the new text is non-blank; persists either way
    pub fn set_text(&mut self, position: usize, text: &str) -> Result<(), StoreError> {
        self.check(position)?;
        let text = text.trim();
        if !text.is_empty() {
            self.todos[position].text = text.to_string();
        }
        self.persist()
    }

    /// Store details markup verbatim
    pub fn set_details(&mut self, position: usize, html: &str) -> Result<(), StoreError> {
        self.check(position)?;
        self.todos[position].details = html.to_string();
        self.persist()
    }

    /// Open details on `position`, or close them if they are already open there.
    /// Pending details of the open record are committed first.
    pub fn toggle_details_open(
        &mut self,
        position: usize,
        pending: &PendingEdits,
    ) -> Result<(), StoreError> {
        self.check(position)?;

        let open = self.open_details_index();
        if let (Some(open), Some(details)) = (open, pending.details.as_deref()) {
            self.todos[open].details = details.to_string();
        }

        let opening = open != Some(position);
        for todo in &mut self.todos {
            todo.is_details_open = Some(false);
        }
        if opening {
            self.todos[position].is_details_open = Some(true);
        }

        self.persist()
    }

    /// Start editing `position`, or stop if it is already being edited.
    ///
    /// The record currently being edited gets the pending text (when
    /// non-blank) and leaves edit mode, and any open details are committed
    /// and closed, before the new record opens.
    pub fn toggle_editing(
        &mut self,
        position: usize,
        pending: &PendingEdits,
    ) -> Result<(), StoreError> {
        self.check(position)?;

        let editing = self.editing_index();
        if let Some(current) = editing {
            if let Some(text) = pending.text.as_deref().map(str::trim) {
                if !text.is_empty() {
                    self.todos[current].text = text.to_string();
                }
            }
        }

        if let Some(open) = self.open_details_index() {
            if let Some(details) = pending.details.as_deref() {
                self.todos[open].details = details.to_string();
            }
            self.todos[open].is_details_open = Some(false);
        }

        for todo in &mut self.todos {
            todo.is_editing = false;
        }
        if editing != Some(position) {
            self.todos[position].is_editing = true;
        }

        self.persist()
    }

    /// Finish editing with `text` (kept only if non-blank)
    pub fn commit_edit(&mut self, position: usize, text: &str) -> Result<(), StoreError> {
        self.check(position)?;
        let text = text.trim();
        if !text.is_empty() {
            self.todos[position].text = text.to_string();
        }
        self.todos[position].is_editing = false;
        self.persist()
    }

    /// Leave edit mode without saving. The stored copy still says the
    /// record is being edited until the next mutation persists.
    pub fn cancel_edit(&mut self, position: usize) -> Result<(), StoreError> {
        self.check(position)?;
        self.todos[position].is_editing = false;
        Ok(())
    }
}
