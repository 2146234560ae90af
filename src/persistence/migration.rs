use super::storage::KeyValueStore;
use crate::domain::{Status, Todo};
use anyhow::{Context, Result};
use serde_json::Value;

/// Storage key holding the JSON-encoded to-do array
pub const TODOS_KEY: &str = "todos";

/// Falsy in the loose sense older stored records use: null, false, 0, ""
fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f == 0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Bring one raw record up to the current schema.
///
/// Each rule only fills in or converts what is missing, so running this
/// twice is a no-op. `isDetailsOpen` is left untouched.
pub fn migrate_record(record: &mut Value, now: i64) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };

    // Boolean `completed` predates `status`
    if let Some(Value::Bool(completed)) = fields.get("completed").cloned() {
        let status = if completed {
            Status::Completed
        } else {
            Status::YetToStart
        };
        fields.insert("status".into(), Value::from(status.as_value()));
        fields.remove("completed");
    }

    if is_falsy(fields.get("startTime")) {
        fields.insert("startTime".into(), Value::from(now));
    }

    if !fields.contains_key("details") {
        fields.insert("details".into(), Value::from(""));
    }

    if !fields.contains_key("isEditing") {
        fields.insert("isEditing".into(), Value::from(false));
    }

    if is_falsy(fields.get("status")) {
        fields.insert("status".into(), Value::from(Status::YetToStart.as_value()));
    }
}

/// Run the migration pass over every record in order.
/// Returns how many records were changed.
pub fn migrate_records(records: &mut [Value], now: i64) -> usize {
    let mut changed = 0;
    for record in records.iter_mut() {
        let before = record.clone();
        migrate_record(record, now);
        if *record != before {
            changed += 1;
        }
    }
    changed
}

/// Parse the raw stored string into loosely-typed records.
/// A missing key or a JSON `null` is an empty list.
pub fn parse_records(raw: Option<&str>) -> Result<Vec<Value>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let value: Value = serde_json::from_str(raw).context("Stored to-dos are not valid JSON")?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(records) => Ok(records),
        other => anyhow::bail!("Stored to-dos must be a JSON array, found {}", type_name(&other)),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Type migrated records, one to-do per record in stored order.
///
/// Object fields are read leniently (see [`Todo`]). Entries that are not
/// objects at all are kept as a bare to-do: a string becomes its text,
/// anything else its JSON text.
pub fn into_todos(records: Vec<Value>, now: i64) -> Vec<Todo> {
    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            if record.is_object() {
                match serde_json::from_value::<Todo>(record.clone()) {
                    Ok(todo) => return todo,
                    Err(err) => {
                        tracing::warn!(position, error = %err, "stored to-do has an unreadable shape");
                    }
                }
            } else {
                tracing::warn!(position, "stored to-do is not an object");
            }
            bare_todo(&record, now)
        })
        .collect()
}

fn bare_todo(record: &Value, now: i64) -> Todo {
    let text = match record {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(fields) => fields
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        other => other.to_string(),
    };
    Todo::new(text, now)
}

/// Read, migrate and type the stored to-dos.
/// Nothing is written back; the next mutation persists the migrated shape.
pub fn load_and_migrate<S: KeyValueStore>(storage: &S, now: i64) -> Result<Vec<Todo>> {
    let raw = storage.get_item(TODOS_KEY)?;
    let mut records = parse_records(raw.as_deref())?;
    let changed = migrate_records(&mut records, now);
    if changed > 0 {
        tracing::info!(changed, total = records.len(), "migrated stored to-dos");
    }
    Ok(into_todos(records, now))
}
