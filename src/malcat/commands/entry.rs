use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::form::{FormData, FormPayload, FormSchema, PayloadValue};
use crate::model::EntryDetail;
use crate::store::CatalogBackend;
use tracing::error;

/// Fetches the full detail of entry `id`.
pub fn get<B: CatalogBackend>(backend: &B, id: u64) -> Result<CmdResult> {
    let entry = backend.get_entry(id)?;
    Ok(CmdResult::default().with_entry(entry))
}

/// Schema of the edit form for `entry`. Entries without a known medium use
/// the inferred schema.
pub fn edit_schema(entry: &EntryDetail) -> FormSchema {
    match entry.record_type() {
        Some(record_type) => FormSchema::edit_for_record_type(&record_type),
        None => FormSchema::inferred(),
    }
}

/// Pre-filled edit form for `entry`.
pub fn edit_form(entry: &EntryDetail) -> FormData {
    FormData::from_entry(entry, &edit_schema(entry))
}

/// Posts an edited form for entry `id`. The form is never reset.
pub fn update<B: CatalogBackend>(
    backend: &mut B,
    id: u64,
    form: &FormData,
    schema: &FormSchema,
) -> CmdResult {
    let payload = match FormPayload::build(form, schema) {
        Ok(payload) => payload,
        Err(e) => return CmdResult::default().with_message(CmdMessage::error(e.to_string())),
    };
    if !matches!(payload.get("medium_type"), Some(PayloadValue::Text(_))) {
        return CmdResult::default()
            .with_message(CmdMessage::error("Error: medium_type is required"));
    }

    match backend.update_entry(id, &payload) {
        Ok(message) => CmdResult::default().with_message(CmdMessage::success(message)),
        Err(CatalogError::Server { message, .. }) => {
            CmdResult::default().with_message(CmdMessage::error(format!("Error: {}", message)))
        }
        Err(e) => {
            error!(id, error = %e, "update request failed");
            CmdResult::default().with_message(CmdMessage::error(format!("Update failed: {}", e)))
        }
    }
}

/// Fetches entry `id`, applies `changes` over its current values and posts the
/// result. Changed fields replace every existing value of that field.
pub fn edit<B: CatalogBackend>(
    backend: &mut B,
    id: u64,
    changes: &FormData,
) -> Result<CmdResult> {
    let entry = backend.get_entry(id)?;
    let schema = edit_schema(&entry);
    let form = merge(&edit_form(&entry), changes);
    let mut result = update(backend, id, &form, &schema);
    result.entry = Some(entry);
    Ok(result)
}

fn merge(base: &FormData, changes: &FormData) -> FormData {
    let changed = changes.keys();
    let mut form = FormData::new();
    for (name, value) in base.entries() {
        if !changed.contains(&name.as_str()) {
            form.append(name.as_str(), value.as_str());
        }
    }
    for (name, value) in changes.entries() {
        form.append(name.as_str(), value.as_str());
    }
    form
}
