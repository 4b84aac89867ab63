use crate::commands::{CmdMessage, CmdResult};
use crate::error::CatalogError;
use crate::form::{FormData, FormPayload, FormSchema};
use crate::model::RecordType;
use crate::store::CatalogBackend;
use tracing::{debug, error};

/// Posts `form` as a new entry of `record_type`.
///
/// On success the form comes back with every field emptied; on failure it
/// comes back untouched so the user can correct it.
pub fn run<B: CatalogBackend>(
    backend: &mut B,
    record_type: &RecordType,
    mut form: FormData,
    schema: &FormSchema,
) -> CmdResult {
    let payload = match FormPayload::build(&form, schema) {
        Ok(payload) => payload,
        Err(e) => {
            return CmdResult::default()
                .with_form(form)
                .with_message(CmdMessage::error(e.to_string()))
        }
    };
    debug!(%record_type, fields = payload.len(), "submitting entry");

    match backend.insert(record_type, &payload) {
        Ok(id) => {
            form.reset();
            let mut result = CmdResult::default()
                .with_form(form)
                .with_message(CmdMessage::success(format!("Success! ID: {}", id)));
            result.entry_id = Some(id);
            result
        }
        Err(CatalogError::Server { message, .. }) => CmdResult::default()
            .with_form(form)
            .with_message(CmdMessage::error(format!("Error: {}", message))),
        Err(e) => {
            error!(%record_type, error = %e, "insert request failed");
            CmdResult::default()
                .with_form(form)
                .with_message(CmdMessage::error(format!("Submit failed: {}", e)))
        }
    }
}
