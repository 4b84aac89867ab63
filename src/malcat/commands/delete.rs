use crate::commands::{search, CmdMessage, CmdResult, Prompter};
use crate::error::CatalogError;
use crate::search::SearchSession;
use crate::store::CatalogBackend;
use tracing::error;

pub const CONFIRM_QUESTION: &str = "Are you sure you want to delete this entry?";

/// Deletes entry `id` once the user confirms.
///
/// Declining sends nothing. A successful delete re-runs the last search; a
/// refused one leaves the results display untouched.
pub fn run<B: CatalogBackend, P: Prompter>(
    backend: &mut B,
    session: &mut SearchSession,
    prompter: &mut P,
    id: u64,
    default_limit: u32,
) -> CmdResult {
    if !prompter.confirm(CONFIRM_QUESTION) {
        return CmdResult::default().with_message(CmdMessage::info("Delete cancelled."));
    }

    match backend.delete_entry(id) {
        Ok(message) => {
            let mut result = search::refresh(backend, session, default_limit);
            result.messages.insert(0, CmdMessage::success(message));
            result
        }
        Err(CatalogError::Server { message, .. }) => CmdResult::default()
            .with_results(session.displayed().clone())
            .with_message(CmdMessage::error(message)),
        Err(e) => {
            error!(id, error = %e, "delete request failed");
            CmdResult::default()
                .with_results(session.displayed().clone())
                .with_message(CmdMessage::error(format!("Delete failed: {}", e)))
        }
    }
}
