use crate::commands::{search, CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::search::SearchSession;
use crate::store::CatalogBackend;
use tracing::error;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Parses a score as typed by the user. Must be a number within 0 to 10.
pub fn parse_score(input: &str) -> Result<String> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => Ok(trimmed.to_string()),
        _ => Err(CatalogError::InvalidInput("Invalid score".to_string())),
    }
}

/// Updates the score of entry `id`.
///
/// `input` is `None` when the user dismissed the prompt; nothing happens
/// then. An invalid score is rejected before any request.
pub fn run<B: CatalogBackend>(
    backend: &mut B,
    session: &mut SearchSession,
    id: u64,
    input: Option<&str>,
    default_limit: u32,
) -> CmdResult {
    let Some(input) = input else {
        return CmdResult::default();
    };

    let score = match parse_score(input) {
        Ok(score) => score,
        Err(e) => return CmdResult::default().with_message(CmdMessage::error(e.to_string())),
    };

    match backend.update_score(id, &score) {
        Ok(message) => {
            let mut result = search::refresh(backend, session, default_limit);
            result.messages.insert(0, CmdMessage::success(message));
            result
        }
        Err(CatalogError::Server { message, .. }) => {
            CmdResult::default().with_message(CmdMessage::error(message))
        }
        Err(e) => {
            error!(id, error = %e, "score update failed");
            CmdResult::default().with_message(CmdMessage::error(format!("Update failed: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::BackendFixture;
    use crate::store::memory::{Endpoint, Failure};

    #[test]
    fn parse_score_accepts_the_closed_range() {
        assert_eq!(parse_score("0").unwrap(), "0");
        assert_eq!(parse_score(" 8.25 ").unwrap(), "8.25");
        assert_eq!(parse_score("10.00").unwrap(), "10.00");
        assert!(parse_score("10.01").is_err());
        assert!(parse_score("-1").is_err());
        assert!(parse_score("great").is_err());
        assert!(parse_score("NaN").is_err());
    }

    #[test]
    fn cancelled_prompt_does_nothing() {
        let mut fixture = BackendFixture::new();
        let mut session = SearchSession::new();
        let result = run(&mut fixture.backend, &mut session, 1, None, 50);
        assert!(result.messages.is_empty());
        assert!(fixture.backend.requests().is_empty());
    }

    #[test]
    fn invalid_score_sends_nothing() {
        let mut fixture = BackendFixture::new();
        let mut session = SearchSession::new();
        let result = run(&mut fixture.backend, &mut session, 1, Some("11"), 50);
        assert_eq!(result.messages[0].content, "Invalid score");
        assert!(fixture.backend.requests().is_empty());
    }

    #[test]
    fn update_shows_message_and_refreshes() {
        let mut fixture = BackendFixture::new();
        let mut session = SearchSession::new();
        let result = run(&mut fixture.backend, &mut session, 2, Some("9.5"), 50);

        assert_eq!(result.messages[0].content, "Score updated");
        assert_eq!(
            fixture.backend.requests(),
            vec!["POST /api/update_score/2", "GET /api/search?limit=50"]
        );
        assert_eq!(
            fixture.backend.entry(2).unwrap().field_values("score"),
            vec!["9.5"]
        );
    }

    #[test]
    fn transport_failure_is_reported() {
        let mut fixture = BackendFixture::new();
        fixture.backend.fail(Endpoint::UpdateScore, Failure::Transport);
        let mut session = SearchSession::new();
        let result = run(&mut fixture.backend, &mut session, 1, Some("5"), 50);
        assert!(result.messages[0].content.starts_with("Update failed:"));
    }
}
