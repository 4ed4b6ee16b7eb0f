use thiserror::Error;

/// Failures of a single search (or catalog) round trip.
///
/// Every variant ends up in the same error banner; the distinction only
/// matters for logging.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Non-2xx response. The body is not parsed, so the message stays generic.
    #[error("Erro na busca")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl SearchError {
    /// HTTP status of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// A required page element was not supplied to the controller.
///
/// This is a wiring defect, not a runtime failure: it is logged and the
/// search is skipped without touching the page.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringError {
    #[error("results container not found")]
    MissingResultsContainer,

    #[error("submit control not found")]
    MissingSubmitControl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_is_generic() {
        let err = SearchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Erro na busca");
        assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn decode_error_carries_underlying_message() {
        let inner = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let expected = inner.to_string();
        let err = SearchError::from(inner);
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.status(), None);
    }
}
