use reqwest::StatusCode;
use thiserror::Error;

/// Failures seen by API consumers.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },

    /// A success envelope without the expected payload.
    #[error("response carried no data")]
    MissingData,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            ClientError::MissingData => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
