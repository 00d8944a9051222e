use thiserror::Error;

/// Failures surfaced by [`crate::AdminClient`].
///
/// Two application channels are distinguished on purpose: `Unauthorized`
/// (session expired or never established; the caller must re-authenticate and
/// must not touch the response body) and `Api` (an otherwise-healthy response
/// with `success: false`).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication required; log in and retry")]
    Unauthorized,

    #[error("{0}")]
    Api(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}
