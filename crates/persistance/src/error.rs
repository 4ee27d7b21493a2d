/// Errors from the persistence REST layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistanceError {
    /// The HTTP request itself failed (connect, timeout, decode, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The persistence service returned a non-2xx status code.
    #[error("Persistance API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl PersistanceError {
    /// Status code returned by the service, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            PersistanceError::Api { status, .. } => Some(*status),
            PersistanceError::Request(err) => err.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
