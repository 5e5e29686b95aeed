use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("unknown model id: {0}")]
    UnknownModel(String),

    #[error("missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("generated data for `{resource}` does not match its cardinality: {reason}")]
    InvalidOutput { resource: String, reason: String },
}

impl GenError {
    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures, rate limiting (429) and server errors (5xx) are
    /// transient; everything else is not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Provider { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GenError {
    fn from(e: reqwest::Error) -> Self {
        // Undecodable bodies are permanent.
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

pub type GenResult<T> = Result<T, GenError>;
