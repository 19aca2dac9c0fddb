use thiserror::Error;

/// Message shown when a Google account is not on the allow-list.
pub const UNAUTHORIZED_MESSAGE: &str = "Your email is not authorized to access the DSOG Franchise Portal. \
Please contact support at office.dsog@gmail.com or use email/password login if you have credentials.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,
    #[error("Please enter both email and password")]
    MissingCredentials,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid credential: {0}")]
    Credential(&'static str),
    #[error("Unable to reach the server: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Parse(String),
    #[error("{0}")]
    Backend(String),
    #[error("invalid backend url")]
    Url(#[from] url::ParseError),
    #[error("session storage error")]
    Session(#[from] std::io::Error),
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying the same request later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
