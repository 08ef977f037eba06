use reqwest::StatusCode;
use std::fmt;

// Failure to get any HTTP response at all. Non-2xx responses are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Timeout,
    Connect(String),
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Connect(message) => write!(f, "connection failed: {message}"),
            TransportError::Other(message) => write!(f, "request failed: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

// Outcome of a failed token refresh. Clone because one refresh result is
// shared by every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    // No refresh token stored; the session cannot be renewed.
    NoSession,
    // Endpoint rejected the token, was unreachable, or answered garbage.
    RefreshFailed(String),
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshError::NoSession => write!(f, "no session to refresh"),
            RefreshError::RefreshFailed(reason) => write!(f, "token refresh failed: {reason}"),
        }
    }
}

impl std::error::Error for RefreshError {}

#[derive(Debug)]
pub enum LoginError {
    // Backend answered non-2xx; message is already human readable.
    Rejected { status: StatusCode, message: String },
    Transport(TransportError),
    InvalidResponse(String),
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::Rejected { status, message } => {
                write!(f, "login rejected ({status}): {message}")
            }
            LoginError::Transport(err) => write!(f, "login transport error: {err}"),
            LoginError::InvalidResponse(message) => {
                write!(f, "login response could not be read: {message}")
            }
        }
    }
}

impl std::error::Error for LoginError {}

impl From<TransportError> for LoginError {
    fn from(err: TransportError) -> Self {
        LoginError::Transport(err)
    }
}
