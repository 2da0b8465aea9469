//! Transport failures, classified so that callers can match on the cause
//! without digging into `reqwest::Error`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum ErrorKind {
    #[error("failed to set up the HTTP client")]
    ClientSetup,
    /// Connection refused, DNS failure, or a failed TLS handshake
    #[error("connection failed")]
    ConnectFailed,
    /// The response body could not be read as text
    #[error("failed to read the response body")]
    DecodingFailed,
    #[error("redirect policy violated")]
    RedirectPolicyViolated,
    /// Either the connect timeout or the total timeout fired, including while
    /// the body was being read
    #[error("timed out")]
    TimedOut,
    #[error("unknown reqwest error")]
    UnknownReqwestError,
}

impl ErrorKind {
    fn classify(err: &reqwest::Error) -> ErrorKind {
        if err.is_timeout() {
            ErrorKind::TimedOut
        } else if err.is_decode() || err.is_body() {
            ErrorKind::DecodingFailed
        } else if err.is_redirect() {
            ErrorKind::RedirectPolicyViolated
        } else if err.is_connect() {
            ErrorKind::ConnectFailed
        } else if err.is_builder() {
            ErrorKind::ClientSetup
        } else {
            ErrorKind::UnknownReqwestError
        }
    }
}

#[derive(Debug, Error)]
#[error("{kind}")]
pub(crate) struct Error {
    kind: ErrorKind,
    #[source]
    source: reqwest::Error,
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error {
            kind: ErrorKind::classify(&source),
            source,
        }
    }
}

impl Error {
    pub(crate) fn kind(&self) -> ErrorKind {
        self.kind
    }
}
