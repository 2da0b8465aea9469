//! Recovers the reply text from a raw chat completion body.
//!
//! The body is not parsed. Instead, the last `"content": "` marker is located
//! and the string that follows it is read up to its closing quote. Choosing the
//! last marker prefers the final answer when a response carries several
//! `content` fields (e.g. a reasoning trace before the answer).

use thiserror::Error;

const CONTENT_MARKER: &str = "\"content\": \"";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ExtractionError {
    /// No content field, and the body looks like an error payload
    #[error("the server returned an error")]
    UpstreamError { raw_body: String },

    /// No content field at all
    #[error("the response did not contain a content field")]
    Malformed { raw_body: String },

    /// The content string is never closed
    #[error("the content field is unterminated")]
    Unterminated { raw_body: String },

    #[error("the content field is empty")]
    EmptyContent { raw_body: String },
}

impl ExtractionError {
    pub(crate) fn raw_body(&self) -> &str {
        match self {
            ExtractionError::UpstreamError { raw_body }
            | ExtractionError::Malformed { raw_body }
            | ExtractionError::Unterminated { raw_body }
            | ExtractionError::EmptyContent { raw_body } => raw_body,
        }
    }
}

pub(crate) fn extract(raw_body: &str) -> Result<String, ExtractionError> {
    let marker = match raw_body.rfind(CONTENT_MARKER) {
        Some(marker) => marker,
        None => {
            let raw_body = raw_body.to_string();

            return Err(if raw_body.contains("error") {
                ExtractionError::UpstreamError { raw_body }
            } else {
                ExtractionError::Malformed { raw_body }
            });
        }
    };

    let start = marker + CONTENT_MARKER.len();
    let end = match closing_quote(&raw_body.as_bytes()[start..]) {
        Some(offset) => start + offset,
        None => {
            return Err(ExtractionError::Unterminated {
                raw_body: raw_body.to_string(),
            })
        }
    };

    if end <= start {
        return Err(ExtractionError::EmptyContent {
            raw_body: raw_body.to_string(),
        });
    }

    // Both ends sit next to ASCII quotes, so they are char boundaries
    Ok(unescape(&raw_body[start..end]))
}

// Offset of the first quote not preceded by an unescaped backslash
fn closing_quote(field: &[u8]) -> Option<usize> {
    let mut escaped = false;

    for (i, &b) in field.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            return Some(i);
        }
    }

    None
}

/// Decodes `\n`, `\"` and `\\`, in that order, each as a separate pass over
/// the output of the previous one. This is not equivalent to a single
/// left-to-right decode: `\\n` decodes to a backslash followed by a newline.
/// Other escapes are left as they are.
pub(crate) fn unescape(field: &str) -> String {
    field
        .replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
}
