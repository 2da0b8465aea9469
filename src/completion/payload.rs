//! Request bodies for `/v1/chat/completions`.

use super::escape::escape;
use crate::chat::Message;

/// Used when the answer length is unlimited.
pub(crate) const MAX_TOKENS_CEILING: u32 = 1024;

/// The smallest `max_tokens` sent for a limited answer.
pub(crate) const MIN_MAX_TOKENS: u32 = 16;

/// Approximates the number of tokens needed for `word_limit` words. A limit
/// of zero means unlimited.
pub(crate) fn max_output_len(word_limit: u32) -> u32 {
    if word_limit == 0 {
        MAX_TOKENS_CEILING
    } else {
        word_limit.saturating_mul(2).max(MIN_MAX_TOKENS)
    }
}

/// Serializes a non-streaming chat completion request.
///
/// Roles are written as-is since they come from a closed set; everything
/// else goes through [`escape`].
pub(crate) fn build(
    messages: &[Message],
    temperature: f64,
    model_name: &str,
    max_tokens: u32,
) -> String {
    let mut body = String::new();

    body.push_str("{\"model\": \"");
    body.push_str(&escape(model_name));
    body.push_str("\", \"messages\": [");

    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            body.push_str(", ");
        }

        body.push_str("{\"role\": \"");
        body.push_str(message.role.as_str());
        body.push_str("\", \"content\": \"");
        body.push_str(&escape(&message.content));
        body.push_str("\"}");
    }

    body.push_str(&format!(
        "], \"temperature\": {}, \"max_tokens\": {}}}",
        temperature, max_tokens
    ));

    body
}
