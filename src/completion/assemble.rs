//! Builds the messages sent for a single turn.

use crate::chat::{Message, Role, RoleSetting};
use crate::warn;

/// Advisory only, the model is free to ignore it.
pub(crate) fn word_limit_instruction(word_limit: u32) -> String {
    format!("Please answer in no more than {} words.", word_limit)
}

/// Produces the system prompt, the optional word limit instruction, and the
/// user's input, in that order. Conversation history is never included.
pub(crate) fn assemble(
    system_prompt: &str,
    word_limit: u32,
    role: &RoleSetting,
    user_input: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(3);

    messages.push(Message::system(system_prompt.to_string()));

    if word_limit > 0 {
        messages.push(Message::system(word_limit_instruction(word_limit)));
    }

    let role = match role {
        RoleSetting::Valid(role) => *role,
        RoleSetting::Unrecognized(value) => {
            warn!(
                "role \"{}\" is not one of user, assistant, system, tool; sending as user",
                value
            );

            Role::User
        }
    };

    messages.push(Message::new(role, user_input.to_string()));

    messages
}
