//! Type definitions for chat primitives
//!

/// The author of a `Message`. This is a closed set: the endpoint
/// rejects any other role, so a value outside of it can never be
/// represented here.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Role {
    /// A message authored by the user
    User,

    /// A message authored by the model
    Assistant,

    /// A `System` message is an authoritative message which is used to
    /// instruct the model. Usually, it appears as the first message
    /// in a dialog.
    System,

    /// The output of a tool invocation
    Tool,
}

impl Role {
    pub(crate) fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// The role used for user turns, as configured. An unrecognized value is
/// kept around for diagnostics but is never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RoleSetting {
    Valid(Role),
    Unrecognized(String),
}

impl RoleSetting {
    pub(crate) fn parse(value: &str) -> RoleSetting {
        match value.parse::<Role>() {
            Ok(role) => RoleSetting::Valid(role),
            Err(_) => RoleSetting::Unrecognized(value.to_string()),
        }
    }
}

impl Default for RoleSetting {
    fn default() -> Self {
        RoleSetting::Valid(Role::User)
    }
}

/// A `Message` in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Message {
    /// The author of the message
    pub role: Role,
    /// The contents of the message
    pub content: String,
}

impl Message {
    pub(crate) fn new(role: Role, content: String) -> Message {
        Message { role, content }
    }

    pub(crate) fn system(content: String) -> Message {
        Message::new(Role::System, content)
    }
}

/// Completed exchanges. The history is kept locally and is never sent to
/// the model.
#[derive(Debug, Default)]
pub(crate) struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub(crate) fn new() -> ConversationHistory {
        ConversationHistory::default()
    }

    pub(crate) fn record_exchange(&mut self, user: String, reply: String) {
        self.messages.push(Message::new(Role::User, user));
        self.messages.push(Message::new(Role::Assistant, reply));
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    /// Discards the history, returning the number of messages removed.
    pub(crate) fn clear(&mut self) -> usize {
        let n = self.messages.len();
        self.messages.clear();
        n
    }
}
