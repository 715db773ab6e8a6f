//! Role-tagged messages and conversation assembly.
//!
//! Every flow builds its model input through [`MessageSequence::assemble`],
//! which keeps history in chronological order and always places the newest
//! user turn last. A `MessageSequence` can never be empty.

use serde::{Deserialize, Serialize};

/// Role of a message sender as seen by the generation port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that steer the model.
    System,
    /// End-user input.
    User,
    /// Prior model output.
    Model,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Creates a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Creates a model message.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }
}

/// Role of an externally supplied history turn.
///
/// History never carries system turns; those are owned by the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of caller-provided chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

impl From<&ChatTurn> for Message {
    fn from(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            ChatRole::User => Role::User,
            ChatRole::Model => Role::Model,
        };
        Message::new(role, turn.content.clone())
    }
}

/// Ordered, non-empty message sequence that ends with the newest user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSequence {
    messages: Vec<Message>,
}

impl MessageSequence {
    /// Builds `[system?, ...history, user]`.
    ///
    /// History turns are converted 1:1 and kept in the order supplied.
    pub fn assemble(
        system: Option<&str>,
        history: &[ChatTurn],
        user_text: impl Into<String>,
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(system) = system {
            messages.push(Message::system(system));
        }
        messages.extend(history.iter().map(Message::from));
        messages.push(Message::user(user_text));
        Self { messages }
    }

    /// Shorthand for a system instruction followed by a single user turn.
    pub fn single_turn(system: &str, user_text: impl Into<String>) -> Self {
        Self::assemble(Some(system), &[], user_text)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true: `assemble` always pushes the user turn.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The system instruction, if the sequence starts with one.
    pub fn system_text(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.text.as_str())
    }

    /// The newest user turn.
    pub fn last_user_text(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.text.as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a MessageSequence {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
