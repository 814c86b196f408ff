use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn's worth of text, tagged with who said it. Never mutated after
/// it enters a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only message history. The full snapshot is sent with
/// every completion request so the remote model sees prior turns.
///
/// The store never evicts on its own; `clear` is the only way to bound
/// growth. It also provides no locking — each session owns its own store
/// and serializes turns through `&mut` access.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the end of the history. Accepts any role in any order;
    /// callers are expected to keep user/assistant turns alternating.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Discards the entire history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The full ordered history, for inclusion in an outgoing request.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
