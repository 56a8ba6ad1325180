//! Per-connection session context.
//!
//! Holds authentication state and the assistant transcript. Every handler takes
//! the session explicitly; nothing here is process-global.

use serde::{Deserialize, Serialize};

use super::faq;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One line of the assistant transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub display_name: String,
    pub logged_in_at: chrono::DateTime<chrono::Utc>,
}

/// Session state for one interactive user.
#[derive(Debug, Clone)]
pub struct Session {
    user: Option<AuthenticatedUser>,
    transcript: Vec<ChatMessage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh, unauthenticated session with the assistant greeting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user: None,
            transcript: vec![ChatMessage::assistant(faq::GREETING)],
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    /// Display name of the logged-in user, empty when logged out.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.display_name.as_str())
    }

    pub(crate) fn authenticate(&mut self, username: &str, display_name: &str) {
        self.user = Some(AuthenticatedUser {
            username: username.to_string(),
            display_name: display_name.to_string(),
            logged_in_at: chrono::Utc::now(),
        });
    }

    /// Drop authentication and start a fresh transcript.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Ask the assistant a question, recording both sides in the transcript.
    ///
    /// Blank queries are ignored and return `None`.
    pub fn ask(&mut self, query: &str) -> Option<&'static str> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let answer = faq::respond(query);
        self.transcript.push(ChatMessage::user(query));
        self.transcript.push(ChatMessage::assistant(answer));
        Some(answer)
    }

    /// Remove every message, including the greeting.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }
}
