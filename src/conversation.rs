//! Session-scoped conversation state
//!
//! An append-only, ordered log of turns. One `Conversation` belongs to one
//! session; it is dropped with the session and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lang::VoiceLang;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message exchanged in the conversation
///
/// Immutable once constructed. Assistant turns carry the playback language
/// resolved for them; user turns never do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Playback language, present only on assistant turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<VoiceLang>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Build a user turn from the effective (post-transcription) message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            lang: None,
            created_at: Utc::now(),
        }
    }

    /// Build an assistant turn tagged with its resolved playback language
    #[must_use]
    pub fn assistant(content: impl Into<String>, lang: VoiceLang) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            lang: Some(lang),
            created_at: Utc::now(),
        }
    }
}

/// Ordered, append-only log of turns for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Session identity
    pub id: Uuid,
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start an empty conversation for a new session
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            turns: Vec::new(),
        }
    }

    /// Append a turn. Never removes or reorders existing turns.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Full ordered sequence, oldest first
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recently appended assistant turn, if any
    ///
    /// Only this turn is ever eligible for audio playback; earlier assistant
    /// turns render as text only.
    #[must_use]
    pub fn last_assistant(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.role == Role::Assistant)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
