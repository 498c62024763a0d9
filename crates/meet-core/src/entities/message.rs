//! Chat message entity and its reaction set

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Actor;
use crate::error::DomainError;
use crate::value_objects::{MeetingId, MessageId, UserId};

/// Maximum chat message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Chat message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub meeting_id: MeetingId,
    pub author: Actor,
    pub content: String,
    pub reactions: ReactionSet,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message, rejecting empty or oversized content
    pub fn new(meeting_id: MeetingId, author: Actor, content: String) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "message content must not be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_MESSAGE_LENGTH,
            });
        }

        Ok(Self {
            id: MessageId::generate(),
            meeting_id,
            author,
            content,
            reactions: ReactionSet::default(),
            created_at: Utc::now(),
        })
    }
}

/// Users who reacted with one emoji
///
/// `count` always equals `users.len()`; both are only changed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEmojiReaction")]
pub struct EmojiReaction {
    users: Vec<UserId>,
    count: usize,
}

#[derive(Deserialize)]
struct RawEmojiReaction {
    users: Vec<UserId>,
}

impl From<RawEmojiReaction> for EmojiReaction {
    fn from(raw: RawEmojiReaction) -> Self {
        let mut reaction = Self::default();
        for user in raw.users {
            if !reaction.contains(&user) {
                reaction.insert(user);
            }
        }
        reaction
    }
}

impl EmojiReaction {
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.users.contains(user_id)
    }

    fn insert(&mut self, user_id: UserId) {
        self.users.push(user_id);
        self.count = self.users.len();
    }

    fn remove(&mut self, user_id: &UserId) {
        self.users.retain(|u| u != user_id);
        self.count = self.users.len();
    }
}

/// Outcome of a reaction toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionChange {
    Added,
    Removed,
}

/// Emoji reactions attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionSet(BTreeMap<String, EmojiReaction>);

impl ReactionSet {
    /// Add the user's reaction, or remove it if already present
    ///
    /// An emoji whose user set becomes empty is dropped entirely.
    pub fn toggle(&mut self, emoji: &str, user_id: &UserId) -> ReactionChange {
        if let Some(reaction) = self.0.get_mut(emoji) {
            if reaction.contains(user_id) {
                reaction.remove(user_id);
                if reaction.users.is_empty() {
                    self.0.remove(emoji);
                }
                return ReactionChange::Removed;
            }
        }

        self.0
            .entry(emoji.to_string())
            .or_default()
            .insert(user_id.clone());
        ReactionChange::Added
    }

    pub fn get(&self, emoji: &str) -> Option<&EmojiReaction> {
        self.0.get(emoji)
    }

    /// Count for one emoji, zero when absent
    pub fn count(&self, emoji: &str) -> usize {
        self.0.get(emoji).map_or(0, EmojiReaction::count)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn emojis(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Flatten into `(emoji, user)` pairs in per-emoji user order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &UserId)> {
        self.0
            .iter()
            .flat_map(|(emoji, r)| r.users.iter().map(move |u| (emoji.as_str(), u)))
    }
}

/// Rebuild a set from stored `(emoji, user)` rows; repeated pairs collapse
impl FromIterator<(String, UserId)> for ReactionSet {
    fn from_iter<I: IntoIterator<Item = (String, UserId)>>(iter: I) -> Self {
        let mut set = Self::default();
        for (emoji, user) in iter {
            let reaction = set.0.entry(emoji).or_default();
            if !reaction.contains(&user) {
                reaction.insert(user);
            }
        }
        set
    }
}
