//! Chat message entity <-> model mapper

use meet_core::entities::{Actor, ChatMessage, ReactionSet};
use meet_core::value_objects::{MeetingId, MessageId, UserId};

use crate::models::{MessageModel, ReactionModel};

/// Assemble a message from its row and its reaction rows (ordered by ordinal)
pub fn message_with_reactions(model: MessageModel, reactions: Vec<ReactionModel>) -> ChatMessage {
    let reactions: ReactionSet = reactions
        .into_iter()
        .filter(|r| r.message_id == model.id)
        .map(|r| (r.emoji, UserId::new(r.user_id)))
        .collect();

    ChatMessage {
        id: MessageId::from_uuid(model.id),
        meeting_id: MeetingId::new(model.meeting_id),
        author: Actor::new(model.author_id, model.author_name),
        content: model.content,
        reactions,
        created_at: model.created_at,
    }
}
