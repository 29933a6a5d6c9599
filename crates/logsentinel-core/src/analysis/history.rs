use crate::conversation::{ChatMessage, ChatRole};
use crate::llm::{Role, Turn};

/// Wire role for a conversation role. System notices are never replayed.
pub fn wire_role(role: ChatRole) -> Option<Role> {
    match role {
        ChatRole::Model => Some(Role::Model),
        ChatRole::User => Some(Role::User),
        ChatRole::System => None,
    }
}

/// Convert the conversation into model turns, dropping system entries.
/// With a `limit`, only the most recent turns are kept.
pub fn to_wire_history(messages: &[ChatMessage], limit: Option<usize>) -> Vec<Turn> {
    let mut turns: Vec<Turn> = messages
        .iter()
        .filter_map(|m| {
            wire_role(m.role).map(|role| Turn {
                role,
                text: m.text.clone(),
            })
        })
        .collect();

    if let Some(limit) = limit {
        if turns.len() > limit {
            turns.drain(..turns.len() - limit);
        }
    }
    turns
}

/// Re-apply the role mapping to turns that were already converted.
pub fn remap_turns(turns: &[Turn]) -> Vec<Turn> {
    turns
        .iter()
        .map(|t| Turn {
            role: Role::from_label(t.role.as_str()),
            text: t.text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::MessageId;

    fn msg(role: ChatRole, text: &str) -> ChatMessage {
        ChatMessage::new(MessageId::new(text), role, text)
    }

    fn sample() -> Vec<ChatMessage> {
        vec![
            msg(ChatRole::Model, "welcome"),
            msg(ChatRole::User, "q1"),
            msg(ChatRole::System, "notice"),
            msg(ChatRole::Model, "a1"),
            msg(ChatRole::User, "q2"),
        ]
    }

    #[test]
    fn system_messages_are_dropped() {
        let turns = to_wire_history(&sample(), None);
        let texts: Vec<_> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["welcome", "q1", "a1", "q2"]);
        assert_eq!(turns[0].role, Role::Model);
        assert_eq!(turns[1].role, Role::User);
    }

    #[test]
    fn mapping_is_idempotent() {
        let once = to_wire_history(&sample(), None);
        let twice = remap_turns(&once);
        assert_eq!(once, twice);
        assert_eq!(remap_turns(&twice), twice);
    }

    #[test]
    fn unknown_labels_map_to_user() {
        assert_eq!(Role::from_label("system"), Role::User);
        assert_eq!(Role::from_label("assistant"), Role::User);
        assert_eq!(Role::from_label("model"), Role::Model);
    }

    #[test]
    fn limit_keeps_most_recent() {
        let turns = to_wire_history(&sample(), Some(2));
        let texts: Vec<_> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a1", "q2"]);
    }
}
