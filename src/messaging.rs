//! Send flow for chat messages.
//!
//! A send is split in two so the UI can release its borrow of the state while
//! the request is in flight:
//! - `begin_send` validates the input and appends the user message
//! - `complete_send` appends the bot reply (or an error line) afterwards
//!
//! `send_message` runs both halves for headless callers.

use crate::api::{ApiResult, ChatReply, DlpBackend};
use crate::conversation::ConversationManager;
use crate::store::KeyValueStore;
use crate::types::{ConversationId, Message};
use tracing::{error, warn};

pub const EMPTY_REPLY_FALLBACK: &str = "I could not process your message. Please try again.";
pub const SEND_ERROR_REPLY: &str = "Sorry, there was an error processing your message.";

/// A user message that has been appended and is awaiting its reply.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSend {
    pub conversation: ConversationId,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SendOutcome {
    /// Input was blank; nothing was appended or sent.
    Rejected,
    /// The server replied; carries the text appended as the bot message.
    Replied(String),
    /// The request failed; the error line was appended.
    Failed(String),
    /// The conversation vanished before the reply arrived.
    Orphaned,
}

/// Append the trimmed input to the active conversation. Returns `None`
/// when there is nothing to send.
pub fn begin_send<S: KeyValueStore>(
    manager: &mut ConversationManager<S>,
    input: &str,
) -> Option<PendingSend> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }
    let conversation = match manager.active_id() {
        Some(id) => id,
        None => manager.create(),
    };
    manager.append(conversation, Message::user(text));
    Some(PendingSend {
        conversation,
        text: text.to_string(),
    })
}

/// Append the reply for `pending` to the conversation it was sent from.
pub fn complete_send<S: KeyValueStore>(
    manager: &mut ConversationManager<S>,
    pending: &PendingSend,
    result: ApiResult<ChatReply>,
) -> SendOutcome {
    let (text, outcome): (String, fn(String) -> SendOutcome) = match result {
        Ok(reply) => {
            let text = reply
                .response
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());
            (text, SendOutcome::Replied)
        }
        Err(err) => {
            error!("chat error: {}", err);
            (SEND_ERROR_REPLY.to_string(), SendOutcome::Failed)
        }
    };

    if manager.append(pending.conversation, Message::bot(text.clone())) {
        outcome(text)
    } else {
        warn!(
            "reply arrived after conversation {} was deleted",
            pending.conversation
        );
        SendOutcome::Orphaned
    }
}

pub async fn send_message<S, B>(
    manager: &mut ConversationManager<S>,
    backend: &B,
    input: &str,
) -> SendOutcome
where
    S: KeyValueStore,
    B: DlpBackend + ?Sized,
{
    let Some(pending) = begin_send(manager, input) else {
        return SendOutcome::Rejected;
    };
    let result = backend.chat(&pending.text).await;
    complete_send(manager, &pending, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::store::{LocalStore, MemoryStore};
    use crate::types::Sender;

    fn manager() -> ConversationManager<MemoryStore> {
        ConversationManager::bootstrap(LocalStore::new(MemoryStore::new()))
    }

    #[test]
    fn test_begin_send_rejects_blank() {
        let mut manager = manager();
        assert_eq!(begin_send(&mut manager, ""), None);
        assert_eq!(begin_send(&mut manager, " \n\t "), None);
        assert!(manager.active().unwrap().is_empty());
    }

    #[test]
    fn test_begin_send_appends_trimmed_user_message() {
        let mut manager = manager();
        let pending = begin_send(&mut manager, "  Hello  ").unwrap();
        assert_eq!(pending.text, "Hello");
        let active = manager.active().unwrap();
        assert_eq!(active.messages.len(), 1);
        assert_eq!(active.messages[0].text, "Hello");
        assert_eq!(active.messages[0].sender, Sender::User);
        assert_eq!(active.title, "Hello");
    }

    #[test]
    fn test_complete_send_uses_fallback_for_empty_reply() {
        let mut manager = manager();
        let pending = begin_send(&mut manager, "Hi").unwrap();
        let outcome = complete_send(&mut manager, &pending, Ok(ChatReply { response: None }));
        assert_eq!(outcome, SendOutcome::Replied(EMPTY_REPLY_FALLBACK.to_string()));
        assert_eq!(
            manager.active().unwrap().messages[1].text,
            EMPTY_REPLY_FALLBACK
        );
    }

    #[test]
    fn test_complete_send_keeps_whitespace_reply() {
        let mut manager = manager();
        let pending = begin_send(&mut manager, "Hi").unwrap();
        let empty = complete_send(
            &mut manager,
            &pending,
            Ok(ChatReply {
                response: Some(String::new()),
            }),
        );
        assert_eq!(empty, SendOutcome::Replied(EMPTY_REPLY_FALLBACK.to_string()));

        let spaces = complete_send(
            &mut manager,
            &pending,
            Ok(ChatReply {
                response: Some("  ".into()),
            }),
        );
        assert_eq!(spaces, SendOutcome::Replied("  ".to_string()));
        assert_eq!(manager.active().unwrap().messages[2].text, "  ");
    }

    #[test]
    fn test_complete_send_appends_error_line() {
        let mut manager = manager();
        let pending = begin_send(&mut manager, "Hi").unwrap();
        let err = ApiError::Decode(serde_json::from_str::<ChatReply>("nope").unwrap_err());
        let outcome = complete_send(&mut manager, &pending, Err(err));
        assert_eq!(outcome, SendOutcome::Failed(SEND_ERROR_REPLY.to_string()));
        let last = manager.active().unwrap().messages.last().unwrap().clone();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, SEND_ERROR_REPLY);
    }

    #[test]
    fn test_reply_lands_in_originating_conversation() {
        let mut manager = manager();
        let pending = begin_send(&mut manager, "First thread").unwrap();
        let other = manager.create();

        complete_send(
            &mut manager,
            &pending,
            Ok(ChatReply {
                response: Some("Answer".into()),
            }),
        );
        assert!(manager.get(other).unwrap().is_empty());
        assert_eq!(manager.get(pending.conversation).unwrap().messages.len(), 2);
    }

    #[test]
    fn test_reply_for_deleted_conversation_is_dropped() {
        let mut manager = manager();
        let pending = begin_send(&mut manager, "Soon gone").unwrap();
        manager.delete(pending.conversation);

        let outcome = complete_send(
            &mut manager,
            &pending,
            Ok(ChatReply {
                response: Some("Too late".into()),
            }),
        );
        assert_eq!(outcome, SendOutcome::Orphaned);
        assert!(manager.active().unwrap().is_empty());
    }
}
