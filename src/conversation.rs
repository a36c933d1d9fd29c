//! Conversation list state.
//!
//! `ConversationManager` owns the ordered list (newest first), the active id,
//! and the store it writes through to after every mutation.

use crate::store::{KeyValueStore, LegacyExchange, LocalStore};
use crate::types::{
    Conversation, ConversationId, DEFAULT_TITLE, Message, Sender, ThemeMode, now_millis,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

pub const TITLE_MAX_CHARS: usize = 30;

/// Title for a conversation whose first user message is `text`.
pub fn derive_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}

pub struct ConversationManager<S> {
    conversations: Vec<Conversation>,
    active_id: Option<ConversationId>,
    store: LocalStore<S>,
}

impl<S: KeyValueStore> ConversationManager<S> {
    /// Load persisted state, migrate legacy history, and make sure one
    /// conversation is active.
    pub fn bootstrap(mut store: LocalStore<S>) -> Self {
        let mut conversations = store.load_conversations();
        let legacy = store.take_legacy_history();
        let migrated = !legacy.is_empty();
        if migrated {
            let id = next_id(&conversations, now_millis());
            conversations.insert(0, conversation_from_legacy(id, &legacy));
            info!("migrated {} legacy exchanges", legacy.len());
        }

        let active_id = conversations.first().map(|conv| conv.id);
        let mut manager = Self {
            conversations,
            active_id,
            store,
        };
        if manager.conversations.is_empty() {
            manager.create();
        } else if migrated {
            manager.persist();
        }
        manager
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_id(&self) -> Option<ConversationId> {
        self.active_id
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|conv| conv.id == id)
    }

    pub fn store(&self) -> &LocalStore<S> {
        &self.store
    }

    /// Prepend a new empty conversation and make it active.
    pub fn create(&mut self) -> ConversationId {
        let id = next_id(&self.conversations, now_millis());
        self.conversations.insert(0, Conversation::new(id));
        self.active_id = Some(id);
        debug!("created conversation {}", id);
        self.persist();
        id
    }

    /// Activate `id`. Unknown ids are ignored.
    pub fn load(&mut self, id: ConversationId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active_id = Some(id);
        true
    }

    pub fn rename(&mut self, id: ConversationId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(conv) = self.conversations.iter_mut().find(|conv| conv.id == id) else {
            return false;
        };
        conv.title = title.to_string();
        self.persist();
        true
    }

    /// Remove `id`. When it was active, fall back to the newest remaining
    /// conversation or start a fresh one.
    pub fn delete(&mut self, id: ConversationId) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|conv| conv.id != id);
        if self.conversations.len() == before {
            return false;
        }

        if self.active_id == Some(id) {
            self.active_id = self.conversations.first().map(|conv| conv.id);
        }
        if self.conversations.is_empty() {
            self.create();
        } else {
            self.persist();
        }
        true
    }

    /// Append to conversation `id`. The first user message names a
    /// conversation that still carries the default title.
    pub fn append(&mut self, id: ConversationId, message: Message) -> bool {
        let Some(conv) = self.conversations.iter_mut().find(|conv| conv.id == id) else {
            warn!("dropping message for missing conversation {}", id);
            return false;
        };
        let names_it = message.sender == Sender::User
            && conv.title == DEFAULT_TITLE
            && !conv.messages.iter().any(|m| m.sender == Sender::User);
        if names_it {
            conv.title = derive_title(&message.text);
        }
        conv.messages.push(message);
        self.persist();
        true
    }

    /// Drop every conversation and start over with one empty conversation.
    pub fn clear_all(&mut self) -> ConversationId {
        self.conversations.clear();
        self.active_id = None;
        self.create()
    }

    pub fn theme(&self) -> ThemeMode {
        self.store.load_theme()
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        if let Err(err) = self.store.save_theme(mode) {
            warn!("failed to persist theme: {}", err);
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save_conversations(&self.conversations) {
            warn!("failed to persist conversations: {}", err);
        }
    }
}

fn next_id(existing: &[Conversation], candidate: ConversationId) -> ConversationId {
    match existing.iter().map(|conv| conv.id).max() {
        Some(max) if candidate <= max => max + 1,
        _ => candidate,
    }
}

fn conversation_from_legacy(id: ConversationId, history: &[LegacyExchange]) -> Conversation {
    let mut conv = Conversation::new(id);
    for exchange in history {
        let timestamp = exchange
            .timestamp
            .as_deref()
            .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
            .map(|dt| (dt.unix_timestamp_nanos() / 1_000_000) as i64)
            .unwrap_or(id);
        conv.messages.push(Message {
            text: exchange.user.clone(),
            sender: Sender::User,
            timestamp,
        });
        conv.messages.push(Message {
            text: exchange.bot.clone(),
            sender: Sender::Bot,
            timestamp,
        });
    }
    if let Some(first) = history.first() {
        conv.title = derive_title(&first.user);
    }
    conv
}
