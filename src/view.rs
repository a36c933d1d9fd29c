//! View-models.
//!
//! Pure functions from application state to what the UI draws. The Dioxus
//! components in `views` only bind these to elements.

use crate::api::ReferenceEntry;
use crate::conversation::ConversationManager;
use crate::speech::SpeechState;
use crate::store::KeyValueStore;
use crate::types::{Conversation, ConversationId, DEFAULT_TITLE, MessageKey, Sender};
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options
});

/// Bot replies are markdown. Raw HTML in them is escaped, not rendered.
pub fn markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

pub fn format_time_label(timestamp_ms: i64) -> Option<String> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_time_label_at(timestamp_ms, offset)
}

fn format_time_label_at(timestamp_ms: i64, offset: UtcOffset) -> Option<String> {
    let nanos = i128::from(timestamp_ms) * 1_000_000;
    let datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    datetime.to_offset(offset).format(MESSAGE_TIME_FORMAT).ok()
}

// ============================================
// Sidebar
// ============================================

#[derive(Clone, Debug, PartialEq)]
pub struct SidebarItem {
    pub id: ConversationId,
    pub title: String,
    pub active: bool,
}

pub fn sidebar<S: KeyValueStore>(manager: &ConversationManager<S>) -> Vec<SidebarItem> {
    let active = manager.active_id();
    manager
        .conversations()
        .iter()
        .map(|conv| SidebarItem {
            id: conv.id,
            title: conv.title.clone(),
            active: Some(conv.id) == active,
        })
        .collect()
}

// ============================================
// Transcript
// ============================================

#[derive(Clone, Debug, PartialEq)]
pub struct MessageView {
    pub key: MessageKey,
    pub sender: Sender,
    pub text: String,
    /// Rendered markdown; bot messages only.
    pub html: Option<String>,
    pub time_label: Option<String>,
    pub speaking: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptView {
    pub conversation: Option<ConversationId>,
    pub title: String,
    pub messages: Vec<MessageView>,
}

pub fn transcript(conversation: Option<&Conversation>, speech: &SpeechState) -> TranscriptView {
    let Some(conv) = conversation else {
        return TranscriptView {
            conversation: None,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        };
    };
    let messages = conv
        .messages
        .iter()
        .enumerate()
        .map(|(index, msg)| {
            let key = MessageKey {
                conversation: conv.id,
                index,
            };
            MessageView {
                key,
                sender: msg.sender,
                text: msg.text.clone(),
                html: (msg.sender == Sender::Bot).then(|| markdown_to_html(&msg.text)),
                time_label: format_time_label(msg.timestamp),
                speaking: speech.is_speaking(key),
            }
        })
        .collect();
    TranscriptView {
        conversation: Some(conv.id),
        title: conv.title.clone(),
        messages,
    }
}

// ============================================
// Reference panels (guidelines / legal)
// ============================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Guidelines,
    Legal,
}

impl ReferenceKind {
    fn default_title(self) -> &'static str {
        match self {
            ReferenceKind::Guidelines => "Guideline",
            ReferenceKind::Legal => "Reference",
        }
    }

    fn empty_text(self) -> &'static str {
        match self {
            ReferenceKind::Guidelines => "No guidelines available.",
            ReferenceKind::Legal => "No legal references available.",
        }
    }

    fn error_text(self) -> &'static str {
        match self {
            ReferenceKind::Guidelines => "Error loading guidelines.",
            ReferenceKind::Legal => "Error loading legal references.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceCard {
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReferencePanel {
    Cards(Vec<ReferenceCard>),
    Placeholder(&'static str),
}

/// `entries` is `None` when loading failed.
pub fn reference_panel(kind: ReferenceKind, entries: Option<&[ReferenceEntry]>) -> ReferencePanel {
    let Some(entries) = entries else {
        return ReferencePanel::Placeholder(kind.error_text());
    };
    if entries.is_empty() {
        return ReferencePanel::Placeholder(kind.empty_text());
    }
    ReferencePanel::Cards(
        entries
            .iter()
            .map(|entry| ReferenceCard {
                title: entry
                    .title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| kind.default_title().to_string()),
                content: entry.content.clone().unwrap_or_default(),
            })
            .collect(),
    )
}
