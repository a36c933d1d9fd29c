use crate::api::DlpBackend;
use crate::messaging::{SendOutcome, begin_send, complete_send};
use crate::notice::{NoticeBoard, NoticeKind};
use crate::speech::{SpeechCommand, SpeechState};
use crate::types::{ConversationId, MessageKey, Sender};
use crate::ui::{AppManager, AppServices, notify};
use crate::view::{MessageView, SidebarItem, sidebar, transcript};
use dioxus::events::Key;
use dioxus::prelude::*;
use tracing::warn;

const SPEAK_SCRIPT: &str = r#"
const synth = window.speechSynthesis;
if (!synth) {
    dioxus.send("unsupported");
} else {
    const utterance = new SpeechSynthesisUtterance(__TEXT__);
    utterance.onend = () => dioxus.send("end");
    utterance.onerror = () => dioxus.send("error");
    synth.speak(utterance);
}
"#;

const CANCEL_SCRIPT: &str = "if (window.speechSynthesis) { window.speechSynthesis.cancel(); }";

const SCROLL_SCRIPT: &str = r#"
const list = document.getElementById("chat-messages");
if (list) { list.scrollTop = list.scrollHeight; }
"#;

fn scroll_to_bottom() {
    let _ = document::eval(SCROLL_SCRIPT);
}

/// Drive the webview's speech synthesis from state-machine commands.
fn run_speech(commands: Vec<SpeechCommand>, text: &str, speech: Signal<SpeechState>) {
    for command in commands {
        match command {
            SpeechCommand::Cancel => {
                let _ = document::eval(CANCEL_SCRIPT);
            }
            SpeechCommand::Speak { key, token } => {
                let literal = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
                let mut eval = document::eval(&SPEAK_SCRIPT.replace("__TEXT__", &literal));
                let mut speech = speech;
                spawn(async move {
                    if let Err(err) = eval.recv::<String>().await {
                        warn!("speech callback failed: {:?}", err);
                    }
                    speech.with_mut(|state| state.finish(key, token));
                });
            }
        }
    }
}

fn stop_speech(mut speech: Signal<SpeechState>) {
    let commands = speech.with_mut(|state| state.stop());
    run_speech(commands, "", speech);
}

#[component]
pub fn ChatView(manager: Signal<AppManager>) -> Element {
    let services = use_context::<AppServices>();
    let notices = use_context::<Signal<NoticeBoard>>();
    let mut input = use_signal(String::new);
    let sending = use_signal(|| false);
    let speech = use_signal(SpeechState::default);
    let client = use_signal(|| services.client.clone());

    let mut send_message = {
        let mut manager = manager;
        let mut sending_signal = sending;
        let mut input_signal = input;
        move |text: String| {
            if sending_signal() {
                return;
            }
            let Some(pending) = manager.with_mut(|m| begin_send(m, &text)) else {
                notify(notices, "Please enter a message", NoticeKind::Warning);
                return;
            };
            input_signal.set(String::new());
            sending_signal.set(true);
            scroll_to_bottom();

            let client = client.peek().clone();
            spawn(async move {
                let result = client.chat(&pending.text).await;
                let outcome = manager.with_mut(|m| complete_send(m, &pending, result));
                if matches!(outcome, SendOutcome::Failed(_)) {
                    notify(notices, "Error sending message", NoticeKind::Error);
                }
                sending_signal.set(false);
                scroll_to_bottom();
            });
        }
    };

    let view = {
        let state = manager.read();
        transcript(state.active(), &speech.read())
    };

    rsx! {
        div { class: "main-container chat-layout",
            Sidebar { manager, speech }
            div { class: "chat-wrap",
                h2 { class: "chat-title", "{view.title}" }
                div { id: "chat-messages", class: "chat-list",
                    if view.messages.is_empty() {
                        p { class: "text-muted empty-chat", "Ask anything about defect liability claims." }
                    }
                    for msg in view.messages.iter() {
                        MessageRow { key: "{msg.key.index}", message: msg.clone(), speech }
                    }
                }
                form { class: "composer",
                    div { class: "composer-inner",
                        textarea {
                            rows: "1",
                            placeholder: "Ask about your defect claim...",
                            value: "{input}",
                            oninput: move |ev| input.set(ev.value()),
                            onkeydown: move |ev| {
                                if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                    ev.prevent_default();
                                    let text = input();
                                    send_message(text);
                                }
                            },
                            disabled: sending(),
                            autofocus: true,
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: sending(),
                            onclick: move |_| {
                                let text = input();
                                send_message(text);
                            },
                            "Send"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Sidebar(manager: Signal<AppManager>, speech: Signal<SpeechState>) -> Element {
    let notices = use_context::<Signal<NoticeBoard>>();
    let items = sidebar(&manager.read());
    let editing = use_signal(|| Option::<(ConversationId, String)>::None);
    let mut confirm_clear = use_signal(|| false);
    let mut manager = manager;

    rsx! {
        aside { class: "sidebar",
            button {
                class: "btn btn-primary new-chat",
                r#type: "button",
                onclick: move |_| {
                    stop_speech(speech);
                    manager.write().create();
                },
                "+ New Chat"
            }
            ul { class: "conversation-list",
                for item in items.into_iter() {
                    ConversationRow { key: "{item.id}", item: item.clone(), manager, speech, editing }
                }
            }
            div { class: "sidebar-footer",
                if confirm_clear() {
                    span { class: "text-muted", "Clear all conversations?" }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: move |_| {
                            stop_speech(speech);
                            manager.write().clear_all();
                            confirm_clear.set(false);
                            notify(notices, "History cleared", NoticeKind::Success);
                        },
                        "Clear"
                    }
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| confirm_clear.set(false),
                        "Cancel"
                    }
                } else {
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| confirm_clear.set(true),
                        "Clear history"
                    }
                }
            }
        }
    }
}

#[component]
fn ConversationRow(
    item: SidebarItem,
    manager: Signal<AppManager>,
    speech: Signal<SpeechState>,
    editing: Signal<Option<(ConversationId, String)>>,
) -> Element {
    let id = item.id;
    let mut manager = manager;
    let mut editing = editing;
    let draft = editing().filter(|(edit_id, _)| *edit_id == id).map(|(_, d)| d);
    let class = if item.active {
        "conversation-item active"
    } else {
        "conversation-item"
    };

    let title_for_edit = item.title.clone();
    let start_rename = move |_| editing.set(Some((id, title_for_edit.clone())));

    let mut commit = move || {
        if let Some((edit_id, title)) = editing() {
            manager.write().rename(edit_id, &title);
        }
        editing.set(None);
    };

    rsx! {
        li { class: class,
            if let Some(draft) = draft {
                input {
                    class: "rename-input",
                    value: "{draft}",
                    autofocus: true,
                    oninput: move |ev| editing.set(Some((id, ev.value()))),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter {
                            commit();
                        } else if ev.key() == Key::Escape {
                            editing.set(None);
                        }
                    },
                    onblur: move |_| commit(),
                }
            } else {
                span {
                    class: "conversation-title",
                    onclick: move |_| {
                        if manager.read().active_id() != Some(id) {
                            stop_speech(speech);
                            manager.write().load(id);
                        }
                    },
                    "{item.title}"
                }
                button {
                    class: "action-btn",
                    r#type: "button",
                    title: "Rename",
                    onclick: start_rename,
                    "Rename"
                }
                button {
                    class: "action-btn",
                    r#type: "button",
                    title: "Delete",
                    onclick: move |_| {
                        if manager.read().active_id() == Some(id) {
                            stop_speech(speech);
                        }
                        manager.write().delete(id);
                    },
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: MessageView, speech: Signal<SpeechState>) -> Element {
    let key: MessageKey = message.key;
    let row_class = message.sender.as_str();
    let read_label = if message.speaking { "Stop" } else { "Read aloud" };

    let speak_text = message.text.clone();
    let mut speech_signal = speech;
    let on_read = move |_| {
        let commands = speech_signal.with_mut(|state| state.toggle(key));
        run_speech(commands, &speak_text, speech_signal);
    };

    let copy_payload = message.text.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            {
                let _ = raw;
            }
        });
    };

    rsx! {
        div { class: format_args!("chat-message {}", row_class),
            div { class: "message-bubble",
                if let Some(html) = message.html.as_ref() {
                    div { class: "md", dangerous_inner_html: "{html}" }
                } else {
                    "{message.text}"
                }
            }
            div { class: "message-meta",
                if let Some(ts) = message.time_label.as_ref() {
                    span { class: "message-timestamp", "{ts}" }
                }
                if message.sender == Sender::Bot {
                    button {
                        class: format_args!("action-btn {}", if message.speaking { "speaking" } else { "" }),
                        r#type: "button",
                        title: "{read_label}",
                        onclick: on_read,
                        "{read_label}"
                    }
                    button { class: "action-btn", r#type: "button", title: "Copy", onclick: on_copy, "Copy" }
                }
            }
        }
    }
}
