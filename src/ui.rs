use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::conversation::ConversationManager;
use crate::notice::{NOTICE_TTL, NoticeBoard, NoticeKind};
use crate::store::{LocalStore, PlatformStore, platform_store};
use crate::theme::{switched_message, theme_definition};
use crate::types::ThemeMode;
use crate::view::ReferenceKind;
use crate::views::{AssessmentView, ChatView, FeedbackView, ReferenceView};
use dioxus::prelude::*;

const APP_CSS: Asset = asset!("/assets/dlpchat.css");

pub type AppManager = ConversationManager<PlatformStore>;

/// Shared, read-only services handed to every view through context.
#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub client: ApiClient,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Chat,
    Guidelines,
    Legal,
    Assessment,
    Feedback,
}

/// Show `message` on `board` and hide it again after `NOTICE_TTL`.
pub fn notify(mut board: Signal<NoticeBoard>, message: impl Into<String>, kind: NoticeKind) {
    let id = board.with_mut(|b| b.show(message, kind));
    spawn(async move {
        tokio::time::sleep(NOTICE_TTL).await;
        board.with_mut(|b| b.dismiss(id));
    });
}

#[component]
pub fn App() -> Element {
    let services = use_context_provider(|| {
        let config = AppConfig::from_env();
        let client = ApiClient::new(config.api_base_url.clone());
        AppServices { config, client }
    });
    let notices = use_context_provider(|| Signal::new(NoticeBoard::default()));
    let manager = use_signal(|| {
        let store = LocalStore::new(platform_store(&services.config.storage_namespace));
        ConversationManager::bootstrap(store)
    });
    let theme = use_signal(|| manager.peek().theme());
    let active_tab = use_signal(|| AppTab::Chat);

    rsx! {
        ThemeStyles { theme }
        AppHeader { active_tab, theme, manager }
        TabPanels { active_tab, manager }
        Toast { notices }
    }
}

#[component]
fn ThemeStyles(theme: Signal<ThemeMode>) -> Element {
    let definition = theme_definition(theme());
    rsx! {
        document::Link { rel: "stylesheet", href: APP_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(
    active_tab: Signal<AppTab>,
    theme: Signal<ThemeMode>,
    manager: Signal<AppManager>,
) -> Element {
    let notices = use_context::<Signal<NoticeBoard>>();
    let toggle_label = theme_definition(theme()).toggle_label;
    let mut theme = theme;
    let mut manager = manager;
    rsx! {
        div { class: "header",
            div { class: "header-content",
                span { class: "header-wordmark", "DLP Assistant" }
                TabNavigation { active_tab }
                button {
                    class: "btn btn-ghost theme-toggle",
                    r#type: "button",
                    onclick: move |_| {
                        let next = theme().toggled();
                        theme.set(next);
                        manager.write().set_theme(next);
                        notify(notices, switched_message(next), NoticeKind::Success);
                    },
                    "{toggle_label}"
                }
            }
        }
    }
}

#[component]
fn TabPanels(active_tab: Signal<AppTab>, manager: Signal<AppManager>) -> Element {
    rsx! {
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Chat,
                children: rsx!( ChatView { manager } ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Guidelines,
                children: rsx!( ReferenceView { kind: ReferenceKind::Guidelines, active: active_tab() == AppTab::Guidelines } ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Legal,
                children: rsx!( ReferenceView { kind: ReferenceKind::Legal, active: active_tab() == AppTab::Legal } ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Assessment,
                children: rsx!( AssessmentView {} ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Feedback,
                children: rsx!( FeedbackView {} ),
            }
        }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn TabNavigation(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        nav { class: "tabs",
            TabButton { active_tab, tab: AppTab::Chat, label: "Chat" }
            TabButton { active_tab, tab: AppTab::Guidelines, label: "Guidelines" }
            TabButton { active_tab, tab: AppTab::Legal, label: "Legal" }
            TabButton { active_tab, tab: AppTab::Assessment, label: "Assessment" }
            TabButton { active_tab, tab: AppTab::Feedback, label: "Feedback" }
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab { "tab active" } else { "tab" };
    rsx! {
        button {
            class: class,
            r#type: "button",
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}

#[component]
fn Toast(notices: Signal<NoticeBoard>) -> Element {
    let current = notices.read().current().cloned();
    rsx! {
        if let Some(notice) = current {
            div {
                key: "{notice.id}",
                class: format_args!("notification show {}", notice.kind.as_str()),
                role: "status",
                "{notice.message}"
            }
        }
    }
}
