use crate::api::{DlpBackend, ReferenceEntry};
use crate::ui::AppServices;
use crate::view::{ReferenceKind, ReferencePanel, reference_panel};
use dioxus::prelude::*;
use tracing::error;

#[derive(Clone, PartialEq)]
enum LoadState {
    Loading,
    Loaded(Vec<ReferenceEntry>),
    Failed,
}

/// Guidelines or legal references, refetched each time the tab is opened.
#[component]
pub fn ReferenceView(kind: ReferenceKind, active: ReadOnlySignal<bool>) -> Element {
    let services = use_context::<AppServices>();
    let mut state = use_signal(|| LoadState::Loading);

    let client = services.client.clone();
    use_effect(move || {
        if !active() {
            return;
        }
        let client = client.clone();
        spawn(async move {
            let result = match kind {
                ReferenceKind::Guidelines => client.guidelines().await,
                ReferenceKind::Legal => client.legal_references().await,
            };
            match result {
                Ok(entries) => state.set(LoadState::Loaded(entries)),
                Err(err) => {
                    error!("error loading {:?}: {}", kind, err);
                    state.set(LoadState::Failed);
                }
            }
        });
    });

    let heading = match kind {
        ReferenceKind::Guidelines => "DLP Guidelines",
        ReferenceKind::Legal => "Legal References",
    };
    let card_class = match kind {
        ReferenceKind::Guidelines => "guideline-card",
        ReferenceKind::Legal => "legal-item",
    };
    let panel = match &*state.read() {
        LoadState::Loading => None,
        LoadState::Loaded(entries) => Some(reference_panel(kind, Some(entries.as_slice()))),
        LoadState::Failed => Some(reference_panel(kind, None)),
    };

    rsx! {
        div { class: "main-container",
            h2 { class: "section-title", "{heading}" }
            {match panel {
                None => rsx! { div { class: "shimmer-text", "Loading…" } },
                Some(ReferencePanel::Placeholder(text)) => rsx! { p { class: "text-muted", "{text}" } },
                Some(ReferencePanel::Cards(cards)) => rsx! {
                    div { class: "reference-list",
                        for (i, card) in cards.iter().enumerate() {
                            div { key: "{i}", class: card_class,
                                h3 { "{card.title}" }
                                p { "{card.content}" }
                            }
                        }
                    }
                },
            }}
        }
    }
}
