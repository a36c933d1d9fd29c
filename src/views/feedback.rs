use crate::forms::{FEEDBACK_FAILED, FEEDBACK_THANKS, FeedbackForm, MAX_STARS, submit_feedback};
use crate::notice::{NoticeBoard, NoticeKind};
use crate::ui::{AppServices, notify};
use dioxus::prelude::*;

fn star_class(lit: bool) -> &'static str {
    if lit { "star active" } else { "star" }
}

#[component]
pub fn FeedbackView() -> Element {
    let services = use_context::<AppServices>();
    let notices = use_context::<Signal<NoticeBoard>>();
    let mut form = use_signal(FeedbackForm::default);
    let status = use_signal(NoticeBoard::default);
    let submitting = use_signal(|| false);
    let client = use_signal(|| services.client.clone());

    let on_submit = {
        let mut submitting = submitting;
        move |_| {
            if submitting() {
                return;
            }
            let mut draft = form();
            let client = client.peek().clone();
            submitting.set(true);
            spawn(async move {
                if submit_feedback(&client, &mut draft).await {
                    form.set(draft);
                    notify(status, FEEDBACK_THANKS, NoticeKind::Success);
                    notify(notices, "Feedback submitted successfully", NoticeKind::Success);
                } else {
                    notify(status, FEEDBACK_FAILED, NoticeKind::Error);
                }
                submitting.set(false);
            });
        }
    };

    let current = form();
    let inline_status = status.read().current().cloned();

    rsx! {
        div { class: "main-container",
            h2 { class: "section-title", "Feedback" }
            div { class: "form-grid",
                label { "Feedback type"
                    select {
                        value: "{current.kind}",
                        onchange: move |ev| form.with_mut(|f| f.kind = ev.value()),
                        option { value: "general", "General" }
                        option { value: "accuracy", "Answer accuracy" }
                        option { value: "bug", "Bug report" }
                        option { value: "feature", "Feature request" }
                    }
                }
                div { class: "rating",
                    span { "Rating" }
                    div {
                        class: "stars",
                        onmouseleave: move |_| form.with_mut(|f| f.rating.unhover()),
                        for index in 0..MAX_STARS {
                            span {
                                key: "{index}",
                                class: star_class(current.rating.is_lit(index)),
                                onclick: move |_| form.with_mut(|f| f.rating.select(index + 1)),
                                onmouseenter: move |_| form.with_mut(|f| f.rating.hover(index + 1)),
                                "★"
                            }
                        }
                    }
                }
                label { class: "span-2", "Message"
                    textarea {
                        rows: "4",
                        value: "{current.message}",
                        oninput: move |ev| form.with_mut(|f| f.message = ev.value()),
                    }
                }
                label { class: "span-2", "Email (optional)"
                    input {
                        r#type: "email",
                        value: "{current.email}",
                        oninput: move |ev| form.with_mut(|f| f.email = ev.value()),
                    }
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: submitting(),
                onclick: on_submit,
                "Submit feedback"
            }
            if let Some(notice) = inline_status {
                div { class: format_args!("feedback-status show {}", notice.kind.as_str()), "{notice.message}" }
            }
        }
    }
}
