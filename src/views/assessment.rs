use crate::forms::{AssessmentForm, AssessmentOutcome, WITHIN_DLP, run_assessment};
use crate::notice::{NoticeBoard, NoticeKind};
use crate::ui::{AppServices, notify};
use dioxus::prelude::*;

const DEFECT_TYPES: &[&str] = &[
    "Structural crack",
    "Water leak",
    "Electrical fault",
    "Plumbing",
    "Poor finishing",
    "Other",
];

const SEVERITIES: &[(&str, &str)] = &[("success", "Minor"), ("warning", "Moderate"), ("error", "Severe")];

#[component]
pub fn AssessmentView() -> Element {
    let services = use_context::<AppServices>();
    let notices = use_context::<Signal<NoticeBoard>>();
    let mut form = use_signal(|| AssessmentForm {
        defect_type: DEFECT_TYPES[0].to_string(),
        reported_within: WITHIN_DLP.to_string(),
        severity: SEVERITIES[1].0.to_string(),
        ..AssessmentForm::default()
    });
    let outcome = use_signal(|| Option::<AssessmentOutcome>::None);
    let running = use_signal(|| false);
    let client = use_signal(|| services.client.clone());
    let mode = services.config.assessment_mode;

    let on_submit = {
        let mut outcome = outcome;
        let mut running = running;
        move |_| {
            if running() {
                return;
            }
            let draft = form();
            let client = client.peek().clone();
            running.set(true);
            spawn(async move {
                match run_assessment(mode, &client, &draft).await {
                    Ok(result) => {
                        outcome.set(Some(result));
                        notify(notices, "Assessment completed", NoticeKind::Success);
                    }
                    Err(_) => notify(notices, "Error running assessment", NoticeKind::Error),
                }
                running.set(false);
            });
        }
    };

    let current = form();

    rsx! {
        div { class: "main-container",
            h2 { class: "section-title", "Defect Assessment" }
            div { class: "form-grid",
                label { "Defect type"
                    select {
                        value: "{current.defect_type}",
                        onchange: move |ev| form.with_mut(|f| f.defect_type = ev.value()),
                        for kind in DEFECT_TYPES.iter() {
                            option { value: "{kind}", "{kind}" }
                        }
                    }
                }
                label { "Reported within"
                    select {
                        value: "{current.reported_within}",
                        onchange: move |ev| form.with_mut(|f| f.reported_within = ev.value()),
                        option { value: WITHIN_DLP, "Within 24 months of vacant possession" }
                        option { value: "after_24_months", "After 24 months" }
                    }
                }
                label { "Severity"
                    select {
                        value: "{current.severity}",
                        onchange: move |ev| form.with_mut(|f| f.severity = ev.value()),
                        for (value, label) in SEVERITIES.iter() {
                            option { value: "{value}", "{label}" }
                        }
                    }
                }
                label { "Estimated repair cost (RM)"
                    input {
                        r#type: "number",
                        min: "0",
                        value: "{current.repair_cost}",
                        oninput: move |ev| form.with_mut(|f| f.repair_cost = ev.value()),
                    }
                }
                label { class: "span-2", "Details"
                    textarea {
                        rows: "4",
                        value: "{current.details}",
                        oninput: move |ev| form.with_mut(|f| f.details = ev.value()),
                    }
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: running(),
                onclick: on_submit,
                "Assess"
            }
            if let Some(result) = outcome() {
                div { class: "assessment-result",
                    h3 { "Assessment Result" }
                    p { strong { "Defect Type: " } "{result.defect_type}" }
                    p { strong { "Liability Status: " } "{result.liability_status}" }
                    p { strong { "Recommendation: " } "{result.recommendation}" }
                    span { class: format_args!("result-status {}", result.severity_class), "{result.severity_label}" }
                }
            }
        }
    }
}
