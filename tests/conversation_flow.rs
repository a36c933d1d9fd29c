//! End-to-end flows through the manager and the form helpers, driven by
//! an in-process backend.

use async_trait::async_trait;
use dlpchat::api::{
    ApiError, ApiResult, AssessmentReply, AssessmentRequest, ChatReply, DlpBackend,
    FeedbackRequest, ReferenceEntry,
};
use dlpchat::config::AssessmentMode;
use dlpchat::conversation::ConversationManager;
use dlpchat::forms::{
    AssessmentForm, FeedbackForm, NOT_AVAILABLE, UNKNOWN_SEVERITY, WITHIN_DLP, run_assessment,
    submit_feedback,
};
use dlpchat::messaging::{
    EMPTY_REPLY_FALLBACK, SEND_ERROR_REPLY, SendOutcome, send_message,
};
use dlpchat::store::{LocalStore, MemoryStore};
use dlpchat::types::{DEFAULT_TITLE, Sender};
use reqwest::StatusCode;
use std::sync::Mutex;

#[derive(Default)]
struct FakeBackend {
    reply: Option<String>,
    fail: bool,
    assessment: AssessmentReply,
    chat_calls: Mutex<Vec<String>>,
    assess_calls: Mutex<usize>,
    feedback: Mutex<Vec<FeedbackRequest>>,
}

impl FakeBackend {
    fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn error() -> ApiError {
        ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        }
    }

    fn chat_count(&self) -> usize {
        self.chat_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DlpBackend for FakeBackend {
    async fn chat(&self, message: &str) -> ApiResult<ChatReply> {
        self.chat_calls.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(Self::error());
        }
        Ok(ChatReply {
            response: self.reply.clone(),
        })
    }

    async fn guidelines(&self) -> ApiResult<Vec<ReferenceEntry>> {
        Ok(Vec::new())
    }

    async fn legal_references(&self) -> ApiResult<Vec<ReferenceEntry>> {
        Ok(Vec::new())
    }

    async fn assess(&self, _request: &AssessmentRequest) -> ApiResult<AssessmentReply> {
        *self.assess_calls.lock().unwrap() += 1;
        if self.fail {
            return Err(Self::error());
        }
        Ok(self.assessment.clone())
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> ApiResult<()> {
        self.feedback.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(Self::error());
        }
        Ok(())
    }
}

fn fresh_manager() -> ConversationManager<MemoryStore> {
    ConversationManager::bootstrap(LocalStore::new(MemoryStore::new()))
}

mod chat_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_input_sends_nothing() {
        let mut manager = fresh_manager();
        let backend = FakeBackend::replying("unused");

        let outcome = send_message(&mut manager, &backend, "   \n").await;

        assert_eq!(outcome, SendOutcome::Rejected);
        assert_eq!(backend.chat_count(), 0);
        assert!(manager.active().unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn test_first_exchange_names_conversation() {
        let mut manager = fresh_manager();
        let backend = FakeBackend::replying("Hi there");

        let outcome = send_message(&mut manager, &backend, "  Hello  ").await;

        assert_eq!(outcome, SendOutcome::Replied("Hi there".into()));
        assert_eq!(*backend.chat_calls.lock().unwrap(), vec!["Hello".to_string()]);
        let conv = manager.active().unwrap();
        assert_eq!(conv.title, "Hello");
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].sender, Sender::User);
        assert_eq!(conv.messages[1].text, "Hi there");

        // Persisted on every mutation.
        let saved = manager.store().load_conversations();
        assert_eq!(saved[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_reply_uses_fallback() {
        let mut manager = fresh_manager();
        let backend = FakeBackend::default();

        let outcome = send_message(&mut manager, &backend, "Anyone there?").await;

        assert_eq!(outcome, SendOutcome::Replied(EMPTY_REPLY_FALLBACK.into()));
        assert_eq!(
            manager.active().unwrap().messages[1].text,
            EMPTY_REPLY_FALLBACK
        );
    }

    #[tokio::test]
    async fn test_failure_appends_error_line() {
        let mut manager = fresh_manager();
        let backend = FakeBackend::failing();

        let outcome = send_message(&mut manager, &backend, "Is my roof covered?").await;

        assert_eq!(outcome, SendOutcome::Failed(SEND_ERROR_REPLY.into()));
        let conv = manager.active().unwrap();
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[1].sender, Sender::Bot);
        assert_eq!(conv.messages[1].text, SEND_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_new_chat_keeps_default_title_until_used() {
        let mut manager = fresh_manager();
        let backend = FakeBackend::replying("ok");
        send_message(&mut manager, &backend, "First topic").await;

        let second = manager.create();
        assert_eq!(manager.get(second).unwrap().title, DEFAULT_TITLE);
        assert_eq!(manager.conversations()[0].id, second);

        send_message(&mut manager, &backend, "Second topic").await;
        assert_eq!(manager.get(second).unwrap().title, "Second topic");
        assert_eq!(manager.conversations()[1].title, "First topic");
    }
}

mod assessment_flow_tests {
    use super::*;

    fn form(reported_within: &str) -> AssessmentForm {
        AssessmentForm {
            defect_type: "Water leakage".into(),
            reported_within: reported_within.into(),
            severity: "warning".into(),
            repair_cost: "1500".into(),
            details: "Ceiling stain in the bathroom".into(),
        }
    }

    #[tokio::test]
    async fn test_local_mode_never_calls_backend() {
        let backend = FakeBackend::failing();

        let outcome = run_assessment(AssessmentMode::Local, &backend, &form(WITHIN_DLP))
            .await
            .unwrap();

        assert_eq!(*backend.assess_calls.lock().unwrap(), 0);
        assert_eq!(outcome.liability_status, "Developer liable");
        assert_eq!(outcome.defect_type, "Water leakage");
        assert_eq!(outcome.severity_class, "warning");
    }

    #[tokio::test]
    async fn test_local_mode_outside_period() {
        let backend = FakeBackend::default();
        let outcome = run_assessment(AssessmentMode::Local, &backend, &form("after_24_months"))
            .await
            .unwrap();
        assert_eq!(
            outcome.liability_status,
            "Outside DLP: latent defect claim may apply"
        );
    }

    #[tokio::test]
    async fn test_remote_mode_fills_placeholders() {
        let backend = FakeBackend {
            assessment: AssessmentReply {
                defect_type: Some("Cracks".into()),
                ..AssessmentReply::default()
            },
            ..FakeBackend::default()
        };

        let outcome = run_assessment(AssessmentMode::Remote, &backend, &form(WITHIN_DLP))
            .await
            .unwrap();

        assert_eq!(*backend.assess_calls.lock().unwrap(), 1);
        assert_eq!(outcome.defect_type, "Cracks");
        assert_eq!(outcome.liability_status, NOT_AVAILABLE);
        assert_eq!(outcome.recommendation, NOT_AVAILABLE);
        assert_eq!(outcome.severity_label, UNKNOWN_SEVERITY);
        assert_eq!(outcome.severity_class, "warning");
    }

    #[tokio::test]
    async fn test_remote_failure_surfaces_error() {
        let backend = FakeBackend::failing();
        let result = run_assessment(AssessmentMode::Remote, &backend, &form(WITHIN_DLP)).await;
        assert!(matches!(result, Err(ApiError::Status { .. })));
    }
}

mod feedback_flow_tests {
    use super::*;

    fn filled_form() -> FeedbackForm {
        let mut form = FeedbackForm {
            kind: "bug".into(),
            message: "The legal tab was empty".into(),
            email: "owner@example.com".into(),
            ..FeedbackForm::default()
        };
        form.rating.select(4);
        form
    }

    #[tokio::test]
    async fn test_success_resets_form() {
        let backend = FakeBackend::default();
        let mut form = filled_form();

        assert!(submit_feedback(&backend, &mut form).await);

        let sent = backend.feedback.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, "bug");
        assert_eq!(sent[0].rating, 4);
        assert_eq!(form, FeedbackForm::default());
    }

    #[tokio::test]
    async fn test_failure_keeps_form() {
        let backend = FakeBackend::failing();
        let mut form = filled_form();

        assert!(!submit_feedback(&backend, &mut form).await);
        assert_eq!(form, filled_form());
    }
}
