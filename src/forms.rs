//! Assessment and feedback forms.

use crate::api::{ApiResult, AssessmentReply, AssessmentRequest, DlpBackend, FeedbackRequest};
use crate::config::AssessmentMode;
use tracing::error;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_SEVERITY: &str = "Unknown";
pub const WITHIN_DLP: &str = "within_24_months";

// ============================================
// Assessment
// ============================================

pub type AssessmentForm = AssessmentRequest;

/// What the result panel shows, with placeholders already applied.
#[derive(Clone, Debug, PartialEq)]
pub struct AssessmentOutcome {
    pub defect_type: String,
    pub liability_status: String,
    pub recommendation: String,
    pub severity_label: String,
    /// CSS modifier for the severity badge.
    pub severity_class: String,
}

impl From<AssessmentReply> for AssessmentOutcome {
    fn from(reply: AssessmentReply) -> Self {
        let or_na = |value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        let severity = reply.severity.filter(|s| !s.trim().is_empty());
        Self {
            defect_type: or_na(reply.defect_type),
            liability_status: or_na(reply.liability_status),
            recommendation: or_na(reply.recommendation),
            severity_label: severity
                .clone()
                .unwrap_or_else(|| UNKNOWN_SEVERITY.to_string()),
            severity_class: severity.unwrap_or_else(|| "warning".to_string()),
        }
    }
}

/// Offline verdict: liability hinges on whether the defect was reported
/// inside the 24-month defect liability period.
pub fn assess_locally(form: &AssessmentForm) -> AssessmentReply {
    let (liability, recommendation) = if form.reported_within == WITHIN_DLP {
        (
            "Developer liable",
            "Report the defect to the developer in writing with photos. Repairs are due within 30 days at no cost.",
        )
    } else {
        (
            "Outside DLP: latent defect claim may apply",
            "File with the Housing Tribunal within 12 months after DLP expiry, or pursue a latent defect claim within 3 years of discovery.",
        )
    };
    AssessmentReply {
        defect_type: Some(form.defect_type.clone()),
        liability_status: Some(liability.to_string()),
        recommendation: Some(recommendation.to_string()),
        severity: Some(form.severity.clone()),
    }
}

/// Produce the assessment verdict for `form`, locally or via the backend.
pub async fn run_assessment<B: DlpBackend + ?Sized>(
    mode: AssessmentMode,
    backend: &B,
    form: &AssessmentForm,
) -> ApiResult<AssessmentOutcome> {
    let reply = match mode {
        AssessmentMode::Local => assess_locally(form),
        AssessmentMode::Remote => backend.assess(form).await.inspect_err(|err| {
            error!("assessment error: {}", err);
        })?,
    };
    Ok(AssessmentOutcome::from(reply))
}

// ============================================
// Feedback
// ============================================

pub const FEEDBACK_THANKS: &str = "Thank you for your feedback!";
pub const FEEDBACK_FAILED: &str = "Error submitting feedback";

pub const MAX_STARS: u8 = 5;

/// Star widget state: a committed value plus an optional hover preview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StarRating {
    selected: u8,
    hover: Option<u8>,
}

impl StarRating {
    pub fn selected(&self) -> u8 {
        self.selected
    }

    pub fn select(&mut self, value: u8) {
        self.selected = value.min(MAX_STARS);
        self.hover = None;
    }

    pub fn hover(&mut self, value: u8) {
        self.hover = Some(value.min(MAX_STARS));
    }

    pub fn unhover(&mut self) {
        self.hover = None;
    }

    /// Whether the star at zero-based `index` is drawn lit.
    pub fn is_lit(&self, index: u8) -> bool {
        index < self.hover.unwrap_or(self.selected)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackForm {
    pub kind: String,
    pub rating: StarRating,
    pub message: String,
    pub email: String,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self {
            kind: "general".to_string(),
            rating: StarRating::default(),
            message: String::new(),
            email: String::new(),
        }
    }
}

impl FeedbackForm {
    pub fn to_request(&self) -> FeedbackRequest {
        FeedbackRequest {
            kind: self.kind.clone(),
            rating: self.rating.selected(),
            message: self.message.clone(),
            email: self.email.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Post `form`; on success the form is reset. Returns whether it went through.
pub async fn submit_feedback<B: DlpBackend + ?Sized>(backend: &B, form: &mut FeedbackForm) -> bool {
    match backend.submit_feedback(&form.to_request()).await {
        Ok(()) => {
            form.reset();
            true
        }
        Err(err) => {
            error!("feedback error: {}", err);
            false
        }
    }
}
