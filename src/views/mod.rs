pub mod assessment;
pub mod chat;
pub mod feedback;
pub mod reference;

pub use assessment::AssessmentView;
pub use chat::ChatView;
pub use feedback::FeedbackView;
pub use reference::ReferenceView;
