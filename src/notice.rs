use std::time::Duration;

/// How long a toast or inline status stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
}

/// Single-slot toast. A newer notice replaces the current one, and a stale
/// auto-hide never clears its replacement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeBoard {
    next_id: u64,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn show(&mut self, message: impl Into<String>, kind: NoticeKind) -> u64 {
        self.next_id += 1;
        self.current = Some(Notice {
            id: self.next_id,
            message: message.into(),
            kind,
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
