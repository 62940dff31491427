/// Display duration for routine notices, in milliseconds.
const DEFAULT_DURATION_MS: u64 = 4000;

/// Display duration for error notices (longer for visibility).
const ERROR_DURATION_MS: u64 = 6000;

/// The category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A message for the user.
///
/// Blocking notices must be acknowledged before the user continues
/// (an alert dialog); the rest dismiss themselves after `duration_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
    pub blocking: bool,
    pub duration_ms: Option<u64>,
}

/// In-memory notice queue with monotonic ID assignment.
///
/// Timers and dialogs are the front end's concern; this only holds the
/// queue in arrival order.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        kind: NoticeKind,
        text: impl Into<String>,
        blocking: bool,
        duration_ms: Option<u64>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            text: text.into(),
            blocking,
            duration_ms,
        });
        id
    }

    /// Queue a blocking error alert. It stays until dismissed.
    pub fn alert(&mut self, text: impl Into<String>) -> u64 {
        self.push(NoticeKind::Error, text, true, None)
    }

    /// Queue a non-blocking error notice (6s).
    pub fn error(&mut self, text: impl Into<String>) -> u64 {
        self.push(NoticeKind::Error, text, false, Some(ERROR_DURATION_MS))
    }

    /// Queue a success notice (4s).
    pub fn success(&mut self, text: impl Into<String>) -> u64 {
        self.push(NoticeKind::Success, text, false, Some(DEFAULT_DURATION_MS))
    }

    /// Queue an informational notice (4s).
    pub fn info(&mut self, text: impl Into<String>) -> u64 {
        self.push(NoticeKind::Info, text, false, Some(DEFAULT_DURATION_MS))
    }

    /// Dismiss a notice by ID. Returns `true` if it was queued.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let len_before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != len_before
    }

    pub fn get(&self, id: u64) -> Option<&Notice> {
        self.notices.iter().find(|n| n.id == id)
    }

    /// The oldest blocking notice still awaiting acknowledgement.
    pub fn pending_alert(&self) -> Option<&Notice> {
        self.notices.iter().find(|n| n.blocking)
    }

    /// The most recently queued notice.
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Remove and return every queued notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
