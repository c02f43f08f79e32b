//! Feedback form state and transient status messages

use hostlens_api::{ApiError, FeedbackSubmission, FeedbackVerdict, SubmissionAck};

/// Tone of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Message that disappears after a number of ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub ttl_ticks: u32,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>, ttl_ticks: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            ttl_ticks,
        }
    }

    pub fn info(text: impl Into<String>, ttl_ticks: u32) -> Self {
        Self::new(StatusKind::Info, text, ttl_ticks)
    }

    pub fn success(text: impl Into<String>, ttl_ticks: u32) -> Self {
        Self::new(StatusKind::Success, text, ttl_ticks)
    }

    pub fn error(text: impl Into<String>, ttl_ticks: u32) -> Self {
        Self::new(StatusKind::Error, text, ttl_ticks)
    }

    /// Count down one tick; returns false once expired
    pub fn tick(&mut self) -> bool {
        self.ttl_ticks = self.ttl_ticks.saturating_sub(1);
        self.ttl_ticks > 0
    }
}

/// Expire `slot` when its message runs out of ticks
pub fn tick_status(slot: &mut Option<StatusMessage>) {
    if let Some(message) = slot {
        if !message.tick() {
            *slot = None;
        }
    }
}

/// Verdict and comment the user is about to send
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackForm {
    pub verdict: FeedbackVerdict,
    pub comment: String,
    pub submitting: bool,
    pub status: Option<StatusMessage>,
}

impl FeedbackForm {
    pub fn toggle_verdict(&mut self) {
        self.verdict = self.verdict.toggled();
    }

    pub fn push_char(&mut self, c: char) {
        self.comment.push(c);
    }

    pub fn pop_char(&mut self) {
        self.comment.pop();
    }

    /// Build the submission for `host_id`; fails without a host
    pub fn prepare(&self, host_id: Option<&str>) -> Result<FeedbackSubmission, ApiError> {
        let host_id = host_id.map(str::trim).unwrap_or_default();
        if host_id.is_empty() {
            return Err(ApiError::Validation(
                "Select a host before submitting feedback".to_string(),
            ));
        }

        Ok(FeedbackSubmission {
            host_id: host_id.to_string(),
            feedback: self.verdict,
            comment: self.comment.clone(),
        })
    }

    pub fn reject(&mut self, error: &ApiError, ttl_ticks: u32) {
        self.status = Some(StatusMessage::error(error.user_message(), ttl_ticks));
    }

    pub fn begin_submit(&mut self) {
        self.submitting = true;
        self.status = Some(StatusMessage::info("Submitting feedback...", u32::MAX));
    }

    /// Record the outcome of `submission`
    ///
    /// The comment is cleared on success unless the user already started a
    /// new one while the request was in flight.
    pub fn finish_submit(
        &mut self,
        submission: &FeedbackSubmission,
        result: &Result<SubmissionAck, ApiError>,
        ttl_ticks: u32,
    ) {
        self.submitting = false;
        self.status = Some(match result {
            Ok(_) => {
                if self.comment == submission.comment {
                    self.comment.clear();
                }
                StatusMessage::success("Feedback submitted", ttl_ticks)
            }
            Err(e) => StatusMessage::error(
                format!("Error submitting feedback: {}", e.user_message()),
                ttl_ticks,
            ),
        });
    }
}
