//! Update function for the Elm Architecture (TEA) loop
//!
//! `update` is pure: it consumes the model and a message and returns the next
//! model plus the side effects to run. Network calls are described by
//! [`Command`] values and executed by [`crate::effects::EffectRunner`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hostlens_api::{
    AnomalyReport, ApiError, FeedbackSubmission, Host, MetricCategory, MetricPoint,
    RootCauseReport, SubmissionAck,
};
use tracing::{debug, warn};

use crate::feedback::{tick_status, StatusMessage};
use crate::loader::{RequestTag, Resolution};
use crate::model::*;
use crate::navigation::Tab;

/// Side effects requested by [`AppModel::update`]
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FetchHosts(RequestTag<()>),
    FetchChart(RequestTag<ChartKey>),
    DetectAnomalies(RequestTag<String>),
    AnalyzeRootCause(RequestTag<String>),
    SubmitFeedback(FeedbackSubmission),
    Quit,
}

const NO_HOST_HINT: &str = "Select a host first";

impl AppModel {
    /// Commands to run once at start-up
    pub fn bootstrap(mut self) -> (Self, Vec<Command>) {
        let tag = self.hosts.begin(());
        (self, vec![Command::FetchHosts(tag)])
    }

    /// Pure update function - returns new state and commands
    pub fn update(self, message: AppMessage) -> (Self, Vec<Command>) {
        match message {
            AppMessage::KeyPress(key) => self.handle_key_press(key),
            AppMessage::Resize { width, height } => self.handle_resize(width, height),
            AppMessage::Tick => self.handle_tick(),

            AppMessage::HostCursorMoved(delta) => self.handle_cursor_moved(delta),
            AppMessage::HostSelected(host_id) => self.handle_host_selected(host_id),
            AppMessage::CategorySelected(category) => self.handle_category_selected(category),

            AppMessage::RefreshHostsRequested => self.handle_refresh_hosts(),
            AppMessage::LoadChartRequested => self.handle_load_chart(),
            AppMessage::DetectAnomaliesRequested => self.handle_detect_anomalies(),
            AppMessage::AnalyzeRootCauseRequested => self.handle_analyze_root_cause(),

            AppMessage::HostsLoaded { tag, result } => self.handle_hosts_loaded(tag, result),
            AppMessage::ChartLoaded { tag, result } => self.handle_chart_loaded(tag, result),
            AppMessage::AnomaliesLoaded { tag, result } => {
                self.handle_anomalies_loaded(tag, result)
            }
            AppMessage::RootCauseLoaded { tag, result } => {
                self.handle_root_cause_loaded(tag, result)
            }

            AppMessage::FeedbackVerdictToggled => {
                let mut model = self;
                model.feedback.toggle_verdict();
                (model, vec![])
            }
            AppMessage::FeedbackEditStarted => {
                let mut model = self;
                model.navigation.select_tab(Tab::Analysis);
                model.input_mode = InputMode::EditingComment;
                (model, vec![])
            }
            AppMessage::FeedbackEditFinished => {
                let mut model = self;
                model.input_mode = InputMode::Normal;
                (model, vec![])
            }
            AppMessage::FeedbackInput(c) => {
                let mut model = self;
                model.feedback.push_char(c);
                (model, vec![])
            }
            AppMessage::FeedbackBackspace => {
                let mut model = self;
                model.feedback.pop_char();
                (model, vec![])
            }
            AppMessage::FeedbackSubmitRequested => self.handle_feedback_submit(),
            AppMessage::FeedbackSubmitted { submission, result } => {
                self.handle_feedback_submitted(submission, result)
            }

            AppMessage::SidebarToggled => {
                let mut model = self;
                model.navigation.toggle_sidebar();
                (model, vec![])
            }
            AppMessage::TabSelected(tab) => {
                let mut model = self;
                model.navigation.select_tab(tab);
                (model, vec![])
            }
            AppMessage::NextTab => {
                let mut model = self;
                model.navigation.next_tab();
                (model, vec![])
            }

            AppMessage::ExitRequested => {
                let mut model = self;
                model.should_quit = true;
                (model, vec![Command::Quit])
            }
        }
    }

    /// Translate a key press into the message it stands for
    pub fn key_to_message(&self, key: KeyEvent) -> Option<AppMessage> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppMessage::ExitRequested);
        }

        match self.input_mode {
            InputMode::EditingComment => match key.code {
                KeyCode::Esc => Some(AppMessage::FeedbackEditFinished),
                KeyCode::Enter => Some(AppMessage::FeedbackSubmitRequested),
                KeyCode::Backspace => Some(AppMessage::FeedbackBackspace),
                KeyCode::Char(c) => Some(AppMessage::FeedbackInput(c)),
                _ => None,
            },
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => Some(AppMessage::ExitRequested),
                KeyCode::Tab => Some(AppMessage::NextTab),
                KeyCode::Char('1') => Some(AppMessage::TabSelected(Tab::Dashboard)),
                KeyCode::Char('2') => Some(AppMessage::TabSelected(Tab::Analysis)),
                KeyCode::Char('b') => Some(AppMessage::SidebarToggled),

                KeyCode::Up | KeyCode::Char('k') => Some(AppMessage::HostCursorMoved(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(AppMessage::HostCursorMoved(1)),
                KeyCode::Enter => self
                    .host_under_cursor()
                    .map(|host| AppMessage::HostSelected(Some(host.id.clone()))),
                KeyCode::Esc => Some(AppMessage::HostSelected(None)),

                KeyCode::Left => Some(AppMessage::CategorySelected(
                    self.selection.category.previous(),
                )),
                KeyCode::Right => {
                    Some(AppMessage::CategorySelected(self.selection.category.next()))
                }

                KeyCode::Char('l') => Some(AppMessage::LoadChartRequested),
                KeyCode::Char('a') => Some(AppMessage::DetectAnomaliesRequested),
                KeyCode::Char('r') => Some(AppMessage::AnalyzeRootCauseRequested),
                KeyCode::Char('h') => Some(AppMessage::RefreshHostsRequested),

                KeyCode::Char('f') => Some(AppMessage::FeedbackVerdictToggled),
                KeyCode::Char('i') => Some(AppMessage::FeedbackEditStarted),
                KeyCode::Char('s') => Some(AppMessage::FeedbackSubmitRequested),
                _ => None,
            },
        }
    }

    fn handle_key_press(self, key: KeyEvent) -> (Self, Vec<Command>) {
        match self.key_to_message(key) {
            Some(message) => self.update(message),
            None => (self, vec![]),
        }
    }

    fn handle_resize(mut self, width: u16, height: u16) -> (Self, Vec<Command>) {
        self.terminal_size = (width, height);
        (self, vec![])
    }

    fn handle_tick(mut self) -> (Self, Vec<Command>) {
        tick_status(&mut self.notice);
        if !self.feedback.submitting {
            tick_status(&mut self.feedback.status);
        }
        (self, vec![])
    }

    fn hint(&mut self, text: &str) {
        self.notice = Some(StatusMessage::info(text, self.settings.status_ttl_ticks));
    }

    // Selection

    fn handle_cursor_moved(mut self, delta: isize) -> (Self, Vec<Command>) {
        let len = self.host_list().len();
        if len > 0 {
            let last = len - 1;
            self.host_cursor = self.host_cursor.saturating_add_signed(delta).min(last);
        }
        (self, vec![])
    }

    fn handle_host_selected(mut self, host_id: Option<String>) -> (Self, Vec<Command>) {
        let host_id = host_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        if host_id == self.selection.host_id {
            return (self, vec![]);
        }

        debug!("Host selection changed to {:?}", host_id);
        self.selection.host_id = host_id;
        self.chart.reset();
        self.anomalies.reset();
        self.root_cause.reset();
        (self, vec![])
    }

    fn handle_category_selected(mut self, category: MetricCategory) -> (Self, Vec<Command>) {
        if category == self.selection.category {
            return (self, vec![]);
        }

        self.selection.category = category;
        match self.selection.chart_key() {
            Some(key) => {
                let tag = self.chart.begin(key);
                (self, vec![Command::FetchChart(tag)])
            }
            None => (self, vec![]),
        }
    }

    // Loader requests

    fn handle_refresh_hosts(mut self) -> (Self, Vec<Command>) {
        let tag = self.hosts.begin(());
        (self, vec![Command::FetchHosts(tag)])
    }

    fn handle_load_chart(mut self) -> (Self, Vec<Command>) {
        match self.selection.chart_key() {
            Some(key) => {
                let tag = self.chart.begin(key);
                (self, vec![Command::FetchChart(tag)])
            }
            None => {
                self.hint(NO_HOST_HINT);
                (self, vec![])
            }
        }
    }

    fn handle_detect_anomalies(mut self) -> (Self, Vec<Command>) {
        match self.selection.host().map(str::to_string) {
            Some(host_id) => {
                let tag = self.anomalies.begin(host_id);
                (self, vec![Command::DetectAnomalies(tag)])
            }
            None => {
                self.hint(NO_HOST_HINT);
                (self, vec![])
            }
        }
    }

    fn handle_analyze_root_cause(mut self) -> (Self, Vec<Command>) {
        match self.selection.host().map(str::to_string) {
            Some(host_id) => {
                let tag = self.root_cause.begin(host_id);
                (self, vec![Command::AnalyzeRootCause(tag)])
            }
            None => {
                self.hint(NO_HOST_HINT);
                (self, vec![])
            }
        }
    }

    // Loader results

    fn handle_hosts_loaded(
        mut self,
        tag: RequestTag<()>,
        result: Result<Vec<Host>, ApiError>,
    ) -> (Self, Vec<Command>) {
        let result = user_result(result, "host list");
        if self.hosts.resolve(&tag, result) == Resolution::Stale {
            debug!("Discarding stale host list (generation {})", tag.generation);
            return (self, vec![]);
        }

        let len = self.host_list().len();
        self.host_cursor = self.host_cursor.min(len.saturating_sub(1));
        (self, vec![])
    }

    fn handle_chart_loaded(
        mut self,
        tag: RequestTag<ChartKey>,
        result: Result<Vec<MetricPoint>, ApiError>,
    ) -> (Self, Vec<Command>) {
        let result = user_result(result, "chart data");
        if self.chart.resolve(&tag, result) == Resolution::Stale {
            debug!(
                "Discarding stale {} chart for host {}",
                tag.key.category, tag.key.host_id
            );
        }
        (self, vec![])
    }

    fn handle_anomalies_loaded(
        mut self,
        tag: RequestTag<String>,
        result: Result<AnomalyReport, ApiError>,
    ) -> (Self, Vec<Command>) {
        let result = user_result(result, "anomaly detection");
        if self.anomalies.resolve(&tag, result) == Resolution::Stale {
            debug!("Discarding stale anomaly report for host {}", tag.key);
        }
        (self, vec![])
    }

    fn handle_root_cause_loaded(
        mut self,
        tag: RequestTag<String>,
        result: Result<RootCauseReport, ApiError>,
    ) -> (Self, Vec<Command>) {
        let result = user_result(result, "root cause analysis");
        if self.root_cause.resolve(&tag, result) == Resolution::Stale {
            debug!("Discarding stale root cause report for host {}", tag.key);
        }
        (self, vec![])
    }

    // Feedback

    fn handle_feedback_submit(mut self) -> (Self, Vec<Command>) {
        self.input_mode = InputMode::Normal;
        match self.feedback.prepare(self.selection.host()) {
            Ok(submission) => {
                self.feedback.begin_submit();
                (self, vec![Command::SubmitFeedback(submission)])
            }
            Err(e) => {
                let ttl = self.settings.status_ttl_ticks;
                self.feedback.reject(&e, ttl);
                (self, vec![])
            }
        }
    }

    fn handle_feedback_submitted(
        mut self,
        submission: FeedbackSubmission,
        result: Result<SubmissionAck, ApiError>,
    ) -> (Self, Vec<Command>) {
        if let Err(e) = &result {
            warn!("Feedback for host {} failed: {}", submission.host_id, e);
        }
        let ttl = self.settings.status_ttl_ticks;
        self.feedback.finish_submit(&submission, &result, ttl);
        (self, vec![])
    }
}

fn user_result<T>(result: Result<T, ApiError>, what: &str) -> Result<T, String> {
    result.map_err(|e| {
        if e.is_transport() {
            warn!("{} failed, backend unreachable: {}", what, e);
        } else {
            warn!("{} failed: {}", what, e);
        }
        e.user_message()
    })
}
