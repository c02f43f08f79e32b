//! Executes [`Command`]s against the monitoring backend
//!
//! Each network command runs on its own tokio task and reports back with
//! exactly one [`AppMessage`] tagged with the request it answers. Tasks never
//! touch the model.

use std::sync::Arc;

use hostlens_api::MonitoringApi;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::model::AppMessage;
use crate::update::Command;

pub struct EffectRunner {
    api: Arc<dyn MonitoringApi>,
    tx: UnboundedSender<AppMessage>,
    time_period_hours: u32,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn MonitoringApi>,
        tx: UnboundedSender<AppMessage>,
        time_period_hours: u32,
    ) -> Self {
        Self {
            api,
            tx,
            time_period_hours,
        }
    }

    /// Spawn the task for `command`; `Quit` is left to the event loop
    pub fn execute(&self, command: Command) -> Option<JoinHandle<()>> {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let hours = self.time_period_hours;

        let handle = match command {
            Command::FetchHosts(tag) => tokio::spawn(async move {
                debug!("Fetching host list (generation {})", tag.generation);
                let result = api.list_hosts().await;
                deliver(&tx, AppMessage::HostsLoaded { tag, result });
            }),
            Command::FetchChart(tag) => tokio::spawn(async move {
                debug!(
                    "Fetching {} chart for host {}",
                    tag.key.category, tag.key.host_id
                );
                let result = api.get_chart_data(&tag.key.host_id, tag.key.category).await;
                deliver(&tx, AppMessage::ChartLoaded { tag, result });
            }),
            Command::DetectAnomalies(tag) => tokio::spawn(async move {
                debug!("Detecting anomalies for host {} over {}h", tag.key, hours);
                let result = api.detect_anomalies(&tag.key, hours).await;
                deliver(&tx, AppMessage::AnomaliesLoaded { tag, result });
            }),
            Command::AnalyzeRootCause(tag) => tokio::spawn(async move {
                debug!("Analyzing root cause for host {} over {}h", tag.key, hours);
                let result = api.analyze_root_cause(&tag.key, hours).await;
                deliver(&tx, AppMessage::RootCauseLoaded { tag, result });
            }),
            Command::SubmitFeedback(submission) => tokio::spawn(async move {
                debug!(
                    "Submitting {} feedback for host {}",
                    submission.feedback, submission.host_id
                );
                let result = api.submit_feedback(&submission).await;
                deliver(&tx, AppMessage::FeedbackSubmitted { submission, result });
            }),
            Command::Quit => return None,
        };

        Some(handle)
    }
}

fn deliver(tx: &UnboundedSender<AppMessage>, message: AppMessage) {
    if tx.send(message).is_err() {
        debug!("Event loop gone, dropping backend response");
    }
}
