//! End-to-end message flow against a mock backend

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hostlens_api::{
    Anomaly, AnomalyReport, ApiError, FeedbackSubmission, Host, MetricCategory, MetricPoint,
    MonitoringApi, Result, RootCauseReport, SubmissionAck, Timestamp,
};
use hostlens_tui::{
    AppMessage, Command, EffectRunner, LoadState, ModelSettings, RequestTag, Runtime,
};
use tokio::sync::mpsc;

#[derive(Default)]
struct MockApi {
    slow_category: Option<MetricCategory>,
    slow_anomalies: bool,
    fail_anomalies: bool,
    anomalies: Vec<Anomaly>,
    host_calls: AtomicUsize,
    chart_calls: AtomicUsize,
    anomaly_calls: AtomicUsize,
    root_cause_calls: AtomicUsize,
    feedback_calls: AtomicUsize,
}

#[async_trait]
impl MonitoringApi for MockApi {
    async fn list_hosts(&self) -> Result<Vec<Host>> {
        self.host_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            Host::new("10101", "Ubuntu Server"),
            Host::new("10102", "Windows Agent"),
        ])
    }

    async fn get_chart_data(
        &self,
        _host_id: &str,
        category: MetricCategory,
    ) -> Result<Vec<MetricPoint>> {
        self.chart_calls.fetch_add(1, Ordering::SeqCst);
        if self.slow_category == Some(category) {
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        let value = match category {
            MetricCategory::Cpu => 42.0,
            _ => 12.0,
        };
        Ok(vec![MetricPoint::new(
            Timestamp::Text("10:00".to_string()),
            value,
        )])
    }

    async fn detect_anomalies(
        &self,
        _host_id: &str,
        time_period_hours: u32,
    ) -> Result<AnomalyReport> {
        self.anomaly_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(time_period_hours, 24);
        if self.slow_anomalies {
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        if self.fail_anomalies {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(AnomalyReport {
            anomalies: self.anomalies.clone(),
        })
    }

    async fn analyze_root_cause(
        &self,
        _host_id: &str,
        _time_period_hours: u32,
    ) -> Result<RootCauseReport> {
        self.root_cause_calls.fetch_add(1, Ordering::SeqCst);
        Ok(RootCauseReport {
            root_cause: "Swap exhaustion".to_string(),
            ..Default::default()
        })
    }

    async fn submit_feedback(&self, _submission: &FeedbackSubmission) -> Result<SubmissionAck> {
        self.feedback_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SubmissionAck {
            status: Some("Feedback saved successfully".to_string()),
            ..Default::default()
        })
    }
}

fn runtime(api: Arc<MockApi>) -> Runtime {
    Runtime::new(api, ModelSettings::default())
}

/// Apply the next `count` messages, failing if they do not arrive in time
async fn settle(runtime: &mut Runtime, count: usize) {
    for _ in 0..count {
        let message = tokio::time::timeout(Duration::from_secs(2), runtime.next_message())
            .await
            .expect("timed out waiting for a backend response")
            .expect("channel closed");
        runtime.dispatch(message);
    }
}

async fn nothing_arrives(runtime: &mut Runtime) -> bool {
    tokio::time::timeout(Duration::from_millis(100), runtime.next_message())
        .await
        .is_err()
}

async fn started_on(api: Arc<MockApi>, host: &str) -> Runtime {
    let mut runtime = runtime(api);
    runtime.start();
    settle(&mut runtime, 1).await;
    runtime.dispatch(AppMessage::HostSelected(Some(host.to_string())));
    runtime
}

#[tokio::test]
async fn test_startup_loads_hosts() {
    let api = Arc::new(MockApi::default());
    let mut runtime = runtime(api.clone());

    runtime.start();
    assert!(runtime.model().hosts.is_loading());
    settle(&mut runtime, 1).await;

    assert_eq!(runtime.model().host_list().len(), 2);
    assert_eq!(api.host_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_chart_loads_single_point() {
    let api = Arc::new(MockApi::default());
    let mut runtime = started_on(api.clone(), "10101").await;

    runtime.dispatch(AppMessage::LoadChartRequested);
    settle(&mut runtime, 1).await;

    let points = runtime.model().chart.data().expect("chart loaded");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].timestamp, Timestamp::Text("10:00".to_string()));
    assert_eq!(points[0].value, 42.0);
    assert_eq!(api.chart_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_slow_cpu_response_after_switch_to_memory_is_discarded() {
    let api = Arc::new(MockApi {
        slow_category: Some(MetricCategory::Cpu),
        ..Default::default()
    });
    let mut runtime = started_on(api.clone(), "10101").await;

    runtime.dispatch(AppMessage::LoadChartRequested);
    runtime.dispatch(AppMessage::CategorySelected(MetricCategory::Memory));
    settle(&mut runtime, 2).await;

    let model = runtime.model();
    assert_eq!(
        model.chart.key().map(|k| k.category),
        Some(MetricCategory::Memory)
    );
    assert_eq!(model.chart.data().map(|p| p[0].value), Some(12.0));
    assert_eq!(api.chart_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_category_change_without_host_never_calls_backend() {
    let api = Arc::new(MockApi::default());
    let mut runtime = runtime(api.clone());
    runtime.start();
    settle(&mut runtime, 1).await;

    runtime.dispatch(AppMessage::CategorySelected(MetricCategory::Disk));
    runtime.dispatch(AppMessage::LoadChartRequested);

    assert!(nothing_arrives(&mut runtime).await);
    assert_eq!(api.chart_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_anomaly_report_is_loaded() {
    let api = Arc::new(MockApi::default());
    let mut runtime = started_on(api, "10101").await;

    runtime.dispatch(AppMessage::DetectAnomaliesRequested);
    settle(&mut runtime, 1).await;

    assert_eq!(
        runtime.model().anomalies.state(),
        &LoadState::Loaded(AnomalyReport::default())
    );
}

#[tokio::test]
async fn test_anomaly_network_failure_becomes_failed_state() {
    let api = Arc::new(MockApi {
        fail_anomalies: true,
        ..Default::default()
    });
    let mut runtime = started_on(api, "10101").await;

    runtime.dispatch(AppMessage::DetectAnomaliesRequested);
    settle(&mut runtime, 1).await;

    let anomalies = &runtime.model().anomalies;
    assert!(!anomalies.is_loading());
    assert!(anomalies.data().is_none());
    assert!(!anomalies.error().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_host_change_discards_in_flight_analysis() {
    let api = Arc::new(MockApi {
        slow_anomalies: true,
        anomalies: vec![Anomaly {
            metric: "CPU utilization".to_string(),
            severity: "high".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    });
    let mut runtime = started_on(api, "10101").await;

    runtime.dispatch(AppMessage::DetectAnomaliesRequested);
    runtime.dispatch(AppMessage::HostSelected(Some("10102".to_string())));
    settle(&mut runtime, 1).await;

    assert_eq!(runtime.model().anomalies.state(), &LoadState::Idle);
}

#[tokio::test]
async fn test_feedback_without_host_stays_local() {
    let api = Arc::new(MockApi::default());
    let mut runtime = runtime(api.clone());

    runtime.dispatch(AppMessage::FeedbackSubmitRequested);

    assert!(nothing_arrives(&mut runtime).await);
    assert_eq!(api.feedback_calls.load(Ordering::SeqCst), 0);
    assert!(runtime.model().feedback.status.is_some());
}

#[tokio::test]
async fn test_feedback_submission_clears_comment() {
    let api = Arc::new(MockApi::default());
    let mut runtime = started_on(api.clone(), "10101").await;

    runtime.dispatch(AppMessage::FeedbackVerdictToggled);
    for c in "backup job".chars() {
        runtime.dispatch(AppMessage::FeedbackInput(c));
    }
    runtime.dispatch(AppMessage::FeedbackSubmitRequested);
    settle(&mut runtime, 1).await;

    let feedback = &runtime.model().feedback;
    assert!(feedback.comment.is_empty());
    assert!(!feedback.submitting);
    assert_eq!(api.feedback_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_analyses_run_concurrently() {
    let api = Arc::new(MockApi {
        slow_anomalies: true,
        ..Default::default()
    });
    let mut runtime = started_on(api.clone(), "10101").await;

    runtime.dispatch(AppMessage::DetectAnomaliesRequested);
    runtime.dispatch(AppMessage::AnalyzeRootCauseRequested);
    runtime.dispatch(AppMessage::LoadChartRequested);
    settle(&mut runtime, 3).await;

    let model = runtime.model();
    assert!(model.anomalies.data().is_some());
    assert_eq!(
        model.root_cause.data().map(|r| r.root_cause.as_str()),
        Some("Swap exhaustion")
    );
    assert!(model.chart.data().is_some());
    assert_eq!(api.root_cause_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_runner_reports_with_issued_tag() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let runner = EffectRunner::new(Arc::new(MockApi::default()), tx, 24);
    let tag = RequestTag {
        generation: 7,
        key: "10101".to_string(),
    };

    let handle = runner
        .execute(Command::AnalyzeRootCause(tag.clone()))
        .expect("network command spawns a task");
    handle.await.unwrap();

    match rx.recv().await {
        Some(AppMessage::RootCauseLoaded { tag: received, result }) => {
            assert_eq!(received, tag);
            assert!(result.is_ok());
        }
        other => panic!("unexpected message {:?}", other),
    }
    assert!(runner.execute(Command::Quit).is_none());
}
