//! Monitoring backend client
//!
//! Every call is one best-effort round trip: no retries, no caching.

use std::sync::Arc;

use async_trait::async_trait;
use hostlens_http::{HttpClientTrait, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{ApiError, Result},
    types::{
        AnomalyReport, FeedbackSubmission, Host, MetricCategory, MetricPoint, RootCauseReport,
        SubmissionAck,
    },
};

/// Analysis window used when the caller does not pick one
pub use hostlens_config::DEFAULT_TIME_PERIOD_HOURS;

/// Backend capabilities used by the dashboard
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    /// List monitored hosts
    async fn list_hosts(&self) -> Result<Vec<Host>>;

    /// Fetch the time series of `category` for `host_id`
    async fn get_chart_data(
        &self,
        host_id: &str,
        category: MetricCategory,
    ) -> Result<Vec<MetricPoint>>;

    /// Run anomaly detection over the last `time_period_hours`
    async fn detect_anomalies(&self, host_id: &str, time_period_hours: u32)
        -> Result<AnomalyReport>;

    /// Run root-cause analysis over the last `time_period_hours`
    async fn analyze_root_cause(
        &self,
        host_id: &str,
        time_period_hours: u32,
    ) -> Result<RootCauseReport>;

    /// Post a verdict on an AI result
    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<SubmissionAck>;

    /// Anomaly detection over the default 24 hour window
    async fn detect_anomalies_default(&self, host_id: &str) -> Result<AnomalyReport> {
        self.detect_anomalies(host_id, DEFAULT_TIME_PERIOD_HOURS).await
    }

    /// Root-cause analysis over the default 24 hour window
    async fn analyze_root_cause_default(&self, host_id: &str) -> Result<RootCauseReport> {
        self.analyze_root_cause(host_id, DEFAULT_TIME_PERIOD_HOURS)
            .await
    }
}

/// REST implementation of [`MonitoringApi`]
pub struct ApiClient {
    http: Arc<dyn HttpClientTrait>,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    pub fn new(http: Arc<dyn HttpClientTrait>, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("Invalid backend URL '{}': {}", base_url, e)))?;

        // Keep any path prefix when joining endpoint names
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http, base_url })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        self.base_url
            .join(path)
            .map(String::from)
            .map_err(|e| ApiError::Validation(format!("Invalid endpoint '{}': {}", path, e)))
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse {} response: {}", what, e);
            ApiError::Decode(format!("{}: {}", what, e))
        })
    }
}

fn require_host(host_id: &str) -> Result<&str> {
    let trimmed = host_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("No host selected".to_string()));
    }
    Ok(trimmed)
}

#[async_trait]
impl MonitoringApi for ApiClient {
    async fn list_hosts(&self) -> Result<Vec<Host>> {
        let url = self.endpoint("get_hosts")?;
        let response = self.http.get(&url, &[]).await?;
        let hosts: Vec<Host> = Self::decode(response, "host list").await?;
        debug!("Fetched {} hosts", hosts.len());
        Ok(hosts)
    }

    async fn get_chart_data(
        &self,
        host_id: &str,
        category: MetricCategory,
    ) -> Result<Vec<MetricPoint>> {
        let host_id = require_host(host_id)?;
        let url = self.endpoint("chart_data")?;
        let query = [
            ("host_id", host_id.to_string()),
            ("category", category.as_str().to_string()),
        ];

        let response = self.http.get(&url, &query).await?;
        let points: Vec<MetricPoint> = Self::decode(response, "chart data").await?;
        debug!(
            "Fetched {} {} points for host {}",
            points.len(),
            category,
            host_id
        );
        Ok(points)
    }

    async fn detect_anomalies(
        &self,
        host_id: &str,
        time_period_hours: u32,
    ) -> Result<AnomalyReport> {
        let host_id = require_host(host_id)?;
        let url = self.endpoint("detect_anomalies")?;
        let query = [
            ("host_id", host_id.to_string()),
            ("time_period", time_period_hours.to_string()),
        ];

        let response = self.http.post_json(&url, &query, None).await?;
        let report: AnomalyReport = Self::decode(response, "anomaly report").await?;
        debug!(
            "Anomaly detection for host {} returned {} anomalies",
            host_id,
            report.anomalies.len()
        );
        Ok(report)
    }

    async fn analyze_root_cause(
        &self,
        host_id: &str,
        time_period_hours: u32,
    ) -> Result<RootCauseReport> {
        let host_id = require_host(host_id)?;
        let url = self.endpoint("root_cause_analysis")?;
        let query = [
            ("host_id", host_id.to_string()),
            ("time_period", time_period_hours.to_string()),
        ];

        let response = self.http.post_json(&url, &query, None).await?;
        Self::decode(response, "root cause report").await
    }

    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<SubmissionAck> {
        require_host(&submission.host_id)?;
        let url = self.endpoint("submit_feedback")?;
        let body = serde_json::to_value(submission)?;

        let response = self.http.post_json(&url, &[], Some(body)).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!("Feedback for host {} acknowledged", submission.host_id);
        Ok(SubmissionAck::from_body(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostlens_http::{shared_client, HttpConfig};

    fn client(base: &str) -> ApiClient {
        ApiClient::new(shared_client(HttpConfig::default()).unwrap(), base).unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_prefix() {
        let api = client("http://localhost:8000");
        assert_eq!(api.endpoint("get_hosts").unwrap(), "http://localhost:8000/get_hosts");
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let api = client("http://gateway.local/monitoring");
        assert_eq!(
            api.endpoint("chart_data").unwrap(),
            "http://gateway.local/monitoring/chart_data"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new(shared_client(HttpConfig::default()).unwrap(), "localhost");
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_require_host_trims() {
        assert_eq!(require_host(" 10101 ").unwrap(), "10101");
        assert!(matches!(require_host("   "), Err(ApiError::Validation(_))));
    }
}
