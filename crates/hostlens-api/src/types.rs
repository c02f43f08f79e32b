//! Wire and domain types for the monitoring backend

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// A monitored machine or service instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Host {
    /// Opaque backend-assigned identifier
    #[serde(rename = "hostid", deserialize_with = "string_or_number")]
    pub id: String,
    /// Human readable name
    #[serde(rename = "host")]
    pub display_name: String,
}

impl Host {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

/// Metric family selecting which time series to chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MetricCategory {
    #[default]
    #[serde(rename = "CPU")]
    Cpu,
    Memory,
    Disk,
    Network,
    Service,
    Other,
}

impl MetricCategory {
    /// All categories in selector order
    pub const ALL: [MetricCategory; 6] = [
        MetricCategory::Cpu,
        MetricCategory::Memory,
        MetricCategory::Disk,
        MetricCategory::Network,
        MetricCategory::Service,
        MetricCategory::Other,
    ];

    /// Name used both on the wire and in the UI
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::Cpu => "CPU",
            MetricCategory::Memory => "Memory",
            MetricCategory::Disk => "Disk",
            MetricCategory::Network => "Network",
            MetricCategory::Service => "Service",
            MetricCategory::Other => "Other",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    /// Next category, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous category, wrapping around
    pub fn previous(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown metric category: {}", s))
    }
}

/// Sample time as sent by the backend: epoch number or formatted string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(f64),
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Epoch(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Timestamp::Epoch(n) => write!(f, "{}", n),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

/// One sample of a metric time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    #[serde(alias = "time")]
    pub timestamp: Timestamp,
    pub value: f64,
    /// Item name the sample belongs to, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl MetricPoint {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self {
            timestamp,
            value,
            metric: None,
        }
    }
}

/// A single detected deviation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub cause: String,
    #[serde(default)]
    pub action: String,
}

/// Result of anomaly detection; an empty list means "no anomalies"
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnomalyReport {
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

impl AnomalyReport {
    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Confidence attached to a root-cause verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Score(f64),
    Label(String),
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Label(String::new())
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Score(n) => write!(f, "{}", n),
            Confidence::Label(s) => f.write_str(s),
        }
    }
}

/// Backend explanation of a detected problem
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RootCauseReport {
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

/// User verdict on an AI result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackVerdict {
    #[default]
    Correct,
    Incorrect,
}

impl FeedbackVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackVerdict::Correct => "correct",
            FeedbackVerdict::Incorrect => "incorrect",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            FeedbackVerdict::Correct => FeedbackVerdict::Incorrect,
            FeedbackVerdict::Incorrect => FeedbackVerdict::Correct,
        }
    }
}

impl fmt::Display for FeedbackVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback posted to `/submit_feedback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub host_id: String,
    pub feedback: FeedbackVerdict,
    pub comment: String,
}

/// Acknowledgement returned after a feedback submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmissionAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubmissionAck {
    /// Build an ack from any JSON value; non-objects carry no fields
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => {
                serde_json::from_value(value).unwrap_or_default()
            }
            serde_json::Value::String(status) => Self {
                status: Some(status),
                extra: serde_json::Map::new(),
            },
            _ => Self::default(),
        }
    }

    /// Build an ack from a 2xx response body
    ///
    /// The request has already succeeded, so a body that is not JSON is kept
    /// as the status text instead of failing the submission.
    pub fn from_body(body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            return Self::default();
        }
        match serde_json::from_str(body) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self {
                status: Some(body.to_string()),
                extra: serde_json::Map::new(),
            },
        }
    }
}
