//! REST client for the HostLens monitoring backend
//!
//! The backend owns metric storage, anomaly detection, root-cause inference
//! and feedback persistence. This crate only speaks its HTTP contract:
//!
//! | Method | Path | Parameters |
//! |---|---|---|
//! | GET | `/get_hosts` | |
//! | GET | `/chart_data` | `host_id`, `category` |
//! | POST | `/detect_anomalies` | query `host_id`, `time_period` |
//! | POST | `/root_cause_analysis` | query `host_id`, `time_period` |
//! | POST | `/submit_feedback` | JSON `{host_id, feedback, comment}` |

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, MonitoringApi, DEFAULT_TIME_PERIOD_HOURS};
pub use error::{ApiError, Result};
pub use types::{
    Anomaly, AnomalyReport, Confidence, FeedbackSubmission, FeedbackVerdict, Host,
    MetricCategory, MetricPoint, RootCauseReport, SubmissionAck, Timestamp,
};
