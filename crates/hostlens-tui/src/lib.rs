//! HostLens terminal dashboard
//!
//! A ratatui front end for the HostLens monitoring backend: pick a host and a
//! metric category, chart the series, run anomaly detection and root-cause
//! analysis, and send feedback on the AI verdicts.
//!
//! The crate follows the Elm Architecture: [`AppModel`] holds all state,
//! [`AppModel::update`] turns messages into a new model plus [`Command`]s,
//! [`view::render`] draws the model, and the [`EffectRunner`] executes
//! commands on tokio tasks that report back as messages.

pub mod app;
pub mod cli;
pub mod effects;
pub mod error;
pub mod event;
pub mod feedback;
pub mod loader;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod update;
pub mod view;

pub use app::{build_api, App, Runtime};
pub use cli::Args;
pub use effects::EffectRunner;
pub use error::{TuiError, TuiResult};
pub use event::{event_to_message, EventLoop};
pub use feedback::{FeedbackForm, StatusKind, StatusMessage};
pub use loader::{LoadState, Loader, RequestTag, Resolution};
pub use model::{AppMessage, AppModel, ChartKey, InputMode, ModelSettings, Selection};
pub use navigation::{Navigation, Tab};
pub use update::Command;
