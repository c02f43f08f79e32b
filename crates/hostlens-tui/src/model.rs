//! Application model for the Elm Architecture (TEA) loop
//!
//! All dashboard state lives in [`AppModel`] and changes only through
//! [`AppModel::update`](crate::update). Backend results come back as
//! [`AppMessage`]s carrying the [`RequestTag`] they were issued under.

use crossterm::event::KeyEvent;
use hostlens_api::{
    AnomalyReport, ApiError, FeedbackSubmission, Host, MetricCategory, MetricPoint,
    RootCauseReport, SubmissionAck,
};
use hostlens_config::{AppConfig, DEFAULT_BASE_URL, DEFAULT_TIME_PERIOD_HOURS};

use crate::feedback::{FeedbackForm, StatusMessage};
use crate::loader::{Loader, RequestTag};
use crate::navigation::{Navigation, Tab};

/// Host and category a chart request was issued for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartKey {
    pub host_id: String,
    pub category: MetricCategory,
}

/// What the user is looking at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub host_id: Option<String>,
    pub category: MetricCategory,
}

impl Selection {
    /// Selected host id, ignoring blank values
    pub fn host(&self) -> Option<&str> {
        self.host_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn chart_key(&self) -> Option<ChartKey> {
        self.host().map(|host_id| ChartKey {
            host_id: host_id.to_string(),
            category: self.category,
        })
    }
}

/// Where key presses go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    EditingComment,
}

/// Values the model needs from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub api_url: String,
    pub time_period_hours: u32,
    pub status_ttl_ticks: u32,
    pub sidebar_open: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            time_period_hours: DEFAULT_TIME_PERIOD_HOURS,
            status_ttl_ticks: 12,
            sidebar_open: true,
        }
    }
}

impl From<&AppConfig> for ModelSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_url: config.api.base_url.clone(),
            time_period_hours: config.api.time_period_hours,
            status_ttl_ticks: config.ui.status_ttl_ticks,
            sidebar_open: config.ui.sidebar_open,
        }
    }
}

/// Complete dashboard state
#[derive(Clone, Debug, PartialEq)]
pub struct AppModel {
    pub settings: ModelSettings,
    pub navigation: Navigation,
    pub input_mode: InputMode,

    pub selection: Selection,
    /// Highlighted row in the sidebar host list
    pub host_cursor: usize,

    pub hosts: Loader<(), Vec<Host>>,
    pub chart: Loader<ChartKey, Vec<MetricPoint>>,
    pub anomalies: Loader<String, AnomalyReport>,
    pub root_cause: Loader<String, RootCauseReport>,

    pub feedback: FeedbackForm,
    /// Transient hint shown in the status bar
    pub notice: Option<StatusMessage>,

    pub terminal_size: (u16, u16),
    pub should_quit: bool,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::init(ModelSettings::default())
    }
}

impl AppModel {
    /// Create initial application state
    pub fn init(settings: ModelSettings) -> Self {
        Self {
            navigation: Navigation::new(settings.sidebar_open),
            settings,
            input_mode: InputMode::Normal,
            selection: Selection::default(),
            host_cursor: 0,
            hosts: Loader::new(),
            chart: Loader::new(),
            anomalies: Loader::new(),
            root_cause: Loader::new(),
            feedback: FeedbackForm::default(),
            notice: None,
            terminal_size: (80, 24),
            should_quit: false,
        }
    }

    /// Hosts currently listed in the sidebar
    pub fn host_list(&self) -> &[Host] {
        self.hosts.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Host under the sidebar cursor
    pub fn host_under_cursor(&self) -> Option<&Host> {
        self.host_list().get(self.host_cursor)
    }

    /// Selected host, if it is known to the host list
    pub fn selected_host(&self) -> Option<&Host> {
        let id = self.selection.host()?;
        self.host_list().iter().find(|h| h.id == id)
    }

    /// Name to show for the selected host
    pub fn selected_host_label(&self) -> Option<String> {
        match (self.selected_host(), self.selection.host()) {
            (Some(host), _) => Some(format!("{} ({})", host.display_name, host.id)),
            (None, Some(id)) => Some(id.to_string()),
            (None, None) => None,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.navigation.active_tab
    }
}

/// Messages that drive [`AppModel::update`]
#[derive(Clone, Debug)]
pub enum AppMessage {
    // Terminal
    KeyPress(KeyEvent),
    Resize { width: u16, height: u16 },
    Tick,

    // Selection
    HostCursorMoved(isize),
    HostSelected(Option<String>),
    CategorySelected(MetricCategory),

    // Loader requests
    RefreshHostsRequested,
    LoadChartRequested,
    DetectAnomaliesRequested,
    AnalyzeRootCauseRequested,

    // Loader results
    HostsLoaded {
        tag: RequestTag<()>,
        result: Result<Vec<Host>, ApiError>,
    },
    ChartLoaded {
        tag: RequestTag<ChartKey>,
        result: Result<Vec<MetricPoint>, ApiError>,
    },
    AnomaliesLoaded {
        tag: RequestTag<String>,
        result: Result<AnomalyReport, ApiError>,
    },
    RootCauseLoaded {
        tag: RequestTag<String>,
        result: Result<RootCauseReport, ApiError>,
    },

    // Feedback
    FeedbackVerdictToggled,
    FeedbackEditStarted,
    FeedbackEditFinished,
    FeedbackInput(char),
    FeedbackBackspace,
    FeedbackSubmitRequested,
    FeedbackSubmitted {
        submission: FeedbackSubmission,
        result: Result<SubmissionAck, ApiError>,
    },

    // Navigation
    SidebarToggled,
    TabSelected(Tab),
    NextTab,

    ExitRequested,
}
