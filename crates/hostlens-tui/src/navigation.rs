//! Sidebar and tab state of the dashboard shell

/// Width of the expanded sidebar, in columns
pub const SIDEBAR_OPEN_WIDTH: u16 = 30;

/// Width of the collapsed rail that only holds the toggle glyph
pub const SIDEBAR_RAIL_WIDTH: u16 = 3;

/// Top-level content tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Host/category selectors and the metric chart
    #[default]
    Dashboard,
    /// Anomaly report, root-cause report and the feedback form
    Analysis,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Dashboard, Tab::Analysis];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Analysis => "Analysis",
        }
    }

    /// Digit key that selects the tab
    pub fn shortcut(&self) -> char {
        match self {
            Tab::Dashboard => '1',
            Tab::Analysis => '2',
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Analysis => 1,
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Shell state; the renderer reads layout from here and nowhere else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub sidebar_open: bool,
    pub active_tab: Tab,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Navigation {
    pub fn new(sidebar_open: bool) -> Self {
        Self {
            sidebar_open,
            active_tab: Tab::Dashboard,
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
    }

    pub fn sidebar_width(&self) -> u16 {
        if self.sidebar_open {
            SIDEBAR_OPEN_WIDTH
        } else {
            SIDEBAR_RAIL_WIDTH
        }
    }

    /// Glyph on the toggle: points inward when open, outward when closed
    pub fn toggle_glyph(&self) -> &'static str {
        if self.sidebar_open {
            "‹"
        } else {
            "›"
        }
    }

    pub fn sidebar_class(&self) -> &'static str {
        if self.sidebar_open {
            "open"
        } else {
            "closed"
        }
    }
}
