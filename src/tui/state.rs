// Dashboard state: focus, tab pages, filter cursor, scrolling.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Filters,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPage {
    Overview,
    Rankings,
    Systems,
    Readiness,
    Heatmap,
    Critical,
}

impl TabPage {
    pub const ALL: [TabPage; 6] = [
        TabPage::Overview,
        TabPage::Rankings,
        TabPage::Systems,
        TabPage::Readiness,
        TabPage::Heatmap,
        TabPage::Critical,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TabPage::Overview => "Overview",
            TabPage::Rankings => "Rankings",
            TabPage::Systems => "Systems",
            TabPage::Readiness => "Readiness",
            TabPage::Heatmap => "Heatmap",
            TabPage::Critical => "Critical",
        }
    }
}

/// Number of filter widgets in the sidebar (Section, System, Category).
pub const FILTER_COUNT: usize = 3;

#[derive(Debug)]
pub struct DashboardState {
    pub focus: FocusArea,
    pub tab: usize,
    pub filter_cursor: usize,
    pub preview_scroll: usize,
    pub heatmap_scroll: usize,
    pub status_message: String,
    pub error_message: Option<String>,
    pub should_quit: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            focus: FocusArea::Filters,
            tab: 0,
            filter_cursor: 0,
            preview_scroll: 0,
            heatmap_scroll: 0,
            status_message: "Welcome! Tab switches pages, 'f' toggles the filter pane, 'q' quits."
                .to_string(),
            error_message: None,
            should_quit: false,
        }
    }

    pub fn current_tab(&self) -> TabPage {
        TabPage::ALL[self.tab]
    }

    pub fn next_tab(&mut self) {
        self.tab = (self.tab + 1) % TabPage::ALL.len();
    }

    pub fn previous_tab(&mut self) {
        self.tab = if self.tab == 0 {
            TabPage::ALL.len() - 1
        } else {
            self.tab - 1
        };
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusArea::Filters => FocusArea::Main,
            FocusArea::Main => FocusArea::Filters,
        };
    }

    pub fn filter_cursor_up(&mut self) {
        self.filter_cursor = if self.filter_cursor == 0 {
            FILTER_COUNT - 1
        } else {
            self.filter_cursor - 1
        };
    }

    pub fn filter_cursor_down(&mut self) {
        self.filter_cursor = (self.filter_cursor + 1) % FILTER_COUNT;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.error_message = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error_message = Some(error.into());
    }
}
