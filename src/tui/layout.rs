// Dashboard layout: filter sidebar, tabbed content, status and help bars.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
};

use super::state::FocusArea;

/// Dashboard color scheme
pub struct DashColors;

impl DashColors {
    pub const BORDER: Color = Color::Rgb(64, 64, 64);
    pub const BORDER_FOCUSED: Color = Color::Rgb(58, 128, 200);
    pub const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 240);
    pub const TEXT_MUTED: Color = Color::Rgb(120, 120, 120);
    pub const ACCENT_BLUE: Color = Color::Rgb(58, 128, 200);
    pub const AVAILABLE: Color = Color::Rgb(120, 180, 120);
    pub const SHORT: Color = Color::Rgb(200, 80, 80);
    pub const WARNING: Color = Color::Rgb(200, 180, 100);
}

#[derive(Debug)]
pub struct DashboardLayout {
    pub tabs: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub status_bar: Rect,
    pub help_bar: Rect,
}

impl DashboardLayout {
    pub fn new(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(30), // Filter sidebar
                Constraint::Min(0),     // Main content
            ])
            .split(main_chunks[1]);

        Self {
            tabs: main_chunks[0],
            sidebar: content_chunks[0],
            content: content_chunks[1],
            status_bar: main_chunks[2],
            help_bar: main_chunks[3],
        }
    }

    pub fn border_style(&self, pane: FocusArea, current_focus: FocusArea) -> Style {
        if pane == current_focus {
            Style::default().fg(DashColors::BORDER_FOCUSED)
        } else {
            Style::default().fg(DashColors::BORDER)
        }
    }
}

/// Overview page sub-layout: metric cells above the preview table.
pub struct OverviewLayout {
    pub metrics: [Rect; 4],
    pub preview: Rect,
}

impl OverviewLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(chunks[0]);

        Self {
            metrics: [cells[0], cells[1], cells[2], cells[3]],
            preview: chunks[1],
        }
    }
}
