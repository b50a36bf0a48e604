// Dashboard application: holds the loaded table and the active filters,
// recomputes the snapshot on every filter change, renders the current tab.

use anyhow::Result;
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};
use std::path::PathBuf;
use tracing::{error, info};

use crate::analyzer::{GroupMean, RankedComponent, Snapshot};
use crate::classify;
use crate::config::DashConfig;
use crate::export::{self, ExportFormat};
use crate::filter::{self, FilterSelection};
use crate::ingest::LoadedTable;

use super::events::Action;
use super::layout::{DashColors, DashboardLayout, OverviewLayout};
use super::state::{DashboardState, FocusArea, TabPage};

pub struct DashboardApp {
    table: LoadedTable,
    config: DashConfig,
    pub state: DashboardState,
    selection: FilterSelection,
    snapshot: Snapshot,
    sections: Vec<String>,
    categories: Vec<String>,
    source_name: String,
}

impl DashboardApp {
    pub fn new(table: LoadedTable, config: DashConfig, source_name: String) -> Self {
        let categories_per_row = classify::assign_categories(&table.raw, &table.columns);
        let sections = filter::section_values(&table.raw, &table.columns);
        let categories = filter::category_values(&categories_per_row);
        let selection = FilterSelection::default();
        let snapshot = Snapshot::compute(&table, &selection, &config);

        let mut app = Self {
            table,
            config,
            state: DashboardState::new(),
            selection,
            snapshot,
            sections,
            categories,
            source_name,
        };
        app.state
            .set_status(format!("{} components loaded", app.snapshot.rows.len()));
        app
    }

    /// Returns true when the app should exit.
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Quit => return Ok(true),
            Action::NextTab => self.state.next_tab(),
            Action::PreviousTab => self.state.previous_tab(),
            Action::JumpToTab(i) if i < TabPage::ALL.len() => self.state.tab = i,
            Action::JumpToTab(_) => {}
            Action::CycleFocus => self.state.cycle_focus(),
            Action::MoveUp => match self.state.focus {
                FocusArea::Filters => self.state.filter_cursor_up(),
                FocusArea::Main => self.scroll_up(),
            },
            Action::MoveDown => match self.state.focus {
                FocusArea::Filters => self.state.filter_cursor_down(),
                FocusArea::Main => self.scroll_down(),
            },
            Action::NextValue => self.cycle_current_filter(true),
            Action::PreviousValue => self.cycle_current_filter(false),
            Action::ClearFilters => {
                self.selection.clear();
                self.recompute();
            }
            Action::Export => self.export_filtered(),
            Action::Redraw => {}
        }
        Ok(false)
    }

    fn scroll_up(&mut self) {
        match self.state.current_tab() {
            TabPage::Heatmap => {
                self.state.heatmap_scroll = self.state.heatmap_scroll.saturating_sub(1)
            }
            _ => self.state.preview_scroll = self.state.preview_scroll.saturating_sub(1),
        }
    }

    fn scroll_down(&mut self) {
        match self.state.current_tab() {
            TabPage::Heatmap => {
                let max = self.snapshot.heatmap.rows.len().saturating_sub(1);
                self.state.heatmap_scroll = (self.state.heatmap_scroll + 1).min(max);
            }
            _ => {
                let max = self.snapshot.rows.len().saturating_sub(1);
                self.state.preview_scroll = (self.state.preview_scroll + 1).min(max);
            }
        }
    }

    fn cycle_current_filter(&mut self, forward: bool) {
        if self.state.focus != FocusArea::Filters {
            return;
        }
        match self.state.filter_cursor {
            0 => cycle_string(&mut self.selection.section, &self.sections, forward),
            1 => cycle_index(
                &mut self.selection.stage_column,
                self.table.columns.stage_columns.len(),
                forward,
            ),
            _ => cycle_string(&mut self.selection.category, &self.categories, forward),
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.snapshot = Snapshot::compute(&self.table, &self.selection, &self.config);
        self.state.preview_scroll = 0;
        self.state.heatmap_scroll = 0;
        if self.snapshot.is_empty() {
            self.state.set_status("No data after filters".to_string());
        } else {
            self.state
                .set_status(format!("{} components match", self.snapshot.rows.len()));
        }
    }

    fn export_filtered(&mut self) {
        let path = PathBuf::from(format!(
            "filtered_components_{}.csv",
            Local::now().format("%Y%m%d-%H%M%S")
        ));
        match export::export_rows(
            &self.snapshot.rows,
            &self.snapshot.stage_names,
            &path,
            ExportFormat::Csv,
        ) {
            Ok(()) => {
                info!("Exported filtered table to {}", path.display());
                self.state.set_status(format!("Exported {}", path.display()));
            }
            Err(e) => {
                error!("Export failed: {e:?}");
                self.state.set_error(format!("Export failed: {e}"));
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let layout = DashboardLayout::new(frame.size());

        self.render_tabs(frame, layout.tabs);
        self.render_filters(frame, &layout);
        match self.state.current_tab() {
            TabPage::Overview => self.render_overview(frame, layout.content),
            TabPage::Rankings => self.render_rankings(frame, layout.content),
            TabPage::Systems => self.render_systems(frame, layout.content),
            TabPage::Readiness => self.render_readiness(frame, layout.content),
            TabPage::Heatmap => self.render_heatmap(frame, layout.content),
            TabPage::Critical => self.render_critical(frame, layout.content),
        }
        self.render_status(frame, layout.status_bar);
        self.render_help(frame, layout.help_bar);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = TabPage::ALL
            .iter()
            .enumerate()
            .map(|(i, page)| Line::from(format!("{} {}", i + 1, page.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.state.tab)
            .highlight_style(
                Style::default()
                    .fg(DashColors::ACCENT_BLUE)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" 🛠️ Component Availability: {} ", self.source_name)),
            );
        frame.render_widget(tabs, area);
    }

    fn render_filters(&self, frame: &mut Frame, layout: &DashboardLayout) {
        let cursor = self.state.filter_cursor;
        let focused = self.state.focus == FocusArea::Filters;

        let entry = |idx: usize, label: &str, value: String| -> Line {
            let style = if focused && cursor == idx {
                Style::default()
                    .fg(DashColors::ACCENT_BLUE)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DashColors::TEXT_PRIMARY)
            };
            Line::from(vec![
                Span::styled(format!("{:<10}", label), style),
                Span::styled(value, style),
            ])
        };

        let stage_value = self
            .selection
            .stage_column
            .and_then(|i| self.snapshot.stage_names.get(i).cloned())
            .unwrap_or_else(|| "All".to_string());

        let lines = vec![
            entry(
                0,
                "Section:",
                self.selection.section.clone().unwrap_or_else(|| "All".into()),
            ),
            entry(1, "System:", stage_value),
            entry(
                2,
                "Category:",
                self.selection.category.clone().unwrap_or_else(|| "All".into()),
            ),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} rows match", self.snapshot.rows.len()),
                Style::default().fg(DashColors::TEXT_MUTED),
            )),
            Line::from(Span::styled(
                "←/→ change · c clear",
                Style::default().fg(DashColors::TEXT_MUTED),
            )),
        ];

        let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 🔎 Filters ")
                .border_style(layout.border_style(FocusArea::Filters, self.state.focus)),
        );
        frame.render_widget(widget, layout.sidebar);
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let layout = OverviewLayout::new(area);
        let summary = &self.snapshot.summary;

        let mean = summary
            .mean_available_in
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string());
        let metrics = [
            ("📦 Components", summary.total_components.to_string()),
            ("🔁 Avg Systems", mean),
            ("✅ In All", summary.used_in_all.to_string()),
            ("❌ In None", summary.used_in_none.to_string()),
        ];
        for ((title, value), cell) in metrics.iter().zip(layout.metrics.iter()) {
            let widget = Paragraph::new(Line::from(Span::styled(
                value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .block(Block::default().borders(Borders::ALL).title(*title));
            frame.render_widget(widget, *cell);
        }

        if self.snapshot.is_empty() {
            frame.render_widget(no_data("Preview"), layout.preview);
            return;
        }

        let cap = self.config.display.preview_rows;
        let rows = scroll_window(&self.snapshot.rows, self.state.preview_scroll, cap)
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.section.clone()),
                    Cell::from(r.category.clone().unwrap_or_else(|| "-".into())),
                    Cell::from(r.nomenclature.clone()),
                    Cell::from(format!("{:.0}", r.bom_qty)),
                    Cell::from(
                        r.stock
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                ])
            });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(15),
                Constraint::Percentage(20),
                Constraint::Percentage(45),
                Constraint::Percentage(10),
                Constraint::Percentage(10),
            ],
        )
        .header(
            Row::new(vec!["Section", "Category", "Nomenclature", "Bom Qty", "Stock"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Cleaned data (first {} rows) ", cap)),
        );
        frame.render_widget(table, layout.preview);
    }

    fn render_rankings(&self, frame: &mut Frame, area: Rect) {
        if !self.snapshot.has_stage_columns() {
            frame.render_widget(no_stage_columns("Rankings"), area);
            return;
        }
        if self.snapshot.is_empty() {
            frame.render_widget(no_data("Rankings"), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(area);

        let panels = [
            (" 🔁 Most systems ", &self.snapshot.top_multiuse),
            (" 🚨 Most 'S' ", &self.snapshot.top_short),
            (" ✅ Most 'A' ", &self.snapshot.top_available),
        ];
        for ((title, entries), chunk) in panels.iter().zip(chunks.iter()) {
            frame.render_widget(ranked_table(title, entries), *chunk);
        }
    }

    fn render_systems(&self, frame: &mut Frame, area: Rect) {
        if !self.snapshot.has_stage_columns() {
            frame.render_widget(no_stage_columns("Systems"), area);
            return;
        }
        if self.snapshot.is_empty() {
            frame.render_widget(no_data("Systems"), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let mut chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Per-system availability (A) vs shortage (S) "),
            )
            .bar_width(4)
            .bar_gap(1)
            .group_gap(3);
        for totals in &self.snapshot.stage_totals {
            let label = totals
                .name
                .split('(')
                .next()
                .unwrap_or(&totals.name)
                .trim()
                .to_string();
            let bars = [
                Bar::default()
                    .value(totals.available as u64)
                    .text_value(totals.available.to_string())
                    .style(Style::default().fg(DashColors::AVAILABLE)),
                Bar::default()
                    .value(totals.short as u64)
                    .text_value(totals.short.to_string())
                    .style(Style::default().fg(DashColors::SHORT)),
            ];
            chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
        }
        frame.render_widget(chart, chunks[0]);

        match self.snapshot.overall.available_ratio() {
            Some(ratio) => {
                let gauge = Gauge::default()
                    .block(Block::default().borders(Borders::ALL).title(" Overall A vs S "))
                    .gauge_style(
                        Style::default()
                            .fg(DashColors::AVAILABLE)
                            .bg(DashColors::SHORT),
                    )
                    .ratio(ratio)
                    .label(format!(
                        "A {} · S {} · {:.1}% available",
                        self.snapshot.overall.available,
                        self.snapshot.overall.short,
                        ratio * 100.0
                    ));
                frame.render_widget(gauge, chunks[1]);
            }
            None => {
                let widget = Paragraph::new("No 'A' or 'S' marks in the filtered table")
                    .block(Block::default().borders(Borders::ALL).title(" Overall A vs S "));
                frame.render_widget(widget, chunks[1]);
            }
        }
    }

    fn render_readiness(&self, frame: &mut Frame, area: Rect) {
        if self.snapshot.is_empty() {
            frame.render_widget(no_data("Readiness"), area);
            return;
        }
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        frame.render_widget(
            means_chart(" Avg 'Available Up To' per Section ", &self.snapshot.mean_by_section),
            chunks[0],
        );
        frame.render_widget(
            means_chart(" Avg 'Available Up To' by Category ", &self.snapshot.mean_by_category),
            chunks[1],
        );
    }

    fn render_heatmap(&self, frame: &mut Frame, area: Rect) {
        if !self.snapshot.has_stage_columns() {
            frame.render_widget(no_stage_columns("Heatmap"), area);
            return;
        }
        if self.snapshot.is_empty() {
            frame.render_widget(no_data("Heatmap"), area);
            return;
        }

        let heatmap = &self.snapshot.heatmap;
        let mut lines = Vec::with_capacity(heatmap.rows.len() + 2);

        let mut header = vec![Span::raw(format!("{:<26}", ""))];
        header.extend(
            (1..=heatmap.stage_names.len())
                .map(|i| Span::styled(format!("{:<3}", i), Style::default().fg(DashColors::TEXT_MUTED))),
        );
        lines.push(Line::from(header));

        for row in heatmap.rows.iter().skip(self.state.heatmap_scroll) {
            let mut spans = vec![Span::styled(
                format!("{:<26}", truncate(&row.label, 24)),
                Style::default().fg(DashColors::TEXT_PRIMARY),
            )];
            for cell in &row.cells {
                let (text, style) = match cell.intensity {
                    Some(i) if i >= 0.5 => {
                        ("■  ".to_string(), Style::default().fg(DashColors::AVAILABLE))
                    }
                    Some(_) => ("■  ".to_string(), Style::default().fg(DashColors::SHORT)),
                    None if cell.code.is_empty() => {
                        ("·  ".to_string(), Style::default().fg(DashColors::TEXT_MUTED))
                    }
                    None => (
                        format!("{:<3}", truncate(&cell.code, 2)),
                        Style::default().fg(DashColors::WARNING),
                    ),
                };
                spans.push(Span::styled(text, style));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(Span::styled(
            format!(
                "■ available  ■ short  · blank | columns: {}",
                heatmap.stage_names.join(", ")
            ),
            Style::default().fg(DashColors::TEXT_MUTED),
        )));

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 🧊 Component × system availability "),
        );
        frame.render_widget(widget, area);
    }

    fn render_critical(&self, frame: &mut Frame, area: Rect) {
        if self.snapshot.is_empty() {
            frame.render_widget(no_data("Critical"), area);
            return;
        }
        if self.snapshot.critical.is_empty() {
            let widget = Paragraph::new("✅ No critical components found")
                .block(Block::default().borders(Borders::ALL).title(" Critical "));
            frame.render_widget(widget, area);
            return;
        }

        let rows = self.snapshot.critical_rows().map(|r| {
            Row::new(vec![
                Cell::from(r.nomenclature.clone()),
                Cell::from(
                    r.stock
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(r.available_in.to_string()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(60),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ],
        )
        .header(
            Row::new(vec!["Nomenclature", "Stock", "Available In"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 🚨 Zero stock or not used anywhere "),
        );
        frame.render_widget(table, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = match &self.state.error_message {
            Some(err) => (err.clone(), Style::default().fg(DashColors::SHORT)),
            None => (
                self.state.status_message.clone(),
                Style::default().fg(DashColors::TEXT_PRIMARY),
            ),
        };
        let widget = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        frame.render_widget(widget, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = "q quit · Tab/1-6 pages · f focus filters · ↑↓ move · ←→ change filter · c clear · e export CSV";
        let widget = Paragraph::new(help).style(Style::default().fg(DashColors::TEXT_MUTED));
        frame.render_widget(widget, area);
    }
}

fn cycle_string(current: &mut Option<String>, values: &[String], forward: bool) {
    if values.is_empty() {
        return;
    }
    let count = values.len() + 1; // "All" plus every value
    let idx = current
        .as_ref()
        .and_then(|v| values.iter().position(|x| x == v))
        .map(|p| p + 1)
        .unwrap_or(0);
    let next = if forward {
        (idx + 1) % count
    } else {
        (idx + count - 1) % count
    };
    *current = if next == 0 {
        None
    } else {
        Some(values[next - 1].clone())
    };
}

fn cycle_index(current: &mut Option<usize>, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let count = len + 1;
    let idx = current.map(|p| p + 1).unwrap_or(0);
    let next = if forward {
        (idx + 1) % count
    } else {
        (idx + count - 1) % count
    };
    *current = if next == 0 { None } else { Some(next - 1) };
}

fn ranked_table<'a>(title: &'a str, entries: &'a [RankedComponent]) -> Table<'a> {
    let rows = entries.iter().map(|e| {
        Row::new(vec![
            Cell::from(e.nomenclature.as_str()),
            Cell::from(e.value.to_string()),
        ])
    });
    Table::new(rows, [Constraint::Percentage(80), Constraint::Percentage(20)])
        .header(Row::new(vec!["Component", "#"]).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(title))
}

fn means_chart<'a>(title: &'a str, means: &'a [GroupMean]) -> BarChart<'a> {
    let mut chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(6)
        .bar_gap(2);
    for group in means {
        let (value, text) = match group.mean {
            Some(m) => (m.round() as u64, format!("{:.1}", m)),
            None => (0, "-".to_string()),
        };
        let bar = Bar::default()
            .value(value)
            .text_value(text)
            .style(Style::default().fg(DashColors::ACCENT_BLUE));
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(truncate(&group.label, 8).to_string()))
                .bars(&[bar]),
        );
    }
    chart
}

fn no_data(title: &str) -> Paragraph<'static> {
    Paragraph::new("No data: the filtered table is empty. Press 'c' to clear filters.")
        .style(Style::default().fg(DashColors::WARNING))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
}

fn no_stage_columns(title: &str) -> Paragraph<'static> {
    Paragraph::new("No test-stage columns found: no header contains the stage marker.")
        .style(Style::default().fg(DashColors::WARNING))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
}

/// Sliding window over `items`: skip `scroll` rows, then show up to `cap`.
fn scroll_window<T>(items: &[T], scroll: usize, cap: usize) -> &[T] {
    let start = scroll.min(items.len());
    let end = (start + cap).min(items.len());
    &items[start..end]
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
