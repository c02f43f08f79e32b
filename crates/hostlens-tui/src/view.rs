//! View function for the Elm Architecture (TEA) loop
//!
//! Rendering is a pure function of [`AppModel`]: layout comes from
//! [`Navigation`](crate::navigation::Navigation), content from the loaders.

use hostlens_api::{Anomaly, FeedbackVerdict, MetricCategory, MetricPoint, RootCauseReport};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph,
        Tabs, Wrap,
    },
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::feedback::{StatusKind, StatusMessage};
use crate::loader::LoadState;
use crate::model::{AppModel, InputMode};
use crate::navigation::Tab;

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;
const ERROR: Color = Color::Red;
const COMMENT_LABEL: &str = "Comment: ";

/// Main view function
pub fn render(frame: &mut Frame, model: &AppModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], model);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(model.navigation.sidebar_width()),
            Constraint::Min(20),
        ])
        .split(chunks[1]);

    render_sidebar(frame, body[0], model);
    match model.active_tab() {
        Tab::Dashboard => render_dashboard(frame, body[1], model),
        Tab::Analysis => render_analysis(frame, body[1], model),
    }

    render_status_bar(frame, chunks[2], model);
}

fn render_header(frame: &mut Frame, area: Rect, model: &AppModel) {
    let host = model
        .selected_host_label()
        .unwrap_or_else(|| "none".to_string());

    let line = Line::from(vec![
        Span::styled(
            "HostLens",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Monitoring & AI Analysis  "),
        Span::styled("Host: ", Style::default().fg(MUTED)),
        Span::raw(host),
        Span::styled("  Category: ", Style::default().fg(MUTED)),
        Span::raw(model.selection.category.as_str()),
        Span::styled("  Window: ", Style::default().fg(MUTED)),
        Span::raw(format!("{}h", model.settings.time_period_hours)),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

// Sidebar

fn render_sidebar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let nav = &model.navigation;

    if !nav.sidebar_open {
        let rail = Paragraph::new(Line::from(Span::styled(
            nav.toggle_glyph(),
            Style::default().fg(ACCENT),
        )))
        .block(Block::default().borders(Borders::RIGHT));
        frame.render_widget(rail, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", nav.toggle_glyph()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(Tab::ALL.len() as u16 + 1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(inner);

    let logo = Paragraph::new(vec![
        Line::from(Span::styled(
            "◆ HostLens",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("host monitoring", Style::default().fg(MUTED))),
    ]);
    frame.render_widget(logo, chunks[0]);

    let tab_lines: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let style = if *tab == nav.active_tab {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{} {}", tab.shortcut(), tab.title()), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(tab_lines), chunks[1]);

    render_host_list(frame, chunks[2], model);
    render_sidebar_footer(frame, chunks[3], model);
}

fn render_host_list(frame: &mut Frame, area: Rect, model: &AppModel) {
    let block = Block::default().borders(Borders::TOP).title("Hosts");
    let width = area.width.saturating_sub(4) as usize;

    match model.hosts.state() {
        LoadState::Loaded(hosts) if !hosts.is_empty() => {
            let selected = model.selection.host();
            let items: Vec<ListItem> = hosts
                .iter()
                .map(|host| {
                    let marker = if selected == Some(host.id.as_str()) { "● " } else { "  " };
                    ListItem::new(format!("{}{}", marker, truncate(&host.display_name, width)))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let mut state = ListState::default().with_selected(Some(model.host_cursor));
            frame.render_stateful_widget(list, area, &mut state);
        }
        state => {
            let line = match state {
                LoadState::Loading => Line::from("Loading hosts..."),
                LoadState::Failed(message) => {
                    Line::from(Span::styled(message.clone(), Style::default().fg(ERROR)))
                }
                LoadState::Loaded(_) => Line::from("No hosts found"),
                LoadState::Idle => Line::from("Press h to load hosts"),
            };
            frame.render_widget(
                Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
                area,
            );
        }
    }
}

fn render_sidebar_footer(frame: &mut Frame, area: Rect, model: &AppModel) {
    let (status, color) = backend_status(model);
    let width = area.width.saturating_sub(4) as usize;

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(MUTED),
        )),
        Line::from(truncate(&model.settings.api_url, width)),
        Line::from(vec![
            Span::raw("Backend: "),
            Span::styled(status, Style::default().fg(color)),
        ]),
    ]);
    frame.render_widget(footer, area);
}

/// Backend reachability as last observed through the host list
pub fn backend_status(model: &AppModel) -> (&'static str, Color) {
    match model.hosts.state() {
        LoadState::Idle => ("unknown", MUTED),
        LoadState::Loading => ("connecting", Color::Yellow),
        LoadState::Loaded(_) => ("online", Color::Green),
        LoadState::Failed(_) => ("unreachable", ERROR),
    }
}

// Dashboard tab

fn render_dashboard(frame: &mut Frame, area: Rect, model: &AppModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let selectors = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    let host_line = match model.selected_host_label() {
        Some(label) => Line::from(label),
        None => Line::from(Span::styled(
            "↑/↓ + Enter to pick a host",
            Style::default().fg(MUTED),
        )),
    };
    frame.render_widget(
        Paragraph::new(host_line).block(Block::default().borders(Borders::ALL).title("Host")),
        selectors[0],
    );

    let categories = Tabs::new(MetricCategory::ALL.iter().map(|c| c.as_str()))
        .select(
            MetricCategory::ALL
                .iter()
                .position(|c| *c == model.selection.category)
                .unwrap_or(0),
        )
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Category ←/→"));
    frame.render_widget(categories, selectors[1]);

    render_chart(frame, chunks[1], model);
}

fn render_chart(frame: &mut Frame, area: Rect, model: &AppModel) {
    let title = match model.chart.key() {
        Some(key) => format!(" {} · host {} ", key.category, key.host_id),
        None => " Metrics ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let message = match model.chart.state() {
        LoadState::Idle if model.selection.host().is_none() => {
            Line::from("Select a host from the sidebar")
        }
        LoadState::Idle => Line::from(format!(
            "Press l to load {} metrics",
            model.selection.category
        )),
        LoadState::Loading => Line::from("Loading chart..."),
        LoadState::Failed(message) => Line::from(Span::styled(
            format!("Error: {}", message),
            Style::default().fg(ERROR),
        )),
        LoadState::Loaded(points) if points.is_empty() => Line::from("No chart data available"),
        LoadState::Loaded(points) => {
            let name = model
                .chart
                .key()
                .map(|k| k.category.to_string())
                .unwrap_or_default();
            render_series(frame, area, block, &name, points);
            return;
        }
    };

    frame.render_widget(
        Paragraph::new(message).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Chart-ready form of a metric time series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub data: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

/// Plot samples in arrival order, labelling the axis with their timestamps
pub fn chart_series(points: &[MetricPoint]) -> ChartSeries {
    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();

    let (min, max) = points
        .iter()
        .map(|p| p.value)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let (min, max) = if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    };

    let last = points.len().saturating_sub(1);
    let mut x_labels: Vec<String> = match points {
        [] => Vec::new(),
        [only] => vec![only.timestamp.to_string()],
        _ => vec![
            points[0].timestamp.to_string(),
            points[last / 2].timestamp.to_string(),
            points[last].timestamp.to_string(),
        ],
    };
    x_labels.dedup();

    ChartSeries {
        data,
        x_bounds: [0.0, last.max(1) as f64],
        y_bounds: [min, max],
        x_labels,
        y_labels: vec![
            format!("{:.1}", min),
            format!("{:.1}", (min + max) / 2.0),
            format!("{:.1}", max),
        ],
    }
}

fn render_series(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    name: &str,
    points: &[MetricPoint],
) {
    let series = chart_series(points);
    let datasets = vec![Dataset::default()
        .name(name.to_string())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(ACCENT))
        .data(&series.data)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(MUTED))
                .bounds(series.x_bounds)
                .labels(series.x_labels.iter().cloned().map(Span::raw).collect::<Vec<_>>()),
        )
        .y_axis(
            Axis::default()
                .title("Value")
                .style(Style::default().fg(MUTED))
                .bounds(series.y_bounds)
                .labels(series.y_labels.iter().cloned().map(Span::raw).collect::<Vec<_>>()),
        );

    frame.render_widget(chart, area);
}

// Analysis tab

fn render_analysis(frame: &mut Frame, area: Rect, model: &AppModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Min(7),
        ])
        .split(area);

    render_anomalies(frame, chunks[0], model);
    render_root_cause(frame, chunks[1], model);
    render_feedback(frame, chunks[2], model);
}

fn render_anomalies(frame: &mut Frame, area: Rect, model: &AppModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Anomaly Detection (a) ");

    let lines = match model.anomalies.state() {
        LoadState::Idle => vec![idle_line(model, "a", "detect anomalies")],
        LoadState::Loading => vec![Line::from("Detecting anomalies...")],
        LoadState::Failed(message) => vec![error_line(message)],
        LoadState::Loaded(report) if report.is_empty() => vec![Line::from(Span::styled(
            "No anomalies detected",
            Style::default().fg(Color::Green),
        ))],
        LoadState::Loaded(report) => report.anomalies.iter().flat_map(anomaly_lines).collect(),
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn anomaly_lines(anomaly: &Anomaly) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                anomaly.metric.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                anomaly.severity.clone(),
                Style::default().fg(severity_color(&anomaly.severity)),
            ),
        ]),
        labelled("Cause", &anomaly.cause),
        labelled("Action", &anomaly.action),
        Line::from(""),
    ]
}

/// Colour for a backend severity label
pub fn severity_color(severity: &str) -> Color {
    match severity.to_ascii_lowercase().as_str() {
        "critical" | "high" => ERROR,
        "medium" | "warning" => Color::Yellow,
        _ => Color::Green,
    }
}

fn render_root_cause(frame: &mut Frame, area: Rect, model: &AppModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Root Cause Analysis (r) ");

    let lines = match model.root_cause.state() {
        LoadState::Idle => vec![idle_line(model, "r", "analyze the root cause")],
        LoadState::Loading => vec![Line::from("Analyzing root cause...")],
        LoadState::Failed(message) => vec![error_line(message)],
        LoadState::Loaded(report) => root_cause_lines(report),
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn root_cause_lines(report: &RootCauseReport) -> Vec<Line<'static>> {
    let mut lines = vec![
        labelled("Root cause", &report.root_cause),
        labelled("Confidence", &report.confidence.to_string()),
    ];
    if !report.evidence.is_empty() {
        lines.push(Line::from(Span::styled("Evidence", Style::default().fg(MUTED))));
        lines.extend(
            report
                .evidence
                .iter()
                .map(|item| Line::from(format!("  • {}", item))),
        );
    }
    lines.push(labelled("Recommendation", &report.recommendation));
    lines
}

fn render_feedback(frame: &mut Frame, area: Rect, model: &AppModel) {
    let editing = model.input_mode == InputMode::EditingComment;
    let border = if editing { Color::Yellow } else { Color::Reset };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Feedback ");
    let inner = block.inner(area);

    let form = &model.feedback;
    let verdict = |v: FeedbackVerdict, label: &'static str| {
        let mark = if form.verdict == v { "[x] " } else { "[ ] " };
        Span::raw(format!("{}{}  ", mark, label))
    };

    let mut lines = vec![
        Line::from(vec![
            verdict(FeedbackVerdict::Correct, "Correct"),
            verdict(FeedbackVerdict::Incorrect, "Incorrect"),
            Span::styled("(f)", Style::default().fg(MUTED)),
        ]),
        Line::from(vec![
            Span::styled(COMMENT_LABEL, Style::default().fg(MUTED)),
            Span::raw(form.comment.clone()),
        ]),
        Line::from(Span::styled(
            if editing {
                "Enter submit · Esc done"
            } else {
                "i edit comment · s submit"
            },
            Style::default().fg(MUTED),
        )),
    ];
    if let Some(status) = &form.status {
        lines.push(status_line(status));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if editing && inner.width > 0 && inner.height > 1 {
        let offset = (COMMENT_LABEL.width() + form.comment.width()) as u16;
        let x = inner.x + offset.min(inner.width - 1);
        frame.set_cursor_position(Position::new(x, inner.y + 1));
    }
}

// Status bar

fn render_status_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let line = match &model.notice {
        Some(notice) => status_line(notice),
        None => Line::from(Span::styled(key_hints(model), Style::default().fg(MUTED))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(model: &AppModel) -> &'static str {
    match (model.input_mode, model.active_tab()) {
        (InputMode::EditingComment, _) => "typing comment · Enter submit · Esc done",
        (_, Tab::Dashboard) => "q quit · Tab switch · b sidebar · ↑↓ Enter host · ←→ category · l load · h hosts",
        (_, Tab::Analysis) => "q quit · Tab switch · b sidebar · a anomalies · r root cause · f verdict · i comment · s submit",
    }
}

// Helpers

fn idle_line(model: &AppModel, key: &str, action: &str) -> Line<'static> {
    if model.selection.host().is_none() {
        Line::from(Span::styled(
            "Select a host first",
            Style::default().fg(MUTED),
        ))
    } else {
        Line::from(format!("Press {} to {}", key, action))
    }
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("Error: {}", message),
        Style::default().fg(ERROR),
    ))
}

fn labelled(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(MUTED)),
        Span::raw(value.to_string()),
    ])
}

fn status_line(status: &StatusMessage) -> Line<'static> {
    let color = match status.kind {
        StatusKind::Info => ACCENT,
        StatusKind::Success => Color::Green,
        StatusKind::Error => ERROR,
    };
    Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
}

/// Cut `text` to at most `max` columns, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
