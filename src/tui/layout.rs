//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::runtime::{App, Screen};
use super::style;
use crate::api::types::{HealthResponse, PhysicsInfo};
use crate::status::ViewState;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(8),    // body
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.screen {
        Screen::Home => render_home(frame, app, chunks[1]),
        Screen::Dashboard => render_dashboard(frame, &app.view, chunks[1]),
    }
    render_footer(frame, app, chunks[2]);
}

/// Header bar: title, screen, poll state, platform badge.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let screen = match app.screen {
        Screen::Home => "home",
        Screen::Dashboard => "dashboard",
    };
    let state_color = match &app.view {
        ViewState::Loading => style::LOADING,
        ViewState::Ready { health, .. } => style::status_color(&health.status),
        ViewState::Error { .. } => style::STATUS_BAD,
    };

    let header = Line::from(vec![
        Span::styled(
            " URJA ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {screen} │ {} │ ", app.api_url)),
        Span::styled(
            app.view.label(),
            Style::default().fg(state_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            app.platform.css_class(),
            Style::default().fg(style::platform_color(app.platform)),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Home view: what the backend says about itself.
fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Physics-based grid intelligence",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("  backend:  {}", app.api_url)),
        Line::from(format!("  platform: {}", app.platform)),
        Line::from(""),
    ];

    match &app.service {
        None => lines.push(Line::from("  Fetching service description...")),
        Some(Err(message)) => lines.push(Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(style::STATUS_BAD),
        ))),
        Some(Ok(info)) => {
            lines.push(Line::from(vec![
                Span::raw(format!("  {} {} ", info.name, info.version)),
                Span::styled(
                    info.status.clone(),
                    Style::default().fg(style::status_color(&info.status)),
                ),
            ]));
            if !info.description.is_empty() {
                lines.push(Line::from(format!("  {}", info.description)));
            }
            lines.push(Line::from(""));
            for (name, state) in &info.capabilities {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {name:<24}"), Style::default().fg(style::KEY_FG)),
                    Span::raw(state.clone()),
                ]));
            }
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Home ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Dashboard view: all-or-nothing rendering of the poll state.
fn render_dashboard(frame: &mut Frame, view: &ViewState, area: Rect) {
    match view {
        ViewState::Loading => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "  Polling backend health and physics engine...",
                Style::default().fg(style::LOADING),
            )))
            .block(Block::default().title(" Dashboard ").borders(Borders::ALL));
            frame.render_widget(paragraph, area);
        }
        ViewState::Ready { health, physics } => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
            render_health(frame, health, chunks[0]);
            render_physics(frame, physics, chunks[1]);
        }
        ViewState::Error { message } => render_error(frame, message, area),
    }
}

fn render_health(frame: &mut Frame, health: &HealthResponse, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::raw("  overall: "),
        Span::styled(
            health.status.clone(),
            Style::default()
                .fg(style::status_color(&health.status))
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(version) = &health.version {
        lines.push(Line::from(format!("  version: {version}")));
    }
    if let Some(uptime) = health.uptime_seconds {
        lines.push(Line::from(format!("  uptime:  {uptime}s")));
    }
    lines.push(Line::from(""));
    for (name, component) in &health.components {
        lines.push(Line::from(vec![
            Span::styled(format!("  {name:<20}"), Style::default().fg(style::KEY_FG)),
            Span::styled(
                component.status.clone(),
                Style::default().fg(style::status_color(&component.status)),
            ),
        ]));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().title(" Health ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_physics(frame: &mut Frame, physics: &PhysicsInfo, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", physics.engine),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  {}", physics.purpose)),
        Line::from(""),
    ];
    for (name, value) in &physics.parameters {
        lines.push(Line::from(vec![
            Span::styled(format!("  {name:<32}"), Style::default().fg(style::KEY_FG)),
            Span::raw(value.to_string()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Physics Engine ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Single error panel; no partial data.
fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("  {message}"),
            Style::default()
                .fg(style::STATUS_BAD)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Press h to return home, r to retry."),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(style::STATUS_BAD)),
    );
    frame.render_widget(paragraph, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.screen {
        Screen::Home => " q:Quit  d:Dashboard  r:Refresh  Tab:Switch",
        Screen::Dashboard => " q:Quit  h:Home  r:Refresh  Tab:Switch",
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hint,
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
