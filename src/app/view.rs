// SPDX-License-Identifier: GPL-3.0-only

//! Dashboard layout
//!
//! ```text
//! ┌ DC  Drone Command Center ─ ● Live Connection ─ Flight Time ─ Battery ─ Signal ┐
//! ├──────────────────────────────────────────────┬─────────────────────────────────┤
//! │ REC · video mode · UTC clock                 │ Flight Statistics               │
//! │                camera frame                  │   Distance / Max Alt            │
//! │ Altitude · Speed · Wind · Heading            │   Max Speed / Storage           │
//! ├──────────────────────────────────────────────┤                                 │
//! │ [recording button]   [webcam button]         │                                 │
//! └──────────────────────────────────────────────┴─────────────────────────────────┘
//!  key hints
//! ```

use super::widgets::{FrameWidget, LevelGauge, ReadoutTile, StatusBar};
use super::{Dashboard, format_flight_time, recording_button_labels, webcam_button_labels};
use crate::backends::camera::{Notification, SessionState};
use crate::constants::{telemetry, ui};
use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

const SIDE_PANEL_WIDTH: u16 = 30;
const CONTROLS_HEIGHT: u16 = 4;

/// Draw the whole dashboard. `now` drives the overlay clock.
pub fn render(frame: &mut Frame, dashboard: &Dashboard, now: DateTime<Utc>) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, dashboard);

    let [main, side] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(SIDE_PANEL_WIDTH)]).areas(body);
    let [video, controls] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(CONTROLS_HEIGHT)]).areas(main);

    render_video(frame, video, dashboard, now);
    render_controls(frame, controls, dashboard);
    render_statistics(frame, side, dashboard);

    let hints = if dashboard.state().show_help {
        "r: Toggle recording | w: Start/stop webcam | Enter/Esc: Dismiss alert | h: Toggle help | q/Ctrl+C: Quit"
    } else {
        "'r' record | 'w' webcam | 'h' help | 'q' quit"
    };
    frame.render_widget(StatusBar { message: hints }, status);

    if let Some(alert) = dashboard.state().current_alert() {
        render_alert(frame, frame.area(), alert);
    }
}

fn render_header(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title, connection, clock, battery, signal] = Layout::horizontal([
        Constraint::Min(26),
        Constraint::Length(18),
        Constraint::Length(23),
        Constraint::Length(22),
        Constraint::Length(21),
    ])
    .areas(inner);

    let title_line = Line::from(vec![
        Span::styled(
            format!(" {} ", ui::BADGE),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(ui::TITLE, Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(title_line), title);

    let connection_line = Line::from(vec![
        Span::styled("● ", Style::default().fg(Color::Green)),
        Span::raw(ui::LIVE_CONNECTION),
    ]);
    frame.render_widget(Paragraph::new(connection_line), connection);

    let clock_line = Line::from(vec![
        Span::styled("Flight Time ", Style::default().fg(Color::Gray)),
        Span::styled(
            format_flight_time(dashboard.elapsed_seconds()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(clock_line), clock);

    let snapshot = dashboard.telemetry();
    frame.render_widget(
        LevelGauge {
            label: "Battery",
            percent: snapshot.battery_percent,
        },
        battery,
    );
    frame.render_widget(
        LevelGauge {
            label: "Signal",
            percent: snapshot.signal_percent,
        },
        signal,
    );
}

fn render_video(frame: &mut Frame, area: Rect, dashboard: &Dashboard, now: DateTime<Utc>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Live Feed ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [top, picture, bottom] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    let mut overlay = Vec::new();
    if dashboard.state().recording {
        overlay.push(Span::styled(
            format!(" ● {} ", telemetry::RECORDING_BADGE),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ));
        overlay.push(Span::raw(" "));
    }
    overlay.push(Span::styled(
        telemetry::VIDEO_MODE,
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(Paragraph::new(Line::from(overlay)), top);
    frame.render_widget(
        Paragraph::new(now.format("%H:%M:%S UTC").to_string()).alignment(Alignment::Right),
        top,
    );

    let placeholder = match dashboard.session_state() {
        SessionState::Idle => ui::CAMERA_OFF,
        SessionState::Requesting | SessionState::Active => ui::WAITING_FOR_CAMERA,
    };
    match dashboard.preview().lock() {
        Ok(preview) => frame.render_widget(
            FrameWidget {
                frame: preview.latest(),
                placeholder,
            },
            picture,
        ),
        Err(_) => frame.render_widget(
            FrameWidget {
                frame: None,
                placeholder,
            },
            picture,
        ),
    }

    let readouts = dashboard.telemetry().feed_readouts();
    let tiles = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(bottom);
    for (readout, tile) in readouts.iter().zip(tiles.iter()) {
        frame.render_widget(ReadoutTile { readout }, *tile);
    }
}

fn render_controls(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let [recording, webcam] =
        Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(area);

    let (title, subtitle) = recording_button_labels(dashboard.state().recording);
    let accent = if dashboard.state().recording {
        Color::Red
    } else {
        Color::Gray
    };
    render_button(frame, recording, "r", title, subtitle, accent);

    let session = dashboard.session_state();
    let (title, subtitle) = webcam_button_labels(session);
    let accent = match session {
        SessionState::Active => Color::Green,
        SessionState::Requesting => Color::Yellow,
        SessionState::Idle => Color::Gray,
    };
    render_button(frame, webcam, "w", title, subtitle, accent);
}

fn render_button(
    frame: &mut Frame,
    area: Rect,
    key: &str,
    title: &str,
    subtitle: &str,
    accent: Color,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", key), Style::default().fg(Color::DarkGray)),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::styled(subtitle, Style::default().fg(accent)),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_statistics(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Flight Statistics ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stats = dashboard.telemetry().flight_statistics();
    let rows = Layout::vertical([Constraint::Length(3); 2]).split(inner);
    for (pair, row) in stats.chunks(2).zip(rows.iter()) {
        let cols = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(*row);
        for (readout, col) in pair.iter().zip(cols.iter()) {
            frame.render_widget(ReadoutTile { readout }, *col);
        }
    }
}

fn render_alert(frame: &mut Frame, area: Rect, alert: &Notification) {
    let popup = centered(area, 56, 7);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(alert.message.as_str())];
    if let Some(detail) = &alert.detail {
        lines.push(Line::styled(
            detail.as_str(),
            Style::default().fg(Color::Gray),
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Press Enter to dismiss",
        Style::default().fg(Color::DarkGray),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {} ", alert.title));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Message, MountOptions};
    use crate::backends::camera::CaptureError;
    use crate::backends::camera::virtual_camera::VirtualCameraBackend;
    use chrono::TimeZone;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    fn screen(dashboard: &Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(130, 30)).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 14, 30, 5).unwrap();
        terminal.draw(|f| render(f, dashboard, now)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn idle() -> Dashboard {
        Dashboard::mount(
            Arc::new(VirtualCameraBackend::new()),
            MountOptions {
                autostart_camera: false,
                ..Default::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_layout() {
        let text = screen(&idle());
        assert!(text.contains(ui::TITLE));
        assert!(text.contains("Flight Time 00:00:00"));
        assert!(text.contains("14:30:05 UTC"));
        assert!(text.contains("Start Recording"));
        assert!(text.contains("Disconnected"));
        assert!(text.contains(ui::CAMERA_OFF));
        assert!(text.contains("Flight Statistics"));
        assert!(text.contains("64.2 GB"));
        assert!(!text.contains("REC "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recording_badge() {
        let mut dashboard = idle();
        dashboard.update(Message::ToggleRecording);
        let text = screen(&dashboard);
        assert!(text.contains(telemetry::RECORDING_BADGE));
        assert!(text.contains("Recording..."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_modal() {
        let backend = Arc::new(VirtualCameraBackend::new());
        backend.fail_next(CaptureError::NoDevice);
        let mut dashboard = Dashboard::mount(backend, MountOptions::default());
        dashboard.settle_capture().await;

        let text = screen(&dashboard);
        assert!(text.contains(ui::CAPTURE_FAILED_TITLE));
        assert!(text.contains("Press Enter to dismiss"));
    }
}
