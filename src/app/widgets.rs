// SPDX-License-Identifier: GPL-3.0-only

//! Terminal widgets for the dashboard
//!
//! Camera frames are drawn with Unicode half-block characters so each cell
//! carries two vertical pixels.

use super::Readout;
use super::utils::StatusLevel;
use crate::backends::camera::VideoFrame;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Renders a video frame, or a centered placeholder when there is none
pub struct FrameWidget<'a> {
    pub frame: Option<&'a VideoFrame>,
    pub placeholder: &'a str,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let Some(frame) = self.frame.filter(|f| f.width > 0 && f.height > 0) else {
            let x = area.x + area.width.saturating_sub(self.placeholder.chars().count() as u16) / 2;
            let y = area.y + area.height / 2;
            buf.set_stringn(
                x,
                y,
                self.placeholder,
                area.width as usize,
                Style::default().fg(Color::Gray),
            );
            return;
        };

        let (display_width, display_height) = fit_half_blocks(frame, area);
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + area.width.saturating_sub(display_width) / 2;
        let y_offset = area.y + area.height.saturating_sub(display_height) / 2;

        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height as f64 * 2.0);

        // Upper pixel is the foreground of '▀', lower pixel the background
        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (r, g, b) = frame.rgb_at(src_x, src_top);
                let top = Color::Rgb(r, g, b);
                let (r, g, b) = frame.rgb_at(src_x, src_bottom);
                let bottom = Color::Rgb(r, g, b);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(top);
                    cell.set_bg(bottom);
                }
            }
        }
    }
}

/// Largest cell size that keeps the frame's aspect ratio inside `area`
fn fit_half_blocks(frame: &VideoFrame, area: Rect) -> (u16, u16) {
    let frame_aspect = frame.width as f64 / frame.height as f64;
    let term_width = area.width as f64;
    let term_height = area.height as f64 * 2.0;

    if term_width / term_height > frame_aspect {
        let w = term_height * frame_aspect;
        ((w as u16).min(area.width), area.height)
    } else {
        let h = term_width / frame_aspect;
        (area.width, ((h / 2.0) as u16).min(area.height))
    }
}

/// One-line bar with key hints or help
pub struct StatusBar<'a> {
    pub message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }
        buf.set_stringn(area.x, area.y, self.message, area.width as usize, style);
    }
}

/// Compact `label ██████░░░░ 85%` gauge colored by health band
pub struct LevelGauge<'a> {
    pub label: &'a str,
    pub percent: u8,
}

impl LevelGauge<'_> {
    const BAR_CELLS: u16 = 10;
}

impl Widget for LevelGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let color = StatusLevel::from_percent(self.percent).color();
        let percent = self.percent.min(100) as u16;
        let filled = percent * Self::BAR_CELLS / 100;

        let mut x = area.x;
        let right = area.x + area.width;
        let (after_label, _) = buf.set_stringn(
            x,
            area.y,
            format!("{} ", self.label),
            area.width as usize,
            Style::default().fg(Color::Gray),
        );
        x = after_label;

        for i in 0..Self::BAR_CELLS {
            if x >= right {
                return;
            }
            let (symbol, fg) = if i < filled {
                ('█', color)
            } else {
                ('░', Color::DarkGray)
            };
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(symbol);
                cell.set_fg(fg);
            }
            x += 1;
        }

        if x < right {
            buf.set_stringn(
                x,
                area.y,
                format!(" {}%", self.percent),
                (right - x) as usize,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Two-line tile: small label above a bold value
pub struct ReadoutTile<'a> {
    pub readout: &'a Readout,
}

impl Widget for ReadoutTile<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let width = area.width as usize;
        buf.set_stringn(
            area.x,
            area.y,
            self.readout.label,
            width,
            Style::default().fg(Color::Gray),
        );
        if area.height > 1 {
            buf.set_stringn(
                area.x,
                area.y + 1,
                &self.readout.value,
                width,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::virtual_camera::test_pattern;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_placeholder_without_frame() {
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        FrameWidget {
            frame: None,
            placeholder: "Camera off",
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 2).contains("Camera off"));
    }

    #[test]
    fn test_frame_uses_half_blocks() {
        let frame = test_pattern(64, 48, 0);
        let area = Rect::new(0, 0, 16, 6);
        let mut buf = Buffer::empty(area);
        FrameWidget {
            frame: Some(&frame),
            placeholder: "",
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 3).contains('▀'));
    }

    #[test]
    fn test_fit_keeps_aspect_within_area() {
        let frame = test_pattern(640, 480, 0);
        let (w, h) = fit_half_blocks(&frame, Rect::new(0, 0, 200, 20));
        assert_eq!(h, 20);
        assert!(w <= 200);
        assert_eq!(w, 53);
    }

    #[test]
    fn test_gauge_shows_percent() {
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        LevelGauge {
            label: "Battery",
            percent: 85,
        }
        .render(area, &mut buf);

        let text = row_text(&buf, 0);
        assert!(text.starts_with("Battery "));
        assert!(text.contains("85%"));
        assert_eq!(text.matches('█').count(), 8);
    }
}
