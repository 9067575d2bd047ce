//! # OptionRow Component
//!
//! A row of reply buttons under a bot prompt. Live rows are clickable and
//! focusable; resolved rows stay on screen greyed out, with the chosen button
//! highlighted.
//!
//! Button geometry comes from [`button_rects`], which both rendering and
//! mouse hit testing use so they can never disagree.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::core::transcript::OptionSet;
use crate::tui::components::message::AVATAR_COLUMN;

/// Gap between adjacent buttons.
const BUTTON_GAP: u16 = 1;

/// `[ label ]`
pub fn button_text(label: &str) -> String {
    format!("[ {label} ]")
}

pub fn button_width(label: &str) -> u16 {
    button_text(label).width() as u16
}

/// Lay out buttons left to right from the avatar column, wrapping to a new row
/// when the next button doesn't fit. Rects are relative to the entry's origin.
pub fn button_rects(labels: &[String], width: u16) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(labels.len());
    let mut x = AVATAR_COLUMN;
    let mut y = 0u16;
    for label in labels {
        let w = button_width(label);
        if x > AVATAR_COLUMN && x + w > width {
            x = AVATAR_COLUMN;
            y += 1;
        }
        rects.push(Rect::new(x, y, w.min(width.saturating_sub(x)), 1));
        x += w + BUTTON_GAP;
    }
    rects
}

/// Rows needed for a set of buttons.
pub fn calculate_height(labels: &[String], width: u16) -> u16 {
    button_rects(labels, width)
        .last()
        .map(|r| r.y + 1)
        .unwrap_or(0)
        .max(1)
}

/// Index of the button at a point relative to the entry's origin.
pub fn button_at(labels: &[String], width: u16, x: u16, y: u16) -> Option<usize> {
    button_rects(labels, width)
        .iter()
        .position(|r| y == r.y && x >= r.x && x < r.x + r.width)
}

/// Style for a button that can still be pressed.
pub fn live_style(focused: bool, hovered: bool) -> Style {
    let base = Style::default().fg(Color::Cyan);
    if focused {
        base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else if hovered {
        base.add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

pub struct OptionRow<'a> {
    pub set: &'a OptionSet,
    /// Focused button index, if focus is in this row.
    pub focused: Option<usize>,
    pub hovered: Option<usize>,
}

impl<'a> OptionRow<'a> {
    fn style_for(&self, index: usize) -> Style {
        if self.set.is_live() {
            live_style(self.focused == Some(index), self.hovered == Some(index))
        } else if self.set.chosen == Some(index) {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        }
    }
}

impl<'a> Widget for OptionRow<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, (label, rect)) in self
            .set
            .labels
            .iter()
            .zip(button_rects(&self.set.labels, area.width))
            .enumerate()
        {
            if rect.y >= area.height || rect.width == 0 {
                continue;
            }
            let target = Rect::new(area.x + rect.x, area.y + rect.y, rect.width, 1);
            Span::styled(button_text(label), self.style_for(index)).render(target, buf);
        }
    }
}
