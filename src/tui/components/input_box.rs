//! # InputBox Component
//!
//! Free-text entry with a Send button.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, backspace)
//! - Emit `Submit` on Enter or a Send click when the buffer has content
//! - Show a placeholder describing what the bot expects
//!
//! ## State Management
//!
//! The buffer is internal state. `enabled` and `placeholder` are props synced
//! from the dialogue every frame: the field and the Send button are disabled
//! whenever the bot is waiting on a button press, and for good once the chat
//! has ended. Edits while disabled are ignored but the buffer is kept.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows taken by the box: one line of text plus borders.
pub const HEIGHT: u16 = 3;
const SEND_LABEL: &str = "[ Send ]";
const SEND_WIDTH: u16 = 8;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter or Send)
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether typing and sending are allowed (Prop)
    pub enabled: bool,
    /// Hint shown while the buffer is empty (Prop)
    pub placeholder: String,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            enabled: true,
            placeholder: String::new(),
        }
    }

    /// Split the box into text and Send button areas.
    pub fn areas(area: Rect) -> (Rect, Rect) {
        let [text_area, send_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(SEND_WIDTH)]).areas(area);
        (text_area, send_area)
    }

    /// Whether a click at screen position `(x, y)` lands on the Send button.
    pub fn is_send_hit(area: Rect, x: u16, y: u16) -> bool {
        let (_, send_area) = Self::areas(area);
        send_area.contains((x, y).into())
    }

    /// Take the buffer for submission, if it has content and sending is allowed.
    pub fn take_submission(&mut self) -> Option<String> {
        if !self.enabled || self.buffer.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.buffer))
    }

    /// Tail of the buffer that fits in `width` columns, plus its display width.
    fn visible_tail(&self, width: u16) -> (&str, u16) {
        let mut used = 0u16;
        let mut start = self.buffer.len();
        for (i, c) in self.buffer.char_indices().rev() {
            let w = c.width().unwrap_or(0) as u16;
            if used + w > width {
                break;
            }
            used += w;
            start = i;
        }
        (&self.buffer[start..], used)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (text_area, send_area) = Self::areas(area);

        let (text_style, border_style) = if self.enabled {
            (
                Style::default().fg(Color::Green),
                Style::default(),
            )
        } else {
            let grey = Style::default().fg(Color::DarkGray);
            (grey, grey.add_modifier(Modifier::DIM))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title("Message");
        let inner = block.inner(text_area);

        let (visible, visible_width) = self.visible_tail(inner.width.saturating_sub(1));
        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(Span::styled(
                self.placeholder.as_str(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Paragraph::new(Span::styled(visible, text_style))
        };
        frame.render_widget(paragraph.block(block), text_area);

        let send_style = if self.enabled && !self.buffer.trim().is_empty() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        };
        let send_row = Rect::new(send_area.x, send_area.y + 1, send_area.width, 1);
        frame.render_widget(Span::styled(SEND_LABEL, send_style), send_row);

        if self.enabled {
            let cursor_x = if self.buffer.is_empty() { 0 } else { visible_width };
            frame.set_cursor_position((inner.x + cursor_x, inner.y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.enabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) if !c.is_control() => {
                self.buffer.push(*c);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field
                let line: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .filter(|c| !c.is_control())
                    .collect();
                self.buffer.push_str(&line);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => self.buffer.pop().map(|_| InputEvent::ContentChanged),
            TuiEvent::Submit => self.take_submission().map(InputEvent::Submit),
            _ => None,
        }
    }
}
