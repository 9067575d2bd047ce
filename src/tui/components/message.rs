use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::avatar::MAX_AVATAR_WIDTH;
use crate::core::transcript::Sender;
use crate::tui::component::Component;

/// Columns reserved for the avatar plus a one-column gap.
pub const AVATAR_COLUMN: u16 = MAX_AVATAR_WIDTH as u16 + 1;
/// Columns kept free on the side opposite the avatar, so bubbles read as left/right.
const FAR_GUTTER: u16 = 6;
/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A chat bubble with the sender's avatar beside it.
///
/// Bot bubbles sit on the left with the avatar before them, user bubbles on the
/// right with the avatar after them. Bubbles shrink to fit short messages.
///
/// `Message` is transient: built each frame by `MessageList` with the data it
/// needs. Text is wrapped once with `textwrap` and drawn line by line, so
/// [`calculate_height`](Self::calculate_height) is exact.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub text: &'a str,
    pub sender: Sender,
    pub avatar: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(text: &'a str, sender: Sender, avatar: &'a str) -> Self {
        Self {
            text,
            sender,
            avatar,
        }
    }

    /// Height of the bubble at the given entry width.
    pub fn calculate_height(text: &str, width: u16) -> u16 {
        let content_width = max_content_width(width);
        if content_width == 0 {
            // Terminal too narrow for borders + padding; still occupy a row.
            return 1;
        }
        (wrap(text, content_width).len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn style(&self) -> Style {
        match self.sender {
            Sender::Bot => Style::default().fg(Color::Blue),
            Sender::User => Style::default().fg(Color::Green),
        }
    }
}

fn max_content_width(width: u16) -> u16 {
    width
        .saturating_sub(AVATAR_COLUMN + FAR_GUTTER)
        .saturating_sub(HORIZONTAL_OVERHEAD)
}

fn wrap(text: &str, content_width: u16) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    let options = textwrap::Options::new(content_width as usize).break_words(true);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = max_content_width(area.width);
        if content_width == 0 {
            return;
        }

        let lines = wrap(self.text, content_width);
        let widest = lines
            .iter()
            .map(|l| textwrap::core::display_width(l) as u16)
            .max()
            .unwrap_or(0)
            .max(1);
        let bubble_width = widest + HORIZONTAL_OVERHEAD;

        let (bubble_x, avatar_x) = match self.sender {
            Sender::Bot => (area.x + AVATAR_COLUMN, area.x),
            Sender::User => {
                let right = area.x + area.width;
                (
                    right.saturating_sub(AVATAR_COLUMN + bubble_width),
                    right.saturating_sub(MAX_AVATAR_WIDTH as u16),
                )
            }
        };

        let style = self.style();
        let avatar_area = Rect::new(avatar_x, area.y + 1, MAX_AVATAR_WIDTH as u16, 1);
        Line::styled(self.avatar, style.add_modifier(Modifier::BOLD)).render(avatar_area, buf);

        let bubble_area = Rect::new(bubble_x, area.y, bubble_width, area.height);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner_area = block.inner(bubble_area);
        block.render(bubble_area, buf);

        let text: Text = lines.into_iter().map(Line::from).collect();
        Paragraph::new(text).style(style).render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
