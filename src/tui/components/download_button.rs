use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::core::transcript::{DownloadOffer, DownloadStatus};
use crate::tui::components::message::AVATAR_COLUMN;
use crate::tui::components::option_row::{button_text, button_width, live_style};

/// Single-use "Download Complaint Report" button. Once pressed it shows the
/// outcome instead and stops responding.
pub struct DownloadButton<'a> {
    pub offer: &'a DownloadOffer,
    pub focused: bool,
    pub hovered: bool,
}

impl<'a> DownloadButton<'a> {
    pub const HEIGHT: u16 = 1;

    /// Whether a click at `x` (relative to the entry) lands on the button.
    pub fn contains(offer: &DownloadOffer, x: u16) -> bool {
        x >= AVATAR_COLUMN && x < AVATAR_COLUMN + button_width(offer.label())
    }

    fn style(&self) -> Style {
        match self.offer.status {
            DownloadStatus::Ready => live_style(self.focused, self.hovered),
            DownloadStatus::Saving => Style::default().fg(Color::Yellow),
            DownloadStatus::Saved(_) => Style::default().fg(Color::Green),
            DownloadStatus::Failed => Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
        }
    }
}

impl<'a> Widget for DownloadButton<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width <= AVATAR_COLUMN {
            return;
        }
        let mut spans = vec![Span::styled(button_text(self.offer.label()), self.style())];
        if let DownloadStatus::Saved(path) = &self.offer.status {
            spans.push(Span::styled(
                format!(" {}", path.display()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let target = Rect::new(
            area.x + AVATAR_COLUMN,
            area.y,
            area.width - AVATAR_COLUMN,
            Self::HEIGHT,
        );
        Line::from(spans).render(target, buf);
    }
}
