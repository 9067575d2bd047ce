//! # TitleBar Component
//!
//! Top status bar: company name, conversation state, status message, and a
//! "↓ New" marker when there is transcript content below the viewport.
//!
//! Stateless. Everything it shows is passed in as props:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     app.company_name.clone(),
//!     app.dialogue.state(),
//!     app.status_message.clone(),
//!     has_unseen_content,
//! );
//! title_bar.render(frame, title_area);
//! ```
//!
//! The text degrades in priority order so the most important part survives on
//! narrow terminals:
//!
//! 1. `"Company Support [main_menu] | Connected | ↓ New"`
//! 2. `"Company Support [main_menu] | Connected"`
//! 3. `"Company Support [main_menu]"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::core::state::ConversationState;
use crate::tui::component::Component;

pub struct TitleBar {
    pub company_name: String,
    pub state: ConversationState,
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        company_name: String,
        state: ConversationState,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            company_name,
            state,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let head = format!("{} Support [{}]", self.company_name, self.state);
        match (self.status_message.is_empty(), self.has_unseen_content) {
            (_, true) => format!("{head} | {} | ↓ New", self.status_message),
            (true, false) => head,
            (false, false) => format!("{head} | {}", self.status_message),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = if self.state == ConversationState::Ended {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Span::styled(self.text(), style), area);
    }
}
