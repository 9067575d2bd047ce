//! # Application State
//!
//! Core business state for deskbot. Domain logic only, no TUI-specific types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── dialogue: Dialogue          // state machine + transcript + cue queue
//! ├── bot_avatar: Avatar          // left of bot bubbles
//! ├── user_avatar: Avatar         // right of user bubbles
//! ├── company_name: String        // title bar / report header
//! └── status_message: String      // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::fmt;

use crate::core::avatar::Avatar;
use crate::core::config::ResolvedConfig;
use crate::core::dialogue::Dialogue;

/// Where the conversation currently is. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// Bookkeeping waypoint: the next input (or the pending menu cue) opens the main menu.
    #[default]
    Initial,
    MainMenu,
    InquiryTopic,
    ComplaintTopic,
    ComplaintDetailsPending,
    /// Terminal. Nothing leaves this state.
    Ended,
}

impl ConversationState {
    pub fn label(&self) -> &'static str {
        match self {
            ConversationState::Initial => "initial",
            ConversationState::MainMenu => "main_menu",
            ConversationState::InquiryTopic => "inquiry_topic",
            ConversationState::ComplaintTopic => "complaint_topic",
            ConversationState::ComplaintDetailsPending => "complaint_details_pending",
            ConversationState::Ended => "ended",
        }
    }

    /// Free-text entry is only open while the engine expects typed text.
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            ConversationState::Initial | ConversationState::ComplaintDetailsPending
        )
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The complaint being collected. Filled across two states, then cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintRecord {
    /// Complaint type as chosen by the user (e.g. "Billing Issue").
    pub kind: String,
    pub details: String,
    pub ticket: String,
}

impl ComplaintRecord {
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.details.is_empty() && self.ticket.is_empty()
    }
}

pub struct App {
    pub dialogue: Dialogue,
    pub bot_avatar: Avatar,
    pub user_avatar: Avatar,
    pub company_name: String,
    pub status_message: String,
}

impl App {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut dialogue = Dialogue::new(config.script(), config.timing);
        dialogue.start();
        Self {
            dialogue,
            bot_avatar: Avatar::load(&config.bot_avatar),
            user_avatar: Avatar::load(&config.user_avatar),
            company_name: config.company_name.clone(),
            status_message: String::from("Connected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_from_config_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Connected");
        assert_eq!(app.company_name, "Company");
        assert_eq!(app.dialogue.state(), ConversationState::Initial);
        assert_eq!(app.bot_avatar.glyph(), "BOT");
    }

    #[test]
    fn test_only_text_states_accept_text() {
        use ConversationState::*;
        assert!(Initial.accepts_text());
        assert!(ComplaintDetailsPending.accepts_text());
        for state in [MainMenu, InquiryTopic, ComplaintTopic, Ended] {
            assert!(!state.accepts_text(), "{state} should not accept text");
        }
    }

    #[test]
    fn test_record_is_empty() {
        assert!(ComplaintRecord::default().is_empty());
        let record = ComplaintRecord {
            kind: "Other Complaint".into(),
            ..Default::default()
        };
        assert!(!record.is_empty());
    }
}
