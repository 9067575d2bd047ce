//! # Actions
//!
//! Everything that can happen in deskbot becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! User clicks a button? That's `Action::SelectOption { set, choice }`.
//! A paced bot reply comes due? That's noticed on `Action::Tick(now)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an [`Effect`] describing any I/O the adapter must
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::path::PathBuf;
use std::time::Instant;

use log::debug;

use crate::core::state::{App, ComplaintRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Text typed into the input box.
    Submit(String),
    /// A click on an option button.
    SelectOption { set: usize, choice: usize },
    /// A click on a download button.
    Download(usize),
    /// The adapter saved the report for an offer.
    ReportSaved { offer: usize, path: PathBuf },
    /// The adapter could not save the report for an offer.
    ReportFailed { offer: usize, reason: String },
    /// Clock tick; fires any cues that are due.
    Tick(Instant),
    Quit,
}

/// I/O the adapter performs after `update()` returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Lay out and save the report for this offer, then send back
    /// `ReportSaved` or `ReportFailed`.
    ExportReport { offer: usize, record: ComplaintRecord },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if !app.dialogue.submit_text(&text) {
                app.status_message = String::from("Choose an option above");
            }
            Effect::None
        }
        Action::SelectOption { set, choice } => {
            app.dialogue.select(set, choice);
            Effect::None
        }
        Action::Download(offer) => match app.dialogue.claim_download(offer) {
            Some(record) => {
                app.status_message = String::from("Saving report...");
                Effect::ExportReport { offer, record }
            }
            None => {
                debug!("Download offer {offer} already used");
                Effect::None
            }
        },
        Action::ReportSaved { offer, path } => {
            app.status_message = format!("Report saved to {}", path.display());
            app.dialogue.report_saved(offer, path);
            Effect::None
        }
        Action::ReportFailed { offer, reason } => {
            app.status_message = String::from("Report failed");
            app.dialogue.report_failed(offer, &reason);
            Effect::None
        }
        Action::Tick(now) => {
            app.dialogue.poll(now);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ConversationState;
    use crate::core::transcript::{DownloadStatus, Entry};
    use crate::test_support::test_app;

    fn tick(app: &mut App) {
        update(app, Action::Tick(Instant::now()));
    }

    fn live_set(app: &App) -> usize {
        app.dialogue.transcript().live_options().unwrap().id
    }

    fn first_offer(app: &App) -> usize {
        app.dialogue
            .transcript()
            .entries()
            .iter()
            .find_map(|e| match e {
                Entry::Download(o) => Some(o.id),
                _ => None,
            })
            .unwrap()
    }

    /// Walk a zero-delay app through a complaint until the download is offered.
    fn complaint_app() -> App {
        let mut app = test_app();
        tick(&mut app);
        let main_menu = live_set(&app);
        update(&mut app, Action::SelectOption { set: main_menu, choice: 1 });
        let complaint_menu = live_set(&app);
        update(&mut app, Action::SelectOption { set: complaint_menu, choice: 2 });
        tick(&mut app);
        update(&mut app, Action::Submit("Double charged in March".into()));
        tick(&mut app);
        app
    }

    #[test]
    fn test_quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_tick_fires_greeting() {
        let mut app = test_app();
        tick(&mut app);
        assert_eq!(app.dialogue.state(), ConversationState::MainMenu);
    }

    #[test]
    fn test_submit_while_buttons_pending_sets_status() {
        let mut app = test_app();
        tick(&mut app);
        let len = app.dialogue.transcript().len();
        update(&mut app, Action::Submit("hello".into()));
        assert_eq!(app.dialogue.transcript().len(), len);
        assert_eq!(app.status_message, "Choose an option above");
    }

    #[test]
    fn test_download_returns_export_effect_once() {
        let mut app = complaint_app();
        let offer = first_offer(&app);
        match update(&mut app, Action::Download(offer)) {
            Effect::ExportReport { offer: o, record } => {
                assert_eq!(o, offer);
                assert_eq!(record.kind, "Billing Issue");
                assert_eq!(record.details, "Double charged in March");
            }
            other => panic!("expected ExportReport, got {other:?}"),
        }
        assert_eq!(update(&mut app, Action::Download(offer)), Effect::None);
    }

    #[test]
    fn test_report_saved_updates_offer() {
        let mut app = complaint_app();
        let offer = first_offer(&app);
        update(&mut app, Action::Download(offer));
        let path = PathBuf::from("/tmp/Complaint_X.txt");
        update(&mut app, Action::ReportSaved { offer, path: path.clone() });
        let status = &app.dialogue.transcript().offer(offer).unwrap().status;
        assert_eq!(status, &DownloadStatus::Saved(path));
    }

    #[test]
    fn test_report_failed_keeps_state() {
        let mut app = complaint_app();
        let offer = first_offer(&app);
        let state = app.dialogue.state();
        update(&mut app, Action::Download(offer));
        update(
            &mut app,
            Action::ReportFailed { offer, reason: "No report backend is available.".into() },
        );
        assert_eq!(app.dialogue.state(), state);
        assert_eq!(
            app.dialogue.transcript().offer(offer).unwrap().status,
            DownloadStatus::Failed
        );
    }
}
