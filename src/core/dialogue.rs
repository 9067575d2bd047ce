//! # Dialogue Engine
//!
//! The finite-state machine behind the chat. It owns the [`ConversationState`],
//! the [`ComplaintRecord`] being collected, the [`Transcript`], and the queue of
//! paced bot actions.
//!
//! ```text
//!            ┌──────────────── any ────────────────┐
//!            ▼                                     │
//!        initial ──any──▶ main_menu ──"end chat"──▶ ended
//!            ▲              │     │
//!            │  "general inquiry"  "complaint"
//!            │              ▼     ▼
//!            ├──topic── inquiry  complaint_topic
//!            │                    │ any (type)
//!            │                    ▼
//!            └──any (details)── complaint_details_pending
//! ```
//!
//! Input is lower-cased and matched by substring against an ordered rule table
//! per state; the first rule that matches wins. Unmatched input never changes
//! state, it re-issues the same prompt.
//!
//! Bot output is not written straight to the transcript: it is scheduled as
//! [`Step`]s on a [`Choreography`] and applied when the driver calls
//! [`Dialogue::poll`] (or [`Dialogue::flush`] in tests).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::core::choreography::{Choreography, Timing};
use crate::core::state::{ComplaintRecord, ConversationState};
use crate::core::ticket;
use crate::core::transcript::{DownloadStatus, Sender, Transcript};

// ============================================================================
// Script
// ============================================================================

/// A bot prompt and the buttons offered under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
}

const MAIN_OPTIONS: &[&str] = &["General Inquiry", "Complaint", "End Chat"];

pub const MAIN_MENU: Menu = Menu {
    prompt: "How can I assist you today?",
    options: MAIN_OPTIONS,
};

/// Main menu as re-offered after a finished exchange.
pub const MAIN_MENU_AGAIN: Menu = Menu {
    prompt: "Is there anything else I can help you with?",
    options: MAIN_OPTIONS,
};

pub const INQUIRY_MENU: Menu = Menu {
    prompt: "What kind of inquiry do you have?",
    options: &["About Services", "Contact Information", "Business Hours", "Other"],
};

pub const COMPLAINT_MENU: Menu = Menu {
    prompt: "Please select the type of complaint:",
    options: &["Product Issue", "Service Issue", "Billing Issue", "Other Complaint"],
};

pub const FAREWELL: &str =
    "Thank you for using our chatbot! We're here to help if you need anything else.";
pub const BUSINESS_HOURS: &str = "Our business hours are Monday to Friday, 9 AM to 5 PM.";
const ABOUT_SERVICES: &str = "We offer a wide range of services including web development, \
    mobile app creation, and cloud solutions. Is there a specific service you'd like to know more about?";
pub const ENDED_PLACEHOLDER: &str = "Chat ended. Please restart to start a new chat.";
const OPEN_PLACEHOLDER: &str = "Type your message...";
const BUTTONS_PLACEHOLDER: &str = "Choose an option above...";

/// Site-specific wording substituted into the canned replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Fallback phone number quoted in every error and "I don't understand" reply.
    pub contact_number: String,
    pub support_email: String,
    /// Support desk line given out by the contact-information answer.
    pub support_phone: String,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            contact_number: "1-800-555-0199".to_string(),
            support_email: "support@example.com".to_string(),
            support_phone: "123-456-7890".to_string(),
        }
    }
}

/// Canned answers for the inquiry menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    AboutServices,
    ContactInformation,
    BusinessHours,
    Other,
}

impl Answer {
    pub fn text(&self, script: &Script) -> String {
        match self {
            Answer::AboutServices => ABOUT_SERVICES.to_string(),
            Answer::ContactInformation => format!(
                "You can reach our support team at {} or call us at {}.",
                script.support_email, script.support_phone
            ),
            Answer::BusinessHours => BUSINESS_HOURS.to_string(),
            Answer::Other => format!(
                "Please type your specific inquiry, and I'll do my best to help. \
                 If I can't, please call us at {}.",
                script.contact_number
            ),
        }
    }
}

// ============================================================================
// Rule tables
// ============================================================================

/// What the bot does when a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Offer(Menu),
    Answer(Answer),
    Farewell,
}

/// One row of a state's dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Lower-case substring looked for in the lower-cased input.
    pub keyword: &'static str,
    pub next: ConversationState,
    pub reply: Reply,
}

/// Checked top to bottom. "general inquiry" before "complaint" before "end chat".
pub const MAIN_MENU_RULES: &[Rule] = &[
    Rule {
        keyword: "general inquiry",
        next: ConversationState::InquiryTopic,
        reply: Reply::Offer(INQUIRY_MENU),
    },
    Rule {
        keyword: "complaint",
        next: ConversationState::ComplaintTopic,
        reply: Reply::Offer(COMPLAINT_MENU),
    },
    Rule {
        keyword: "end chat",
        next: ConversationState::Ended,
        reply: Reply::Farewell,
    },
];

pub const INQUIRY_RULES: &[Rule] = &[
    Rule {
        keyword: "about services",
        next: ConversationState::Initial,
        reply: Reply::Answer(Answer::AboutServices),
    },
    Rule {
        keyword: "contact information",
        next: ConversationState::Initial,
        reply: Reply::Answer(Answer::ContactInformation),
    },
    Rule {
        keyword: "business hours",
        next: ConversationState::Initial,
        reply: Reply::Answer(Answer::BusinessHours),
    },
    Rule {
        keyword: "other",
        next: ConversationState::Initial,
        reply: Reply::Answer(Answer::Other),
    },
];

/// First rule in `rules` whose keyword occurs in `input`, case-insensitively.
pub fn match_rule<'r>(rules: &'r [Rule], input: &str) -> Option<&'r Rule> {
    let lowered = input.to_lowercase();
    rules.iter().find(|rule| lowered.contains(rule.keyword))
}

// ============================================================================
// Steps
// ============================================================================

/// A paced bot action, applied when its cue fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Opening greeting: behaves like empty input in `initial`.
    Greet(u64),
    Say(String),
    Offer(Menu),
    Download(ComplaintRecord),
    /// Leave the `initial` waypoint for the main menu. Carries the waypoint
    /// generation it was queued in; stale once the engine has left `initial` since.
    ReturnToMenu(u64),
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug)]
pub struct Dialogue {
    state: ConversationState,
    record: ComplaintRecord,
    transcript: Transcript,
    cues: Choreography<Step>,
    script: Script,
    timing: Timing,
    /// Bumped every time the engine leaves `initial`.
    waypoint: u64,
}

impl Dialogue {
    pub fn new(script: Script, timing: Timing) -> Self {
        Self {
            state: ConversationState::Initial,
            record: ComplaintRecord::default(),
            transcript: Transcript::new(),
            cues: Choreography::new(),
            script,
            timing,
            waypoint: 0,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn record(&self) -> &ComplaintRecord {
        &self.record
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Whether the input field and send button are enabled.
    pub fn accepts_text(&self) -> bool {
        self.state.accepts_text()
    }

    pub fn input_placeholder(&self) -> &'static str {
        match self.state {
            ConversationState::Ended => ENDED_PLACEHOLDER,
            state if state.accepts_text() => OPEN_PLACEHOLDER,
            _ => BUTTONS_PLACEHOLDER,
        }
    }

    /// Queue the opening menu behind the greeting delay.
    pub fn start(&mut self) {
        self.cues
            .schedule(self.timing.greeting, Step::Greet(self.waypoint));
    }

    /// Typed input from the user. Echoed and processed only while text is accepted.
    pub fn submit_text(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || !self.accepts_text() {
            debug!("Ignoring typed input in state {}", self.state);
            return false;
        }
        self.transcript.push_message(text, Sender::User);
        self.advance(text);
        true
    }

    /// A button click. Inert rows produce no transcript entry and no transition.
    pub fn select(&mut self, set_id: usize, choice: usize) -> bool {
        if self.state == ConversationState::Ended {
            return false;
        }
        let Some(label) = self.transcript.choose(set_id, choice) else {
            debug!("Ignoring click on inert option set {set_id}");
            return false;
        };
        self.transcript.push_message(label.as_str(), Sender::User);
        self.advance(&label);
        true
    }

    /// Feed one input (typed text or an echoed option label) to the state machine.
    pub fn advance(&mut self, input: &str) {
        if self.state == ConversationState::Ended {
            return;
        }
        // Whatever prompt was on screen has now been answered.
        self.transcript.retire_live_options();

        let from = self.state;
        match from {
            ConversationState::Initial => self.open_main_menu(MAIN_MENU),
            ConversationState::MainMenu => match match_rule(MAIN_MENU_RULES, input) {
                Some(rule) => self.apply_rule(rule),
                None => self.reprompt(
                    format!(
                        "Please choose 'General Inquiry' or 'Complaint' from the options provided. \
                         If you need further assistance, please call us at {}.",
                        self.script.contact_number
                    ),
                    MAIN_MENU,
                ),
            },
            ConversationState::InquiryTopic => match match_rule(INQUIRY_RULES, input) {
                Some(rule) => self.apply_rule(rule),
                None => self.reprompt(
                    format!(
                        "Please choose a valid inquiry topic from the options. \
                         If you need further assistance, please call us at {}.",
                        self.script.contact_number
                    ),
                    INQUIRY_MENU,
                ),
            },
            ConversationState::ComplaintTopic => {
                self.record.kind = input.to_string();
                self.state = ConversationState::ComplaintDetailsPending;
                self.cues.schedule(
                    self.timing.reply,
                    Step::Say(format!(
                        "Understood. Please describe your {} in detail.",
                        input.to_lowercase()
                    )),
                );
            }
            ConversationState::ComplaintDetailsPending => self.close_complaint(input),
            ConversationState::Ended => {}
        }

        if self.state != from {
            info!("Transition {} -> {}", from, self.state);
        }
    }

    /// Apply every cue that is due at `now`. Returns whether anything fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = false;
        while let Some(step) = self.cues.pop_due(now) {
            self.apply_step(step);
            fired = true;
        }
        fired
    }

    /// Apply every pending cue immediately, in order.
    pub fn flush(&mut self) {
        while let Some(step) = self.cues.pop_now() {
            self.apply_step(step);
        }
    }

    pub fn has_pending_cues(&self) -> bool {
        !self.cues.is_empty()
    }

    /// How long the driver may sleep before the next cue is due.
    pub fn time_until_next_cue(&self, now: Instant) -> Option<Duration> {
        self.cues.time_until_due(now)
    }

    /// Start a one-shot download. Returns the bound record the first time only.
    pub fn claim_download(&mut self, offer_id: usize) -> Option<ComplaintRecord> {
        let record = self.transcript.claim_offer(offer_id)?;
        info!("Report requested for {}", record.ticket);
        Some(record)
    }

    pub fn report_saved(&mut self, offer_id: usize, path: PathBuf) {
        info!("Report saved to {}", path.display());
        self.transcript
            .set_offer_status(offer_id, DownloadStatus::Saved(path));
    }

    /// Export failed. Surfaced in the transcript; conversation state is untouched.
    pub fn report_failed(&mut self, offer_id: usize, reason: &str) {
        warn!("Report export failed: {reason}");
        self.transcript
            .set_offer_status(offer_id, DownloadStatus::Failed);
        self.transcript.push_message(
            format!("Error: report generation failed. {reason}"),
            Sender::Bot,
        );
    }

    fn apply_rule(&mut self, rule: &Rule) {
        debug!("Matched rule '{}' in state {}", rule.keyword, self.state);
        self.state = rule.next;
        match rule.reply {
            Reply::Offer(menu) => {
                self.transcript.push_options(menu.prompt, menu.options);
            }
            Reply::Answer(answer) => {
                let text = answer.text(&self.script);
                self.cues.schedule(self.timing.reply, Step::Say(text));
                self.cues
                    .schedule(self.timing.menu, Step::ReturnToMenu(self.waypoint));
            }
            Reply::Farewell => {
                self.transcript.retire_live_options();
                self.cues
                    .schedule(self.timing.reply, Step::Say(FAREWELL.to_string()));
            }
        }
    }

    fn reprompt(&mut self, error: String, menu: Menu) {
        debug!("Unmatched input in state {}", self.state);
        self.cues.schedule(Duration::ZERO, Step::Say(error));
        self.cues.schedule(self.timing.reply, Step::Offer(menu));
    }

    fn open_main_menu(&mut self, menu: Menu) {
        self.transcript.push_options(menu.prompt, menu.options);
        self.state = ConversationState::MainMenu;
        self.waypoint += 1;
    }

    fn close_complaint(&mut self, details: &str) {
        self.record.details = details.to_string();
        self.record.ticket = ticket::generate();
        info!(
            "Complaint registered: ticket={} type={}",
            self.record.ticket, self.record.kind
        );

        self.transcript.push_message(
            format!(
                "Thank you for providing the details. Your complaint has been registered. \
                 Your ticket number is: {}.",
                self.record.ticket
            ),
            Sender::Bot,
        );

        let record = std::mem::take(&mut self.record);
        self.cues.schedule(self.timing.reply, Step::Download(record));
        self.cues
            .schedule(self.timing.menu, Step::ReturnToMenu(self.waypoint));
        self.state = ConversationState::Initial;
    }

    fn apply_step(&mut self, step: Step) {
        // Once ended, only messages and a report offer already owed may still land.
        if self.state == ConversationState::Ended
            && !matches!(step, Step::Say(_) | Step::Download(_))
        {
            debug!("Dropping cue {:?} after chat ended", step);
            return;
        }
        match step {
            Step::Greet(generation) | Step::ReturnToMenu(generation) => {
                if self.state != ConversationState::Initial || generation != self.waypoint {
                    debug!(
                        "Menu cue from waypoint {generation} skipped, now {} at waypoint {}",
                        self.state, self.waypoint
                    );
                    return;
                }
                let menu = if matches!(step, Step::Greet(_)) {
                    MAIN_MENU
                } else {
                    MAIN_MENU_AGAIN
                };
                self.open_main_menu(menu);
                info!("Transition {} -> {}", ConversationState::Initial, self.state);
            }
            Step::Say(text) => self.transcript.push_message(text, Sender::Bot),
            Step::Offer(menu) => {
                self.transcript.push_options(menu.prompt, menu.options);
            }
            Step::Download(record) => {
                self.transcript.push_download(record);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::Entry;
    use crate::test_support::test_dialogue;

    /// Dialogue that has already shown the opening menu.
    fn at_main_menu() -> Dialogue {
        let mut d = test_dialogue();
        d.start();
        d.flush();
        assert_eq!(d.state(), ConversationState::MainMenu);
        d
    }

    fn last_options(d: &Dialogue) -> Vec<String> {
        d.transcript()
            .entries()
            .iter()
            .rev()
            .find_map(|e| match e {
                Entry::Options(set) => Some(set.labels.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_greeting_is_paced() {
        let mut d = test_dialogue();
        d.start();
        assert!(d.transcript().is_empty());
        assert!(d.has_pending_cues());
        d.flush();
        assert_eq!(d.transcript().last_message_from(Sender::Bot), Some(MAIN_MENU.prompt));
        assert_eq!(last_options(&d), MAIN_OPTIONS);
    }

    #[test]
    fn test_rule_priority_general_inquiry_first() {
        let rule = match_rule(MAIN_MENU_RULES, "General Inquiry about a complaint").unwrap();
        assert_eq!(rule.next, ConversationState::InquiryTopic);
        let rule = match_rule(MAIN_MENU_RULES, "complaint, then end chat").unwrap();
        assert_eq!(rule.next, ConversationState::ComplaintTopic);
    }

    #[test]
    fn test_match_rule_is_case_insensitive_substring() {
        let rule = match_rule(INQUIRY_RULES, "what are your BUSINESS HOURS?").unwrap();
        assert_eq!(rule.reply, Reply::Answer(Answer::BusinessHours));
        assert!(match_rule(INQUIRY_RULES, "pricing").is_none());
    }

    #[test]
    fn test_main_menu_unmatched_reprompts() {
        let mut d = at_main_menu();
        d.advance("pizza");
        d.flush();
        assert_eq!(d.state(), ConversationState::MainMenu);
        assert_eq!(last_options(&d), MAIN_OPTIONS);
        let texts: Vec<_> = d
            .transcript()
            .entries()
            .iter()
            .filter_map(|e| match e {
                Entry::Message { text, sender: Sender::Bot } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.iter().any(|t| t.contains("1-800-555-0199")));
        assert_eq!(texts.last(), Some(&MAIN_MENU.prompt));
    }

    #[test]
    fn test_inquiry_unmatched_reprompts() {
        let mut d = at_main_menu();
        d.advance("General Inquiry");
        d.advance("refunds");
        d.flush();
        assert_eq!(d.state(), ConversationState::InquiryTopic);
        assert_eq!(last_options(&d), INQUIRY_MENU.options);
    }

    #[test]
    fn test_business_hours_returns_to_menu() {
        let mut d = at_main_menu();
        d.advance("General Inquiry");
        assert_eq!(d.state(), ConversationState::InquiryTopic);
        d.advance("business hours");
        assert_eq!(d.state(), ConversationState::Initial);
        assert!(d.accepts_text());
        d.flush();
        assert_eq!(d.state(), ConversationState::MainMenu);
        let bot: Vec<_> = d
            .transcript()
            .entries()
            .iter()
            .filter_map(|e| match e {
                Entry::Message { text, sender: Sender::Bot } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert!(bot.contains(&BUSINESS_HOURS.to_string()));
        assert_eq!(bot.last().map(String::as_str), Some(MAIN_MENU_AGAIN.prompt));
    }

    #[test]
    fn test_contact_answer_uses_script() {
        let script = Script {
            contact_number: "555-0000".into(),
            support_email: "help@acme.test".into(),
            support_phone: "555-0142".into(),
        };
        let text = Answer::ContactInformation.text(&script);
        assert_eq!(
            text,
            "You can reach our support team at help@acme.test or call us at 555-0142."
        );
        assert!(!text.contains("555-0000"));
        let text = Answer::Other.text(&script);
        assert!(text.contains("555-0000"));
    }

    #[test]
    fn test_complaint_flow_issues_ticket_and_clears_record() {
        let mut d = at_main_menu();
        d.advance("Complaint");
        assert_eq!(d.state(), ConversationState::ComplaintTopic);
        d.advance("Billing Issue");
        assert_eq!(d.state(), ConversationState::ComplaintDetailsPending);
        assert_eq!(d.record().kind, "Billing Issue");
        d.flush();
        assert_eq!(
            d.transcript().last_message_from(Sender::Bot),
            Some("Understood. Please describe your billing issue in detail.")
        );

        d.advance("Double charged in March");
        assert_eq!(d.state(), ConversationState::Initial);
        assert!(d.record().is_empty());

        let ticket_msg = d.transcript().last_message_from(Sender::Bot).unwrap();
        let ticket = ticket_msg
            .rsplit(' ')
            .next()
            .unwrap()
            .trim_end_matches('.')
            .to_string();
        assert!(ticket::is_well_formed(&ticket), "bad ticket in: {ticket_msg}");

        d.flush();
        let offer = d
            .transcript()
            .entries()
            .iter()
            .find_map(|e| match e {
                Entry::Download(o) => Some(o.clone()),
                _ => None,
            })
            .expect("download offered");
        assert_eq!(offer.record.kind, "Billing Issue");
        assert_eq!(offer.record.details, "Double charged in March");
        assert_eq!(offer.record.ticket, ticket);
        assert_eq!(d.state(), ConversationState::MainMenu);
    }

    #[test]
    fn test_download_is_one_shot() {
        let mut d = at_main_menu();
        d.advance("Complaint");
        d.advance("Product Issue");
        d.advance("Broken on arrival");
        d.flush();
        let offer_id = d
            .transcript()
            .entries()
            .iter()
            .find_map(|e| match e {
                Entry::Download(o) => Some(o.id),
                _ => None,
            })
            .unwrap();
        let record = d.claim_download(offer_id).unwrap();
        assert_eq!(record.details, "Broken on arrival");
        assert!(d.claim_download(offer_id).is_none());
    }

    #[test]
    fn test_report_failure_is_reported_inline() {
        let mut d = at_main_menu();
        d.advance("Complaint");
        d.advance("Service Issue");
        d.advance("Rude staff");
        d.flush();
        let state = d.state();
        let before = d.transcript().len();
        d.report_failed(0, "No report backend is available.");
        assert_eq!(d.state(), state);
        assert_eq!(d.transcript().len(), before + 1);
        assert!(
            d.transcript()
                .last_message_from(Sender::Bot)
                .unwrap()
                .starts_with("Error: report generation failed.")
        );
    }

    #[test]
    fn test_end_chat_is_absorbing() {
        let mut d = at_main_menu();
        d.advance("End Chat");
        assert_eq!(d.state(), ConversationState::Ended);
        assert!(!d.accepts_text());
        assert_eq!(d.input_placeholder(), ENDED_PLACEHOLDER);
        d.flush();
        assert_eq!(d.transcript().last_message_from(Sender::Bot), Some(FAREWELL));
        assert!(d.transcript().live_options().is_none());

        let len = d.transcript().len();
        d.advance("Complaint");
        d.advance("");
        assert!(!d.submit_text("hello?"));
        assert!(!d.select(0, 0));
        d.flush();
        assert_eq!(d.state(), ConversationState::Ended);
        assert_eq!(d.transcript().len(), len);
    }

    #[test]
    fn test_typed_input_in_initial_preempts_menu_cue() {
        let mut d = at_main_menu();
        d.advance("General Inquiry");
        d.advance("Other");
        // Say + ReturnToMenu pending; user types before they fire.
        assert!(d.submit_text("Do you ship abroad?"));
        assert_eq!(d.state(), ConversationState::MainMenu);
        let menus_before = d
            .transcript()
            .entries()
            .iter()
            .filter(|e| matches!(e, Entry::Options(_)))
            .count();
        d.flush();
        let menus_after = d
            .transcript()
            .entries()
            .iter()
            .filter(|e| matches!(e, Entry::Options(_)))
            .count();
        assert_eq!(menus_before, menus_after);
    }

    fn bot_texts(d: &Dialogue) -> Vec<&str> {
        d.transcript()
            .entries()
            .iter()
            .filter_map(|e| match e {
                Entry::Message { text, sender: Sender::Bot } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stale_menu_cue_does_not_jump_ahead_of_later_answer() {
        let mut d = at_main_menu();
        d.advance("General Inquiry");
        d.advance("Business Hours");
        // Leave the waypoint by typing, then finish a second inquiry before any cue fires.
        assert!(d.submit_text("hi"));
        d.advance("General Inquiry");
        d.advance("Business Hours");
        assert_eq!(d.state(), ConversationState::Initial);

        d.flush();

        let texts = bot_texts(&d);
        assert_eq!(
            texts[texts.len() - 3..],
            [BUSINESS_HOURS, BUSINESS_HOURS, MAIN_MENU_AGAIN.prompt]
        );
        assert_eq!(
            texts.iter().filter(|t| **t == MAIN_MENU_AGAIN.prompt).count(),
            1
        );
        assert_eq!(d.state(), ConversationState::MainMenu);
        assert!(matches!(
            d.transcript().entries().last(),
            Some(Entry::Options(set)) if set.is_live()
        ));
    }

    #[test]
    fn test_stale_greeting_cue_is_skipped() {
        let mut d = test_dialogue();
        d.start();
        // Typed before the greeting fired, then a full inquiry back to `initial`.
        assert!(d.submit_text("hello"));
        d.advance("General Inquiry");
        d.advance("About Services");

        d.flush();

        let texts = bot_texts(&d);
        assert_eq!(
            texts,
            [
                MAIN_MENU.prompt,
                INQUIRY_MENU.prompt,
                ABOUT_SERVICES,
                MAIN_MENU_AGAIN.prompt
            ]
        );
    }

    #[test]
    fn test_report_offer_survives_end_chat_before_it_lands() {
        let mut d = at_main_menu();
        d.advance("Complaint");
        d.advance("Billing Issue");
        d.flush();
        assert!(d.submit_text("Double charged in March"));
        assert!(d.submit_text("thanks"));
        let set = d.transcript().live_options().unwrap().id;
        assert!(d.select(set, 2));
        assert_eq!(d.state(), ConversationState::Ended);

        d.flush();

        let entries = d.transcript().entries();
        let offers: Vec<_> = entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                Entry::Download(o) => Some((i, o.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(offers.len(), 1);
        let (offer_at, offer) = &offers[0];
        assert_eq!(offer.record.details, "Double charged in March");

        let farewell_at = entries
            .iter()
            .position(|e| matches!(e, Entry::Message { text, .. } if text == FAREWELL))
            .unwrap();
        assert!(offer_at < &farewell_at);
        assert!(!bot_texts(&d).contains(&MAIN_MENU_AGAIN.prompt));
        assert!(d.transcript().live_options().is_none());

        // Still absorbing: the offer is an action, not a transition.
        assert!(d.claim_download(offer.id).is_some());
        assert_eq!(d.state(), ConversationState::Ended);
        assert!(!d.accepts_text());
    }

    #[test]
    fn test_select_inert_option_is_noop() {
        let mut d = at_main_menu();
        let set = d.transcript().live_options().unwrap().id;
        assert!(d.select(set, 1));
        assert_eq!(d.state(), ConversationState::ComplaintTopic);
        let len = d.transcript().len();
        assert!(!d.select(set, 0));
        assert_eq!(d.state(), ConversationState::ComplaintTopic);
        assert_eq!(d.transcript().len(), len);
    }

    #[test]
    fn test_submit_text_rejected_while_buttons_pending() {
        let mut d = at_main_menu();
        let len = d.transcript().len();
        assert!(!d.submit_text("Complaint"));
        assert_eq!(d.transcript().len(), len);
        assert_eq!(d.state(), ConversationState::MainMenu);
    }

    #[test]
    fn test_poll_respects_reply_delay() {
        let mut d = Dialogue::new(Script::default(), Timing::default());
        d.start();
        let t0 = Instant::now();
        assert!(!d.poll(t0));
        assert!(!d.poll(t0 + Duration::from_millis(999)));
        assert!(d.poll(t0 + Duration::from_millis(1000)));
        assert_eq!(d.state(), ConversationState::MainMenu);
    }
}
