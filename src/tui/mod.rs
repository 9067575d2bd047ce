//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! It also performs the I/O the core asks for through [`Effect`]s: saving a
//! complaint report happens here, and the outcome goes back in as an action.
//!
//! ## Redraw Strategy
//!
//! The event loop redraws only when something changed: an input event, a
//! resize, or the transcript's revision moving because a paced bot reply
//! fired. The poll timeout shrinks to the next cue's deadline so replies land
//! on time, and otherwise idles at 500ms.

mod component;
mod components;
mod event;
mod focus;
mod ui;

use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::report::{DirectoryBackend, ReportExporter};
use crate::core::state::{App, ComplaintRecord};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::focus::{FocusRing, Target};
use crate::tui::ui::Hit;

/// Longest the loop sleeps when no cue is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Keyboard focus among pressable buttons
    pub focus: FocusRing,
    /// Button under the mouse
    pub hovered: Option<Target>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            focus: FocusRing::new(),
            hovered: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Build the report exporter for a resolved config. No directory means reports are off.
pub fn build_exporter(config: &ResolvedConfig) -> ReportExporter {
    match &config.report_dir {
        Some(dir) => {
            info!("Reports will be saved to {}", dir.display());
            ReportExporter::new(
                Some(Box::new(DirectoryBackend::new(dir))),
                config.company_name.clone(),
            )
        }
        None => {
            info!("Report export disabled");
            ReportExporter::disabled(config.company_name.clone())
        }
    }
}

/// Run an action through the reducer and carry out its effect.
/// Returns `true` if the app should quit.
fn dispatch(app: &mut App, exporter: &ReportExporter, action: Action) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::ExportReport { offer, record } => {
            let outcome = export(exporter, offer, &record);
            dispatch(app, exporter, outcome)
        }
    }
}

fn export(exporter: &ReportExporter, offer: usize, record: &ComplaintRecord) -> Action {
    match exporter.export(record) {
        Ok(path) => Action::ReportSaved { offer, path },
        Err(e) => Action::ReportFailed {
            offer,
            reason: e.to_string(),
        },
    }
}

fn press(target: Target) -> Action {
    match target {
        Target::Choice { set, choice } => Action::SelectOption { set, choice },
        Target::Download(offer) => Action::Download(offer),
    }
}

/// Handle one terminal event. Returns `true` if the app should quit.
fn handle_event(
    event: TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    exporter: &ReportExporter,
    frame_area: Rect,
) -> bool {
    match event {
        TuiEvent::Quit => dispatch(app, exporter, Action::Quit),
        TuiEvent::Resize => false,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            false
        }
        TuiEvent::FocusNext => {
            tui.focus.next(app.dialogue.transcript());
            false
        }
        TuiEvent::FocusPrev => {
            tui.focus.prev(app.dialogue.transcript());
            false
        }
        TuiEvent::MouseMove(x, y) => {
            tui.hovered = match ui::hit_test(frame_area, x, y, app, tui) {
                Some(Hit::Button(target)) => Some(target),
                _ => None,
            };
            false
        }
        TuiEvent::MouseClick(x, y) => match ui::hit_test(frame_area, x, y, app, tui) {
            Some(Hit::Button(target)) => {
                tui.focus.clear();
                dispatch(app, exporter, press(target))
            }
            Some(Hit::Send) => match tui.input_box.take_submission() {
                Some(text) => dispatch(app, exporter, Action::Submit(text)),
                None => false,
            },
            None => false,
        },
        TuiEvent::Submit => {
            // A focused button takes Enter; otherwise it sends the typed text.
            if let Some(target) = tui.focus.current(app.dialogue.transcript()) {
                tui.focus.clear();
                return dispatch(app, exporter, press(target));
            }
            match tui.input_box.handle_event(&event) {
                Some(InputEvent::Submit(text)) => dispatch(app, exporter, Action::Submit(text)),
                _ => false,
            }
        }
        TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace => {
            // Typing moves focus back to the text field.
            tui.focus.clear();
            tui.input_box.handle_event(&event);
            false
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let exporter = build_exporter(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let result = TerminalModeGuard::new()
        .and_then(|_guard| event_loop(&mut terminal, &mut app, &mut tui, &exporter));

    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    exporter: &ReportExporter,
) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame
    let mut last_revision = app.dialogue.transcript().revision();

    loop {
        // Fire any paced bot replies that are due
        dispatch(app, exporter, Action::Tick(Instant::now()));
        let revision = app.dialogue.transcript().revision();
        if revision != last_revision {
            debug!("Transcript revision {} -> {}", last_revision, revision);
            last_revision = revision;
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        // Sleep until the next event or the next cue, whichever comes first
        let timeout = app
            .dialogue
            .time_until_next_cue(Instant::now())
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        let frame_area = terminal.get_frame().area();
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, app, tui, exporter, frame_area) {
                info!("Quit requested");
                return Ok(());
            }
        }
    }
}
