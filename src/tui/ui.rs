use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::core::transcript::{DownloadStatus, Entry};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::download_button::DownloadButton;
use crate::tui::components::input_box::{self, InputBox};
use crate::tui::components::option_row;
use crate::tui::components::{MessageList, TitleBar};
use crate::tui::focus::Target;

/// What a mouse position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Button(Target),
    Send,
}

/// Title bar, transcript, input box.
pub fn layout(area: Rect) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(input_box::HEIGHT)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let [title_area, main_area, input_area] = layout(frame.area());
    let transcript = app.dialogue.transcript();

    tui.input_box.enabled = app.dialogue.accepts_text();
    tui.input_box.placeholder = app.dialogue.input_placeholder().to_string();

    let focused = tui.focus.current(transcript);
    MessageList::new(
        &mut tui.message_list,
        transcript,
        app.bot_avatar.glyph(),
        app.user_avatar.glyph(),
    )
    .focused(focused)
    .hovered(tui.hovered)
    .render(frame, main_area);

    TitleBar::new(
        app.company_name.clone(),
        app.dialogue.state(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}

/// Hit test a screen position against the last drawn frame.
///
/// Only buttons that can still be pressed count; inert buttons are ignored.
pub fn hit_test(frame_area: Rect, x: u16, y: u16, app: &App, tui: &TuiState) -> Option<Hit> {
    let [_title_area, main_area, input_area] = layout(frame_area);
    let position = (x, y).into();

    if input_area.contains(position) {
        return (InputBox::is_send_hit(input_area, x, y) && tui.input_box.enabled)
            .then_some(Hit::Send);
    }
    if !main_area.contains(position) {
        return None;
    }

    let list = &tui.message_list;
    let (index, local_y) = list.entry_at(y - main_area.y)?;
    let local_x = x - main_area.x;

    match app.dialogue.transcript().entries().get(index)? {
        Entry::Options(set) if set.is_live() => {
            option_row::button_at(&set.labels, list.content_width, local_x, local_y)
                .map(|choice| Hit::Button(Target::Choice { set: set.id, choice }))
        }
        Entry::Download(offer)
            if offer.status == DownloadStatus::Ready
                && local_y == 0
                && DownloadButton::contains(offer, local_x) =>
        {
            Some(Hit::Button(Target::Download(offer.id)))
        }
        _ => None,
    }
}
