//! # MessageList Component
//!
//! Scrollable view of the transcript: chat bubbles, option rows and download
//! buttons.
//!
//! ## Responsibilities
//!
//! - Display every transcript entry
//! - Manage scrolling (stick-to-bottom while the bot is talking)
//! - Map screen rows back to entries for mouse hit testing
//! - Cache entry heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//!
//! Transcript entries are append-only and their heights depend only on their
//! content and the width, so cached heights stay valid until the width changes.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{Entry, Sender, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::download_button::DownloadButton;
use crate::tui::components::message::Message;
use crate::tui::components::option_row::{self, OptionRow};
use crate::tui::event::TuiEvent;
use crate::tui::focus::Target;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Last known content width (for hit testing between frames)
    pub content_width: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            content_width: 0,
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    /// Called on scroll-down events so that scrolling past the end re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Whether content extends below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        self.scroll_state.offset().y < self.max_scroll()
    }

    /// Entry at a viewport row, with the row's offset inside that entry.
    pub fn entry_at(&self, viewport_y: u16) -> Option<(usize, u16)> {
        let content_y = viewport_y.saturating_add(self.scroll_state.offset().y);
        let index = self
            .layout
            .prefix_heights
            .partition_point(|&end| end <= content_y);
        if index >= self.layout.prefix_heights.len() {
            return None;
        }
        Some((index, content_y - self.layout.top_of(index)))
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub bot_avatar: &'a str,
    pub user_avatar: &'a str,
    pub focused: Option<Target>,
    pub hovered: Option<Target>,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        bot_avatar: &'a str,
        user_avatar: &'a str,
    ) -> Self {
        Self {
            state,
            transcript,
            bot_avatar,
            user_avatar,
            focused: None,
            hovered: None,
        }
    }

    pub fn focused(mut self, focused: Option<Target>) -> Self {
        self.focused = focused;
        self
    }

    pub fn hovered(mut self, hovered: Option<Target>) -> Self {
        self.hovered = hovered;
        self
    }

    fn avatar(&self, sender: Sender) -> &'a str {
        match sender {
            Sender::Bot => self.bot_avatar,
            Sender::User => self.user_avatar,
        }
    }
}

/// Height of one transcript entry at a given width.
pub fn entry_height(entry: &Entry, width: u16) -> u16 {
    match entry {
        Entry::Message { text, .. } => Message::calculate_height(text, width),
        Entry::Options(set) => option_row::calculate_height(&set.labels, width),
        Entry::Download(_) => DownloadButton::HEIGHT,
    }
}

/// Index of the button a target refers to, if it lives in option set `set_id`.
fn choice_in(target: Option<Target>, set_id: usize) -> Option<usize> {
    match target {
        Some(Target::Choice { set, choice }) if set == set_id => Some(choice),
        _ => None,
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let entries = self.transcript.entries();

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(entries.len(), content_width);
        layout.heights.truncate(reusable);
        for entry in entries.iter().skip(layout.heights.len()) {
            layout.heights.push(entry_height(entry, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(entries.len(), content_width);

        let total_height = self.state.layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content.
        self.state.viewport_height = area.height;
        self.state.content_width = content_width;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset = self.state.layout.top_of(visible_range.start);

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);

            match &entries[i] {
                Entry::Message { text, sender } => {
                    let message = Message::new(text, *sender, self.avatar(*sender));
                    scroll_view.render_widget(message, rect);
                }
                Entry::Options(set) => {
                    let row = OptionRow {
                        set,
                        focused: choice_in(self.focused, set.id),
                        hovered: choice_in(self.hovered, set.id),
                    };
                    scroll_view.render_widget(row, rect);
                }
                Entry::Download(offer) => {
                    let button = DownloadButton {
                        offer,
                        focused: self.focused == Some(Target::Download(offer.id)),
                        hovered: self.hovered == Some(Target::Download(offer.id)),
                    };
                    scroll_view.render_widget(button, rect);
                }
            }

            y_offset += height;
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because scrolling needs the persistent state, and `MessageList` is rebuilt
/// each frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid for `entry_count` entries at `content_width`.
    pub fn reusable_count(&self, entry_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        // Fewer entries than cached means a different transcript.
        if entry_count < self.entry_count {
            return 0;
        }
        self.entry_count.min(self.heights.len())
    }

    pub fn update_metadata(&mut self, entry_count: usize, content_width: u16) {
        self.entry_count = entry_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Content row where entry `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        match index {
            0 => 0,
            i => self.prefix_heights.get(i - 1).copied().unwrap_or(0),
        }
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
