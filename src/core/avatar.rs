//! # Avatars
//!
//! Each bubble carries a short glyph identifying the sender. A glyph that can't
//! be drawn in the avatar column (empty, control characters, too wide) is
//! swapped for a placeholder. The swap happens at most once per avatar: the
//! failure handler disarms itself so a bad placeholder can never loop.

use log::warn;
use unicode_width::UnicodeWidthStr;

/// Widest glyph, in terminal cells, that fits the avatar column.
pub const MAX_AVATAR_WIDTH: usize = 4;
pub const PLACEHOLDER: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    glyph: String,
    fallback_armed: bool,
}

impl Avatar {
    /// Resolve `glyph`, falling back to the placeholder if it can't be drawn.
    pub fn load(glyph: &str) -> Self {
        let mut avatar = Self {
            glyph: glyph.to_string(),
            fallback_armed: true,
        };
        if !is_renderable(&avatar.glyph) {
            avatar.on_error();
        }
        avatar
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    /// Whether the fallback has not been used yet.
    pub fn fallback_armed(&self) -> bool {
        self.fallback_armed
    }

    /// Render failure. Swaps in the placeholder once; later calls do nothing.
    /// Returns whether the swap happened.
    pub fn on_error(&mut self) -> bool {
        if !self.fallback_armed {
            return false;
        }
        self.fallback_armed = false;
        warn!(
            "Avatar {:?} cannot be rendered, using placeholder",
            self.glyph
        );
        self.glyph = PLACEHOLDER.to_string();
        true
    }
}

/// Whether `glyph` draws cleanly inside the avatar column.
pub fn is_renderable(glyph: &str) -> bool {
    !glyph.trim().is_empty()
        && !glyph.chars().any(char::is_control)
        && glyph.width() <= MAX_AVATAR_WIDTH
}
