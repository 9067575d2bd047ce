//! # Core Application Logic
//!
//! This module contains deskbot's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Dialogue (FSM)       │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No terminal. No UI.    │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App`, `ConversationState`, `ComplaintRecord`
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`dialogue`]: the state machine and its rule tables
//! - [`choreography`]: paced queue of bot actions
//! - [`transcript`]: append-only conversation log, option rows, download offers
//! - [`ticket`]: ticket numbers
//! - [`report`]: complaint report layout and export
//! - [`avatar`]: sender glyphs with placeholder fallback
//! - [`config`]: layered configuration

pub mod action;
pub mod avatar;
pub mod choreography;
pub mod config;
pub mod dialogue;
pub mod report;
pub mod state;
pub mod ticket;
pub mod transcript;
