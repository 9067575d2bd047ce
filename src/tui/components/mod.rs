//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props and are rebuilt each frame:
//! - `TitleBar`: company, conversation state, status
//! - `Message`: one chat bubble with its avatar
//! - `OptionRow`: reply buttons under a bot prompt
//! - `DownloadButton`: the one-shot report button
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep state across frames and emit events:
//! - `InputBox`: free-text field and Send button
//! - `MessageList`: scrollable transcript with layout caching
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as props, never by reaching into `App`:
//!
//! ```rust,ignore
//! // Good: dependencies are explicit
//! TitleBar::new(app.company_name.clone(), app.dialogue.state(), status, unseen)
//!     .render(frame, area);
//!
//! // Bad: hidden dependency on global state
//! title_bar.render(frame, area); // reads from global App
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs        (top status bar)
//! ├── message.rs          (single bubble)
//! ├── option_row.rs       (reply buttons + button geometry)
//! ├── download_button.rs  (report button)
//! ├── message_list.rs     (scrollable transcript)
//! └── input_box.rs        (text entry + Send)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod download_button;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod option_row;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
