//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::choreography::Timing;
use crate::core::config::{CliOverrides, DeskbotConfig, resolve_with_env};
use crate::core::dialogue::{Dialogue, Script};
use crate::core::state::App;

/// A dialogue with the default script and zero delays. Not started.
pub fn test_dialogue() -> Dialogue {
    Dialogue::new(Script::default(), Timing::INSTANT)
}

/// Creates a test App from default config with zero delays. The greeting is
/// queued and fires on the first tick.
pub fn test_app() -> App {
    let cli = CliOverrides {
        fast: true,
        no_report: true,
        ..Default::default()
    };
    let config = resolve_with_env(&DeskbotConfig::default(), &cli, |_| None);
    App::from_config(&config)
}
