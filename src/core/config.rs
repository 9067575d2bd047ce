//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.deskbot/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::choreography::Timing;
use crate::core::dialogue::Script;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeskbotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub avatars: AvatarConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub company_name: Option<String>,
    pub contact_number: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimingConfig {
    pub greeting_delay_ms: Option<u64>,
    pub reply_delay_ms: Option<u64>,
    pub menu_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    pub enabled: Option<bool>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AvatarConfig {
    pub bot: Option<String>,
    pub user: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_COMPANY_NAME: &str = "Company";
pub const DEFAULT_CONTACT_NUMBER: &str = "1-800-555-0199";
pub const DEFAULT_SUPPORT_EMAIL: &str = "support@example.com";
pub const DEFAULT_SUPPORT_PHONE: &str = "123-456-7890";
pub const DEFAULT_GREETING_DELAY_MS: u64 = 1000;
pub const DEFAULT_REPLY_DELAY_MS: u64 = 500;
pub const DEFAULT_MENU_DELAY_MS: u64 = 1000;
pub const DEFAULT_BOT_AVATAR: &str = "BOT";
pub const DEFAULT_USER_AVATAR: &str = "YOU";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub company_name: String,
    pub contact_number: String,
    pub support_email: String,
    /// Support desk line quoted in the contact answer.
    pub support_phone: String,
    pub timing: Timing,
    /// `None` = reports disabled.
    pub report_dir: Option<PathBuf>,
    pub bot_avatar: String,
    pub user_avatar: String,
}

impl ResolvedConfig {
    /// Wording substituted into the dialogue's canned replies.
    pub fn script(&self) -> Script {
        Script {
            contact_number: self.contact_number.clone(),
            support_email: self.support_email.clone(),
            support_phone: self.support_phone.clone(),
        }
    }
}

/// Overrides taken from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub report_dir: Option<PathBuf>,
    pub no_report: bool,
    /// Zero every delay.
    pub fast: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.deskbot/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".deskbot").join("config.toml"))
}

/// Load config from `~/.deskbot/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DeskbotConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DeskbotConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DeskbotConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DeskbotConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<DeskbotConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DeskbotConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# deskbot Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# company_name = "Company"               # Or set DESKBOT_COMPANY_NAME
# contact_number = "1-800-555-0199"      # Or set DESKBOT_CONTACT_NUMBER
# support_email = "support@example.com"
# support_phone = "123-456-7890"

# [timing]
# greeting_delay_ms = 1000
# reply_delay_ms = 500
# menu_delay_ms = 1000

# [report]
# enabled = true
# output_dir = "~/Downloads"             # Or set DESKBOT_REPORT_DIR

# [avatars]
# bot = "BOT"
# user = "YOU"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DeskbotConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with the environment lookup injected, so tests don't touch process env.
pub fn resolve_with_env(
    config: &DeskbotConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Company name: env → config → default
    let company_name = env("DESKBOT_COMPANY_NAME")
        .or_else(|| config.general.company_name.clone())
        .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());

    // Contact number: env → config → default
    let contact_number = env("DESKBOT_CONTACT_NUMBER")
        .or_else(|| config.general.contact_number.clone())
        .unwrap_or_else(|| DEFAULT_CONTACT_NUMBER.to_string());

    let support_email = config
        .general
        .support_email
        .clone()
        .unwrap_or_else(|| DEFAULT_SUPPORT_EMAIL.to_string());
    let support_phone = config
        .general
        .support_phone
        .clone()
        .unwrap_or_else(|| DEFAULT_SUPPORT_PHONE.to_string());

    let timing = if cli.fast {
        Timing::INSTANT
    } else {
        let ms = Duration::from_millis;
        Timing {
            greeting: ms(config
                .timing
                .greeting_delay_ms
                .unwrap_or(DEFAULT_GREETING_DELAY_MS)),
            reply: ms(config
                .timing
                .reply_delay_ms
                .unwrap_or(DEFAULT_REPLY_DELAY_MS)),
            menu: ms(config
                .timing
                .menu_delay_ms
                .unwrap_or(DEFAULT_MENU_DELAY_MS)),
        }
    };

    // Report dir: CLI → env → config → download dir → cwd. --no-report / enabled=false win.
    let reports_enabled = !cli.no_report && config.report.enabled.unwrap_or(true);
    let report_dir = reports_enabled.then(|| {
        cli.report_dir
            .clone()
            .or_else(|| env("DESKBOT_REPORT_DIR").map(|d| expand_home(&d)))
            .or_else(|| config.report.output_dir.as_deref().map(expand_home))
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    ResolvedConfig {
        company_name,
        contact_number,
        support_email,
        support_phone,
        timing,
        report_dir,
        bot_avatar: config
            .avatars
            .bot
            .clone()
            .unwrap_or_else(|| DEFAULT_BOT_AVATAR.to_string()),
        user_avatar: config
            .avatars
            .user
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AVATAR.to_string()),
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = DeskbotConfig::default();
        assert!(config.general.company_name.is_none());
        assert!(config.report.enabled.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&DeskbotConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.company_name, DEFAULT_COMPANY_NAME);
        assert_eq!(resolved.contact_number, DEFAULT_CONTACT_NUMBER);
        assert_eq!(resolved.support_phone, DEFAULT_SUPPORT_PHONE);
        assert_ne!(resolved.support_phone, resolved.contact_number);
        assert_eq!(resolved.timing, Timing::default());
        assert!(resolved.report_dir.is_some());
        assert_eq!(resolved.bot_avatar, DEFAULT_BOT_AVATAR);
        assert_eq!(resolved.user_avatar, DEFAULT_USER_AVATAR);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = DeskbotConfig {
            general: GeneralConfig {
                company_name: Some("Acme".to_string()),
                contact_number: Some("555-0100".to_string()),
                support_email: Some("help@acme.test".to_string()),
                support_phone: Some("555-0142".to_string()),
            },
            timing: TimingConfig {
                greeting_delay_ms: Some(10),
                reply_delay_ms: Some(20),
                menu_delay_ms: Some(30),
            },
            report: ReportConfig {
                enabled: Some(true),
                output_dir: Some("/tmp/acme-reports".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.company_name, "Acme");
        assert_eq!(resolved.contact_number, "555-0100");
        assert_eq!(resolved.script().support_email, "help@acme.test");
        assert_eq!(resolved.script().support_phone, "555-0142");
        assert_eq!(resolved.timing.reply, Duration::from_millis(20));
        assert_eq!(resolved.report_dir, Some(PathBuf::from("/tmp/acme-reports")));
    }

    #[test]
    fn test_env_wins_over_config() {
        let config = DeskbotConfig {
            general: GeneralConfig {
                contact_number: Some("555-0100".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| (key == "DESKBOT_CONTACT_NUMBER").then(|| "555-0199".to_string());
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.contact_number, "555-0199");
    }

    #[test]
    fn test_cli_report_dir_wins() {
        let config = DeskbotConfig {
            report: ReportConfig {
                output_dir: Some("/from/config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| (key == "DESKBOT_REPORT_DIR").then(|| "/from/env".to_string());
        let cli = CliOverrides {
            report_dir: Some(PathBuf::from("/from/cli")),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.report_dir, Some(PathBuf::from("/from/cli")));
    }

    #[test]
    fn test_reports_can_be_disabled() {
        let cli = CliOverrides {
            no_report: true,
            ..Default::default()
        };
        let resolved = resolve_with_env(&DeskbotConfig::default(), &cli, no_env);
        assert!(resolved.report_dir.is_none());

        let config = DeskbotConfig {
            report: ReportConfig {
                enabled: Some(false),
                output_dir: Some("/tmp/x".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(resolved.report_dir.is_none());
    }

    #[test]
    fn test_fast_zeroes_delays() {
        let cli = CliOverrides {
            fast: true,
            ..Default::default()
        };
        let resolved = resolve_with_env(&DeskbotConfig::default(), &cli, no_env);
        assert_eq!(resolved.timing, Timing::INSTANT);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
company_name = "Acme"
contact_number = "555-0100"

[timing]
reply_delay_ms = 250

[report]
enabled = false

[avatars]
bot = "ACME"
"#;
        let config: DeskbotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.company_name.as_deref(), Some("Acme"));
        assert_eq!(config.timing.reply_delay_ms, Some(250));
        assert_eq!(config.timing.menu_delay_ms, None);
        assert_eq!(config.report.enabled, Some(false));
        assert_eq!(config.avatars.bot.as_deref(), Some("ACME"));
        assert!(config.avatars.user.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[general]
contact_number = "555-0100"
"#;
        let config: DeskbotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.contact_number.as_deref(), Some("555-0100"));
        assert!(config.general.company_name.is_none());
        assert!(config.timing.greeting_delay_ms.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\ncontact_number = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/reports"), home.join("reports"));
        }
    }
}
