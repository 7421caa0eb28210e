use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serenity::all::ChannelId;

/// Default message-command prefix when `PREFIX` is unset.
pub const DEFAULT_COMMAND_PREFIX: &str = "?";

/// Default wait for a reaction vote on a tanabata preview.
pub const DEFAULT_REACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment-derived configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    pub prefix: String,
    pub warning_icon: String,
    pub wave_icon: String,
    pub check_icon: String,
    pub x_icon: String,
    pub tanabata_log_channel: ChannelId,
    pub tanabata_channel: ChannelId,
    pub tanabata_dir: PathBuf,
    pub reaction_timeout: Duration,
}

impl Config {
    /// Read the full configuration surface from the process environment.
    ///
    /// Icon and channel variables are required; `PREFIX` and the reaction
    /// timeout fall back to their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let token = env::var("DISCORD_TOKEN")?;
        let prefix =
            env::var("PREFIX").unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string());

        let warning_icon = env::var("WARNING_ICON")?;
        let wave_icon = env::var("WAVE_ICON")?;
        let check_icon = env::var("CHECK_ICON")?;
        let x_icon = env::var("X_ICON")?;

        let tanabata_log_channel =
            ChannelId::new(env::var("TANABATA_LOG_CHANNEL_ID")?.trim().parse::<u64>()?);
        let tanabata_channel =
            ChannelId::new(env::var("TANABATA_CHANNEL_ID")?.trim().parse::<u64>()?);
        let tanabata_dir = PathBuf::from(env::var("TANABATA_DIR")?);

        let reaction_timeout = Duration::from_secs(env_u64(
            "TANABATA_TIMEOUT_SECONDS",
            DEFAULT_REACTION_TIMEOUT.as_secs(),
        ));

        Ok(Self {
            token,
            prefix,
            warning_icon,
            wave_icon,
            check_icon,
            x_icon,
            tanabata_log_channel,
            tanabata_channel,
            tanabata_dir,
            reaction_timeout,
        })
    }
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

/// Process-wide switch gating the tanabata submission workflow.
///
/// Initialized on at startup, mutated only by the `tanabata` command, read by
/// the DM workflow on each submission. In-memory only; resets on restart.
#[derive(Clone, Debug)]
pub struct TanabataToggle(Arc<AtomicBool>);

impl TanabataToggle {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

impl Default for TanabataToggle {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Shared state handed to every command handler and event handler.
#[derive(Clone, Debug)]
pub struct Data {
    pub config: Config,
    pub tanabata_enabled: TanabataToggle,
}

impl Data {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tanabata_enabled: TanabataToggle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TanabataToggle;

    #[test]
    fn toggle_starts_enabled_and_flips() {
        let toggle = TanabataToggle::default();
        assert!(toggle.get());
        toggle.set(false);
        assert!(!toggle.get());
        toggle.set(true);
        assert!(toggle.get());
    }

    #[test]
    fn toggle_clones_share_state() {
        let toggle = TanabataToggle::new(true);
        let clone = toggle.clone();
        clone.set(false);
        assert!(!toggle.get());
    }
}
