//! Application settings loaded via OrthoConfig.
//!
//! Values come from `BATTERY_*` environment variables, CLI flags or a
//! configuration file. Numeric game settings carry declared defaults; the
//! remaining fields are optional and their accessors apply the fallbacks.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use crate::domain::game::{DEFAULT_INITIAL_LEVEL, GameRules, GameRulesError};
use crate::domain::{AdminPassword, AdminPasswordError, PuzzleRng};
use crate::inbound::http::session_config::BuildMode;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RESULTS_FILE: &str = "results.json";
const DEV_ADMIN_PASSWORD: &str = "dev-admin-password";

/// Where assessment records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    JsonFile(Utf8PathBuf),
    Postgres(String),
}

/// Errors raised while turning raw settings into runtime values.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("BATTERY_ADMIN_PASSWORD must be set in release builds")]
    MissingAdminPassword,
    #[error("invalid admin password: {0}")]
    AdminPassword(#[from] AdminPasswordError),
    #[error("invalid game rules: {0}")]
    GameRules(#[from] GameRulesError),
    #[error("results file path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
    #[error("session TTL must be at least one minute")]
    ZeroSessionTtl,
}

/// Runtime settings for the battery server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BATTERY")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// Password guarding the results report.
    pub admin_password: Option<String>,
    /// JSON results file used when no database is configured.
    pub results_file: Option<PathBuf>,
    /// PostgreSQL URL; selects the database store when present.
    pub database_url: Option<String>,
    /// Failures tolerated per level before the game ends.
    #[ortho_config(default = 2)]
    pub chances_per_level: u32,
    /// Highest level; clearing it completes the test. Defaults to the
    /// largest level the sequence canvas can lay out.
    pub max_level: Option<u32>,
    /// Idle minutes before a participant session expires.
    #[ortho_config(default = 30)]
    pub session_ttl_minutes: u64,
    /// Seed for reproducible puzzles.
    pub rng_seed: Option<u64>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Select the results store. A database URL wins over the JSON file.
    pub fn storage(&self) -> Result<StorageBackend, SettingsError> {
        if let Some(url) = self.database_url.as_deref().filter(|url| !url.trim().is_empty()) {
            return Ok(StorageBackend::Postgres(url.to_owned()));
        }
        let path = self
            .results_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_FILE));
        Utf8PathBuf::from_path_buf(path)
            .map(StorageBackend::JsonFile)
            .map_err(SettingsError::NonUtf8Path)
    }

    pub fn game_rules(&self) -> Result<GameRules, SettingsError> {
        Ok(GameRules::new(
            DEFAULT_INITIAL_LEVEL,
            self.chances_per_level,
            self.max_level,
        )?)
    }

    pub fn session_ttl(&self) -> Result<Duration, SettingsError> {
        match self.session_ttl_minutes {
            0 => Err(SettingsError::ZeroSessionTtl),
            minutes => Ok(Duration::from_secs(minutes.saturating_mul(60))),
        }
    }

    /// Resolve the admin password.
    ///
    /// Debug builds fall back to a development password with a warning.
    pub fn admin_password(&self, mode: BuildMode) -> Result<AdminPassword, SettingsError> {
        match (self.admin_password.as_deref(), mode) {
            (Some(secret), _) => Ok(AdminPassword::new(secret)?),
            (None, BuildMode::Debug) => {
                warn!("BATTERY_ADMIN_PASSWORD not set; using the development password");
                Ok(AdminPassword::new(DEV_ADMIN_PASSWORD)?)
            }
            (None, BuildMode::Release) => Err(SettingsError::MissingAdminPassword),
        }
    }

    pub fn puzzle_rng(&self) -> PuzzleRng {
        match self.rng_seed {
            Some(seed) => PuzzleRng::from_seed(seed),
            None => PuzzleRng::from_entropy(),
        }
    }
}
