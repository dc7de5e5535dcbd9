use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
    time::Duration,
};

use crate::geometry::EngineScale;

/// Characters treated as word boundaries and never preceded by an automatic
/// space.
pub const DEFAULT_PUNCTUATIONS: &str =
    ".,?!'\"(){}-:;«»„¡¿”•_;·჻՛՜՞՝՚。、~〈〉《》「」〖〗・·…๏๚๛ฯๆ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriteToTypeSettings {
    /// Pen rest before the current recognition is committed.
    pub commit_timeout_ms: u64,
    /// Poll cadence while recognition results are pending.
    pub poll_interval_ms: u64,
    /// Upper bound on waiting for the recognizers to settle before a commit.
    pub commit_wait_timeout_ms: u64,
    /// Drop finger and mouse input; only an active stylus writes.
    pub active_stylus_only: bool,
    pub language: String,
    pub dpi_x: f32,
    pub dpi_y: f32,
    pub punctuations: String,
    /// Emit a debug report for every dispatched result.
    pub debug: bool,
}

impl Default for WriteToTypeSettings {
    fn default() -> Self {
        Self {
            commit_timeout_ms: 500,
            poll_interval_ms: 10,
            commit_wait_timeout_ms: 2_000,
            active_stylus_only: false,
            language: "en_US".into(),
            dpi_x: 160.0,
            dpi_y: 160.0,
            punctuations: DEFAULT_PUNCTUATIONS.into(),
            debug: false,
        }
    }
}

impl WriteToTypeSettings {
    /// Defaults, with `WRITE_TO_TYPE_DEBUG=1|true` switching debug reports on.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        let debug_mode = std::env::var("WRITE_TO_TYPE_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        self.debug |= debug_mode;
        self
    }

    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn commit_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_wait_timeout_ms)
    }

    pub fn scale(&self) -> EngineScale {
        EngineScale::from_dpi(self.dpi_x, self.dpi_y)
    }
}

/// JSON-file backed settings.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<WriteToTypeSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring unreadable settings in {}: {err}",
                    path.display()
                );
                WriteToTypeSettings::default()
            })
        } else {
            WriteToTypeSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data.with_env_overrides()),
        })
    }

    pub fn settings(&self) -> WriteToTypeSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, settings: WriteToTypeSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: WriteToTypeSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", self.path.display()))?;
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }

    fn persist(&self, data: &WriteToTypeSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
