//! # Theme Storage
//!
//! Durable light/dark flag and the hook that applies it.
//!
//! ```text
//!   start:   theme.toml ──load()──► Action::ThemeLoaded ──► ThemeSink::apply
//!   toggle:  Action::ToggleTheme ──► ThemeSink::apply + save() ──► theme.toml
//! ```
//!
//! File format:
//! ```toml
//! theme = "dark"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use kawuz_core::theme::Theme;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Theme Sink
// =============================================================================

/// Presentation-layer hook. The front end implements this to restyle itself.
pub trait ThemeSink: Send + Sync {
    fn apply(&self, theme: Theme);
}

/// Sink that ignores theme changes (headless use, tests).
pub struct NoOpThemeSink;

impl ThemeSink for NoOpThemeSink {
    fn apply(&self, _theme: Theme) {}
}

// =============================================================================
// Theme Store
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Reads and writes the theme flag.
///
/// Without a path (no platform config dir) the store is memory-only: `load`
/// always yields the default and `save` is a no-op.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: Option<PathBuf>,
}

impl ThemeStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        ThemeStore { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stored theme; absent or unreadable storage yields [`Theme::Light`].
    pub fn load(&self) -> Theme {
        let Some(path) = self.path.as_ref() else {
            return Theme::default();
        };

        if !path.exists() {
            debug!(?path, "No stored theme, using default");
            return Theme::default();
        }

        match std::fs::read_to_string(path)
            .map_err(ClientError::from)
            .and_then(|contents| toml::from_str::<ThemeFile>(&contents).map_err(ClientError::from))
        {
            Ok(file) => {
                debug!(?path, theme = %file.theme, "Loaded stored theme");
                file.theme
            }
            Err(e) => {
                warn!(?path, error = %e, "Unreadable theme file, using default");
                Theme::default()
            }
        }
    }

    /// Persists `theme`, creating the parent directory if needed.
    pub fn save(&self, theme: Theme) -> ClientResult<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string(&ThemeFile { theme })?;
        std::fs::write(path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, %theme, "Theme saved");
        Ok(())
    }
}
