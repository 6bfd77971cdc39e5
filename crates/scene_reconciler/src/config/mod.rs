//! Configuration system
//!
//! Settings load from `.toml` or `.ron` files through the [`Config`] trait.
//! Every field has a default so partial files are accepted.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Reconciler Configuration
///
/// Behavior switches for the host-config core and the render-root facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Emit development advisories (conflicting grouped props, unknown props,
    /// incomplete meshes). Defaults to on in debug builds only.
    pub development: bool,
    /// Optional `env_logger` filter applied by [`crate::foundation::logging::init_with_filter`]
    pub log_filter: Option<String>,
    /// Submit a frame to every live renderer after a commit that changed the graph
    pub submit_frames_on_commit: bool,
    /// Drop disposed native objects from the graph when a root unmounts
    pub purge_disposed_on_unmount: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            development: cfg!(debug_assertions),
            log_filter: None,
            submit_frames_on_commit: true,
            purge_disposed_on_unmount: false,
        }
    }
}

impl ReconcilerConfig {
    /// Configuration with advisories switched off, as in release builds
    pub fn production() -> Self {
        Self {
            development: false,
            ..Self::default()
        }
    }
}

impl Config for ReconcilerConfig {}
