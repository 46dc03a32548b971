//! Errors raised while loading, saving or applying presets.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Host-side configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Preset file could not be read.
    #[error("cannot read preset {path:?}: {source}")]
    ReadFile {
        /// File that was opened.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Preset file could not be written.
    #[error("cannot write preset {path:?}: {source}")]
    WriteFile {
        /// Destination file.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Parent directory of a preset could not be created.
    #[error("cannot create preset directory {path:?}: {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Malformed preset TOML.
    #[error("invalid preset TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Preset could not be turned into TOML.
    #[error("cannot encode preset as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No effect is registered under this id.
    #[error("no effect named '{0}'")]
    UnknownEffect(String),

    /// The effect has no control with this name.
    #[error("effect '{effect}' has no parameter '{param}'")]
    UnknownParameter {
        /// Effect id.
        effect: String,
        /// Requested control name.
        param: String,
    },

    /// Preset values failed validation.
    #[error("invalid preset: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// Neither a factory preset nor a file by this name.
    #[error("no preset named '{0}'")]
    PresetNotFound(String),
}

impl ConfigError {
    pub(crate) fn read_file(path: &Path, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write_file(path: &Path, source: std::io::Error) -> Self {
        Self::WriteFile {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn create_dir(path: &Path, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    }
}
