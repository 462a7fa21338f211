//! Error types for slnsync
//!
//! Configuration problems are hard errors (`SlnError`) and abort the
//! triggering pass. Recoverable per-item problems are `Warning` values
//! collected on the sync report while generation continues.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for slnsync operations
pub type SlnResult<T> = Result<T, SlnError>;

/// Main error type for slnsync operations
#[derive(Error, Debug)]
pub enum SlnError {
    /// Assembly declares both include and exclude platform sets
    #[error("assembly '{assembly}' sets both includePlatforms and excludePlatforms")]
    ConflictingPlatformSets { assembly: String },

    /// Platform name is not in the catalog (and not a known deprecated name)
    #[error(
        "platform name '{name}' not supported in assembly '{assembly}'.\nSupported platform names:\n{supported}"
    )]
    UnknownPlatform {
        name: String,
        assembly: String,
        supported: String,
    },

    /// Flag name has no entry in the assembly flag table
    #[error("flag '{name}' not recognized in assembly '{assembly}'")]
    UnknownFlag { name: String, assembly: String },

    /// Compatibility was queried with an empty define set
    #[error("defines cannot be empty")]
    EmptyDefines,

    /// Assembly manifest is structurally invalid
    #[error("invalid assembly manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// No project file extension is registered for this language
    #[error("no project extension registered for language '{language}'")]
    UnsupportedLanguage { language: String },

    /// Duplicate platform name when building a catalog
    #[error("duplicate platform name '{name}' in catalog")]
    DuplicatePlatformName { name: String },

    /// Settings file is invalid
    #[error("invalid settings in {file}: {message}")]
    InvalidSettings { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recoverable, per-item problem reported alongside a completed pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A response file had parse errors; its valid entries were still used
    ResponseFileParse { file: String, message: String },

    /// A reference looked like a managed assembly but failed the validity probe
    InvalidAssembly { path: String },

    /// A single output file could not be written; other files proceeded
    WriteFailed { path: PathBuf, message: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ResponseFileParse { file, message } => {
                write!(f, "{file} parse error: {message}")
            }
            Warning::InvalidAssembly { path } => {
                write!(f, "'{path}' is not a valid managed assembly, reference dropped")
            }
            Warning::WriteFailed { path, message } => {
                write!(f, "failed to write {}: {message}", path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_platform_sets_names_assembly() {
        let err = SlnError::ConflictingPlatformSets {
            assembly: "Game.Core".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "assembly 'Game.Core' sets both includePlatforms and excludePlatforms"
        );
    }

    #[test]
    fn unknown_platform_lists_supported_names() {
        let err = SlnError::UnknownPlatform {
            name: "Amiga".to_string(),
            assembly: "Game.Core".to_string(),
            supported: "\"Editor\",\n\"Windows\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Amiga'"));
        assert!(msg.contains("Game.Core"));
        assert!(msg.contains("\"Editor\""));
    }

    #[test]
    fn warning_display_names_the_item() {
        let warning = Warning::WriteFailed {
            path: PathBuf::from("Game.sln"),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "failed to write Game.sln: permission denied"
        );
    }
}
