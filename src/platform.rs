//! Build target platforms and the platform catalog
//!
//! The catalog is an explicit immutable value constructed once and passed
//! into the components that need it, so tests can substitute a reduced
//! catalog without touching process-wide state.

use serde::{Deserialize, Serialize};

use crate::error::{SlnError, SlnResult};

/// A build target platform.
///
/// `Editor` is a synthetic pseudo-target for the editor-hosted build and
/// never corresponds to a shippable platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTarget {
    Editor,
    Windows,
    MacOs,
    Linux,
    Ios,
    Android,
    WebGl,
    Ps4,
    XboxOne,
    Switch,
}

/// One named platform in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEntry {
    /// Name used in assembly manifests, matched case-insensitively
    pub name: String,
    /// Human-readable name for diagnostics
    pub display_name: String,
    pub target: BuildTarget,
}

impl PlatformEntry {
    pub fn new(name: &str, display_name: &str, target: BuildTarget) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            target,
        }
    }
}

/// Immutable catalog of known platform names.
///
/// Unknown names are hard errors; names on the deprecated list are
/// silently dropped so stale manifests keep loading.
#[derive(Debug, Clone)]
pub struct PlatformCatalog {
    entries: Vec<PlatformEntry>,
    deprecated: Vec<String>,
}

impl PlatformCatalog {
    /// Build a catalog, rejecting duplicate names up front
    pub fn new(entries: Vec<PlatformEntry>, deprecated: Vec<String>) -> SlnResult<Self> {
        for (i, entry) in entries.iter().enumerate() {
            let clash = entries[i + 1..]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&entry.name));
            if clash {
                return Err(SlnError::DuplicatePlatformName {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(Self {
            entries,
            deprecated,
        })
    }

    /// The standard shipping catalog
    pub fn standard() -> Self {
        // When removing a platform, add its name to the deprecated list.
        Self::new(
            vec![
                PlatformEntry::new("Editor", "Editor", BuildTarget::Editor),
                PlatformEntry::new("Windows", "Windows", BuildTarget::Windows),
                PlatformEntry::new("macOS", "macOS", BuildTarget::MacOs),
                PlatformEntry::new("Linux", "Linux", BuildTarget::Linux),
                PlatformEntry::new("iOS", "iOS", BuildTarget::Ios),
                PlatformEntry::new("Android", "Android", BuildTarget::Android),
                PlatformEntry::new("WebGL", "WebGL", BuildTarget::WebGl),
                PlatformEntry::new("PS4", "PlayStation 4", BuildTarget::Ps4),
                PlatformEntry::new("XboxOne", "Xbox One", BuildTarget::XboxOne),
                PlatformEntry::new("Switch", "Nintendo Switch", BuildTarget::Switch),
            ],
            vec![
                "PSMobile".to_string(),
                "Tizen".to_string(),
                "WiiU".to_string(),
                "Nintendo3DS".to_string(),
                "PSVita".to_string(),
            ],
        )
        .expect("standard catalog has no duplicate names")
    }

    /// Look up a single name, case-insensitively
    pub fn resolve(&self, name: &str) -> Option<BuildTarget> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.target)
    }

    pub fn is_deprecated(&self, name: &str) -> bool {
        self.deprecated
            .iter()
            .any(|deprecated| deprecated.eq_ignore_ascii_case(name))
    }

    /// Resolve a declared platform list for one assembly.
    ///
    /// Deprecated names are dropped, unknown names fail with the full list
    /// of supported names in the message.
    pub fn resolve_all(&self, names: &[String], assembly: &str) -> SlnResult<Vec<BuildTarget>> {
        let mut targets = Vec::new();
        for name in names {
            if self.is_deprecated(name) {
                continue;
            }
            match self.resolve(name) {
                Some(target) => targets.push(target),
                None => {
                    return Err(SlnError::UnknownPlatform {
                        name: name.clone(),
                        assembly: assembly.to_string(),
                        supported: self.supported_names(),
                    })
                }
            }
        }
        Ok(targets)
    }

    /// Sorted, quoted platform names for error messages
    pub fn supported_names(&self) -> String {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .map(|entry| format!("\"{}\"", entry.name))
            .collect();
        names.sort();
        names.join(",\n")
    }

    pub fn entries(&self) -> &[PlatformEntry] {
        &self.entries
    }
}
