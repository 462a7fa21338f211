//! Script-assembly descriptors
//!
//! `AssemblyDescriptorData` is the raw serde form of one assembly
//! manifest. `AssemblyDescriptor` is the validated, immutable record the
//! rest of the generator consumes. All structural rules are enforced at
//! load time so later stages never see a conflicted descriptor.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defines::DefineConstraint;
use crate::error::{SlnError, SlnResult};
use crate::platform::{BuildTarget, PlatformCatalog};

/// Known assembly flag names and what they set.
///
/// Flags arrive as strings in manifests; this table is the only place
/// that maps them, and unrecognized names are load-time errors.
const FLAG_TABLE: &[(&str, AssemblyFlag)] = &[("TestAssembly", AssemblyFlag::TestAssembly)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblyFlag {
    TestAssembly,
}

fn lookup_flag(name: &str, assembly: &str) -> SlnResult<AssemblyFlag> {
    FLAG_TABLE
        .iter()
        .find(|(flag_name, _)| *flag_name == name)
        .map(|(_, flag)| *flag)
        .ok_or_else(|| SlnError::UnknownFlag {
            name: name.to_string(),
            assembly: assembly.to_string(),
        })
}

/// Raw manifest form of an assembly descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyDescriptorData {
    pub name: String,

    #[serde(default)]
    pub references: Vec<String>,

    #[serde(default)]
    pub precompiled_references: Vec<String>,

    #[serde(default)]
    pub include_platforms: Vec<String>,

    #[serde(default)]
    pub exclude_platforms: Vec<String>,

    #[serde(default)]
    pub define_constraints: Vec<String>,

    #[serde(default)]
    pub flags: Vec<String>,

    #[serde(default = "default_true")]
    pub auto_referenced: bool,

    #[serde(default)]
    pub override_references: bool,
}

fn default_true() -> bool {
    true
}

impl AssemblyDescriptorData {
    /// Parse a JSON assembly manifest
    pub fn from_json(path: &Path, json: &str) -> SlnResult<Self> {
        let data: AssemblyDescriptorData =
            serde_json::from_str(json).map_err(|e| SlnError::InvalidManifest {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if data.name.is_empty() {
            return Err(SlnError::InvalidManifest {
                file: path.to_path_buf(),
                message: "required property 'name' not set".to_string(),
            });
        }
        Ok(data)
    }
}

/// Per-directory metadata attached from the surrounding asset database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMetadata {
    /// Whether assemblies under this directory may ship tests
    pub is_testable: bool,
}

/// Validated, immutable record of one script-assembly's declared metadata
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyDescriptor {
    pub name: String,
    /// Source root, normalized to end with `/`
    pub path_prefix: String,
    pub references: Vec<String>,
    pub precompiled_references: Vec<String>,
    /// `Some` means the assembly is restricted to exactly these targets
    pub include_platforms: Option<Vec<BuildTarget>>,
    /// `Some` means the assembly is excluded from these targets
    pub exclude_platforms: Option<Vec<BuildTarget>>,
    /// Conjunctive, in declaration order
    pub define_constraints: Vec<DefineConstraint>,
    pub is_test_assembly: bool,
    pub auto_referenced: bool,
    pub override_references: bool,
    pub directory_metadata: Option<DirectoryMetadata>,
}

impl AssemblyDescriptor {
    /// Validate raw manifest data against a platform catalog.
    ///
    /// `path` is the manifest location; its directory becomes the source
    /// root prefix.
    pub fn from_data(
        path: &Path,
        data: &AssemblyDescriptorData,
        catalog: &PlatformCatalog,
    ) -> SlnResult<Self> {
        if !data.include_platforms.is_empty() && !data.exclude_platforms.is_empty() {
            return Err(SlnError::ConflictingPlatformSets {
                assembly: data.name.clone(),
            });
        }

        let include_platforms = if data.include_platforms.is_empty() {
            None
        } else {
            Some(catalog.resolve_all(&data.include_platforms, &data.name)?)
        };
        let exclude_platforms = if data.exclude_platforms.is_empty() {
            None
        } else {
            Some(catalog.resolve_all(&data.exclude_platforms, &data.name)?)
        };

        let mut is_test_assembly = false;
        for flag_name in &data.flags {
            match lookup_flag(flag_name, &data.name)? {
                AssemblyFlag::TestAssembly => is_test_assembly = true,
            }
        }

        Ok(Self {
            name: data.name.clone(),
            path_prefix: prefix_for(path),
            references: data.references.clone(),
            precompiled_references: data.precompiled_references.clone(),
            include_platforms,
            exclude_platforms,
            define_constraints: DefineConstraint::parse_all(&data.define_constraints),
            is_test_assembly,
            auto_referenced: data.auto_referenced,
            override_references: data.override_references,
            directory_metadata: None,
        })
    }

    /// Minimal descriptor for an unrestricted assembly rooted at `directory`
    pub fn unrestricted(name: &str, directory: &str) -> Self {
        let mut prefix = directory.replace('\\', "/");
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            name: name.to_string(),
            path_prefix: prefix,
            references: Vec::new(),
            precompiled_references: Vec::new(),
            include_platforms: None,
            exclude_platforms: None,
            define_constraints: Vec::new(),
            is_test_assembly: false,
            auto_referenced: true,
            override_references: false,
            directory_metadata: None,
        }
    }

    pub fn with_directory_metadata(mut self, metadata: DirectoryMetadata) -> Self {
        self.directory_metadata = Some(metadata);
        self
    }
}

fn prefix_for(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    match normalized.rfind('/') {
        Some(index) => normalized[..=index].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(json: &str) -> SlnResult<AssemblyDescriptor> {
        let path = PathBuf::from("Assets/Game/Game.Core.adef");
        let data = AssemblyDescriptorData::from_json(&path, json)?;
        AssemblyDescriptor::from_data(&path, &data, &PlatformCatalog::standard())
    }

    #[test]
    fn minimal_manifest_loads_with_defaults() {
        let descriptor = parse(r#"{"name": "Game.Core"}"#).unwrap();
        assert_eq!(descriptor.name, "Game.Core");
        assert_eq!(descriptor.path_prefix, "Assets/Game/");
        assert!(descriptor.include_platforms.is_none());
        assert!(descriptor.exclude_platforms.is_none());
        assert!(descriptor.auto_referenced);
        assert!(!descriptor.override_references);
        assert!(!descriptor.is_test_assembly);
    }

    #[test]
    fn missing_name_is_rejected() {
        let result = parse(r#"{"references": ["Other"]}"#);
        assert!(matches!(result, Err(SlnError::InvalidManifest { .. })));
    }

    #[test]
    fn both_platform_sets_rejected_at_load() {
        let result = parse(
            r#"{"name": "Game.Core", "includePlatforms": ["Windows"], "excludePlatforms": ["Android"]}"#,
        );
        assert!(matches!(
            result,
            Err(SlnError::ConflictingPlatformSets { .. })
        ));
    }

    #[test]
    fn unknown_platform_name_is_hard_error() {
        let result = parse(r#"{"name": "Game.Core", "includePlatforms": ["Amiga"]}"#);
        assert!(matches!(result, Err(SlnError::UnknownPlatform { .. })));
    }

    #[test]
    fn deprecated_platform_names_silently_dropped() {
        let descriptor =
            parse(r#"{"name": "Game.Core", "includePlatforms": ["Windows", "WiiU"]}"#).unwrap();
        assert_eq!(
            descriptor.include_platforms,
            Some(vec![BuildTarget::Windows])
        );
    }

    #[test]
    fn all_deprecated_leaves_empty_include_set() {
        // A declared-but-empty include set restricts to nothing; it is not
        // the same as no restriction at all.
        let descriptor = parse(r#"{"name": "Game.Core", "includePlatforms": ["WiiU"]}"#).unwrap();
        assert_eq!(descriptor.include_platforms, Some(vec![]));
    }

    #[test]
    fn test_assembly_flag_via_table() {
        let descriptor = parse(r#"{"name": "Game.Tests", "flags": ["TestAssembly"]}"#).unwrap();
        assert!(descriptor.is_test_assembly);
    }

    #[test]
    fn unknown_flag_is_hard_error() {
        let result = parse(r#"{"name": "Game.Core", "flags": ["SelfDestruct"]}"#);
        match result {
            Err(SlnError::UnknownFlag { name, assembly }) => {
                assert_eq!(name, "SelfDestruct");
                assert_eq!(assembly, "Game.Core");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn define_constraints_keep_declaration_order() {
        let descriptor =
            parse(r#"{"name": "Game.Core", "defineConstraints": ["FOO", "!BAR"]}"#).unwrap();
        assert_eq!(descriptor.define_constraints.len(), 2);
        assert_eq!(descriptor.define_constraints[0].symbol, "FOO");
        assert!(descriptor.define_constraints[1].negated);
    }

    #[test]
    fn unrestricted_normalizes_prefix() {
        let descriptor = AssemblyDescriptor::unrestricted("Game.Core", r"Assets\Game");
        assert_eq!(descriptor.path_prefix, "Assets/Game/");
    }
}
