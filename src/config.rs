//! Generation settings
//!
//! Settings come from an optional `slnsync.toml` next to the project,
//! with every field defaulted so a bare project directory works out of
//! the box. Toolchain facts (output root, runtime library names, the
//! internal-reference allow-list) live here rather than as constants so
//! hosts with different conventions can override them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SlnError, SlnResult};

/// Source file extensions recognized without any configuration
pub const BUILTIN_EXTENSIONS: &[&str] = &[
    "cs", "shader", "compute", "hlsl", "cginc", "glslinc", "template",
];

/// Extension that marks a language-bearing script file
pub const SCRIPT_EXTENSION: &str = "cs";

/// Which external IDE the output is generated for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum IdeFlavor {
    #[default]
    VisualStudio,
    VsCode,
    Rider,
}

/// All knobs for one generation pass
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Directory the solution and project files are written into
    pub project_directory: PathBuf,
    /// Root project name; the solution file is `<name>.sln`
    pub project_name: String,
    pub flavor: IdeFlavor,
    /// Extra recognized member-file extensions, without leading dot
    pub extra_extensions: Vec<String>,
    pub root_namespace: String,
    /// Directory convention for compiled script-assembly outputs
    pub output_root: String,
    /// Reserved core-runtime library names, always skipped as references
    pub runtime_libraries: Vec<String>,
    /// Internal assemblies that editor projects may reference anyway
    pub internal_allowlist: Vec<String>,
    /// Path prefixes of non-internalized external packages
    pub package_roots: Vec<String>,
}

impl GenerationSettings {
    /// Defaults for a project rooted at `directory`
    pub fn for_directory(directory: &Path) -> Self {
        let project_name = directory
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "Project".to_string());
        Self {
            project_directory: directory.to_path_buf(),
            project_name,
            flavor: IdeFlavor::default(),
            extra_extensions: Vec::new(),
            root_namespace: String::new(),
            output_root: "Library/ScriptAssemblies".to_string(),
            runtime_libraries: vec![
                "Engine.Runtime.dll".to_string(),
                "Engine.Editor.dll".to_string(),
            ],
            internal_allowlist: vec!["Engine.TestRunner.dll".to_string()],
            package_roots: vec!["Library/PackageCache/".to_string()],
        }
    }

    /// Load `slnsync.toml` from `directory` if present, else defaults
    pub fn load(directory: &Path) -> SlnResult<Self> {
        let path = directory.join("slnsync.toml");
        if !path.exists() {
            return Ok(Self::for_directory(directory));
        }
        let text = std::fs::read_to_string(&path)?;
        let file: SettingsFile = toml::from_str(&text).map_err(|e| SlnError::InvalidSettings {
            file: path.clone(),
            message: e.to_string(),
        })?;
        Ok(file.apply_to(Self::for_directory(directory)))
    }

    /// Whether `extension` (without dot) is a recognized member-file extension
    pub fn is_supported_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        BUILTIN_EXTENSIONS
            .iter()
            .any(|builtin| builtin.eq_ignore_ascii_case(extension))
            || self
                .extra_extensions
                .iter()
                .any(|extra| extra.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }

    /// Whether `path` lies under a non-internalized external-package root
    pub fn is_external_package_path(&self, path: &str) -> bool {
        let normalized = path.replace('\\', "/");
        self.package_roots
            .iter()
            .any(|root| normalized.starts_with(root.as_str()))
    }
}

/// On-disk TOML form; every field optional
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    project_name: Option<String>,
    flavor: Option<IdeFlavor>,
    #[serde(default)]
    extra_extensions: Vec<String>,
    root_namespace: Option<String>,
    output_root: Option<String>,
    runtime_libraries: Option<Vec<String>>,
    internal_allowlist: Option<Vec<String>>,
    package_roots: Option<Vec<String>>,
}

impl SettingsFile {
    fn apply_to(self, mut settings: GenerationSettings) -> GenerationSettings {
        if let Some(project_name) = self.project_name {
            settings.project_name = project_name;
        }
        if let Some(flavor) = self.flavor {
            settings.flavor = flavor;
        }
        settings.extra_extensions = self.extra_extensions;
        if let Some(root_namespace) = self.root_namespace {
            settings.root_namespace = root_namespace;
        }
        if let Some(output_root) = self.output_root {
            settings.output_root = output_root;
        }
        if let Some(runtime_libraries) = self.runtime_libraries {
            settings.runtime_libraries = runtime_libraries;
        }
        if let Some(internal_allowlist) = self.internal_allowlist {
            settings.internal_allowlist = internal_allowlist;
        }
        if let Some(package_roots) = self.package_roots {
            settings.package_roots = package_roots;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_project_name_from_directory() {
        let settings = GenerationSettings::for_directory(Path::new("/work/MyGame"));
        assert_eq!(settings.project_name, "MyGame");
        assert_eq!(settings.output_root, "Library/ScriptAssemblies");
    }

    #[test]
    fn builtin_extensions_recognized_with_or_without_dot() {
        let settings = GenerationSettings::for_directory(Path::new("/work/MyGame"));
        assert!(settings.is_supported_extension("cs"));
        assert!(settings.is_supported_extension(".cs"));
        assert!(settings.is_supported_extension("SHADER"));
        assert!(!settings.is_supported_extension("png"));
    }

    #[test]
    fn extra_extensions_extend_the_builtin_set() {
        let mut settings = GenerationSettings::for_directory(Path::new("/work/MyGame"));
        settings.extra_extensions = vec!["proto".to_string()];
        assert!(settings.is_supported_extension("proto"));
    }

    #[test]
    fn package_paths_detected_by_prefix() {
        let settings = GenerationSettings::for_directory(Path::new("/work/MyGame"));
        assert!(settings.is_external_package_path("Library/PackageCache/com.vendor.pkg/File.cs"));
        assert!(settings.is_external_package_path(r"Library\PackageCache\com.vendor.pkg\File.cs"));
        assert!(!settings.is_external_package_path("Assets/Game/File.cs"));
    }

    #[test]
    fn settings_file_overrides_apply() {
        let file: SettingsFile = toml::from_str(
            r#"
project_name = "Renamed"
flavor = "vs-code"
extra_extensions = ["proto"]
output_root = "Build/Assemblies"
"#,
        )
        .unwrap();
        let settings = file.apply_to(GenerationSettings::for_directory(Path::new("/work/MyGame")));
        assert_eq!(settings.project_name, "Renamed");
        assert_eq!(settings.flavor, IdeFlavor::VsCode);
        assert_eq!(settings.extra_extensions, vec!["proto".to_string()]);
        assert_eq!(settings.output_root, "Build/Assemblies");
        // Untouched fields keep their defaults.
        assert_eq!(settings.package_roots, vec!["Library/PackageCache/".to_string()]);
    }

    #[test]
    fn unknown_settings_key_is_rejected() {
        let result: Result<SettingsFile, _> = toml::from_str("unknown_key = 1");
        assert!(result.is_err());
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GenerationSettings::load(dir.path()).unwrap();
        assert_eq!(settings.flavor, IdeFlavor::VisualStudio);
    }

    #[test]
    fn load_with_invalid_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("slnsync.toml"), "not = [valid").unwrap();
        let err = GenerationSettings::load(dir.path()).unwrap_err();
        assert!(matches!(err, SlnError::InvalidSettings { .. }));
    }
}
