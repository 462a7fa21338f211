//! Compiled-unit input records
//!
//! These are read-only snapshots supplied by the compiler front end for
//! one generation pass. Nothing here is produced by this crate.

use serde::{Deserialize, Serialize};

use crate::error::{SlnError, SlnResult};

/// Source language marker on a compiled unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    #[default]
    CSharp,
    /// Non-code unit; no project file is generated for it
    None,
}

impl ScriptLanguage {
    /// Project file extension for this language.
    ///
    /// Languages without a registered extension are a configuration error.
    pub fn project_extension(&self) -> SlnResult<&'static str> {
        match self {
            ScriptLanguage::CSharp => Ok(".csproj"),
            ScriptLanguage::None => Err(SlnError::UnsupportedLanguage {
                language: "none".to_string(),
            }),
        }
    }

    /// Whether units of this language get their own generated project
    pub fn generates_project(&self) -> bool {
        matches!(self, ScriptLanguage::CSharp)
    }
}

/// Externally parsed compiler response-file data.
///
/// Parse errors do not abort the owning unit; the entries that parsed are
/// still applied and each error surfaces as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFileData {
    pub path: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub unsafe_code: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// One compiled unit as reported by the compiler front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledUnit {
    /// Assembly name, unique within the pass
    pub name: String,
    /// Compiled output path, e.g. `Library/ScriptAssemblies/Core.dll`
    pub output: String,
    #[serde(default)]
    pub files: Vec<String>,
    /// Raw reference strings, unclassified
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub allow_unsafe: bool,
    #[serde(default)]
    pub language: ScriptLanguage,
    #[serde(default)]
    pub response_files: Vec<ResponseFileData>,
}

impl CompiledUnit {
    /// Output file name without directory or extension
    pub fn output_name(&self) -> &str {
        let file = self
            .output
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.output);
        file.strip_suffix(".dll")
            .or_else(|| file.rsplit_once('.').map(|(stem, _)| stem))
            .unwrap_or(file)
    }

    /// Output file name including extension
    pub fn output_file(&self) -> &str {
        self.output
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.output)
    }

    /// Whether this unit's output is an editor-context assembly
    pub fn is_editor_unit(&self) -> bool {
        self.output_name().ends_with("-Editor")
    }
}
