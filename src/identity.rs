//! Deterministic project identity generation
//!
//! Identities are pure functions of their seed components: the same
//! inputs reproduce byte-identical identifiers across runs, which is what
//! keeps regenerated projects stable for the consuming IDE. No randomness,
//! no timestamps.

use sha2::{Digest, Sha256};

use crate::units::ScriptLanguage;

/// Well-known language-project-type identifier expected by external IDE
/// tooling for C# class library projects. Fixed, never derived.
pub const CSHARP_PROJECT_TYPE: &str = "FAE04EC0-301F-11D3-BF4B-00C04F79EFBC";

/// Derives stable identifiers scoped to one root project name
#[derive(Debug, Clone)]
pub struct IdentityGenerator {
    root_name: String,
}

impl IdentityGenerator {
    pub fn new(root_name: &str) -> Self {
        Self {
            root_name: root_name.to_string(),
        }
    }

    /// Identity for a generated project, seeded by root and assembly name
    pub fn project_identity(&self, assembly_name: &str) -> String {
        identity(&[&self.root_name, assembly_name])
    }

    /// Identity slot for a solution entry's project type.
    ///
    /// C# uses the fixed classification constant; anything else gets a
    /// derived identity so the output is still deterministic.
    pub fn project_type_identity(&self, language: ScriptLanguage) -> String {
        match language {
            ScriptLanguage::CSharp => CSHARP_PROJECT_TYPE.to_string(),
            ScriptLanguage::None => identity(&[&self.root_name]),
        }
    }
}

/// Stable identifier from ordered seed components.
///
/// Components are concatenated in order, digested with SHA-256, and the
/// first 16 bytes are formatted as uppercase 8-4-4-4-12 groups.
pub fn identity(components: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for component in components {
        hasher.update(component.as_bytes());
    }
    let digest = hasher.finalize();
    format_identity(&digest[..16])
}

fn format_identity(bytes: &[u8]) -> String {
    debug_assert_eq!(bytes.len(), 16);
    let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
