//! Raw reference classification
//!
//! Every raw reference string a unit carries lands in exactly one of four
//! buckets: dropped entirely, a link to another generated project, a
//! precompiled external library, or an allow-listed internal assembly for
//! editor projects. Detecting "one of our own projects" is a literal
//! prefix/suffix match against the compiled-output directory convention.

use std::collections::HashSet;

use crate::config::GenerationSettings;
use crate::error::Warning;

/// Classification of one raw reference token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Dropped: runtime library, invalid assembly, or dangling project output
    Skip,
    /// Reference to another project generated in this pass
    Project { name: String },
    /// External precompiled managed library
    Precompiled { path: String },
    /// Allow-listed internal assembly, editor projects only
    InternalAdditional { path: String },
}

/// Managed-assembly validity probe, supplied by the host toolchain
pub trait AssemblyProbe {
    /// Whether the path points at a loadable managed assembly
    fn is_managed(&self, path: &str) -> bool;

    /// Whether the path lies in the toolchain's internal library area
    fn is_internal(&self, path: &str) -> bool;
}

/// Default probe: extension check for managed, prefix check for internal
#[derive(Debug, Clone)]
pub struct ExtensionProbe {
    pub internal_roots: Vec<String>,
}

impl Default for ExtensionProbe {
    fn default() -> Self {
        Self {
            internal_roots: vec!["Engine/Managed/".to_string()],
        }
    }
}

impl AssemblyProbe for ExtensionProbe {
    fn is_managed(&self, path: &str) -> bool {
        has_dll_extension(path)
    }

    fn is_internal(&self, path: &str) -> bool {
        let normalized = path.replace('\\', "/");
        self.internal_roots
            .iter()
            .any(|root| normalized.contains(root.as_str()))
    }
}

fn has_dll_extension(path: &str) -> bool {
    path.len() >= 4
        && path
            .get(path.len() - 4..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(".dll"))
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Classifies raw references for one generation pass.
///
/// `included_projects` is the set of unit names that survived filtering;
/// project-output references to anything else are dropped so the output
/// never carries dangling project links.
pub struct ReferenceClassifier<'a> {
    settings: &'a GenerationSettings,
    probe: &'a dyn AssemblyProbe,
    included_projects: HashSet<String>,
    seen_internal: HashSet<String>,
    warnings: Vec<Warning>,
}

impl<'a> ReferenceClassifier<'a> {
    pub fn new(
        settings: &'a GenerationSettings,
        probe: &'a dyn AssemblyProbe,
        included_projects: HashSet<String>,
    ) -> Self {
        Self {
            settings,
            probe,
            included_projects,
            seen_internal: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Classify one reference; `editor_project` gates internal references
    pub fn classify(&mut self, reference: &str, editor_project: bool) -> ReferenceKind {
        let name = file_name(reference);
        if self
            .settings
            .runtime_libraries
            .iter()
            .any(|library| library.eq_ignore_ascii_case(name))
        {
            return ReferenceKind::Skip;
        }

        if let Some(project) = self.match_project_output(reference) {
            if self.included_projects.contains(&project) {
                return ReferenceKind::Project { name: project };
            }
            // Output-pattern match for a unit filtered out of this pass.
            return ReferenceKind::Skip;
        }

        if !self.probe.is_managed(reference) {
            if has_dll_extension(reference) {
                self.warnings.push(Warning::InvalidAssembly {
                    path: reference.to_string(),
                });
            }
            return ReferenceKind::Skip;
        }

        if self.probe.is_internal(reference) {
            if !editor_project {
                return ReferenceKind::Skip;
            }
            if !self
                .settings
                .internal_allowlist
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(name))
            {
                return ReferenceKind::Skip;
            }
            if !self.seen_internal.insert(name.to_ascii_lowercase()) {
                return ReferenceKind::Skip;
            }
            return ReferenceKind::InternalAdditional {
                path: reference.to_string(),
            };
        }

        ReferenceKind::Precompiled {
            path: reference.to_string(),
        }
    }

    /// Match `<output-root>/<name>.dll`, case-insensitively, any separator
    fn match_project_output(&self, reference: &str) -> Option<String> {
        let normalized = reference.replace('\\', "/");
        let root = self.settings.output_root.replace('\\', "/");
        if normalized.len() <= root.len() + 1 || !normalized.is_char_boundary(root.len()) {
            return None;
        }
        let (prefix, rest) = normalized.split_at(root.len());
        if !prefix.eq_ignore_ascii_case(&root) || !rest.starts_with('/') {
            return None;
        }
        let file = &rest[1..];
        if file.contains('/') || !has_dll_extension(file) {
            return None;
        }
        Some(file[..file.len() - 4].to_string())
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}
