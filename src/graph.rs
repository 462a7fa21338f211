//! Project graph assembly
//!
//! Turns the narrowed set of compiled units into one project descriptor
//! per language-relevant unit plus a solution descriptor. Descriptors are
//! built fresh every pass and carry no state beyond their deterministic
//! identities. Output is independent of input iteration order: solution
//! entries are sorted by display name and compile files keep first-seen
//! order.

use std::collections::{HashMap, HashSet};

use crate::config::{GenerationSettings, SCRIPT_EXTENSION};
use crate::error::{SlnResult, Warning};
use crate::identity::IdentityGenerator;
use crate::refs::{AssemblyProbe, ReferenceClassifier, ReferenceKind};
use crate::units::{CompiledUnit, ScriptLanguage};

/// Resolves which assembly a loose (non-script) asset belongs to.
///
/// Ownership is decided outside this crate; a plain map keyed by asset
/// path is a valid provider.
pub trait AssetOwnershipProvider {
    fn owning_assembly(&self, asset_path: &str) -> Option<String>;
}

impl AssetOwnershipProvider for HashMap<String, String> {
    fn owning_assembly(&self, asset_path: &str) -> Option<String> {
        self.get(asset_path).cloned()
    }
}

/// A resolved cross-project link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLink {
    pub name: String,
    pub identity: String,
}

/// One generated project, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDescriptor {
    pub identity: String,
    /// Display name, the compiled output's file stem
    pub name: String,
    pub language: ScriptLanguage,
    /// Project file name, e.g. `Core.csproj`
    pub file_name: String,
    /// Script members, first-seen order
    pub compile_files: Vec<String>,
    /// Precompiled and internal-additional reference paths
    pub external_references: Vec<String>,
    /// Links to other projects generated in the same pass
    pub project_references: Vec<ProjectLink>,
    /// Associated non-script assets
    pub loose_assets: Vec<String>,
    pub defines: Vec<String>,
    pub allow_unsafe: bool,
}

/// One project entry in the solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    pub project_name: String,
    pub file_name: String,
    pub identity: String,
    pub type_identity: String,
}

/// The solution, ordered by display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDescriptor {
    pub name: String,
    pub entries: Vec<SolutionEntry>,
}

/// Result of one graph build
#[derive(Debug, Clone)]
pub struct GraphOutput {
    pub solution: SolutionDescriptor,
    pub projects: Vec<ProjectDescriptor>,
    pub warnings: Vec<Warning>,
}

/// Builds the per-pass project graph
pub struct ProjectGraphBuilder<'a> {
    settings: &'a GenerationSettings,
    identity: &'a IdentityGenerator,
    probe: &'a dyn AssemblyProbe,
    asset_paths: &'a [String],
    ownership: &'a dyn AssetOwnershipProvider,
}

impl<'a> ProjectGraphBuilder<'a> {
    pub fn new(
        settings: &'a GenerationSettings,
        identity: &'a IdentityGenerator,
        probe: &'a dyn AssemblyProbe,
        asset_paths: &'a [String],
        ownership: &'a dyn AssetOwnershipProvider,
    ) -> Self {
        Self {
            settings,
            identity,
            probe,
            asset_paths,
            ownership,
        }
    }

    /// Build descriptors for every language-relevant unit.
    ///
    /// `units` must already be narrowed by the compatibility and
    /// file-inclusion filters; anything passed here is considered part of
    /// the pass for project-reference resolution.
    pub fn build(&self, units: &[CompiledUnit]) -> SlnResult<GraphOutput> {
        let relevant: Vec<&CompiledUnit> = units
            .iter()
            .filter(|unit| unit.language.generates_project())
            .collect();

        let included: HashSet<String> = relevant
            .iter()
            .map(|unit| unit.output_name().to_string())
            .collect();

        let loose_assets = self.collect_loose_assets();
        let mut classifier = ReferenceClassifier::new(
            self.settings,
            self.probe,
            included,
        );

        let mut warnings = Vec::new();
        let mut projects = Vec::new();
        for unit in &relevant {
            projects.push(self.build_project(unit, &mut classifier, &loose_assets, &mut warnings)?);
        }
        warnings.extend(classifier.take_warnings());

        let mut entries: Vec<SolutionEntry> = projects
            .iter()
            .map(|project| SolutionEntry {
                project_name: project.name.clone(),
                file_name: project.file_name.clone(),
                identity: project.identity.clone(),
                type_identity: self.identity.project_type_identity(project.language),
            })
            .collect();
        entries.sort_by(|a, b| a.project_name.cmp(&b.project_name));

        Ok(GraphOutput {
            solution: SolutionDescriptor {
                name: self.settings.project_name.clone(),
                entries,
            },
            projects,
            warnings,
        })
    }

    fn build_project(
        &self,
        unit: &CompiledUnit,
        classifier: &mut ReferenceClassifier<'_>,
        loose_assets: &HashMap<String, Vec<String>>,
        warnings: &mut Vec<Warning>,
    ) -> SlnResult<ProjectDescriptor> {
        let name = unit.output_name().to_string();
        let editor_project = unit.is_editor_unit();

        // Split members into compile entries and binaries; binaries join
        // the reference candidates.
        let mut compile_files = Vec::new();
        let mut candidates = Vec::new();
        for file in &unit.files {
            if self.settings.is_external_package_path(file) {
                continue;
            }
            if file.to_ascii_lowercase().ends_with(".dll") {
                candidates.push(file.clone());
            } else if self.settings.is_supported_extension(extension_of(file)) {
                compile_files.push(file.clone());
            }
        }

        for response in &unit.response_files {
            for error in &response.errors {
                warnings.push(Warning::ResponseFileParse {
                    file: response.path.clone(),
                    message: error.clone(),
                });
            }
        }

        // Declared unit references and response-file references join the
        // binaries in one de-duplicated, ordered candidate list.
        let mut seen = HashSet::new();
        candidates.extend(unit.references.iter().cloned());
        candidates.extend(
            unit.response_files
                .iter()
                .flat_map(|response| response.references.iter().cloned()),
        );
        candidates.retain(|candidate| seen.insert(candidate.clone()));

        let mut external_references = Vec::new();
        let mut project_references: Vec<ProjectLink> = Vec::new();
        for candidate in &candidates {
            match classifier.classify(candidate, editor_project) {
                ReferenceKind::Skip => {}
                ReferenceKind::Project { name: target } => {
                    if target != name
                        && !project_references.iter().any(|link| link.name == target)
                    {
                        let identity = self.identity.project_identity(&target);
                        project_references.push(ProjectLink {
                            name: target,
                            identity,
                        });
                    }
                }
                ReferenceKind::Precompiled { path }
                | ReferenceKind::InternalAdditional { path } => {
                    external_references.push(path);
                }
            }
        }

        let mut defines: Vec<String> = vec!["DEBUG".to_string(), "TRACE".to_string()];
        defines.extend(unit.defines.iter().cloned());
        defines.extend(
            unit.response_files
                .iter()
                .flat_map(|response| response.defines.iter().cloned()),
        );
        let mut seen_defines = HashSet::new();
        defines.retain(|define| seen_defines.insert(define.clone()));

        let allow_unsafe = unit.allow_unsafe
            || unit
                .response_files
                .iter()
                .any(|response| response.unsafe_code);

        let file_name = format!("{name}{}", unit.language.project_extension()?);

        Ok(ProjectDescriptor {
            identity: self.identity.project_identity(&name),
            name: name.clone(),
            language: unit.language,
            file_name,
            compile_files,
            external_references,
            project_references,
            loose_assets: loose_assets.get(&name).cloned().unwrap_or_default(),
            defines,
            allow_unsafe,
        })
    }

    /// Group loose, non-script assets by their owning assembly name
    fn collect_loose_assets(&self) -> HashMap<String, Vec<String>> {
        let mut by_assembly: HashMap<String, Vec<String>> = HashMap::new();
        for asset in self.asset_paths {
            if self.settings.is_external_package_path(asset) {
                continue;
            }
            let extension = extension_of(asset);
            if extension.eq_ignore_ascii_case(SCRIPT_EXTENSION)
                || !self.settings.is_supported_extension(extension)
            {
                continue;
            }
            if let Some(owner) = self.ownership.owning_assembly(asset) {
                by_assembly.entry(owner).or_default().push(asset.clone());
            }
        }
        by_assembly
    }
}

fn extension_of(path: &str) -> &str {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}
