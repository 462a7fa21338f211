//! Generation-pass orchestration
//!
//! `Synchronizer` ties the pieces together: narrow the compiled units by
//! compatibility and member relevance, build the project graph, render,
//! and write everything through the change-detecting writer. It also
//! answers the incremental question: given a set of touched files, does a
//! pass need to run at all?

use std::collections::HashMap;
use std::path::PathBuf;

use crate::compat::is_compatible;
use crate::config::{GenerationSettings, IdeFlavor};
use crate::context::BuildContext;
use crate::descriptor::AssemblyDescriptor;
use crate::error::{SlnResult, Warning};
use crate::graph::ProjectGraphBuilder;
use crate::identity::IdentityGenerator;
use crate::refs::{AssemblyProbe, ExtensionProbe};
use crate::render::{render_project, render_solution};
use crate::units::CompiledUnit;
use crate::writer::{DiffReport, OutputSynchronizer, WriteOutcome};

/// Manifest-style extensions that always make a touched file relevant
const REIMPORT_SYNC_EXTENSIONS: &[&str] = &["dll", "adef", "aref"];

/// Everything one generation pass consumes
#[derive(Debug, Clone, Default)]
pub struct SyncInput {
    pub units: Vec<CompiledUnit>,
    /// Assembly descriptors keyed by unit name; units without one are
    /// unconditional
    pub descriptors: HashMap<String, AssemblyDescriptor>,
    /// All project asset paths, for loose-asset association
    pub asset_paths: Vec<String>,
    /// Asset path to owning assembly name
    pub asset_owners: HashMap<String, String>,
}

/// What a completed pass did
#[derive(Debug, Default)]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<Warning>,
    pub warnings: Vec<Warning>,
    pub diffs: Vec<DiffReport>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs generation passes for one project directory
pub struct Synchronizer {
    settings: GenerationSettings,
    identity: IdentityGenerator,
    probe: Box<dyn AssemblyProbe>,
}

impl Synchronizer {
    pub fn new(settings: GenerationSettings) -> Self {
        let identity = IdentityGenerator::new(&settings.project_name);
        Self {
            settings,
            identity,
            probe: Box::new(ExtensionProbe::default()),
        }
    }

    pub fn with_probe(mut self, probe: Box<dyn AssemblyProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Path of the solution file this synchronizer maintains
    pub fn solution_path(&self) -> PathBuf {
        self.settings
            .project_directory
            .join(format!("{}.sln", self.settings.project_name))
    }

    /// Whether `path` belongs in the generated solution at all
    pub fn should_file_be_in_solution(&self, path: &str) -> bool {
        if self.settings.is_external_package_path(path) {
            return false;
        }
        let extension = extension_of(path);
        REIMPORT_SYNC_EXTENSIONS
            .iter()
            .any(|sync| sync.eq_ignore_ascii_case(extension))
            || self.settings.is_supported_extension(extension)
    }

    /// Run a pass only when one of the touched files warrants it.
    ///
    /// Returns `Ok(None)` when no solution exists yet (nothing to keep in
    /// sync) or when none of the touched files is relevant.
    pub fn sync_if_needed(
        &self,
        input: &SyncInput,
        context: &BuildContext,
        affected: &[String],
        reimported: &[String],
    ) -> SlnResult<Option<SyncReport>> {
        if !self.solution_path().exists() {
            return Ok(None);
        }
        let relevant = affected
            .iter()
            .any(|path| self.should_file_be_in_solution(path))
            || reimported.iter().any(|path| {
                let extension = extension_of(path);
                REIMPORT_SYNC_EXTENSIONS
                    .iter()
                    .any(|sync| sync.eq_ignore_ascii_case(extension))
            });
        if !relevant {
            return Ok(None);
        }
        self.sync(input, context).map(Some)
    }

    /// Run one full generation pass
    pub fn sync(&self, input: &SyncInput, context: &BuildContext) -> SlnResult<SyncReport> {
        let units = self.narrow_units(input, context)?;
        let builder = ProjectGraphBuilder::new(
            &self.settings,
            &self.identity,
            self.probe.as_ref(),
            &input.asset_paths,
            &input.asset_owners,
        );
        let output = builder.build(&units)?;

        let mut report = SyncReport {
            warnings: output.warnings,
            ..SyncReport::default()
        };
        let mut writer = OutputSynchronizer::new();

        let solution_path = self.solution_path();
        let solution_text = render_solution(&output.solution);
        record(
            &mut report,
            writer.write_if_changed(&solution_path, &solution_text),
            solution_path,
        );

        for project in &output.projects {
            let path = self.settings.project_directory.join(&project.file_name);
            let text = render_project(project, &self.settings);
            record(&mut report, writer.write_if_changed(&path, &text), path);
        }

        if self.settings.flavor == IdeFlavor::VsCode {
            let path = self
                .settings
                .project_directory
                .join(".vscode")
                .join("settings.json");
            record(
                &mut report,
                writer.write_if_absent(&path, &vscode_settings()),
                path,
            );
        }

        report.diffs = writer.diffs().to_vec();
        report.failures = writer.take_failures();
        Ok(report)
    }

    /// Drop units with no solution-worthy members or an incompatible
    /// descriptor. Configuration errors in a descriptor abort the pass.
    fn narrow_units(
        &self,
        input: &SyncInput,
        context: &BuildContext,
    ) -> SlnResult<Vec<CompiledUnit>> {
        let mut kept = Vec::new();
        for unit in &input.units {
            if !unit
                .files
                .iter()
                .any(|file| self.should_file_be_in_solution(file))
            {
                continue;
            }
            if let Some(descriptor) = input.descriptors.get(&unit.name) {
                // The resolver only gates test assemblies outside editor
                // builds; generated output drops them whenever test
                // inclusion is off.
                if descriptor.is_test_assembly && !context.include_test_assemblies {
                    continue;
                }
                if !is_compatible(descriptor, context)? {
                    continue;
                }
            }
            kept.push(unit.clone());
        }
        Ok(kept)
    }
}

fn record(report: &mut SyncReport, outcome: WriteOutcome, path: PathBuf) {
    match outcome {
        WriteOutcome::Written => report.written.push(path),
        WriteOutcome::Skipped => report.skipped.push(path),
        // Recorded by the writer itself.
        WriteOutcome::Failed => {}
    }
}

fn extension_of(path: &str) -> &str {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Default editor workspace settings, written once and never touched again
fn vscode_settings() -> String {
    let settings = serde_json::json!({
        "files.exclude": {
            "**/.DS_Store": true,
            "**/*.csproj": true,
            "**/*.sln": true,
            "Library/": true,
            "Temp/": true,
        }
    });
    let mut text = serde_json::to_string_pretty(&settings).unwrap_or_default();
    text.push('\n');
    text
}
