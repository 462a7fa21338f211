//! Command-line interface
//!
//! The binary reads one JSON pass manifest describing the compiled units,
//! assembly manifests, and build context, and drives a generation pass
//! against a project directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::config::{GenerationSettings, IdeFlavor};
use crate::context::BuildContext;
use crate::descriptor::{AssemblyDescriptor, AssemblyDescriptorData, DirectoryMetadata};
use crate::platform::PlatformCatalog;
use crate::sync::{SyncInput, SyncReport, Synchronizer};
use crate::units::CompiledUnit;

/// slnsync - IDE solution and project generator for script assemblies
#[derive(Parser, Debug)]
#[command(name = "slnsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full generation pass
    Generate {
        /// Path to the JSON pass manifest
        #[arg(short, long)]
        manifest: PathBuf,

        /// Project directory the solution is written into
        #[arg(short, long, default_value = ".")]
        project_dir: PathBuf,

        /// Override the configured IDE flavor
        #[arg(long, value_enum)]
        flavor: Option<IdeFlavor>,

        /// Include test assemblies outside editor builds
        #[arg(long)]
        include_tests: bool,
    },

    /// Regenerate only if any touched file is relevant
    Sync {
        /// Path to the JSON pass manifest
        #[arg(short, long)]
        manifest: PathBuf,

        /// Project directory the solution is written into
        #[arg(short, long, default_value = ".")]
        project_dir: PathBuf,

        /// Touched source or asset paths
        #[arg(long, value_delimiter = ',')]
        affected: Vec<String>,

        /// Reimported files (manifests, binaries)
        #[arg(long, value_delimiter = ',')]
        reimported: Vec<String>,

        /// Include test assemblies outside editor builds
        #[arg(long)]
        include_tests: bool,
    },
}

/// On-disk JSON form of one pass manifest
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PassManifest {
    context: BuildContext,
    #[serde(default)]
    units: Vec<CompiledUnit>,
    #[serde(default)]
    manifests: Vec<ManifestEntry>,
    /// Source roots whose assemblies may ship tests
    #[serde(default)]
    testable_roots: Vec<String>,
    #[serde(default)]
    asset_paths: Vec<String>,
    #[serde(default)]
    asset_owners: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    path: String,
    #[serde(flatten)]
    data: AssemblyDescriptorData,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            manifest,
            project_dir,
            flavor,
            include_tests,
        } => {
            let (input, context) = load_manifest(&manifest, include_tests)?;
            let mut settings = GenerationSettings::load(&project_dir)?;
            if let Some(flavor) = flavor {
                settings.flavor = flavor;
            }
            let synchronizer = Synchronizer::new(settings);
            let report = synchronizer.sync(&input, &context)?;
            print_report(&report);
            if !report.is_clean() {
                bail!("{} file(s) could not be written", report.failures.len());
            }
            Ok(())
        }
        Commands::Sync {
            manifest,
            project_dir,
            affected,
            reimported,
            include_tests,
        } => {
            let (input, context) = load_manifest(&manifest, include_tests)?;
            let settings = GenerationSettings::load(&project_dir)?;
            let synchronizer = Synchronizer::new(settings);
            match synchronizer.sync_if_needed(&input, &context, &affected, &reimported)? {
                Some(report) => {
                    print_report(&report);
                    if !report.is_clean() {
                        bail!("{} file(s) could not be written", report.failures.len());
                    }
                }
                None => println!("up to date, nothing to regenerate"),
            }
            Ok(())
        }
    }
}

/// Read the pass manifest and resolve its assembly descriptors
fn load_manifest(path: &Path, include_tests: bool) -> Result<(SyncInput, BuildContext)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading pass manifest {}", path.display()))?;
    let manifest: PassManifest = serde_json::from_str(&text)
        .with_context(|| format!("parsing pass manifest {}", path.display()))?;

    let catalog = PlatformCatalog::standard();
    let mut descriptors = HashMap::new();
    for entry in &manifest.manifests {
        let manifest_path = PathBuf::from(&entry.path);
        let mut descriptor =
            AssemblyDescriptor::from_data(&manifest_path, &entry.data, &catalog)?;
        if !manifest.testable_roots.is_empty() {
            let normalized = entry.path.replace('\\', "/");
            let is_testable = manifest
                .testable_roots
                .iter()
                .any(|root| normalized.starts_with(root.as_str()));
            descriptor = descriptor.with_directory_metadata(DirectoryMetadata { is_testable });
        }
        descriptors.insert(descriptor.name.clone(), descriptor);
    }

    // The flag can only widen what the manifest context already allows.
    let context = if include_tests {
        manifest.context.with_test_assemblies(true)
    } else {
        manifest.context
    };
    Ok((
        SyncInput {
            units: manifest.units,
            descriptors,
            asset_paths: manifest.asset_paths,
            asset_owners: manifest.asset_owners,
        },
        context,
    ))
}

fn print_report(report: &SyncReport) {
    for path in &report.written {
        println!("wrote   {}", path.display());
    }
    for path in &report.skipped {
        println!("skipped {}", path.display());
    }
    for diff in &report.diffs {
        print!("{diff}");
    }
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for failure in &report.failures {
        eprintln!("error: {failure}");
    }
    println!(
        "{} written, {} unchanged, {} warning(s)",
        report.written.len(),
        report.skipped.len(),
        report.warnings.len()
    );
}
