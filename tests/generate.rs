//! End-to-end generation tests for a small two-assembly project:
//! `Core` plus a `Core.Tests` test assembly that references it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use slnsync::{
    AssemblyDescriptor, AssemblyDescriptorData, BuildContext, BuildTarget, CompiledUnit,
    GenerationSettings, PlatformCatalog, ScriptLanguage, SyncInput, Synchronizer,
};

fn unit(name: &str, references: &[&str]) -> CompiledUnit {
    CompiledUnit {
        name: name.to_string(),
        output: format!("Library/ScriptAssemblies/{name}.dll"),
        files: vec![
            format!("Assets/{name}/First.cs"),
            format!("Assets/{name}/Second.cs"),
        ],
        references: references.iter().map(|r| r.to_string()).collect(),
        defines: vec![],
        allow_unsafe: false,
        language: ScriptLanguage::CSharp,
        response_files: vec![],
    }
}

fn descriptor(name: &str, json: &str) -> (String, AssemblyDescriptor) {
    let path = PathBuf::from(format!("Assets/{name}/{name}.adef"));
    let data = AssemblyDescriptorData::from_json(&path, json).unwrap();
    let descriptor =
        AssemblyDescriptor::from_data(&path, &data, &PlatformCatalog::standard()).unwrap();
    (name.to_string(), descriptor)
}

fn core_project_input() -> SyncInput {
    let descriptors: HashMap<String, AssemblyDescriptor> = [
        descriptor("Core", r#"{"name": "Core"}"#),
        descriptor(
            "Core.Tests",
            r#"{"name": "Core.Tests", "references": ["Core"], "flags": ["TestAssembly"]}"#,
        ),
    ]
    .into_iter()
    .collect();

    SyncInput {
        units: vec![
            unit("Core", &[]),
            unit("Core.Tests", &["Library/ScriptAssemblies/Core.dll"]),
        ],
        descriptors,
        asset_paths: vec![],
        asset_owners: HashMap::new(),
    }
}

fn synchronizer(directory: &Path) -> Synchronizer {
    Synchronizer::new(GenerationSettings::for_directory(directory))
}

#[test]
fn editor_pass_without_tests_generates_core_only() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let context = BuildContext::editor(vec!["EDITOR".to_string()]);

    let report = sync.sync(&core_project_input(), &context).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.written.len(), 2);

    let solution = fs::read_to_string(sync.solution_path()).unwrap();
    assert!(solution.contains("\"Core\", \"Core.csproj\""));
    assert!(!solution.contains("Core.Tests"));
    assert!(!dir.path().join("Core.Tests.csproj").exists());
}

#[test]
fn editor_pass_with_tests_generates_both_projects() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let context = BuildContext::editor(vec!["EDITOR".to_string()]).with_test_assemblies(true);

    let report = sync.sync(&core_project_input(), &context).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.written.len(), 3);

    let solution = fs::read_to_string(sync.solution_path()).unwrap();
    assert!(solution.contains("\"Core\", \"Core.csproj\""));
    assert!(solution.contains("\"Core.Tests\", \"Core.Tests.csproj\""));

    let tests_project = fs::read_to_string(dir.path().join("Core.Tests.csproj")).unwrap();
    assert!(tests_project.contains("<ProjectReference Include=\"Core.csproj\">"));
    assert!(tests_project.contains("<Compile Include=\"Assets\\Core.Tests\\First.cs\" />"));
}

#[test]
fn player_pass_drops_test_assembly_unless_requested() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let input = core_project_input();

    let without = BuildContext::player(BuildTarget::Windows, vec!["PLAYER".to_string()]);
    sync.sync(&input, &without).unwrap();
    assert!(dir.path().join("Core.csproj").exists());
    assert!(!dir.path().join("Core.Tests.csproj").exists());

    let with = without.with_test_assemblies(true);
    sync.sync(&input, &with).unwrap();
    assert!(dir.path().join("Core.Tests.csproj").exists());
}

#[test]
fn dangling_project_reference_leaves_no_trace_in_output() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let context = BuildContext::player(BuildTarget::Windows, vec!["PLAYER".to_string()]);

    // Core.Tests is filtered out of this pass; its output reference in
    // another unit must not surface as a project or assembly reference.
    let mut input = core_project_input();
    input.units[0].references = vec!["Library/ScriptAssemblies/Core.Tests.dll".to_string()];
    sync.sync(&input, &context).unwrap();

    let core = fs::read_to_string(dir.path().join("Core.csproj")).unwrap();
    assert!(!core.contains("Core.Tests"));
}

#[test]
fn second_pass_rewrites_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let context = BuildContext::editor(vec!["EDITOR".to_string()]);
    let input = core_project_input();

    sync.sync(&input, &context).unwrap();
    let report = sync.sync(&input, &context).unwrap();
    assert!(report.written.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(report.diffs.is_empty());
}

#[test]
fn unit_order_does_not_change_output_bytes() {
    let context = BuildContext::editor(vec!["EDITOR".to_string()]).with_test_assemblies(true);
    let forward_dir = tempfile::tempdir().unwrap();
    let reversed_dir = tempfile::tempdir().unwrap();

    // Same project name in both directories so identities match.
    let mut forward_settings = GenerationSettings::for_directory(forward_dir.path());
    forward_settings.project_name = "Game".to_string();
    let mut reversed_settings = GenerationSettings::for_directory(reversed_dir.path());
    reversed_settings.project_name = "Game".to_string();

    let forward_input = core_project_input();
    let mut reversed_input = core_project_input();
    reversed_input.units.reverse();

    Synchronizer::new(forward_settings)
        .sync(&forward_input, &context)
        .unwrap();
    Synchronizer::new(reversed_settings)
        .sync(&reversed_input, &context)
        .unwrap();

    for file in ["Game.sln", "Core.csproj", "Core.Tests.csproj"] {
        let forward = fs::read_to_string(forward_dir.path().join(file)).unwrap();
        let reversed = fs::read_to_string(reversed_dir.path().join(file)).unwrap();
        assert_eq!(forward, reversed, "{file} differs across input orders");
    }
}

#[test]
fn identities_survive_regeneration_from_scratch() {
    let context = BuildContext::editor(vec!["EDITOR".to_string()]);
    let read_identity = |dir: &Path| {
        let text = fs::read_to_string(dir.join("Core.csproj")).unwrap();
        let start = text.find("<ProjectGuid>").unwrap();
        let end = text.find("</ProjectGuid>").unwrap();
        text[start..end].to_string()
    };

    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    for dir in [first_dir.path(), second_dir.path()] {
        let mut settings = GenerationSettings::for_directory(dir);
        settings.project_name = "Game".to_string();
        Synchronizer::new(settings)
            .sync(&core_project_input(), &context)
            .unwrap();
    }
    assert_eq!(read_identity(first_dir.path()), read_identity(second_dir.path()));
}

#[test]
fn externally_modified_output_is_restored_with_a_diff_report() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let context = BuildContext::editor(vec!["EDITOR".to_string()]);
    let input = core_project_input();

    sync.sync(&input, &context).unwrap();
    let path = dir.path().join("Core.csproj");
    let original = fs::read_to_string(&path).unwrap();
    fs::write(&path, original.replacen("latest", "9.0", 1)).unwrap();

    let report = sync.sync(&input, &context).unwrap();
    assert_eq!(report.written, vec![path.clone()]);
    assert_eq!(report.diffs.len(), 1);
    let diff = &report.diffs[0];
    assert_eq!(diff.path, path);
    assert!(diff.old_lines[0].contains("9.0"));
    assert!(diff.new_lines[0].contains("latest"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn incompatible_descriptor_excludes_its_unit() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let context = BuildContext::player(BuildTarget::Windows, vec!["PLAYER".to_string()]);

    let mut input = core_project_input();
    let (name, excluded) = descriptor(
        "Core",
        r#"{"name": "Core", "excludePlatforms": ["Windows"]}"#,
    );
    input.descriptors.insert(name, excluded);

    sync.sync(&input, &context).unwrap();
    assert!(!dir.path().join("Core.csproj").exists());
}

#[test]
fn empty_context_defines_abort_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let sync = synchronizer(dir.path());
    let context = BuildContext::player(BuildTarget::Windows, vec![]);
    let result = sync.sync(&core_project_input(), &context);
    assert!(result.is_err());
    assert!(!sync.solution_path().exists());
}
