//! Text rendering for solution and project files
//!
//! Output uses CRLF line endings and backslash path separators throughout,
//! matching what the consuming IDEs expect regardless of the host platform.
//! Rendering is pure: the same descriptors always produce byte-identical
//! text, so the change detection in the writer stays meaningful.

use crate::config::GenerationSettings;
use crate::graph::{ProjectDescriptor, SolutionDescriptor};

const LINE_ENDING: &str = "\r\n";

/// Render the solution file for one pass
pub fn render_solution(solution: &SolutionDescriptor) -> String {
    let mut lines: Vec<String> = vec![
        String::new(),
        "Microsoft Visual Studio Solution File, Format Version 11.00".to_string(),
        "# Visual Studio 2010".to_string(),
    ];
    for entry in &solution.entries {
        lines.push(format!(
            "Project(\"{{{}}}\") = \"{}\", \"{}\", \"{{{}}}\"",
            entry.type_identity, entry.project_name, entry.file_name, entry.identity
        ));
        lines.push("EndProject".to_string());
    }
    lines.push("Global".to_string());
    lines.push("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution".to_string());
    lines.push("\t\tDebug|Any CPU = Debug|Any CPU".to_string());
    lines.push("\t\tRelease|Any CPU = Release|Any CPU".to_string());
    lines.push("\tEndGlobalSection".to_string());
    lines.push("\tGlobalSection(ProjectConfigurationPlatforms) = postSolution".to_string());
    for entry in &solution.entries {
        for configuration in ["Debug", "Release"] {
            lines.push(format!(
                "\t\t{{{id}}}.{cfg}|Any CPU.ActiveCfg = {cfg}|Any CPU",
                id = entry.identity,
                cfg = configuration
            ));
            lines.push(format!(
                "\t\t{{{id}}}.{cfg}|Any CPU.Build.0 = {cfg}|Any CPU",
                id = entry.identity,
                cfg = configuration
            ));
        }
    }
    lines.push("\tEndGlobalSection".to_string());
    lines.push("\tGlobalSection(SolutionProperties) = preSolution".to_string());
    lines.push("\t\tHideSolutionNode = FALSE".to_string());
    lines.push("\tEndGlobalSection".to_string());
    lines.push("EndGlobal".to_string());
    lines.push(String::new());
    lines.join(LINE_ENDING)
}

/// Render one project file
pub fn render_project(project: &ProjectDescriptor, settings: &GenerationSettings) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<?xml version=\"1.0\" encoding=\"utf-8\"?>".to_string());
    lines.push(
        "<Project ToolsVersion=\"4.0\" DefaultTargets=\"Build\" \
         xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">"
            .to_string(),
    );
    lines.push("  <PropertyGroup>".to_string());
    lines.push("    <LangVersion>latest</LangVersion>".to_string());
    lines.push("    <Configuration Condition=\" '$(Configuration)' == '' \">Debug</Configuration>".to_string());
    lines.push("    <Platform Condition=\" '$(Platform)' == '' \">AnyCPU</Platform>".to_string());
    lines.push(format!(
        "    <ProjectGuid>{{{}}}</ProjectGuid>",
        project.identity
    ));
    lines.push("    <OutputType>Library</OutputType>".to_string());
    lines.push(format!(
        "    <RootNamespace>{}</RootNamespace>",
        escape_xml(&settings.root_namespace)
    ));
    lines.push(format!(
        "    <AssemblyName>{}</AssemblyName>",
        escape_xml(&project.name)
    ));
    lines.push(format!(
        "    <DefineConstants>{}</DefineConstants>",
        escape_xml(&project.defines.join(";"))
    ));
    lines.push(format!(
        "    <AllowUnsafeBlocks>{}</AllowUnsafeBlocks>",
        project.allow_unsafe
    ));
    lines.push("    <OutputPath>Temp\\bin\\Debug\\</OutputPath>".to_string());
    lines.push("  </PropertyGroup>".to_string());

    lines.push("  <ItemGroup>".to_string());
    for file in &project.compile_files {
        lines.push(format!(
            "    <Compile Include=\"{}\" />",
            escape_xml(&to_windows_path(file))
        ));
    }
    for asset in &project.loose_assets {
        lines.push(format!(
            "    <None Include=\"{}\" />",
            escape_xml(&to_windows_path(asset))
        ));
    }
    lines.push("  </ItemGroup>".to_string());

    lines.push("  <ItemGroup>".to_string());
    for reference in &project.external_references {
        let name = reference_display_name(reference);
        lines.push(format!("    <Reference Include=\"{}\">", escape_xml(name)));
        lines.push(format!(
            "      <HintPath>{}</HintPath>",
            escape_xml(&to_windows_path(reference))
        ));
        lines.push("    </Reference>".to_string());
    }
    lines.push("  </ItemGroup>".to_string());

    if !project.project_references.is_empty() {
        lines.push("  <ItemGroup>".to_string());
        for link in &project.project_references {
            lines.push(format!(
                "    <ProjectReference Include=\"{}.csproj\">",
                escape_xml(&link.name)
            ));
            lines.push(format!("      <Project>{{{}}}</Project>", link.identity));
            lines.push(format!("      <Name>{}</Name>", escape_xml(&link.name)));
            lines.push("    </ProjectReference>".to_string());
        }
        lines.push("  </ItemGroup>".to_string());
    }

    lines.push(
        "  <Import Project=\"$(MSBuildToolsPath)\\Microsoft.CSharp.targets\" />".to_string(),
    );
    lines.push("</Project>".to_string());
    lines.push(String::new());
    lines.join(LINE_ENDING)
}

/// Reference display name: file stem of the reference path
fn reference_display_name(reference: &str) -> &str {
    let file = reference.rsplit(['/', '\\']).next().unwrap_or(reference);
    file.strip_suffix(".dll")
        .or_else(|| file.strip_suffix(".DLL"))
        .unwrap_or(file)
}

fn to_windows_path(path: &str) -> String {
    path.replace('/', "\\")
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
