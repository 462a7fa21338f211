//! slnsync - IDE solution and project generator for script assemblies
//!
//! slnsync turns the compiler front end's view of a project (compiled
//! units, assembly manifests, build context) into an IDE solution with one
//! project per script assembly. Assemblies declare platform and define
//! constraints; the compatibility resolver decides which of them take part
//! in a pass, and the writer only touches files whose content actually
//! changed.

pub mod cli;
pub mod compat;
pub mod config;
pub mod context;
pub mod defines;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod identity;
pub mod platform;
pub mod refs;
pub mod render;
pub mod sync;
pub mod units;
pub mod writer;

// Re-exports for convenience
pub use compat::{is_compatible, is_compatible_with_editor};
pub use config::{GenerationSettings, IdeFlavor};
pub use context::BuildContext;
pub use defines::{constraints_satisfied, DefineConstraint};
pub use descriptor::{AssemblyDescriptor, AssemblyDescriptorData, DirectoryMetadata};
pub use error::{SlnError, SlnResult, Warning};
pub use graph::{
    AssetOwnershipProvider, GraphOutput, ProjectDescriptor, ProjectGraphBuilder, ProjectLink,
    SolutionDescriptor, SolutionEntry,
};
pub use identity::{identity, IdentityGenerator, CSHARP_PROJECT_TYPE};
pub use platform::{BuildTarget, PlatformCatalog, PlatformEntry};
pub use refs::{AssemblyProbe, ExtensionProbe, ReferenceClassifier, ReferenceKind};
pub use sync::{SyncInput, SyncReport, Synchronizer};
pub use units::{CompiledUnit, ResponseFileData, ScriptLanguage};
pub use writer::{DiffReport, OutputSynchronizer, WriteOutcome};
