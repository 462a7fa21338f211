//! Compatibility resolution
//!
//! Decides whether one assembly descriptor participates in a build
//! context. Pure; descriptors with conflicting platform sets were already
//! rejected at load time and never reach this point.
//!
//! The decision order is fixed and first-match-wins:
//! 1. test-only assembly outside an editor build with tests disabled
//! 2. unsatisfied define constraint
//! 3. test-only assembly in a non-testable directory
//! 4. no platform restriction at all
//! 5. editor build: exclude set checked before include set, against the
//!    Editor pseudo-target
//! 6. player build: exclude set checked before include set, against the
//!    concrete target
//!
//! Steps 5 and 6 are deliberately asymmetric in what they compare
//! against, even though both check exclude before include.

use crate::context::BuildContext;
use crate::defines::constraints_satisfied;
use crate::descriptor::AssemblyDescriptor;
use crate::error::{SlnError, SlnResult};
use crate::platform::BuildTarget;

/// Whether `descriptor` is compatible with the editor-hosted build
pub fn is_compatible_with_editor(descriptor: &AssemblyDescriptor) -> bool {
    if let Some(excluded) = &descriptor.exclude_platforms {
        return excluded
            .iter()
            .all(|target| *target != BuildTarget::Editor);
    }
    if let Some(included) = &descriptor.include_platforms {
        return included
            .iter()
            .any(|target| *target == BuildTarget::Editor);
    }
    true
}

/// Whether `descriptor` should be included for `context`.
///
/// Fails with `SlnError::EmptyDefines` when the context carries no active
/// defines; callers must always supply the real define set.
pub fn is_compatible(descriptor: &AssemblyDescriptor, context: &BuildContext) -> SlnResult<bool> {
    if !context.building_for_editor
        && descriptor.is_test_assembly
        && !context.include_test_assemblies
    {
        return Ok(false);
    }

    if context.defines.is_empty() {
        return Err(SlnError::EmptyDefines);
    }

    if !constraints_satisfied(&context.defines, &descriptor.define_constraints) {
        return Ok(false);
    }

    if descriptor.is_test_assembly {
        if let Some(metadata) = &descriptor.directory_metadata {
            if !metadata.is_testable {
                return Ok(false);
            }
        }
    }

    // Compatible with the editor and every platform.
    if descriptor.include_platforms.is_none() && descriptor.exclude_platforms.is_none() {
        return Ok(true);
    }

    if context.building_for_editor {
        return Ok(is_compatible_with_editor(descriptor));
    }

    if let Some(excluded) = &descriptor.exclude_platforms {
        return Ok(excluded.iter().all(|target| *target != context.target));
    }

    Ok(descriptor
        .include_platforms
        .as_ref()
        .map(|included| included.iter().any(|target| *target == context.target))
        .unwrap_or(false))
}
