//! Build context for one generation pass

use serde::{Deserialize, Serialize};

use crate::platform::BuildTarget;

/// Everything the compatibility decision needs about the current build.
///
/// `defines` must be non-empty; an empty set is a caller error surfaced by
/// the resolver, never treated as "no defines".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContext {
    pub target: BuildTarget,
    pub building_for_editor: bool,
    pub include_test_assemblies: bool,
    pub defines: Vec<String>,
}

impl BuildContext {
    /// Context for an editor-hosted build
    pub fn editor(defines: Vec<String>) -> Self {
        Self {
            target: BuildTarget::Editor,
            building_for_editor: true,
            include_test_assemblies: false,
            defines,
        }
    }

    /// Context for a player build on a concrete target
    pub fn player(target: BuildTarget, defines: Vec<String>) -> Self {
        Self {
            target,
            building_for_editor: false,
            include_test_assemblies: false,
            defines,
        }
    }

    pub fn with_test_assemblies(mut self, include: bool) -> Self {
        self.include_test_assemblies = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_context_targets_editor() {
        let ctx = BuildContext::editor(vec!["DEBUG".to_string()]);
        assert_eq!(ctx.target, BuildTarget::Editor);
        assert!(ctx.building_for_editor);
        assert!(!ctx.include_test_assemblies);
    }

    #[test]
    fn player_context_is_not_editor() {
        let ctx = BuildContext::player(BuildTarget::Android, vec!["DEBUG".to_string()]);
        assert_eq!(ctx.target, BuildTarget::Android);
        assert!(!ctx.building_for_editor);
    }

    #[test]
    fn with_test_assemblies_toggles_flag() {
        let ctx = BuildContext::editor(vec!["DEBUG".to_string()]).with_test_assemblies(true);
        assert!(ctx.include_test_assemblies);
    }
}
