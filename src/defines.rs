//! Define-constraint expressions
//!
//! A constraint list is conjunctive: every constraint must hold for the
//! assembly to be eligible. A leading `!` marks a symbol that must be
//! absent from the active define set.

use serde::{Deserialize, Serialize};

/// One boolean requirement over the active define symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefineConstraint {
    pub symbol: String,
    /// When true, the symbol must be absent
    pub negated: bool,
}

impl DefineConstraint {
    /// Parse a raw constraint string, honoring a leading `!`
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.strip_prefix('!') {
            Some(symbol) => Self {
                symbol: symbol.trim().to_string(),
                negated: true,
            },
            None => Self {
                symbol: trimmed.to_string(),
                negated: false,
            },
        }
    }

    pub fn parse_all(raw: &[String]) -> Vec<Self> {
        raw.iter().map(|constraint| Self::parse(constraint)).collect()
    }

    /// Whether this constraint holds against the active defines
    pub fn is_satisfied(&self, defines: &[String]) -> bool {
        let present = defines.iter().any(|define| define == &self.symbol);
        present != self.negated
    }
}

/// Evaluate a conjunctive constraint list
pub fn constraints_satisfied(defines: &[String], constraints: &[DefineConstraint]) -> bool {
    constraints
        .iter()
        .all(|constraint| constraint.is_satisfied(defines))
}
