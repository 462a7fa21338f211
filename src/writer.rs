//! Change-detecting output writer
//!
//! Every generated file goes through `write_if_changed`: the current disk
//! content is compared byte-for-byte against the candidate and the write
//! is skipped when they match, so file timestamps only move when content
//! actually changed. When content differs, a compact diff report records
//! where the versions diverge first.

use std::fs;
use std::path::{Path, PathBuf};

use similar::{ChangeTag, TextDiff};

use crate::error::Warning;

/// How many lines of each side to capture after the first divergence
const DIFF_CONTEXT_LINES: usize = 5;

/// What happened to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped,
    Failed,
}

/// First point of divergence between the on-disk and candidate versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub path: PathBuf,
    /// Line number (1-based) of the first differing line
    pub first_divergence: usize,
    /// Up to [`DIFF_CONTEXT_LINES`] lines of the old version from there
    pub old_lines: Vec<String>,
    /// Up to [`DIFF_CONTEXT_LINES`] lines of the new version from there
    pub new_lines: Vec<String>,
}

impl DiffReport {
    /// Locate the first divergent line between `old` and `new`.
    ///
    /// Returns `None` when the texts are identical.
    pub fn between(path: &Path, old: &str, new: &str) -> Option<Self> {
        let diff = TextDiff::from_lines(old, new);
        let mut first_divergence = None;
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Equal => {}
                ChangeTag::Delete => {
                    first_divergence = change.old_index().map(|index| index + 1);
                    break;
                }
                ChangeTag::Insert => {
                    first_divergence = change.new_index().map(|index| index + 1);
                    break;
                }
            }
        }
        let first_divergence = first_divergence?;

        let collect = |text: &str| {
            text.lines()
                .skip(first_divergence - 1)
                .take(DIFF_CONTEXT_LINES)
                .map(|line| line.to_string())
                .collect::<Vec<_>>()
        };
        Some(Self {
            path: path.to_path_buf(),
            first_divergence,
            old_lines: collect(old),
            new_lines: collect(new),
        })
    }
}

impl std::fmt::Display for DiffReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}: content differs from line {}",
            self.path.display(),
            self.first_divergence
        )?;
        for line in &self.old_lines {
            writeln!(f, "- {line}")?;
        }
        for line in &self.new_lines {
            writeln!(f, "+ {line}")?;
        }
        Ok(())
    }
}

/// Writes generated files, skipping the ones that have not changed.
///
/// A failed write never aborts the pass; it is recorded and the remaining
/// files are still processed.
#[derive(Debug, Default)]
pub struct OutputSynchronizer {
    diffs: Vec<DiffReport>,
    failures: Vec<Warning>,
}

impl OutputSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `content` to `path` unless the file already holds it
    pub fn write_if_changed(&mut self, path: &Path, content: &str) -> WriteOutcome {
        match fs::read_to_string(path) {
            Ok(existing) if existing == content => return WriteOutcome::Skipped,
            Ok(existing) => {
                if let Some(report) = DiffReport::between(path, &existing, content) {
                    self.diffs.push(report);
                }
            }
            Err(_) => {}
        }

        if let Some(parent) = path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                return self.record_failure(path, error);
            }
        }
        match fs::write(path, content) {
            Ok(()) => WriteOutcome::Written,
            Err(error) => self.record_failure(path, error),
        }
    }

    /// Create `path` with `content` only when it does not exist yet
    pub fn write_if_absent(&mut self, path: &Path, content: &str) -> WriteOutcome {
        if path.exists() {
            return WriteOutcome::Skipped;
        }
        if let Some(parent) = path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                return self.record_failure(path, error);
            }
        }
        match fs::write(path, content) {
            Ok(()) => WriteOutcome::Written,
            Err(error) => self.record_failure(path, error),
        }
    }

    fn record_failure(&mut self, path: &Path, error: std::io::Error) -> WriteOutcome {
        self.failures.push(Warning::WriteFailed {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
        WriteOutcome::Failed
    }

    pub fn diffs(&self) -> &[DiffReport] {
        &self.diffs
    }

    pub fn take_failures(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.failures)
    }
}
