//! Autofix engine for automatic code corrections
//!
//! Fixes are tree rewrites: a [`Fixer`](crate::rules::Fixer) turns one
//! violation into a new root. Applying several fixes to one file is
//! serialized in passes:
//!
//! 1. analyze the current tree
//! 2. synthesize a fix per fixable violation (single-fix-only rules get one
//!    per pass)
//! 3. keep fixes whose edited ranges do not overlap, defer the rest
//! 4. apply the kept fixes from the end of the file backwards
//!
//! Passes repeat until nothing is fixable or the pass limit is reached.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rowan::TextRange;
use serde::Serialize;

use crate::context::TokenContext;
use crate::cst::CsSyntaxNode;
use crate::diagnostics::Violation;
use crate::error::SharplintError;
use crate::executor::CancellationToken;
use crate::result::Result;
use crate::rules::RuleSet;

/// Whether a rule's fixes may be applied together in one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixCapability {
    pub batch: bool,
}

impl FixCapability {
    /// Any number of non-overlapping fixes per pass
    pub const BATCH: Self = Self { batch: true };
    /// At most one fix per pass
    pub const SINGLE: Self = Self { batch: false };
}

/// A synthesized fix: the corrected tree and what changed
#[derive(Debug, Clone)]
pub struct Fix {
    pub rule_id: String,
    pub description: String,
    /// Root of the corrected tree
    pub root: CsSyntaxNode,
    /// Replaced range, in coordinates of the tree the fix was built from
    pub edited: TextRange,
}

impl Fix {
    pub fn new(
        rule_id: impl Into<String>,
        description: impl Into<String>,
        root: CsSyntaxNode,
        edited: TextRange,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: description.into(),
            root,
            edited,
        }
    }

    /// Check if this fix conflicts with another fix
    ///
    /// Ranges that touch conflict too: an insertion at the boundary of
    /// another edit is ambiguous.
    pub fn conflicts_with(&self, other: &Fix) -> bool {
        self.edited.start() <= other.edited.end() && other.edited.start() <= self.edited.end()
    }

    /// Text of the corrected tree
    pub fn text(&self) -> String {
        self.root.text().to_string()
    }
}

/// Record of one applied fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFix {
    pub rule_id: String,
    pub description: String,
    /// Byte offset in the tree version the fix was applied to
    pub offset: usize,
    pub length: usize,
    /// 1-based pass number
    pub pass: usize,
}

/// Configuration for fix application
#[derive(Debug, Clone)]
pub struct FixConfig {
    /// Maximum number of analyze/fix passes per file
    pub max_passes: usize,
    /// Compute fixes without writing them back
    pub dry_run: bool,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            max_passes: crate::config::DEFAULT_MAX_PASSES,
            dry_run: false,
        }
    }
}

impl FixConfig {
    /// Create a config for dry-run preview
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Default::default()
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }
}

/// Result of fixing one tree
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub root: CsSyntaxNode,
    pub applied: Vec<AppliedFix>,
    /// Passes that applied at least one fix
    pub passes: usize,
}

impl FixOutcome {
    pub fn text(&self) -> String {
        self.root.text().to_string()
    }

    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Applies fixes of a [`RuleSet`] to a tree
pub struct AutofixEngine<'a> {
    rules: &'a RuleSet,
    config: FixConfig,
    cancel: CancellationToken,
}

impl<'a> AutofixEngine<'a> {
    pub fn new(rules: &'a RuleSet, config: FixConfig) -> Self {
        Self {
            rules,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the caller
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &FixConfig {
        &self.config
    }

    /// Fix `root` until no fixable violation is left or the pass limit hits
    pub fn fix_tree(&self, root: CsSyntaxNode) -> Result<FixOutcome> {
        let mut root = root;
        let mut applied = Vec::new();
        let mut passes = 0;

        while passes < self.config.max_passes {
            let ctx = TokenContext::new(root.clone());
            let violations = self.rules.check_all(&ctx, &self.cancel)?;
            let selected = self.select_fixes(&ctx, &violations);
            if selected.is_empty() {
                break;
            }
            passes += 1;
            tracing::debug!("Pass {}: applying {} fixes", passes, selected.len());
            root = self.apply_pass(root, selected, passes, &mut applied)?;
        }

        if passes == self.config.max_passes {
            tracing::debug!("Stopped after {} fix passes", passes);
        }

        Ok(FixOutcome {
            root,
            applied,
            passes,
        })
    }

    /// Fixes to apply in this pass, ordered by position
    fn select_fixes(&self, ctx: &TokenContext, violations: &[Violation]) -> Vec<(Violation, Fix)> {
        let mut single_used: HashSet<&str> = HashSet::new();
        let mut selected: Vec<(Violation, Fix)> = Vec::new();

        for violation in violations {
            let Some(fixer) = self.rules.fixer(&violation.rule_id) else {
                continue;
            };
            let capability = fixer.capability();
            if !capability.batch && single_used.contains(violation.rule_id.as_str()) {
                tracing::debug!(
                    "{} at {:?} deferred: one fix per pass",
                    violation.rule_id,
                    violation.range
                );
                continue;
            }

            let Some(fix) = fixer.fix(ctx, violation) else {
                tracing::debug!(
                    "{} declined fix at {:?}",
                    violation.rule_id,
                    violation.range
                );
                continue;
            };

            if selected.iter().any(|(_, other)| other.conflicts_with(&fix)) {
                tracing::debug!(
                    "{} at {:?} deferred: overlaps another fix",
                    violation.rule_id,
                    fix.edited
                );
                continue;
            }

            if !capability.batch {
                single_used.insert(violation.rule_id.as_str());
            }
            selected.push((violation.clone(), fix));
        }

        selected
    }

    /// Apply non-overlapping fixes back to front
    ///
    /// Every fix except the last one in the file is synthesized again on the
    /// partially fixed tree; edits after it do not move its range. A fix that
    /// leaves the text as it was is an error, it would fire on every pass.
    fn apply_pass(
        &self,
        root: CsSyntaxNode,
        mut selected: Vec<(Violation, Fix)>,
        pass: usize,
        applied: &mut Vec<AppliedFix>,
    ) -> Result<CsSyntaxNode> {
        selected.sort_by_key(|(_, fix)| std::cmp::Reverse(fix.edited.start()));

        let mut current = root;
        for (index, (violation, planned)) in selected.into_iter().enumerate() {
            let fix = if index == 0 {
                Some(planned)
            } else {
                let ctx = TokenContext::new(current.clone());
                self.rules
                    .fixer(&violation.rule_id)
                    .and_then(|fixer| fixer.fix(&ctx, &violation))
            };
            let Some(fix) = fix else {
                tracing::debug!("{} fix vanished at {:?}", violation.rule_id, violation.range);
                continue;
            };
            if fix.root.text() == current.text() {
                return Err(SharplintError::autofix_error(
                    fix.rule_id,
                    format!("fix at {:?} made no change", fix.edited),
                ));
            }

            applied.push(AppliedFix {
                rule_id: fix.rule_id.clone(),
                description: fix.description.clone(),
                offset: usize::from(fix.edited.start()),
                length: usize::from(fix.edited.len()),
                pass,
            });
            current = fix.root;
        }
        Ok(current)
    }
}

/// Preview of fixes to be applied to a file
#[derive(Debug, Clone)]
pub struct FixPreview {
    pub file: PathBuf,
    pub original_content: String,
    pub modified_content: String,
    pub applied_fixes: Vec<AppliedFix>,
    /// Unified diff of the change
    pub diff: String,
}

impl FixPreview {
    pub fn new(
        file: impl Into<PathBuf>,
        original_content: String,
        modified_content: String,
        applied_fixes: Vec<AppliedFix>,
        colorize: bool,
    ) -> Self {
        let file = file.into();
        let diff = generate_unified_diff(&original_content, &modified_content, &file, colorize);
        Self {
            file,
            original_content,
            modified_content,
            applied_fixes,
            diff,
        }
    }
}

/// Generate a unified diff between original and modified content
///
/// With `colorize`, deletions, insertions and hunk headers carry ANSI colors.
pub fn generate_unified_diff(
    original: &str,
    modified: &str,
    file_path: &Path,
    colorize: bool,
) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    if colorize {
        output.push_str(&format!("\x1b[1m--- {}\x1b[0m\n", file_path.display()));
        output.push_str(&format!(
            "\x1b[1m+++ {} (fixed)\x1b[0m\n",
            file_path.display()
        ));
    } else {
        output.push_str(&format!("--- {}\n", file_path.display()));
        output.push_str(&format!("+++ {} (fixed)\n", file_path.display()));
    }

    for group in diff.grouped_ops(3) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_start = first.old_range().start;
        let new_start = first.new_range().start;
        let old_len = last.old_range().end - old_start;
        let new_len = last.new_range().end - new_start;

        let header = format!(
            "@@ -{},{} +{},{} @@",
            old_start + 1,
            old_len,
            new_start + 1,
            new_len
        );
        if colorize {
            output.push_str(&format!("\x1b[36m{header}\x1b[0m\n"));
        } else {
            output.push_str(&header);
            output.push('\n');
        }

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                let line_text = change.value();
                let line = match (colorize, change.tag()) {
                    (true, ChangeTag::Delete) => format!("\x1b[31m{sign}{line_text}\x1b[0m"),
                    (true, ChangeTag::Insert) => format!("\x1b[32m{sign}{line_text}\x1b[0m"),
                    _ => format!("{sign}{line_text}"),
                };
                output.push_str(&line);
                if !line_text.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}
