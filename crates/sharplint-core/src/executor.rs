//! Parallel execution engine for lint runs
//!
//! Files are processed in parallel with rayon. Each file is handled entirely
//! by the worker that picked it up: parse, optional autofix passes, then one
//! analysis whose per-rule batches are merged by the
//! [`DiagnosticAggregator`]. Syntax trees never cross threads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc, Once,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rowan::{TextRange, TextSize};
use tracing::{Level, debug, error, info, span, warn};

use crate::autofix::{AppliedFix, AutofixEngine, FixConfig};
use crate::context::TokenContext;
use crate::cst::{CsSyntaxNode, ParseError, parse_source};
use crate::diagnostics::{Diagnostic, DiagnosticAggregator, Severity, SourceMap};
use crate::error::SharplintError;
use crate::result::Result;
use crate::rules::RuleSet;

/// Rule id used for diagnostics produced by the tree builder
pub const SYNTAX_RULE_ID: &str = "syntax";

static THREAD_POOL_INIT: Once = Once::new();

fn init_global_thread_pool(threads: usize) {
    THREAD_POOL_INIT.call_once(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("sharplint-worker-{index}"))
            .build_global()
            .unwrap_or_else(|e| {
                warn!(
                    "Could not configure global thread pool (may already be initialized): {}",
                    e
                );
            });
        info!(
            "Configured global rayon thread pool with {} threads",
            threads
        );
    });
}

/// Shared flag that stops a run between rule invocations and between files
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) was called
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SharplintError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Result of linting a single file
#[derive(Debug)]
pub struct FileExecutionResult {
    /// Path of the processed file
    pub file_path: PathBuf,
    /// Rule diagnostics, ordered by position then rule id
    pub diagnostics: Vec<Diagnostic>,
    /// Problems the tree builder reported
    pub parse_errors: Vec<Diagnostic>,
    /// Source after autofix, `None` when nothing changed
    pub fixed_source: Option<String>,
    pub applied_fixes: Vec<AppliedFix>,
    /// Execution time for this file
    pub execution_time: Duration,
    /// Any error that occurred during processing
    pub error: Option<SharplintError>,
}

impl FileExecutionResult {
    fn failed(file_path: &Path, error: SharplintError, start_time: Instant) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            diagnostics: Vec::new(),
            parse_errors: Vec::new(),
            fixed_source: None,
            applied_fixes: Vec::new(),
            execution_time: start_time.elapsed(),
            error: Some(error),
        }
    }

    /// Whether any diagnostic has error severity
    pub fn has_errors(&self) -> bool {
        self.error.is_some()
            || self
                .diagnostics
                .iter()
                .any(|diagnostic| diagnostic.severity == Severity::Error)
    }
}

/// Runs a [`RuleSet`] over files
pub struct LintExecutor {
    rules: RuleSet,
    fix_config: Option<FixConfig>,
    cancel: CancellationToken,
}

impl LintExecutor {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            fix_config: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Apply fixes before reporting
    pub fn with_fixes(mut self, config: FixConfig) -> Self {
        self.fix_config = Some(config);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Configure the global worker pool, effective for the first call only
    pub fn with_threads(self, threads: usize) -> Self {
        init_global_thread_pool(threads.max(1));
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Lint files in parallel
    ///
    /// Results keep the order of `files`. Files not started before
    /// cancellation produce no result.
    pub fn execute(&self, files: &[PathBuf]) -> Vec<FileExecutionResult> {
        let start_time = Instant::now();
        let completed = AtomicUsize::new(0);

        let mut indexed: Vec<(usize, FileExecutionResult)> = files
            .par_iter()
            .enumerate()
            .filter_map(|(index, file)| {
                if self.cancel.is_cancelled() {
                    return None;
                }
                let result = self.lint_file(file);
                if matches!(result.error, Some(SharplintError::Cancelled)) {
                    return None;
                }
                completed.fetch_add(1, Ordering::Relaxed);
                Some((index, result))
            })
            .collect();

        indexed.sort_by_key(|(index, _)| *index);

        info!(
            "Linted {} of {} files in {:?}",
            completed.load(Ordering::Relaxed),
            files.len(),
            start_time.elapsed()
        );

        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Read and lint one file; I/O errors are recorded in the result
    pub fn lint_file(&self, file_path: &Path) -> FileExecutionResult {
        let start_time = Instant::now();
        match fs::read_to_string(file_path) {
            Ok(content) => self.lint_source(file_path, &content),
            Err(io_error) => {
                let error = SharplintError::io_error(file_path, io_error);
                error!("Failed to read file {}: {}", file_path.display(), error);
                FileExecutionResult::failed(file_path, error, start_time)
            }
        }
    }

    /// Lint in-memory source text attributed to `file_path`
    pub fn lint_source(&self, file_path: &Path, source: &str) -> FileExecutionResult {
        let start_time = Instant::now();
        let span = span!(Level::DEBUG, "lint_file", file = %file_path.display());
        let _enter = span.enter();

        let parse = parse_source(source);
        let mut root = parse.syntax();
        let mut fixed_source = None;
        let mut applied_fixes = Vec::new();

        if let Some(config) = &self.fix_config {
            let engine = AutofixEngine::new(&self.rules, config.clone())
                .with_cancellation(self.cancel.clone());
            match engine.fix_tree(root.clone()) {
                Ok(outcome) => {
                    if outcome.changed() {
                        debug!(
                            "Applied {} fixes in {} passes",
                            outcome.applied.len(),
                            outcome.passes
                        );
                        fixed_source = Some(outcome.text());
                        applied_fixes = outcome.applied;
                    }
                    root = outcome.root;
                }
                Err(error) => return FileExecutionResult::failed(file_path, error, start_time),
            }
        }

        // Positions refer to the text the diagnostics are reported against
        let parse_errors = match &fixed_source {
            Some(fixed) => syntax_diagnostics(parse_source(fixed).errors(), file_path, fixed),
            None => syntax_diagnostics(parse.errors(), file_path, source),
        };
        if !parse_errors.is_empty() {
            debug!("{} parse errors", parse_errors.len());
        }

        let diagnostics = match analyze_tree(&self.rules, root, file_path, &self.cancel) {
            Ok(diagnostics) => diagnostics,
            Err(error) => return FileExecutionResult::failed(file_path, error, start_time),
        };

        let execution_time = start_time.elapsed();
        debug!(
            "Completed {} in {:?} with {} diagnostics",
            file_path.display(),
            execution_time,
            diagnostics.len()
        );

        FileExecutionResult {
            file_path: file_path.to_path_buf(),
            diagnostics,
            parse_errors,
            fixed_source,
            applied_fixes,
            execution_time,
            error: None,
        }
    }
}

/// Run every rule on `root` and aggregate the diagnostics
///
/// Cancellation is checked before each rule; a cancelled file reports
/// nothing.
pub fn analyze_tree(
    rules: &RuleSet,
    root: CsSyntaxNode,
    file_path: &Path,
    cancel: &CancellationToken,
) -> Result<Vec<Diagnostic>> {
    let ctx = TokenContext::new(root);
    let mut aggregator = DiagnosticAggregator::new(file_path, ctx.text());
    for index in 0..rules.len() {
        cancel.check()?;
        aggregator.add_batch(rules.check_rule(index, &ctx));
    }
    Ok(aggregator.finish(|rule_id| rules.is_fixable(rule_id)))
}

fn syntax_diagnostics(errors: &[ParseError], file_path: &Path, source: &str) -> Vec<Diagnostic> {
    let source_map = SourceMap::new(source);
    errors
        .iter()
        .map(|parse_error| {
            let range = TextRange::new(
                TextSize::new(parse_error.span.start as u32),
                TextSize::new(parse_error.span.end as u32),
            );
            Diagnostic {
                rule_id: SYNTAX_RULE_ID.to_string(),
                severity: Severity::Warning,
                message: parse_error.message.clone(),
                location: source_map.location(file_path, range, source),
                fixable: false,
            }
        })
        .collect()
}
