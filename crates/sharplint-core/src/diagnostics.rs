//! Violations, diagnostics and the per-file diagnostic aggregator
//!
//! Rules report [`Violation`]s: a rule id, a message and a byte range in one
//! tree version. Once every rule has run on a file, the
//! [`DiagnosticAggregator`] merges the batches into the final ordered list of
//! [`Diagnostic`]s with resolved line/column [`Location`]s.

use std::fmt;
use std::path::{Path, PathBuf};

use rowan::TextRange;
use serde::{Deserialize, Serialize};

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A rule violation in one tree version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule_id: String,
    pub message: String,
    pub range: TextRange,
    pub severity: Severity,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        range: TextRange,
        severity: Severity,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            range,
            severity,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span in bytes
    pub length: usize,
}

/// A violation resolved against its source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    /// Whether the rule that produced this diagnostic can fix it
    pub fixable: bool,
}

impl Diagnostic {
    /// Byte range of the diagnostic
    pub fn span(&self) -> std::ops::Range<usize> {
        self.location.offset..self.location.offset + self.location.length
    }
}

/// Efficient byte offset to line/column mapping
///
/// Recognises `\n`, `\r\n` and a lone `\r` as line breaks.
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Byte offsets of each line start
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        for (idx, byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => line_starts.push(idx + 1),
                b'\r' if bytes.get(idx + 1) != Some(&b'\n') => line_starts.push(idx + 1),
                _ => {}
            }
        }
        Self { line_starts }
    }

    /// Convert byte offset to 1-based (line, column)
    ///
    /// Columns count characters, not bytes.
    pub fn offset_to_position(&self, offset: usize, source: &str) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        let end = offset.min(source.len());
        let column = source
            .get(line_start..end)
            .map(|text| text.chars().count())
            .unwrap_or(end.saturating_sub(line_start));
        (line_idx + 1, column + 1)
    }

    /// Check whether `offset` is the first byte of a line (column zero)
    pub fn is_line_start(&self, offset: usize) -> bool {
        self.line_starts.binary_search(&offset).is_ok()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve a byte range into a [`Location`]
    pub fn location(&self, file: &Path, range: TextRange, source: &str) -> Location {
        let offset = usize::from(range.start());
        let end = usize::from(range.end());
        let (line, column) = self.offset_to_position(offset, source);
        let (end_line, end_column) = self.offset_to_position(end, source);
        Location {
            file: file.to_path_buf(),
            line,
            column,
            end_line,
            end_column,
            offset,
            length: end - offset,
        }
    }
}

/// Merges the violation batches of every rule run on one file
///
/// The result is ordered by span start, then rule id; violations with the
/// same rule id and span are reported once.
#[derive(Debug)]
pub struct DiagnosticAggregator<'a> {
    file: PathBuf,
    source: &'a str,
    source_map: SourceMap,
    violations: Vec<Violation>,
}

impl<'a> DiagnosticAggregator<'a> {
    pub fn new(file: impl Into<PathBuf>, source: &'a str) -> Self {
        Self {
            file: file.into(),
            source,
            source_map: SourceMap::new(source),
            violations: Vec::new(),
        }
    }

    /// Add the violations of one rule
    pub fn add_batch(&mut self, batch: Vec<Violation>) {
        self.violations.extend(batch);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Ordered, de-duplicated violations collected so far
    pub fn violations(&self) -> Vec<Violation> {
        merge_violations(self.violations.clone())
    }

    /// Produce the final diagnostics
    ///
    /// `fixable` tells whether the rule with the given id has a fixer.
    pub fn finish(self, fixable: impl Fn(&str) -> bool) -> Vec<Diagnostic> {
        let merged = merge_violations(self.violations);
        tracing::debug!(
            "Aggregated {} diagnostics for {}",
            merged.len(),
            self.file.display()
        );
        merged
            .into_iter()
            .map(|violation| Diagnostic {
                location: self
                    .source_map
                    .location(&self.file, violation.range, self.source),
                fixable: fixable(&violation.rule_id),
                rule_id: violation.rule_id,
                severity: violation.severity,
                message: violation.message,
            })
            .collect()
    }
}

/// Sort by span start then rule id and drop repeated (rule id, span) pairs
pub fn merge_violations(mut violations: Vec<Violation>) -> Vec<Violation> {
    violations.sort_by(|a, b| {
        a.range
            .start()
            .cmp(&b.range.start())
            .then_with(|| a.rule_id.cmp(&b.rule_id))
            .then_with(|| a.range.end().cmp(&b.range.end()))
    });
    violations.dedup_by(|a, b| a.rule_id == b.rule_id && a.range == b.range);
    violations
}
