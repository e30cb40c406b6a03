//! Output formatting and reporting

use anyhow::Result;
use colored::*;
use sharplint_core::{Diagnostic, FixPreview, Severity};

use crate::OutputFormat;

/// Summary statistics for linting results
#[derive(Debug, Clone, Default)]
pub struct LintSummary {
    pub files_checked: usize,
    /// Files that could not be read or analyzed
    pub failed_files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub hints: usize,
    pub files_fixed: usize,
    pub fixes_applied: usize,
}

impl LintSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.info += 1,
            Severity::Hint => self.hints += 1,
        }
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings + self.info + self.hints
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}

/// Output formatter for different formats
///
/// Colors follow the global `colored` override set at startup.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format and print linting results
    pub fn print_results(
        &self,
        diagnostics: &[Diagnostic],
        previews: &[FixPreview],
        summary: &LintSummary,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human_format(diagnostics, previews, summary);
                Ok(())
            }
            OutputFormat::Json => self.print_json_format(diagnostics, previews, summary),
            OutputFormat::Compact => {
                self.print_compact_format(diagnostics, previews, summary);
                Ok(())
            }
        }
    }

    fn print_human_format(
        &self,
        diagnostics: &[Diagnostic],
        previews: &[FixPreview],
        summary: &LintSummary,
    ) {
        for preview in previews {
            print!("{}", preview.diff);
        }

        for diagnostic in diagnostics {
            println!("{}", self.render_diagnostic(diagnostic));
        }

        self.print_summary_human(summary, !previews.is_empty());
    }

    fn render_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
            Severity::Hint => "hint".cyan().bold(),
        };
        let fixable = if diagnostic.fixable {
            format!(" {}", "(fixable)".dimmed())
        } else {
            String::new()
        };
        format!(
            "{}[{}]: {}{}\n  {} {}:{}:{}",
            severity,
            diagnostic.rule_id,
            diagnostic.message.bold(),
            fixable,
            "-->".blue(),
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column
        )
    }

    fn print_summary_human(&self, summary: &LintSummary, dry_run: bool) {
        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.files_checked);
        if summary.failed_files > 0 {
            println!("  Files failed: {}", summary.failed_files.to_string().red());
        }

        if summary.has_issues() {
            println!("  Issues found:");
            if summary.errors > 0 {
                println!("    Errors: {}", summary.errors.to_string().red());
            }
            if summary.warnings > 0 {
                println!("    Warnings: {}", summary.warnings.to_string().yellow());
            }
            if summary.info > 0 {
                println!("    Info: {}", summary.info.to_string().blue());
            }
            if summary.hints > 0 {
                println!("    Hints: {}", summary.hints.to_string().cyan());
            }
        } else {
            println!("  {}", "No issues found".green());
        }

        if summary.fixes_applied > 0 {
            let label = if dry_run { "Fixes available" } else { "Fixes applied" };
            println!(
                "  {}: {} in {} file{}",
                label,
                summary.fixes_applied.to_string().green(),
                summary.files_fixed,
                if summary.files_fixed == 1 { "" } else { "s" }
            );
        }
    }

    fn print_json_format(
        &self,
        diagnostics: &[Diagnostic],
        previews: &[FixPreview],
        summary: &LintSummary,
    ) -> Result<()> {
        let fixes: Vec<serde_json::Value> = previews
            .iter()
            .map(|preview| {
                serde_json::json!({
                    "file": preview.file.display().to_string(),
                    "fixes": preview.applied_fixes,
                })
            })
            .collect();

        let result = serde_json::json!({
            "filesChecked": summary.files_checked,
            "diagnostics": diagnostics,
            "fixes": fixes,
            "summary": {
                "errors": summary.errors,
                "warnings": summary.warnings,
                "info": summary.info,
                "hints": summary.hints,
                "total": summary.total_issues(),
                "failedFiles": summary.failed_files,
                "fixesApplied": summary.fixes_applied,
            }
        });

        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }

    fn print_compact_format(
        &self,
        diagnostics: &[Diagnostic],
        previews: &[FixPreview],
        summary: &LintSummary,
    ) {
        for diagnostic in diagnostics {
            println!(
                "{}:{}:{}: {} [{}] {}",
                diagnostic.location.file.display(),
                diagnostic.location.line,
                diagnostic.location.column,
                diagnostic.severity,
                diagnostic.rule_id,
                diagnostic.message
            );
        }
        for preview in previews {
            println!(
                "{}: {} fixes available",
                preview.file.display(),
                preview.applied_fixes.len()
            );
        }

        if summary.has_issues() {
            println!(
                "sharplint: {} files, {} issues ({} errors, {} warnings)",
                summary.files_checked,
                summary.total_issues(),
                summary.errors,
                summary.warnings
            );
        } else {
            println!("sharplint: {} files checked, no issues", summary.files_checked);
        }

        if summary.fixes_applied > 0 && previews.is_empty() {
            println!("sharplint: {} fixes applied", summary.fixes_applied);
        }
    }
}
