//! sharplint core
//!
//! Core engine of the sharplint C# style checker: lossless syntax trees,
//! trivia classification, per-token layout context, the rule and fixer
//! interfaces, diagnostic aggregation and the autofix engine.

pub mod autofix;
pub mod config;
pub mod context; // Per-token neighbors and attached trivia
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod result;
pub mod rules;

// Re-export commonly used types
pub use autofix::{
    AppliedFix, AutofixEngine, Fix, FixCapability, FixConfig, FixOutcome, FixPreview,
    generate_unified_diff,
};
pub use config::{
    ConfigLoader, FilesConfiguration, FixConfiguration, LinterConfiguration, RuleSeverity,
    SharplintConfig,
};
pub use context::{TokenContext, TokenId};
pub use diagnostics::{
    Diagnostic, DiagnosticAggregator, Location, Severity, SourceMap, Violation, merge_violations,
};
pub use discovery::discover_files;
pub use error::{ErrorKind, SharplintError};
pub use executor::{CancellationToken, FileExecutionResult, LintExecutor, analyze_tree};
pub use result::{Result, ResultExt};
pub use rules::{Fixer, Rule, RuleCategory, RuleMetadata, RuleSet};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with_filter("sharplint=info");
}

/// Initialize tracing with a default filter, overridable by `RUST_LOG`
pub fn init_tracing_with_filter(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
