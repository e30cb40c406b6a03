//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use sharplint_core::config::CONFIG_FILE_NAMES;
use sharplint_core::{
    ConfigLoader, Diagnostic, FixConfig, FixPreview, LintExecutor, ResultExt, RuleCategory,
    SharplintConfig, SharplintError, discover_files,
};
use sharplint_rules::RuleRegistry;
use tracing::{debug, error, info};

use crate::output::{LintSummary, OutputFormatter};
use crate::{ConfigFormat, LintArgs};

/// Directory to start config discovery from
fn discovery_start(paths: &[PathBuf]) -> &Path {
    match paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
        Some(path) => path,
        None => Path::new("."),
    }
}

fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> Result<SharplintConfig> {
    let start = discovery_start(paths);
    // A missing start directory is reported by discovery, not here
    let start_dir = start.is_dir().then_some(start);
    ConfigLoader::load(config_path, start_dir).context("failed to load configuration")
}

/// Lint command implementation
///
/// Returns the exit code: 1 when errors (or, with `--error-on-warnings`,
/// warnings) were reported or a file could not be processed.
pub fn lint_command(
    args: LintArgs,
    config_path: Option<PathBuf>,
    threads: Option<usize>,
    use_colors: bool,
) -> Result<i32> {
    debug!("Running lint command on paths: {:?}", args.paths);
    let start_time = Instant::now();

    let mut config = load_config(config_path.as_deref(), &args.paths)?;

    // Apply CLI overrides to configuration
    if !args.include.is_empty() {
        config.files.get_or_insert_with(Default::default).include = Some(args.include.clone());
    }
    if !args.exclude.is_empty() {
        config.files.get_or_insert_with(Default::default).exclude = Some(args.exclude.clone());
    }
    config.validate()?;

    let files = discover_files(&args.paths, &config)?;
    if files.is_empty() {
        println!("No C# files found in specified paths.");
        return Ok(0);
    }
    debug!("Found {} C# files to lint", files.len());

    let rules = RuleRegistry::builtin().into_rule_set(&config);
    info!("Running {} rules", rules.len());

    let mut executor = LintExecutor::new(rules);
    if let Some(threads) = threads {
        executor = executor.with_threads(threads);
    }
    let fix_config = args.fix.then(|| FixConfig {
        max_passes: args.max_passes.unwrap_or_else(|| config.max_passes()).max(1),
        dry_run: args.dry_run,
    });
    if let Some(fix_config) = &fix_config {
        executor = executor.with_fixes(fix_config.clone());
    }

    let results = executor.execute(&files);

    let mut summary = LintSummary::new();
    summary.files_checked = results.len();
    let mut all_diagnostics: Vec<Diagnostic> = Vec::new();
    let mut previews = Vec::new();

    for result in results {
        if let Some(error) = &result.error {
            error!("Error processing {}: {}", result.file_path.display(), error);
            summary.failed_files += 1;
            continue;
        }

        if let (Some(fixed), Some(fix_config)) = (&result.fixed_source, &fix_config) {
            summary.fixes_applied += result.applied_fixes.len();
            summary.files_fixed += 1;
            if fix_config.dry_run {
                let original = fs::read_to_string(&result.file_path)
                    .map_err(|e| SharplintError::io_error(&result.file_path, e))
                    .log_and_continue();
                match original {
                    Some(original) => previews.push(FixPreview::new(
                        &result.file_path,
                        original,
                        fixed.clone(),
                        result.applied_fixes.clone(),
                        use_colors,
                    )),
                    None => summary.failed_files += 1,
                }
            } else {
                let written = fs::write(&result.file_path, fixed)
                    .map_err(|e| SharplintError::io_error(&result.file_path, e))
                    .log_and_continue();
                match written {
                    Some(()) => info!(
                        "Applied {} fixes to {}",
                        result.applied_fixes.len(),
                        result.file_path.display()
                    ),
                    None => summary.failed_files += 1,
                }
            }
        }

        let mut file_diagnostics = result.parse_errors;
        file_diagnostics.extend(result.diagnostics);
        file_diagnostics.sort_by_key(|diagnostic| diagnostic.location.offset);
        for diagnostic in &file_diagnostics {
            summary.record(diagnostic.severity);
        }
        all_diagnostics.extend(file_diagnostics);
    }

    let formatter = OutputFormatter::new(args.format);
    formatter.print_results(&all_diagnostics, &previews, &summary)?;
    debug!("Completed in {:?}", start_time.elapsed());

    let failed = summary.errors > 0
        || summary.failed_files > 0
        || (args.error_on_warnings && summary.warnings > 0);
    Ok(i32::from(failed))
}

/// Rules command implementation
pub fn rules_command(
    detailed: bool,
    category: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Listing available rules");

    let category = match category {
        Some(slug) => match RuleCategory::from_slug(&slug) {
            Some(category) => Some(category),
            None => bail!("unknown rule category '{slug}'"),
        },
        None => None,
    };
    let config = ConfigLoader::load(config_path.as_deref(), None)?;
    let registry = RuleRegistry::builtin();

    println!("Available Rules:");
    println!("================");

    let mut count = 0;
    for metadata in registry.metadata() {
        if category.is_some_and(|category| category != metadata.category) {
            continue;
        }
        count += 1;

        let severity = match config.rule_severity(metadata.id) {
            Some(configured) => configured.to_severity(),
            None if metadata.enabled_by_default => Some(metadata.default_severity),
            None => None,
        };
        let status = match severity {
            _ if !config.linter_enabled() => "off".to_string(),
            Some(severity) => severity.to_string(),
            None => "off".to_string(),
        };

        println!("  {} - {} [{}]", metadata.id, metadata.title, status);
        if detailed {
            println!("    Category: {}", metadata.category);
            println!("    Description: {}", metadata.description);
            if registry.is_fixable(metadata.id) {
                println!("    Autofix: available");
            }
            println!("    Documentation: {}", metadata.help_link);
        }
    }

    if count == 0 {
        println!("\nNo rules found matching the specified filters.");
    } else {
        println!("\nTotal: {count} rules");
    }
    Ok(())
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => CONFIG_FILE_NAMES[0],
        ConfigFormat::Toml => CONFIG_FILE_NAMES[1],
    };
    let config_path = PathBuf::from(filename);
    if config_path.exists() && !force {
        bail!("configuration file '{filename}' already exists, use --force to overwrite");
    }

    let config = SharplintConfig::recommended();
    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
    };
    fs::write(&config_path, content).with_context(|| format!("failed to write {filename}"))?;

    println!("Created configuration file: {filename}");
    Ok(())
}

/// Config schema command implementation
pub fn config_schema_command() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&SharplintConfig::json_schema())?);
    Ok(())
}

/// Config validate command implementation
pub fn config_validate_command(path: Option<PathBuf>) -> Result<()> {
    debug!("Validating configuration file: {:?}", path);
    let config = ConfigLoader::load(path.as_deref(), None)?;

    println!("Configuration is valid");
    println!("   Linter enabled: {}", config.linter_enabled());
    println!("   Fix passes: {}", config.max_passes());
    let overrides = config
        .linter
        .as_ref()
        .and_then(|linter| linter.rules.as_ref())
        .map(|rules| rules.len())
        .unwrap_or(0);
    println!("   Rule overrides: {overrides}");
    Ok(())
}
