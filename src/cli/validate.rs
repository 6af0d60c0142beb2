use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzxml::validator::validate_mzxml_file;

/// Check an mzXML file and print the report
///
/// Exits with status 1 when any check failed, so the command can gate
/// pipelines.
pub fn run(file: PathBuf) -> Result<()> {
    info!("Validating {}", file.display());

    let report = validate_mzxml_file(&file)
        .with_context(|| format!("Cannot validate {}", file.display()))?;

    #[cfg(feature = "colorized_output")]
    println!("{}", report.format_colored());
    #[cfg(not(feature = "colorized_output"))]
    println!("{}", report);

    let summary = report.summary();
    info!(
        "{} checks: {} passed, {} warnings, {} failed",
        report.checks.len(),
        summary.passed,
        summary.warnings,
        summary.failed
    );

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
