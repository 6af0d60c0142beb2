//! # mzXML Validation Module
//!
//! Consistency checks for mzXML runs, beyond what the parser enforces while
//! reading.
//!
//! ## Validation Checklist
//!
//! 1. **Structure Check**: the document parses, its schema revision, the
//!    declared scan count and recoverable parse problems
//! 2. **Data Sanity**: MS levels, retention time order, precursors of MSn
//!    scans, empty scans, m/z ranges and peak values
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mzxml::validator::validate_mzxml_file;
//! use std::path::Path;
//!
//! let result = validate_mzxml_file(Path::new("run.mzXML"));
//! match result {
//!     Ok(report) => {
//!         println!("{}", report);
//!     }
//!     Err(e) => {
//!         eprintln!("Validation failed: {}", e);
//!     }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};

pub use report::{CheckStatus, ReportSummary, ValidationCheck, ValidationReport};

use crate::experiment::Experiment;
use crate::mzxml::{MzXMLFile, ParseStats};

mod data;
mod report;
mod structure;

/// Load and check an mzXML file
///
/// A document that fails to parse yields a report with a failed check; only
/// an inaccessible path is an error.
pub fn validate_mzxml_file(path: &Path) -> Result<ValidationReport> {
    std::fs::metadata(path).with_context(|| format!("Cannot access {}", path.display()))?;

    let mut report = ValidationReport::new(path.display().to_string());
    let mut exp = Experiment::new();
    match MzXMLFile::new().load_into(path, &mut exp) {
        Ok(stats) => {
            report.add_check(ValidationCheck::ok("Document parses"));
            run_checks(&exp, &stats, &mut report);
        }
        Err(e) => report.add_check(ValidationCheck::failed("Document parses", e.to_string())),
    }
    Ok(report)
}

/// Check an experiment that was already parsed
pub fn validate_experiment(exp: &Experiment, stats: &ParseStats) -> ValidationReport {
    let mut report = ValidationReport::new(format!("{} in memory", stats.schema));
    run_checks(exp, stats, &mut report);
    report
}

fn run_checks(exp: &Experiment, stats: &ParseStats, report: &mut ValidationReport) {
    // 1. Structure Check
    structure::check_structure(exp, stats, report);

    // 2. Data Sanity Check
    data::check_data_sanity(exp, report);
}
