use crate::experiment::Experiment;
use crate::mzxml::{ParseStats, SchemaVersion};

use super::{ValidationCheck, ValidationReport};

/// Step 1: Structure validation
pub(crate) fn check_structure(exp: &Experiment, stats: &ParseStats, report: &mut ValidationReport) {
    let name = format!("Schema version ({})", stats.schema);
    if stats.schema == SchemaVersion::Mzxml1 {
        report.add_check(ValidationCheck::warning(
            name,
            "Legacy msXML 1.x document; it is written back as mzXML 2.0",
        ));
    } else {
        report.add_check(ValidationCheck::ok(name));
    }

    match stats.declared_scan_count {
        None => report.add_check(ValidationCheck::warning(
            "Declared scan count",
            "msRun has no scanCount attribute",
        )),
        Some(declared) if declared != exp.len() => report.add_check(ValidationCheck::failed(
            "Declared scan count",
            format!("scanCount is {} but {} scans were read", declared, exp.len()),
        )),
        Some(_) => report.add_check(ValidationCheck::ok("Declared scan count")),
    }

    report.add_check(ValidationCheck::warn_on(
        "Parser warnings",
        (stats.warnings > 0).then(|| {
            format!(
                "{} recoverable problem(s) were logged while parsing",
                stats.warnings
            )
        }),
    ));
}
