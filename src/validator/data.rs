use crate::experiment::{Experiment, Scan};

use super::{ValidationCheck, ValidationReport};

/// Step 2: Data sanity validation
pub(crate) fn check_data_sanity(exp: &Experiment, report: &mut ValidationReport) {
    let scans = exp.scans();
    report.add_check(ValidationCheck::ok(format!(
        "Scans: {} ({} peaks)",
        scans.len(),
        exp.total_peaks()
    )));

    if scans.is_empty() {
        report.add_check(ValidationCheck::warning("Data rows", "Run contains no scans"));
        return;
    }

    check_ms_levels(scans, report);
    check_retention_order(scans, report);
    check_precursors(scans, report);
    check_empty_scans(scans, report);
    check_mz_ranges(scans, report);
    check_peak_values(scans, report);
}

fn check_ms_levels(scans: &[Scan], report: &mut ValidationReport) {
    let invalid = scans.iter().filter(|s| s.ms_level < 1).count();
    if invalid == 0 {
        report.add_check(ValidationCheck::ok("MS levels"));
    } else {
        report.add_check(ValidationCheck::failed(
            "MS levels",
            format!("{} scan(s) have an MS level below 1", invalid),
        ));
    }
}

fn check_retention_order(scans: &[Scan], report: &mut ValidationReport) {
    let first_drop = scans
        .windows(2)
        .position(|pair| pair[1].retention_time < pair[0].retention_time);
    report.add_check(ValidationCheck::warn_on(
        "Retention time order",
        first_drop.map(|i| {
            format!(
                "retention time decreases from {}s to {}s at scan {}",
                scans[i].retention_time,
                scans[i + 1].retention_time,
                i + 2
            )
        }),
    ));
}

fn check_precursors(scans: &[Scan], report: &mut ValidationReport) {
    let missing = scans
        .iter()
        .filter(|s| s.ms_level > 1 && s.precursor.is_none())
        .count();
    report.add_check(ValidationCheck::warn_on(
        "MSn precursors",
        (missing > 0).then(|| format!("{} MSn scan(s) have no precursor", missing)),
    ));
}

fn check_empty_scans(scans: &[Scan], report: &mut ValidationReport) {
    let empty = scans.iter().filter(|s| s.is_empty()).count();
    report.add_check(ValidationCheck::warn_on(
        "Empty scans",
        (empty > 0).then(|| format!("{} scan(s) have no peaks and are dropped on write", empty)),
    ));
}

fn check_mz_ranges(scans: &[Scan], report: &mut ValidationReport) {
    // A zero bound means the range was not recorded
    let outside = scans
        .iter()
        .filter(|s| {
            let (start, stop) = (s.settings.mz_range_start, s.settings.mz_range_stop);
            if start == 0.0 && stop == 0.0 {
                return false;
            }
            start > stop
                || s.peaks
                    .iter()
                    .any(|p| (start != 0.0 && p.mz < start) || (stop != 0.0 && p.mz > stop))
        })
        .count();
    report.add_check(ValidationCheck::warn_on(
        "m/z ranges",
        (outside > 0).then(|| {
            format!(
                "{} scan(s) have peaks outside their recorded m/z range",
                outside
            )
        }),
    ));
}

fn check_peak_values(scans: &[Scan], report: &mut ValidationReport) {
    let mut non_finite = 0usize;
    let mut negative = 0usize;
    for peak in scans.iter().flat_map(|s| s.peaks.iter()) {
        if !peak.mz.is_finite() || !peak.intensity.is_finite() {
            non_finite += 1;
        } else if peak.intensity < 0.0 {
            negative += 1;
        }
    }

    if non_finite == 0 {
        report.add_check(ValidationCheck::ok("Peak values"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Peak values",
            format!("{} peak(s) have NaN or infinite coordinates", non_finite),
        ));
    }
    report.add_check(ValidationCheck::warn_on(
        "Intensities non-negative",
        (negative > 0).then(|| format!("{} peak(s) have negative intensity", negative)),
    ));
}
