use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use mzxml::experiment::Experiment;
use mzxml::mzxml::{MzXMLFile, Term};

/// Display information about an mzXML file
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let mut exp = Experiment::new();
    let stats = MzXMLFile::new()
        .load_into(&file, &mut exp)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if json {
        let dump = serde_json::to_string_pretty(&exp).context("Failed to serialize run")?;
        println!("{}", dump);
        return Ok(());
    }

    println!("mzXML File Information");
    println!("======================");
    println!("File: {}", file.display());
    println!("Schema: {}", stats.schema);
    println!();

    // Scan statistics
    println!("Scans:");
    match stats.declared_scan_count {
        Some(declared) => println!("  Declared: {}", declared),
        None => println!("  Declared: <none>"),
    }
    println!("  Read: {}", stats.scans);
    println!("  With peaks: {}", exp.non_empty_scan_count());
    println!("  Total peaks: {}", stats.peaks);

    let mut levels: BTreeMap<u32, usize> = BTreeMap::new();
    for scan in exp.scans() {
        *levels.entry(scan.ms_level).or_default() += 1;
    }
    for (level, count) in &levels {
        println!("  MS{}: {}", level, count);
    }

    if let (Some(first), Some(last)) = (exp.scans().first(), exp.scans().last()) {
        println!(
            "  Retention time: {:.2}s - {:.2}s",
            first.retention_time, last.retention_time
        );
    }
    if stats.warnings > 0 {
        println!("  Parser warnings: {}", stats.warnings);
    }
    println!();

    // Run metadata
    if !exp.source_file.name.is_empty() {
        println!("Source file: {}", exp.source_file.name);
    }
    if !exp.instrument.is_unset() {
        let instrument = &exp.instrument;
        println!("Instrument:");
        println!("  Manufacturer: {}", instrument.vendor);
        println!("  Model: {}", instrument.model);
        for analyzer in &instrument.mass_analyzers {
            println!("  Analyzer: {}", analyzer.analyzer_type.term());
        }
    }
    if !exp.software.name.is_empty() {
        println!(
            "Software: {} {} ({})",
            exp.software.name, exp.software.version, exp.software.software_type
        );
    }
    for contact in &exp.contacts {
        println!("Operator: {}", contact.name());
    }

    Ok(())
}
