use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzxml::experiment::Experiment;
use mzxml::mzxml::{MzXMLFile, ReaderConfig, WriterConfig};

use super::config::Config;

/// Load an mzXML file and store it again as mzXML 2.0
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    escape_text: bool,
    no_index: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let output = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        input.with_file_name(format!("{}.2_0.mzXML", stem))
    });
    if output == input {
        anyhow::bail!("Refusing to overwrite the input file: {}", input.display());
    }

    // Config file values first, flags override them
    let (reader_config, mut writer_config) = match &config {
        Some(path) => {
            let file_config = Config::from_file(path)?;
            (file_config.reader_config()?, file_config.writer_config())
        }
        None => (ReaderConfig::default(), WriterConfig::default()),
    };
    if escape_text {
        writer_config = writer_config.with_escape_text(true);
    }
    if no_index {
        writer_config = writer_config.with_index(false);
    }

    info!("mzXML Converter");
    info!("===============");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Escape text: {}", writer_config.escape_text);
    info!("Scan index: {}", writer_config.write_index);

    let file = MzXMLFile::new()
        .with_reader_config(reader_config)
        .with_writer_config(writer_config);

    let mut exp = Experiment::new();
    let read_stats = file
        .load_into(&input, &mut exp)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    info!(
        "Read {} scans ({} peaks) as {}",
        read_stats.scans, read_stats.peaks, read_stats.schema
    );

    let write_stats = file
        .store(&output, &exp)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Conversion complete!");
    info!("  Scans written: {}", write_stats.scans_written);
    info!("  Peaks written: {}", write_stats.peaks_written);
    let skipped = exp.len() - write_stats.scans_written;
    if skipped > 0 {
        info!("  Empty scans skipped: {}", skipped);
    }
    info!(
        "  Output file size: {} bytes ({:.2} MB)",
        write_stats.bytes_written,
        write_stats.bytes_written as f64 / 1024.0 / 1024.0
    );

    Ok(())
}
