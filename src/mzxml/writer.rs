//! mzXML serializer
//!
//! Writes an [`Experiment`] as an mzXML 2.0 document. Output always uses
//! 32-bit network-order peak payloads. Scans without peaks are skipped and
//! `scanCount` counts only the scans written.

use std::borrow::Cow;
use std::io::{self, Write};

use log::{debug, info, warn};
use quick_xml::escape::escape;

use super::binary::{PeakCodec, Precision};
use super::config::WriterConfig;
use super::error::WriterError;
use super::terms::{self, Term};
use crate::experiment::{
    Experiment, MetaInfo, ResolutionMethod, Scan, ScanMode, SpectrumType, COMMENT_KEY,
    INSTRUMENT_SOFTWARE, INSTRUMENT_SOFTWARE_TIME, INSTRUMENT_SOFTWARE_TYPE,
    INSTRUMENT_SOFTWARE_VERSION,
};

const MZXML_NAMESPACE: &str = "http://sashimi.sourceforge.net/schema_revision/mzXML_2.0";
const SCHEMA_LOCATION: &str = "http://sashimi.sourceforge.net/schema_revision/mzXML_2.0 \
                               http://sashimi.sourceforge.net/schema_revision/mzXML_2.0/mzXML_idx_2.0.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Placeholder checksum for the source file
const EMPTY_SHA1: &str = "0000000000000000000000000000000000000000";

/// Summary of one write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Scans written (empty scans excluded)
    pub scans_written: usize,
    /// Peaks written across all scans
    pub peaks_written: usize,
    /// Bytes of the document
    pub bytes_written: u64,
}

/// Byte-counting pass-through writer, used to record index offsets
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Serializer for mzXML documents
pub struct MzXMLWriter<W: Write> {
    out: CountingWriter<W>,
    config: WriterConfig,
}

impl<W: Write> MzXMLWriter<W> {
    /// Create a writer with the default configuration
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, WriterConfig::default())
    }

    /// Create a writer with an explicit configuration
    pub fn with_config(inner: W, config: WriterConfig) -> Self {
        Self {
            out: CountingWriter { inner, count: 0 },
            config,
        }
    }

    /// Total bytes written through this writer
    pub fn bytes_written(&self) -> u64 {
        self.out.count
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out.inner
    }

    /// Write a complete document for `exp` and flush
    pub fn write_experiment(&mut self, exp: &Experiment) -> Result<WriterStats, WriterError> {
        let start = self.out.count;
        let scan_count = exp.non_empty_scan_count();
        if scan_count < exp.len() {
            warn!(
                "Skipping {} scan(s) without peaks",
                exp.len() - scan_count
            );
        }

        writeln!(self.out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(
            self.out,
            "<mzXML xmlns=\"{}\" xmlns:xsi=\"{}\" xsi:schemaLocation=\"{}\">",
            MZXML_NAMESPACE, XSI_NAMESPACE, SCHEMA_LOCATION
        )?;
        writeln!(self.out, "\t<msRun scanCount=\"{}\">", scan_count)?;

        let source = &exp.source_file;
        writeln!(
            self.out,
            "\t\t<parentFile fileName=\"{}\" fileType=\"{}\" fileSha1=\"{}\"/>",
            self.text(&source.name),
            self.text(&source.file_type),
            source.sha1.as_deref().unwrap_or(EMPTY_SHA1)
        )?;

        self.write_instrument(exp)?;
        self.write_data_processing(exp)?;
        let (offsets, peaks_written) = self.write_scans(exp)?;
        writeln!(self.out, "\t</msRun>")?;

        if self.config.write_index {
            write!(self.out, "\t")?;
            let index_offset = self.out.count;
            writeln!(self.out, "<index name=\"scan\">")?;
            for (num, offset) in offsets.iter().enumerate() {
                writeln!(self.out, "\t\t<offset id=\"{}\">{}</offset>", num + 1, offset)?;
            }
            writeln!(self.out, "\t</index>")?;
            writeln!(self.out, "\t<indexOffset>{}</indexOffset>", index_offset)?;
        } else {
            writeln!(self.out, "\t<indexOffset>0</indexOffset>")?;
        }
        writeln!(self.out, "</mzXML>")?;
        self.out.flush()?;

        let stats = WriterStats {
            scans_written: offsets.len(),
            peaks_written,
            bytes_written: self.out.count - start,
        };
        info!(
            "Wrote {} scans ({} peaks, {} bytes)",
            stats.scans_written, stats.peaks_written, stats.bytes_written
        );
        Ok(stats)
    }

    /// Free text, escaped only when configured
    fn text<'t>(&self, value: &'t str) -> Cow<'t, str> {
        if self.config.escape_text {
            escape(value)
        } else {
            Cow::Borrowed(value)
        }
    }

    fn indent(&mut self, depth: usize) -> io::Result<()> {
        for _ in 0..depth {
            self.out.write_all(b"\t")?;
        }
        Ok(())
    }

    fn write_instrument(&mut self, exp: &Experiment) -> io::Result<()> {
        let inst = &exp.instrument;
        if inst.is_unset() {
            return Ok(());
        }

        writeln!(self.out, "\t\t<msInstrument>")?;
        writeln!(
            self.out,
            "\t\t\t<msManufacturer category=\"msManufacturer\" value=\"{}\"/>",
            self.text(&inst.vendor)
        )?;
        writeln!(
            self.out,
            "\t\t\t<msModel category=\"msModel\" value=\"{}\"/>",
            self.text(&inst.model)
        )?;
        writeln!(
            self.out,
            "\t\t\t<msIonisation category=\"msIonisation\" value=\"{}\"/>",
            inst.ion_source.ionization_method.term()
        )?;

        let analyzer = inst.mass_analyzers.first();
        if inst.mass_analyzers.len() > 1 {
            warn!(
                "mzXML describes a single mass analyzer; writing the first of {}",
                inst.mass_analyzers.len()
            );
        }
        if let Some(analyzer) = analyzer {
            writeln!(
                self.out,
                "\t\t\t<msMassAnalyzer category=\"msMassAnalyzer\" value=\"{}\"/>",
                analyzer.analyzer_type.term()
            )?;
        }
        writeln!(
            self.out,
            "\t\t\t<msDetector category=\"msDetector\" value=\"{}\"/>",
            inst.ion_detector.detector_type.term()
        )?;

        let meta = &inst.meta;
        match (
            meta.get(INSTRUMENT_SOFTWARE),
            meta.get(INSTRUMENT_SOFTWARE_TYPE),
            meta.get(INSTRUMENT_SOFTWARE_VERSION),
        ) {
            (Some(name), Some(kind), Some(version)) => {
                write!(
                    self.out,
                    "\t\t\t<software type=\"{}\" name=\"{}\" version=\"{}\"",
                    self.text(kind),
                    self.text(name),
                    self.text(version)
                )?;
                if let Some(time) = meta.get(INSTRUMENT_SOFTWARE_TIME) {
                    write!(self.out, " completionTime=\"{}\"", time.replace(' ', "T"))?;
                }
                writeln!(self.out, "/>")?;
            }
            _ => debug!("No instrument software recorded"),
        }

        if let Some(analyzer) = analyzer {
            if analyzer.resolution_method != ResolutionMethod::Unknown {
                writeln!(
                    self.out,
                    "\t\t\t<msResolution category=\"msResolution\" value=\"{}\"/>",
                    analyzer.resolution_method.term()
                )?;
            }
        }

        if let Some(contact) = exp.contacts.first() {
            write!(
                self.out,
                "\t\t\t<operator first=\"{}\" last=\"{}\"",
                self.text(&contact.first_name),
                self.text(&contact.last_name)
            )?;
            for (attribute, value) in [
                ("phone", &contact.phone),
                ("email", &contact.email),
                ("URI", &contact.uri),
            ] {
                if !value.is_empty() {
                    write!(self.out, " {}=\"{}\"", attribute, self.text(value))?;
                }
            }
            writeln!(self.out, "/>")?;
        }

        self.write_name_values(&inst.meta, 3)?;
        self.write_comment(meta.get(COMMENT_KEY).unwrap_or(""), 3)?;
        writeln!(self.out, "\t\t</msInstrument>")
    }

    fn write_data_processing(&mut self, exp: &Experiment) -> io::Result<()> {
        let processing = &exp.processing;
        write!(
            self.out,
            "\t\t<dataProcessing deisotoped=\"{}\" chargeDeconvoluted=\"{}\"",
            terms::format_bool(processing.deisotoping),
            terms::format_bool(processing.charge_deconvolution)
        )?;
        if processing.spectrum_type != SpectrumType::Unknown {
            write!(self.out, " centroided=\"{}\"", processing.spectrum_type.term())?;
        }
        writeln!(self.out, ">")?;

        let software = &exp.software;
        write!(
            self.out,
            "\t\t\t<software type=\"{}\" name=\"{}\" version=\"{}\"",
            self.text(&software.software_type),
            self.text(&software.name),
            self.text(&software.version)
        )?;
        if let Some(time) = &software.completion_time {
            write!(self.out, " completionTime=\"{}\"", terms::format_datetime(time))?;
        }
        writeln!(self.out, "/>")?;

        for (key, value) in processing.meta.visible() {
            write!(self.out, "\t\t\t<processingOperation name=\"")?;
            match key.split_once('#') {
                Some((name, kind)) => {
                    write!(self.out, "{}\" type=\"{}", self.text(name), self.text(kind))?
                }
                None => write!(self.out, "{}", self.text(key))?,
            }
            writeln!(self.out, "\" value=\"{}\"/>", self.text(value))?;
        }
        self.write_comment(processing.meta.get(COMMENT_KEY).unwrap_or(""), 3)?;
        writeln!(self.out, "\t\t</dataProcessing>")
    }

    /// Write non-empty scans nested by MS level
    ///
    /// A scan closes every open scan of the same or a higher level before it
    /// opens, so MSn scans end up inside the preceding lower-level scan.
    /// Returns the byte offset of each `<scan` and the number of peaks written.
    fn write_scans(&mut self, exp: &Experiment) -> io::Result<(Vec<u64>, usize)> {
        let mut open_levels: Vec<u32> = Vec::new();
        let mut offsets = Vec::with_capacity(exp.non_empty_scan_count());
        let mut peaks_written = 0;

        for scan in exp.scans().iter().filter(|scan| !scan.is_empty()) {
            while open_levels
                .last()
                .is_some_and(|&level| level >= scan.ms_level)
            {
                open_levels.pop();
                self.indent(open_levels.len() + 2)?;
                writeln!(self.out, "</scan>")?;
            }

            let depth = open_levels.len() + 2;
            self.indent(depth)?;
            offsets.push(self.out.count);
            self.write_scan(scan, offsets.len(), depth)?;
            peaks_written += scan.len();
            open_levels.push(scan.ms_level);
        }

        while open_levels.pop().is_some() {
            self.indent(open_levels.len() + 2)?;
            writeln!(self.out, "</scan>")?;
        }
        Ok((offsets, peaks_written))
    }

    /// Write the opening tag and content of a scan, leaving it open
    fn write_scan(&mut self, scan: &Scan, num: usize, depth: usize) -> io::Result<()> {
        let settings = &scan.settings;
        write!(
            self.out,
            "<scan num=\"{}\" msLevel=\"{}\" peaksCount=\"{}\" polarity=\"{}\"",
            num,
            scan.ms_level,
            scan.len(),
            settings.polarity.term()
        )?;
        if settings.scan_mode != ScanMode::Unknown {
            write!(self.out, " scanType=\"{}\"", settings.scan_mode.term())?;
        }
        write!(
            self.out,
            " retentionTime=\"{}\"",
            terms::format_duration(scan.retention_time)
        )?;
        if settings.mz_range_start != 0.0 {
            write!(self.out, " startMz=\"{}\"", settings.mz_range_start)?;
        }
        if settings.mz_range_stop != 0.0 {
            write!(self.out, " endMz=\"{}\"", settings.mz_range_stop)?;
        }
        writeln!(self.out, ">")?;

        if let Some(precursor) = &scan.precursor {
            self.indent(depth + 1)?;
            write!(
                self.out,
                "<precursorMz precursorIntensity=\"{}\"",
                precursor.intensity
            )?;
            if precursor.charge != 0 {
                write!(self.out, " precursorCharge=\"{}\"", precursor.charge)?;
            }
            writeln!(self.out, ">{}</precursorMz>", precursor.mz)?;
        }

        self.indent(depth + 1)?;
        writeln!(
            self.out,
            "<peaks precision=\"{}\" byteOrder=\"network\" pairOrder=\"m/z-int\">{}</peaks>",
            Precision::Float32.as_attribute(),
            PeakCodec::encode_peaks(&scan.peaks)
        )?;

        self.write_name_values(&scan.meta, depth + 1)?;
        self.write_comment(&scan.comment, depth + 1)
    }

    fn write_name_values(&mut self, meta: &MetaInfo, depth: usize) -> io::Result<()> {
        for (name, value) in meta.visible() {
            self.indent(depth)?;
            writeln!(
                self.out,
                "<nameValue name=\"{}\" value=\"{}\"/>",
                self.text(name),
                self.text(value)
            )?;
        }
        Ok(())
    }

    fn write_comment(&mut self, comment: &str, depth: usize) -> io::Result<()> {
        if comment.is_empty() {
            return Ok(());
        }
        self.indent(depth)?;
        writeln!(self.out, "<comment>{}</comment>", self.text(comment))
    }
}
