//! Event-driven parse state machine for mzXML
//!
//! [`MzXMLHandler`] consumes SAX-style events (an opening tag with its
//! attributes, character data, a closing tag) and fills an [`Experiment`].
//! It does not read XML itself; [`MzXMLReader`](crate::mzxml::MzXMLReader)
//! drives it from a `quick_xml` pull reader, and tests drive it directly.
//!
//! Names are resolved through the [`SchemaTable`] of the active schema
//! version. Element text that matters (`peaks`, `precursorMz`, `comment`) is
//! accumulated across chunks and interpreted when the element closes.

mod attributes;

#[cfg(test)]
mod tests;

use std::str::FromStr;

use log::{debug, warn};

pub use attributes::{AttributeValues, OpenTags};

use super::binary::{Compression, PeakCodec, Precision};
use super::error::{NameRole, ParseError};
use super::schema::{Attr, SchemaTable, SchemaVersion, Tag};
use super::terms::{self, Term};
use crate::experiment::{
    ContactPerson, Experiment, MassAnalyzer, PrecursorPeak, Scan, COMMENT_KEY,
    INSTRUMENT_SOFTWARE, INSTRUMENT_SOFTWARE_TIME, INSTRUMENT_SOFTWARE_TYPE,
    INSTRUMENT_SOFTWARE_VERSION,
};

/// Upper bound for capacity reserved from counts declared in the document
const PREALLOCATION_LIMIT: usize = 1 << 16;

/// Summary of one parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Schema version the document was read with
    pub schema: SchemaVersion,
    /// `scanCount` of the `msRun` element, if given
    pub declared_scan_count: Option<usize>,
    /// Scans parsed (closed)
    pub scans: usize,
    /// Peaks decoded across all scans
    pub peaks: usize,
    /// Recoverable problems reported through `log::warn!`
    pub warnings: usize,
}

/// Scan being filled: where it lives and how many peaks it declared
#[derive(Debug, Clone, Copy)]
struct ScanCursor {
    index: usize,
    declared: usize,
}

/// Parse state machine for one mzXML document
pub struct MzXMLHandler<'a> {
    exp: &'a mut Experiment,
    table: &'static SchemaTable,
    open: OpenTags,
    scan_stack: Vec<ScanCursor>,
    analyzer: Option<usize>,
    precision: Precision,
    compression: Compression,
    text: String,
    stats: ParseStats,
}

impl<'a> MzXMLHandler<'a> {
    /// Create a handler filling `exp`, starting with the tables of `schema`
    pub fn new(exp: &'a mut Experiment, schema: SchemaVersion) -> Self {
        Self {
            exp,
            table: schema.table(),
            open: OpenTags::default(),
            scan_stack: Vec::new(),
            analyzer: None,
            precision: Precision::default(),
            compression: Compression::default(),
            text: String::new(),
            stats: ParseStats {
                schema,
                ..Default::default()
            },
        }
    }

    /// Schema version currently used to resolve names
    pub fn schema(&self) -> SchemaVersion {
        self.table.version()
    }

    /// Statistics gathered so far
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Handle an opening tag
    pub fn start_element<K, V>(&mut self, name: &str, attributes: &[(K, V)]) -> Result<(), ParseError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let tag = self.table.tag(name).ok_or_else(|| ParseError::UnknownName {
            role: NameRole::OpeningTag,
            name: name.to_string(),
        })?;

        if matches!(tag, Tag::MzXML | Tag::MsRun) {
            self.detect_schema(&AttributeValues::resolve(self.table, attributes));
        }
        let atts = AttributeValues::resolve(self.table, attributes);

        if let Some(&unknown) = atts.unknown().first() {
            let role = match tag {
                Tag::Scan => Some(NameRole::ScanAttribute),
                Tag::DataProcessing => Some(NameRole::DataProcessingAttribute),
                _ => None,
            };
            if let Some(role) = role {
                return Err(ParseError::UnknownName {
                    role,
                    name: unknown.to_string(),
                });
            }
            self.warn(format_args!(
                "Ignoring unknown attributes {:?} on <{}>",
                atts.unknown(),
                name
            ));
        }

        self.open.open(tag);
        self.open_element(tag, &atts)
    }

    /// Handle character data
    ///
    /// Text is kept only inside elements whose content is interpreted;
    /// anything else that is not whitespace is reported and dropped.
    pub fn characters(&mut self, text: &str) {
        if self.open.contains(Tag::Peaks)
            || self.open.contains(Tag::PrecursorMz)
            || self.open.contains(Tag::Comment)
        {
            self.text.push_str(text);
        } else if self.open.contains(Tag::Offset)
            || self.open.contains(Tag::IndexOffset)
            || self.open.contains(Tag::Sha1)
        {
            // index data is recomputed on write
        } else if !text.trim().is_empty() {
            self.warn(format_args!("Unhandled characters: \"{}\"", text.trim()));
        }
    }

    /// Handle a closing tag
    pub fn end_element(&mut self, name: &str) -> Result<(), ParseError> {
        let tag = self.table.tag(name).ok_or_else(|| ParseError::UnknownName {
            role: NameRole::ClosingTag,
            name: name.to_string(),
        })?;
        if !self.open.close(tag) {
            return Err(ParseError::InvalidStructure(format!(
                "</{}> without matching opening tag",
                name
            )));
        }

        match tag {
            Tag::Peaks => self.close_peaks(),
            Tag::PrecursorMz => self.close_precursor(),
            Tag::Comment => {
                self.close_comment();
                Ok(())
            }
            Tag::Scan => self.close_scan(),
            Tag::Instrument => {
                self.analyzer = None;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Finish the document and return the parse statistics
    pub fn finish(self) -> Result<ParseStats, ParseError> {
        if !self.open.is_empty() {
            return Err(ParseError::InvalidStructure(format!(
                "document ended with {} unclosed element(s)",
                self.open.len()
            )));
        }
        Ok(self.stats)
    }

    fn warn(&mut self, message: std::fmt::Arguments<'_>) {
        warn!("{}", message);
        self.stats.warnings += 1;
    }

    /// Switch tables when the root element names another schema version
    fn detect_schema(&mut self, atts: &AttributeValues<'_>) {
        let detected = atts
            .get(Attr::Schema)
            .and_then(SchemaVersion::detect)
            .or_else(|| atts.get(Attr::Xmlns).and_then(SchemaVersion::detect));
        let Some(version) = detected else {
            return;
        };
        if version == self.table.version() {
            return;
        }

        let only_root_open = self.open.len() == self.open.depth(Tag::MzXML);
        if only_root_open && self.scan_stack.is_empty() && self.exp.is_empty() {
            debug!("Switching to {} tables", version);
            self.table = version.table();
            self.stats.schema = version;
        } else {
            self.warn(format_args!(
                "Ignoring {} marker after content was read with {} tables",
                version,
                self.table.version()
            ));
        }
    }

    fn open_element(&mut self, tag: Tag, atts: &AttributeValues<'_>) -> Result<(), ParseError> {
        match tag {
            Tag::MsRun => {
                if let Some(count) = atts.get(Attr::ScanCount) {
                    let count: usize = number(count, "scan count")?;
                    self.stats.declared_scan_count = Some(count);
                    self.exp.reserve(count.min(PREALLOCATION_LIMIT));
                }
            }
            Tag::ParentFile => {
                let source = &mut self.exp.source_file;
                source.name = atts.get_or_empty(Attr::FileName).to_string();
                source.file_type = atts.get_or_empty(Attr::FileType).to_string();
                source.sha1 = atts
                    .get(Attr::FileSha1)
                    .filter(|sha1| !sha1.is_empty())
                    .map(str::to_string);
            }
            Tag::Instrument => self.open_legacy_instrument(atts)?,
            Tag::Manufacturer => {
                if let Some(value) = self.category_value(tag, atts) {
                    self.exp.instrument.vendor = value.to_string();
                }
            }
            Tag::Model => {
                if let Some(value) = self.category_value(tag, atts) {
                    self.exp.instrument.model = value.to_string();
                }
            }
            Tag::Ionisation => {
                if let Some(value) = self.category_value(tag, atts) {
                    let method = self.term(value);
                    self.exp.instrument.ion_source.ionization_method = method;
                }
            }
            Tag::Analyzer => {
                if let Some(value) = self.category_value(tag, atts) {
                    let analyzer_type = self.term(value);
                    let analyzers = &mut self.exp.instrument.mass_analyzers;
                    analyzers.push(MassAnalyzer::new(analyzer_type));
                    self.analyzer = Some(analyzers.len() - 1);
                }
            }
            Tag::Detector => {
                if let Some(value) = self.category_value(tag, atts) {
                    let detector = self.term(value);
                    self.exp.instrument.ion_detector.detector_type = detector;
                }
            }
            Tag::Resolution => {
                if let Some(value) = self.category_value(tag, atts) {
                    let method = self.term(value);
                    match self
                        .analyzer
                        .and_then(|i| self.exp.instrument.mass_analyzers.get_mut(i))
                    {
                        Some(analyzer) => analyzer.resolution_method = method,
                        None => debug!("Ignoring msResolution without a mass analyzer"),
                    }
                }
            }
            Tag::Operator => {
                self.exp.contacts.push(ContactPerson {
                    first_name: atts.get_or_empty(Attr::FirstName).to_string(),
                    last_name: atts.get_or_empty(Attr::LastName).to_string(),
                    email: atts.get_or_empty(Attr::Email).to_string(),
                    phone: atts.get_or_empty(Attr::Phone).to_string(),
                    uri: atts.get_or_empty(Attr::Uri).to_string(),
                });
            }
            Tag::Software => self.open_software(atts),
            Tag::DataProcessing => {
                for (attr, value) in atts.iter() {
                    match attr {
                        Attr::Deisotoped => {
                            self.exp.processing.deisotoping = flag(value, "deisotoped flag")?
                        }
                        Attr::Deconvoluted => {
                            self.exp.processing.charge_deconvolution =
                                flag(value, "charge deconvolution flag")?
                        }
                        Attr::Centroided => {
                            let spectrum_type = self.term(value);
                            self.exp.processing.spectrum_type = spectrum_type;
                        }
                        _ => {}
                    }
                }
            }
            Tag::Processing => {
                let name = atts.get_or_empty(Attr::Name);
                // `#` only separates a name from its type, a bare type is its own key
                let key = match atts.get(Attr::Type) {
                    Some(kind) if !kind.is_empty() && !name.is_empty() => {
                        format!("{}#{}", name, kind)
                    }
                    Some(kind) if !kind.is_empty() => kind.to_string(),
                    _ => name.to_string(),
                };
                self.exp
                    .processing
                    .meta
                    .set(key, atts.get_or_empty(Attr::Value));
            }
            Tag::NameValue => self.open_name_value(atts)?,
            Tag::Scan => self.open_scan(atts)?,
            Tag::PrecursorMz => {
                let intensity = match atts.get(Attr::PrecursorIntensity) {
                    Some(value) => number(value, "precursor intensity")?,
                    None => 0.0,
                };
                let charge = match atts.get(Attr::PrecursorCharge) {
                    Some(value) => number(value, "precursor charge")?,
                    None => 0,
                };
                self.current_scan("<precursorMz>")?.precursor = Some(PrecursorPeak {
                    mz: 0.0,
                    intensity,
                    charge,
                });
                self.text.clear();
            }
            Tag::Peaks => self.open_peaks(atts)?,
            Tag::Comment => self.text.clear(),
            _ => {}
        }
        Ok(())
    }

    /// `instrument` in 1.x documents describes the instrument in attributes
    fn open_legacy_instrument(&mut self, atts: &AttributeValues<'_>) -> Result<(), ParseError> {
        if let Some(vendor) = atts.get(Attr::InstrumentManufacturer) {
            self.exp.instrument.vendor = vendor.to_string();
        }
        if let Some(model) = atts.get(Attr::InstrumentModel) {
            self.exp.instrument.model = model.to_string();
        }
        if let Some(method) = atts.get(Attr::InstrumentIonisation) {
            let method = self.term(method);
            self.exp.instrument.ion_source.ionization_method = method;
        }
        if let Some(analyzer) = atts.get(Attr::InstrumentAnalyzer) {
            let analyzer_type = self.term(analyzer);
            let analyzers = &mut self.exp.instrument.mass_analyzers;
            analyzers.push(MassAnalyzer::new(analyzer_type));
            self.analyzer = Some(analyzers.len() - 1);
        }
        if let Some(detector) = atts.get(Attr::InstrumentDetector) {
            let detector = self.term(detector);
            self.exp.instrument.ion_detector.detector_type = detector;
        }
        Ok(())
    }

    /// The `value` of a category/value element whose category is its own name
    fn category_value<'v>(&self, tag: Tag, atts: &AttributeValues<'v>) -> Option<&'v str> {
        let expected = self.table.tag_name(tag)?;
        match atts.get(Attr::Category) {
            Some(category) if category == expected => Some(atts.get_or_empty(Attr::Value)),
            other => {
                debug!("Ignoring <{}> with category {:?}", expected, other);
                None
            }
        }
    }

    fn open_software(&mut self, atts: &AttributeValues<'_>) {
        let name = atts.get_or_empty(Attr::Name);
        let version = atts.get_or_empty(Attr::SoftwareVersion);
        let kind = atts.get_or_empty(Attr::Type);
        let time = match atts.get(Attr::CompletionTime) {
            Some(text) => {
                let parsed = terms::parse_datetime(text);
                if parsed.is_none() {
                    self.warn(format_args!("Could not parse completion time \"{}\"", text));
                }
                parsed
            }
            None => None,
        };

        if self.open.contains(Tag::DataProcessing) {
            let software = &mut self.exp.software;
            software.name = name.to_string();
            software.version = version.to_string();
            software.software_type = kind.to_string();
            software.completion_time = time;
        } else if self.open.contains(Tag::Instrument) {
            let meta = &mut self.exp.instrument.meta;
            meta.set(INSTRUMENT_SOFTWARE, name);
            meta.set(INSTRUMENT_SOFTWARE_VERSION, version);
            meta.set(INSTRUMENT_SOFTWARE_TYPE, kind);
            if let Some(time) = time {
                meta.set(
                    INSTRUMENT_SOFTWARE_TIME,
                    time.format("%Y-%m-%d %H:%M:%S").to_string(),
                );
            }
        } else {
            self.warn(format_args!("Ignoring <software> \"{}\" outside instrument and dataProcessing", name));
        }
    }

    fn open_name_value(&mut self, atts: &AttributeValues<'_>) -> Result<(), ParseError> {
        let name = atts.get_or_empty(Attr::Name);
        let value = atts.get_or_empty(Attr::Value);
        if self.open.contains(Tag::Instrument) {
            self.exp.instrument.meta.set(name, value);
        } else if self.open.contains(Tag::Scan) {
            self.current_scan("<nameValue>")?.meta.set(name, value);
        } else {
            self.warn(format_args!("Unhandled nameValue \"{}\" = \"{}\"", name, value));
        }
        Ok(())
    }

    fn open_scan(&mut self, atts: &AttributeValues<'_>) -> Result<(), ParseError> {
        let ms_level = match atts.get(Attr::MsLevel) {
            Some(value) => number::<u32>(value, "MS level")?,
            None => return Err(self.missing(Tag::Scan, Attr::MsLevel)),
        };
        if ms_level == 0 {
            return Err(ParseError::InvalidValue {
                attribute: self.table.describe_attr(Attr::MsLevel),
                value: "0".to_string(),
                expected: "a positive integer".to_string(),
            });
        }
        let declared = match atts.get(Attr::PeaksCount) {
            Some(value) => number::<usize>(value, "peak count")?,
            None => return Err(self.missing(Tag::Scan, Attr::PeaksCount)),
        };

        let mut scan = Scan::new(ms_level);
        for (attr, value) in atts.iter() {
            match attr {
                Attr::Polarity => scan.settings.polarity = self.term(value),
                Attr::ScanType => scan.settings.scan_mode = self.term(value),
                Attr::RetentionTime => {
                    scan.retention_time =
                        terms::parse_duration(value).ok_or_else(|| ParseError::InvalidNumber {
                            field: "retention time",
                            value: value.to_string(),
                        })?
                }
                Attr::StartMz => scan.settings.mz_range_start = number(value, "start m/z")?,
                Attr::EndMz => scan.settings.mz_range_stop = number(value, "end m/z")?,
                Attr::Deisotoped => {
                    self.exp.processing.deisotoping = flag(value, "deisotoped flag")?
                }
                Attr::Deconvoluted => {
                    self.exp.processing.charge_deconvolution =
                        flag(value, "charge deconvolution flag")?
                }
                _ => {}
            }
        }
        scan.peaks.reserve(declared.min(PREALLOCATION_LIMIT));

        let index = self.exp.push_scan(scan);
        self.scan_stack.push(ScanCursor { index, declared });
        Ok(())
    }

    fn open_peaks(&mut self, atts: &AttributeValues<'_>) -> Result<(), ParseError> {
        if self.scan_stack.is_empty() {
            return Err(ParseError::InvalidStructure(
                "<peaks> outside of <scan>".to_string(),
            ));
        }

        self.precision = match atts.get(Attr::Precision) {
            Some(value) => Precision::from_attribute(value)
                .ok_or_else(|| self.invalid(Attr::Precision, value, &["32", "64"]))?,
            None => return Err(self.missing(Tag::Peaks, Attr::Precision)),
        };
        self.check_fixed(atts, Attr::ByteOrder, "network")?;
        self.check_fixed(atts, Attr::PairOrder, "m/z-int")?;
        self.check_fixed(atts, Attr::ContentType, "m/z-int")?;
        self.compression = match atts.get(Attr::CompressionType) {
            Some(value) => Compression::from_attribute(value)
                .ok_or_else(|| self.invalid(Attr::CompressionType, value, &["none", "zlib"]))?,
            None => Compression::None,
        };

        self.text.clear();
        Ok(())
    }

    fn close_peaks(&mut self) -> Result<(), ParseError> {
        let peaks = PeakCodec::decode_peaks(&self.text, self.precision, self.compression)?;
        self.text.clear();

        let declared = self
            .scan_stack
            .last()
            .map(|cursor| cursor.declared)
            .unwrap_or_default();
        let scan = self.current_scan("</peaks>")?;
        let written = scan.peaks.len() + peaks.len();
        if written > declared {
            return Err(ParseError::PeakCountMismatch {
                declared,
                actual: written,
            });
        }
        let count = peaks.len();
        scan.peaks.extend(peaks);
        self.stats.peaks += count;
        Ok(())
    }

    fn close_precursor(&mut self) -> Result<(), ParseError> {
        let mz: f64 = number(&self.text, "precursor m/z")?;
        self.text.clear();
        if let Some(precursor) = self.current_scan("</precursorMz>")?.precursor.as_mut() {
            precursor.mz = mz;
        }
        Ok(())
    }

    /// Route comment text to the innermost element that keeps comments
    fn close_comment(&mut self) {
        let text = std::mem::take(&mut self.text);
        if text.is_empty() {
            return;
        }

        if self.open.contains(Tag::Instrument) {
            self.exp.instrument.meta.set(COMMENT_KEY, text);
        } else if self.open.contains(Tag::DataProcessing) {
            self.exp.processing.meta.set(COMMENT_KEY, text);
        } else if !self.scan_stack.is_empty() {
            if let Ok(scan) = self.current_scan("</comment>") {
                scan.comment = text;
            }
        } else if !text.trim().is_empty() {
            self.warn(format_args!("Unhandled comment \"{}\"", text.trim()));
        }
    }

    fn close_scan(&mut self) -> Result<(), ParseError> {
        let cursor = self.scan_stack.pop().ok_or_else(|| {
            ParseError::InvalidStructure("</scan> without an open scan".to_string())
        })?;
        let written = self
            .exp
            .scans()
            .get(cursor.index)
            .map(Scan::len)
            .unwrap_or_default();
        if written != cursor.declared {
            return Err(ParseError::PeakCountMismatch {
                declared: cursor.declared,
                actual: written,
            });
        }
        self.stats.scans += 1;
        Ok(())
    }

    /// Innermost open scan
    fn current_scan(&mut self, context: &str) -> Result<&mut Scan, ParseError> {
        let index = self
            .scan_stack
            .last()
            .map(|cursor| cursor.index)
            .ok_or_else(|| ParseError::InvalidStructure(format!("{} outside of <scan>", context)))?;
        self.exp
            .scans_mut()
            .get_mut(index)
            .ok_or_else(|| ParseError::InvalidStructure(format!("{} refers to a removed scan", context)))
    }

    /// Fail if `attr` is present with a value other than `required`
    fn check_fixed(
        &self,
        atts: &AttributeValues<'_>,
        attr: Attr,
        required: &str,
    ) -> Result<(), ParseError> {
        match atts.get(attr) {
            Some(value) if value != required => Err(self.invalid(attr, value, &[required])),
            _ => Ok(()),
        }
    }

    /// Map a vocabulary value to its term, falling back to the unknown term
    fn term<T: Term + Default>(&mut self, value: &str) -> T {
        match T::from_term(value) {
            Some(term) => term,
            None => {
                self.warn(format_args!("Unrecognized {} \"{}\"", T::KIND, value));
                T::default()
            }
        }
    }

    fn invalid(&self, attr: Attr, value: &str, accepted: &[&str]) -> ParseError {
        let expected = accepted
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join(" or ");
        ParseError::InvalidValue {
            attribute: self.table.describe_attr(attr),
            value: value.to_string(),
            expected,
        }
    }

    fn missing(&self, tag: Tag, attr: Attr) -> ParseError {
        ParseError::MissingAttribute {
            tag: self.table.tag_name(tag).unwrap_or("?"),
            attribute: self.table.attr_name(attr).unwrap_or("?"),
        }
    }
}

fn number<T: FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn flag(value: &str, field: &'static str) -> Result<bool, ParseError> {
    terms::parse_bool(value).ok_or_else(|| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
