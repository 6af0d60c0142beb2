//! # In-memory experiment model
//!
//! An [`Experiment`] is an ordered list of [`Scan`]s plus the run-level
//! metadata describing how they were acquired and processed. The model is
//! format-agnostic: the mzXML reader fills it, the mzXML writer reads it.
//!
//! ```rust
//! use mzxml::experiment::{Experiment, Scan};
//!
//! let mut exp = Experiment::new();
//! let mut scan = Scan::new(1);
//! scan.retention_time = 12.5;
//! scan.push(400.0, 1000.0);
//! exp.push_scan(scan);
//!
//! assert_eq!(exp.total_peaks(), 1);
//! ```

mod instrument;
mod meta;
mod processing;
mod spectrum;


use serde::{Deserialize, Serialize};

pub use instrument::{
    AnalyzerType, DetectorType, Instrument, IonDetector, IonSource, IonizationMethod,
    MassAnalyzer, ResolutionMethod, INSTRUMENT_SOFTWARE, INSTRUMENT_SOFTWARE_TIME,
    INSTRUMENT_SOFTWARE_TYPE, INSTRUMENT_SOFTWARE_VERSION,
};
pub use meta::{is_internal_key, MetaInfo, COMMENT_KEY, INTERNAL_PREFIX};
pub use processing::{ContactPerson, ProcessingMethod, Software, SourceFile, SpectrumType};
pub use spectrum::{InstrumentSettings, Peak, Polarity, PrecursorPeak, Scan, ScanMode};

/// A complete LC-MS run: scans plus run-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    scans: Vec<Scan>,
    /// Instrument that acquired the data
    pub instrument: Instrument,
    /// File the data was derived from
    pub source_file: SourceFile,
    /// Software that processed the data
    pub software: Software,
    /// Processing applied to the spectra
    pub processing: ProcessingMethod,
    /// People responsible for the run
    pub contacts: Vec<ContactPerson>,
}

impl Experiment {
    /// Create an empty experiment
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans in acquisition order
    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    /// Mutable access to the scans
    pub fn scans_mut(&mut self) -> &mut Vec<Scan> {
        &mut self.scans
    }

    /// Append a scan, returning its index
    pub fn push_scan(&mut self, scan: Scan) -> usize {
        self.scans.push(scan);
        self.scans.len() - 1
    }

    /// Reserve room for `additional` more scans
    pub fn reserve(&mut self, additional: usize) {
        self.scans.reserve(additional);
    }

    /// Number of scans, empty ones included
    pub fn len(&self) -> usize {
        self.scans.len()
    }

    /// Whether the experiment holds no scans
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Number of scans carrying at least one peak
    pub fn non_empty_scan_count(&self) -> usize {
        self.scans.iter().filter(|s| !s.is_empty()).count()
    }

    /// Total number of peaks across all scans
    pub fn total_peaks(&self) -> usize {
        self.scans.iter().map(Scan::len).sum()
    }

    /// Reset to the empty state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
