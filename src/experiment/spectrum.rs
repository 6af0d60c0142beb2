use serde::{Deserialize, Serialize};

use super::meta::MetaInfo;

/// A single (m/z, intensity) coordinate pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Signal intensity
    pub intensity: f64,
}

impl Peak {
    /// Create a peak from its coordinates
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// The selected ion a higher-level scan was produced from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecursorPeak {
    /// Precursor m/z
    pub mz: f64,
    /// Precursor intensity
    pub intensity: f64,
    /// Charge state, 0 when unknown
    pub charge: i32,
}

/// Ion polarity of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Not recorded
    #[default]
    Unknown,
    /// Positive ion mode
    Positive,
    /// Negative ion mode
    Negative,
}

/// Acquisition mode of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    /// Not recorded
    #[default]
    Unknown,
    /// Full scan
    Full,
    /// Zoom scan
    Zoom,
    /// Selected ion monitoring
    Sim,
    /// Selected reaction monitoring
    Srm,
    /// Consecutive reaction monitoring
    Crm,
    /// Constant neutral loss
    Cnl,
    /// First quadrupole scan
    Q1,
    /// Third quadrupole scan
    Q3,
    /// Multiple reaction monitoring
    Mrm,
}

/// Acquisition settings recorded for one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSettings {
    /// Ion polarity
    pub polarity: Polarity,
    /// Scan mode
    pub scan_mode: ScanMode,
    /// Lower bound of the scanned m/z range, 0 when unset
    pub mz_range_start: f64,
    /// Upper bound of the scanned m/z range, 0 when unset
    pub mz_range_stop: f64,
}

/// One spectrum of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// MS level (1 for survey scans, 2 for fragment scans, ...)
    pub ms_level: u32,
    /// Retention time in seconds
    pub retention_time: f64,
    /// Acquisition settings
    pub settings: InstrumentSettings,
    /// Peaks in acquisition order
    pub peaks: Vec<Peak>,
    /// Precursor ion, for MSn scans
    pub precursor: Option<PrecursorPeak>,
    /// Free-text comment
    pub comment: String,
    /// Additional name/value pairs
    pub meta: MetaInfo,
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            ms_level: 1,
            retention_time: 0.0,
            settings: InstrumentSettings::default(),
            peaks: Vec::new(),
            precursor: None,
            comment: String::new(),
            meta: MetaInfo::default(),
        }
    }
}

impl Scan {
    /// Create an empty scan at the given MS level
    pub fn new(ms_level: u32) -> Self {
        Self {
            ms_level,
            ..Default::default()
        }
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Whether the scan has no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Append a peak
    pub fn push(&mut self, mz: f64, intensity: f64) {
        self.peaks.push(Peak::new(mz, intensity));
    }

    /// The most intense peak, if any
    pub fn base_peak(&self) -> Option<&Peak> {
        self.peaks
            .iter()
            .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
    }

    /// Sum of all peak intensities
    pub fn total_ion_current(&self) -> f64 {
        self.peaks.iter().map(|p| p.intensity).sum()
    }
}
