//! Textual values of enumerated mzXML attributes
//!
//! Each model enum maps to the strings mzXML uses for it. The first entry
//! listed for a variant is the one written; later entries are accepted
//! aliases. Matching on read ignores ASCII case.

use chrono::{DateTime, NaiveDateTime};

use crate::experiment::{
    AnalyzerType, DetectorType, IonizationMethod, Polarity, ResolutionMethod, ScanMode,
    SpectrumType,
};

/// An enum with a fixed mzXML vocabulary
pub trait Term: Copy + PartialEq + Sized + 'static {
    /// Human-readable name of the vocabulary, used in diagnostics
    const KIND: &'static str;
    /// `(variant, text)` pairs; the first text of a variant is canonical
    const TERMS: &'static [(Self, &'static str)];

    /// Resolve text to a variant
    fn from_term(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::TERMS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(text))
            .map(|(variant, _)| *variant)
    }

    /// Canonical text of a variant
    fn term(&self) -> &'static str {
        Self::TERMS
            .iter()
            .find(|(variant, _)| variant == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }
}

impl Term for Polarity {
    const KIND: &'static str = "polarity";
    const TERMS: &'static [(Self, &'static str)] = &[
        (Polarity::Unknown, "any"),
        (Polarity::Positive, "+"),
        (Polarity::Negative, "-"),
        (Polarity::Unknown, ""),
        (Polarity::Positive, "positive"),
        (Polarity::Negative, "negative"),
    ];
}

impl Term for ScanMode {
    const KIND: &'static str = "scan mode";
    const TERMS: &'static [(Self, &'static str)] = &[
        (ScanMode::Unknown, ""),
        (ScanMode::Full, "Full"),
        (ScanMode::Zoom, "zoom"),
        (ScanMode::Sim, "SIM"),
        (ScanMode::Srm, "SRM"),
        (ScanMode::Crm, "CRM"),
        (ScanMode::Cnl, "CNL"),
        (ScanMode::Q1, "Q1"),
        (ScanMode::Q3, "Q3"),
        (ScanMode::Mrm, "MRM"),
    ];
}

impl Term for IonizationMethod {
    const KIND: &'static str = "ionization type";
    const TERMS: &'static [(Self, &'static str)] = &[
        (IonizationMethod::Unknown, ""),
        (IonizationMethod::Esi, "ESI"),
        (IonizationMethod::Ei, "EI"),
        (IonizationMethod::Ci, "CI"),
        (IonizationMethod::Fab, "FAB"),
        (IonizationMethod::Tsp, "TSP"),
        (IonizationMethod::Ld, "LD"),
        (IonizationMethod::Fd, "FD"),
        (IonizationMethod::Fi, "FI"),
        (IonizationMethod::Pd, "PD"),
        (IonizationMethod::Si, "SI"),
        (IonizationMethod::Ti, "TI"),
        (IonizationMethod::Api, "API"),
        (IonizationMethod::Isi, "ISI"),
        (IonizationMethod::Cid, "CID"),
        (IonizationMethod::Cad, "CAD"),
        (IonizationMethod::Hn, "HN"),
        (IonizationMethod::Apci, "APCI"),
        (IonizationMethod::Appi, "APPI"),
        (IonizationMethod::Icp, "ICP"),
        (IonizationMethod::Maldi, "MALDI"),
        (IonizationMethod::NanoEsi, "NSI"),
        (IonizationMethod::NanoEsi, "nanoESI"),
    ];
}

impl Term for AnalyzerType {
    const KIND: &'static str = "analyzer type";
    const TERMS: &'static [(Self, &'static str)] = &[
        (AnalyzerType::Unknown, ""),
        (AnalyzerType::Quadrupole, "Quadrupole"),
        (AnalyzerType::PaulIonTrap, "Quadrupole Ion Trap"),
        (AnalyzerType::RadialEjectionLinearIonTrap, "Radial Ejection Linear Ion Trap"),
        (AnalyzerType::AxialEjectionLinearIonTrap, "Axial Ejection Linear Ion Trap"),
        (AnalyzerType::Tof, "TOF"),
        (AnalyzerType::Sector, "Magnetic Sector"),
        (AnalyzerType::FourierTransform, "FT-ICR"),
        (AnalyzerType::IonStorage, "Ion Storage"),
        (AnalyzerType::Orbitrap, "Orbitrap"),
        (AnalyzerType::PaulIonTrap, "Ion Trap"),
        (AnalyzerType::RadialEjectionLinearIonTrap, "ITMS"),
        (AnalyzerType::FourierTransform, "FTMS"),
    ];
}

impl Term for ResolutionMethod {
    const KIND: &'static str = "resolution method";
    const TERMS: &'static [(Self, &'static str)] = &[
        (ResolutionMethod::Unknown, ""),
        (ResolutionMethod::Fwhm, "FWHM"),
        (ResolutionMethod::TenPercentValley, "TenPercentValley"),
        (ResolutionMethod::Baseline, "Baseline"),
    ];
}

impl Term for DetectorType {
    const KIND: &'static str = "detector type";
    const TERMS: &'static [(Self, &'static str)] = &[
        (DetectorType::Unknown, ""),
        (DetectorType::ElectronMultiplier, "EMT"),
        (DetectorType::Photomultiplier, "Photomultiplier"),
        (DetectorType::FocalPlaneArray, "Focal Plane Array"),
        (DetectorType::FaradayCup, "Faraday Cup"),
        (
            DetectorType::ConversionDynodeElectronMultiplier,
            "Conversion Dynode Electron Multiplier",
        ),
        (
            DetectorType::ConversionDynodePhotomultiplier,
            "Conversion Dynode Photomultiplier",
        ),
        (DetectorType::MultiCollector, "Multi-Collector"),
        (DetectorType::ChannelElectronMultiplier, "Channel Electron Multiplier"),
        (DetectorType::ElectronMultiplier, "Electron Multiplier"),
    ];
}

impl Term for SpectrumType {
    const KIND: &'static str = "peak processing";
    const TERMS: &'static [(Self, &'static str)] = &[
        (SpectrumType::Unknown, ""),
        (SpectrumType::Peaks, "1"),
        (SpectrumType::RawData, "0"),
        (SpectrumType::Peaks, "true"),
        (SpectrumType::RawData, "false"),
    ];
}

/// Parse an `xs:duration` time span such as `PT60.5S` or `PT1M30S` to seconds
pub fn parse_duration(text: &str) -> Option<f64> {
    let rest = text.trim().strip_prefix("PT")?;
    let mut seconds = 0.0;
    let mut number_start = 0;
    let mut components = 0;

    for (i, c) in rest.char_indices() {
        let factor = match c {
            'H' => 3600.0,
            'M' => 60.0,
            'S' => 1.0,
            _ => continue,
        };
        let value: f64 = rest[number_start..i].parse().ok()?;
        seconds += value * factor;
        number_start = i + 1;
        components += 1;
    }

    if components == 0 || number_start != rest.len() {
        return None;
    }
    Some(seconds)
}

/// Format seconds as the `PT<seconds>S` token
pub fn format_duration(seconds: f64) -> String {
    format!("PT{}S", seconds)
}

/// Parse an `xs:boolean`
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Format a boolean the way legacy mzXML writers do
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Parse an `xs:dateTime`; offsets are dropped, keeping local wall time
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    let text = text.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Format a timestamp as `xs:dateTime` without offset
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}
