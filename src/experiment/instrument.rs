use serde::{Deserialize, Serialize};

use super::meta::MetaInfo;

/// Metadata key of the instrument control software name
pub const INSTRUMENT_SOFTWARE: &str = "#InstSoftware";
/// Metadata key of the instrument control software version
pub const INSTRUMENT_SOFTWARE_VERSION: &str = "#InstSoftwareVersion";
/// Metadata key of the instrument control software type
pub const INSTRUMENT_SOFTWARE_TYPE: &str = "#InstSoftwareType";
/// Metadata key of the instrument control software completion time
pub const INSTRUMENT_SOFTWARE_TIME: &str = "#InstSoftwareTime";

/// Ionization method of the ion source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IonizationMethod {
    /// Not recorded
    #[default]
    Unknown,
    /// Electrospray ionization
    Esi,
    /// Electron ionization
    Ei,
    /// Chemical ionization
    Ci,
    /// Fast atom bombardment
    Fab,
    /// Thermospray
    Tsp,
    /// Laser desorption
    Ld,
    /// Field desorption
    Fd,
    /// Field ionization
    Fi,
    /// Plasma desorption
    Pd,
    /// Secondary ionization
    Si,
    /// Thermal ionization
    Ti,
    /// Atmospheric pressure ionization
    Api,
    /// Ion spray ionization
    Isi,
    /// Collision induced decomposition
    Cid,
    /// Collision activated decomposition
    Cad,
    /// Hyperthermal negative ionization
    Hn,
    /// Atmospheric pressure chemical ionization
    Apci,
    /// Atmospheric pressure photo ionization
    Appi,
    /// Inductively coupled plasma
    Icp,
    /// Matrix-assisted laser desorption ionization
    Maldi,
    /// Nanoelectrospray
    NanoEsi,
}

/// Ion source of an instrument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IonSource {
    /// How ions are produced
    pub ionization_method: IonizationMethod,
}

/// Mass analyzer principle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalyzerType {
    /// Not recorded
    #[default]
    Unknown,
    /// Quadrupole
    Quadrupole,
    /// Paul (3D) ion trap
    PaulIonTrap,
    /// Radial ejection linear ion trap
    RadialEjectionLinearIonTrap,
    /// Axial ejection linear ion trap
    AxialEjectionLinearIonTrap,
    /// Time of flight
    Tof,
    /// Magnetic sector
    Sector,
    /// Fourier transform ion cyclotron resonance
    FourierTransform,
    /// Ion storage device
    IonStorage,
    /// Orbitrap
    Orbitrap,
}

/// How the resolution of an analyzer is specified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionMethod {
    /// Not recorded
    #[default]
    Unknown,
    /// Full width at half maximum
    Fwhm,
    /// Ten percent valley
    TenPercentValley,
    /// Baseline
    Baseline,
}

/// One mass analyzer of an instrument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MassAnalyzer {
    /// Analyzer principle
    pub analyzer_type: AnalyzerType,
    /// Resolution method
    pub resolution_method: ResolutionMethod,
}

impl MassAnalyzer {
    /// Create an analyzer of the given type
    pub fn new(analyzer_type: AnalyzerType) -> Self {
        Self {
            analyzer_type,
            ..Default::default()
        }
    }
}

/// Ion detector principle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorType {
    /// Not recorded
    #[default]
    Unknown,
    /// Electron multiplier tube
    ElectronMultiplier,
    /// Photomultiplier
    Photomultiplier,
    /// Focal plane array
    FocalPlaneArray,
    /// Faraday cup
    FaradayCup,
    /// Conversion dynode electron multiplier
    ConversionDynodeElectronMultiplier,
    /// Conversion dynode photomultiplier
    ConversionDynodePhotomultiplier,
    /// Multi-collector
    MultiCollector,
    /// Channel electron multiplier
    ChannelElectronMultiplier,
}

/// Ion detector of an instrument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IonDetector {
    /// Detector principle
    pub detector_type: DetectorType,
}

/// Mass spectrometer description
///
/// Instrument control software has no dedicated slot in the model; it is
/// recorded in [`Instrument::meta`] under the `#InstSoftware*` keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Manufacturer
    pub vendor: String,
    /// Model name
    pub model: String,
    /// Ion source
    pub ion_source: IonSource,
    /// Mass analyzers in ion path order
    pub mass_analyzers: Vec<MassAnalyzer>,
    /// Ion detector
    pub ion_detector: IonDetector,
    /// Additional metadata
    pub meta: MetaInfo,
}

impl Instrument {
    /// Whether nothing has been recorded about the instrument
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}
