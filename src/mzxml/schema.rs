//! Versioned mzXML vocabularies
//!
//! The parse state machine never compares element or attribute names
//! directly. Names are resolved once per event to a [`Tag`] or [`Attr`] code
//! through the [`SchemaTable`] of the document's schema version. Codes are
//! plain Rust enums and mean the same thing in every version; only the
//! spelling of names (and which names exist) differs between tables.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

macro_rules! codes {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every code, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            /// Number of codes
            pub const COUNT: usize = Self::ALL.len();

            /// Dense index of the code, usable for fixed-size lookup arrays
            pub fn index(self) -> usize {
                self as usize
            }
        }
    };
}

codes! {
    /// Element codes
    Tag {
        /// `mzXML` document root
        MzXML,
        /// `msRun`, the root of legacy documents
        MsRun,
        /// `index`
        Index,
        /// `offset`
        Offset,
        /// `indexOffset`
        IndexOffset,
        /// `sha1`
        Sha1,
        /// `parentFile`
        ParentFile,
        /// `msInstrument` (`instrument` in 1.x)
        Instrument,
        /// `msManufacturer`
        Manufacturer,
        /// `msModel`
        Model,
        /// `msIonisation`
        Ionisation,
        /// `msMassAnalyzer`
        Analyzer,
        /// `msDetector`
        Detector,
        /// `msResolution`
        Resolution,
        /// `operator`
        Operator,
        /// `software`
        Software,
        /// `dataProcessing`
        DataProcessing,
        /// `processingOperation`
        Processing,
        /// `separation`
        Separation,
        /// `separationTechnique`
        SeparationTechnique,
        /// `spotting`
        Spotting,
        /// `robot`
        Robot,
        /// `plate`
        Plate,
        /// `spot`
        Spot,
        /// `scan`
        Scan,
        /// `scanOrigin`
        ScanOrigin,
        /// `precursorMz`
        PrecursorMz,
        /// `maldi`
        Maldi,
        /// `peaks`
        Peaks,
        /// `nameValue`
        NameValue,
        /// `comment`
        Comment,
    }
}

codes! {
    /// Attribute codes
    Attr {
        /// `xmlns`
        Xmlns,
        /// `xmlns:xsi`
        XmlnsXsi,
        /// `xsi:schemaLocation`
        Schema,
        /// `scanCount`
        ScanCount,
        /// `startTime`
        StartTime,
        /// `endTime`
        EndTime,
        /// `id`
        Id,
        /// `fileName`
        FileName,
        /// `fileType`
        FileType,
        /// `fileSha1`
        FileSha1,
        /// `msInstrumentID`
        MsInstrumentId,
        /// `category`
        Category,
        /// `value`
        Value,
        /// `first`
        FirstName,
        /// `last`
        LastName,
        /// `phone`
        Phone,
        /// `email`
        Email,
        /// `URI`
        Uri,
        /// `type`
        Type,
        /// `name`
        Name,
        /// `version`
        SoftwareVersion,
        /// `completionTime`
        CompletionTime,
        /// `centroided`
        Centroided,
        /// `deisotoped`
        Deisotoped,
        /// `chargeDeconvoluted`
        Deconvoluted,
        /// `spotIntegration`
        SpotIntegration,
        /// `intensityCutoff`
        IntensityCutoff,
        /// `num`
        Num,
        /// `msLevel`
        MsLevel,
        /// `peaksCount`
        PeaksCount,
        /// `polarity`
        Polarity,
        /// `scanType`
        ScanType,
        /// `filterLine`
        FilterLine,
        /// `retentionTime`
        RetentionTime,
        /// `ionisationEnergy`
        IonisationEnergy,
        /// `collisionEnergy`
        CollisionEnergy,
        /// `cidGasPressure`
        CidGasPressure,
        /// `startMz`
        StartMz,
        /// `endMz`
        EndMz,
        /// `lowMz`
        LowMz,
        /// `highMz`
        HighMz,
        /// `basePeakMz`
        BasePeakMz,
        /// `basePeakIntensity`
        BasePeakIntensity,
        /// `totIonCurrent`
        TotIonCurrent,
        /// `parentFileID`
        ParentFileId,
        /// `precursorScanNum`
        PrecursorScanNum,
        /// `precursorIntensity`
        PrecursorIntensity,
        /// `precursorCharge`
        PrecursorCharge,
        /// `activationMethod`
        ActivationMethod,
        /// `windowWideness`
        WindowWideness,
        /// `precision`
        Precision,
        /// `byteOrder`
        ByteOrder,
        /// `pairOrder`
        PairOrder,
        /// `contentType`
        ContentType,
        /// `compressionType`
        CompressionType,
        /// `compressedLen`
        CompressedLen,
        /// `manufacturer` on 1.x `instrument`
        InstrumentManufacturer,
        /// `model` on 1.x `instrument`
        InstrumentModel,
        /// `ionisation` on 1.x `instrument`
        InstrumentIonisation,
        /// `msType` on 1.x `instrument`
        InstrumentAnalyzer,
        /// `detector` on 1.x `instrument`
        InstrumentDetector,
    }
}

/// Known revisions of the mzXML vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaVersion {
    /// Legacy msXML 1.x, rooted at `msRun`
    Mzxml1,
    /// mzXML 2.0
    #[default]
    Mzxml2_0,
    /// mzXML 2.1
    Mzxml2_1,
    /// mzXML 3.0
    Mzxml3_0,
    /// mzXML 3.1
    Mzxml3_1,
    /// mzXML 3.2
    Mzxml3_2,
}

/// Version markers in match order; the first marker contained in the schema
/// attribute wins.
const VERSION_MARKERS: &[(&str, SchemaVersion)] = &[
    ("mzXML_3.2", SchemaVersion::Mzxml3_2),
    ("mzXML_3.1", SchemaVersion::Mzxml3_1),
    ("mzXML_3.0", SchemaVersion::Mzxml3_0),
    ("mzXML_2.1", SchemaVersion::Mzxml2_1),
    ("mzXML_2.0", SchemaVersion::Mzxml2_0),
    ("MsXML", SchemaVersion::Mzxml1),
];

impl SchemaVersion {
    /// Version written by the serializer and assumed when a document names none
    pub const CURRENT: SchemaVersion = SchemaVersion::Mzxml2_0;

    /// Find the version named in a schema location or namespace string
    pub fn detect(text: &str) -> Option<Self> {
        VERSION_MARKERS
            .iter()
            .find(|(marker, _)| text.contains(*marker))
            .map(|(_, version)| *version)
    }

    /// Short version label, e.g. `"2.0"`
    pub fn label(&self) -> &'static str {
        match self {
            SchemaVersion::Mzxml1 => "1.x",
            SchemaVersion::Mzxml2_0 => "2.0",
            SchemaVersion::Mzxml2_1 => "2.1",
            SchemaVersion::Mzxml3_0 => "3.0",
            SchemaVersion::Mzxml3_1 => "3.1",
            SchemaVersion::Mzxml3_2 => "3.2",
        }
    }

    /// Symbol table of this version
    pub fn table(self) -> &'static SchemaTable {
        static V1: OnceLock<SchemaTable> = OnceLock::new();
        static V2_0: OnceLock<SchemaTable> = OnceLock::new();
        static V2_1: OnceLock<SchemaTable> = OnceLock::new();
        static V3_0: OnceLock<SchemaTable> = OnceLock::new();
        static V3_1: OnceLock<SchemaTable> = OnceLock::new();
        static V3_2: OnceLock<SchemaTable> = OnceLock::new();

        let cell = match self {
            SchemaVersion::Mzxml1 => &V1,
            SchemaVersion::Mzxml2_0 => &V2_0,
            SchemaVersion::Mzxml2_1 => &V2_1,
            SchemaVersion::Mzxml3_0 => &V3_0,
            SchemaVersion::Mzxml3_1 => &V3_1,
            SchemaVersion::Mzxml3_2 => &V3_2,
        };
        cell.get_or_init(|| SchemaTable::build(self))
    }

    fn generation(self) -> u8 {
        match self {
            SchemaVersion::Mzxml1 => 1,
            SchemaVersion::Mzxml2_0 | SchemaVersion::Mzxml2_1 => 2,
            SchemaVersion::Mzxml3_0 | SchemaVersion::Mzxml3_1 | SchemaVersion::Mzxml3_2 => 3,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mzXML {}", self.label())
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    /// Accepts labels (`"2.1"`), markers (`"mzXML_2.1"`) and `"1"`/`"1.x"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "1" | "1.x" => return Ok(SchemaVersion::Mzxml1),
            "2.0" => return Ok(SchemaVersion::Mzxml2_0),
            "2.1" => return Ok(SchemaVersion::Mzxml2_1),
            "3.0" => return Ok(SchemaVersion::Mzxml3_0),
            "3.1" => return Ok(SchemaVersion::Mzxml3_1),
            "3.2" => return Ok(SchemaVersion::Mzxml3_2),
            _ => {}
        }
        Self::detect(s).ok_or_else(|| format!("unknown mzXML schema version: {}", s))
    }
}

// Names shared by every generation
const COMMON_TAGS: &[(Tag, &str)] = &[
    (Tag::MzXML, "mzXML"),
    (Tag::MsRun, "msRun"),
    (Tag::Index, "index"),
    (Tag::Offset, "offset"),
    (Tag::IndexOffset, "indexOffset"),
    (Tag::Sha1, "sha1"),
    (Tag::ParentFile, "parentFile"),
    (Tag::Operator, "operator"),
    (Tag::Software, "software"),
    (Tag::DataProcessing, "dataProcessing"),
    (Tag::Processing, "processingOperation"),
    (Tag::Separation, "separation"),
    (Tag::SeparationTechnique, "separationTechnique"),
    (Tag::Spotting, "spotting"),
    (Tag::Scan, "scan"),
    (Tag::ScanOrigin, "scanOrigin"),
    (Tag::PrecursorMz, "precursorMz"),
    (Tag::Maldi, "maldi"),
    (Tag::Peaks, "peaks"),
    (Tag::NameValue, "nameValue"),
    (Tag::Comment, "comment"),
];

const V1_TAGS: &[(Tag, &str)] = &[(Tag::Instrument, "instrument")];

const V2_TAGS: &[(Tag, &str)] = &[
    (Tag::Instrument, "msInstrument"),
    (Tag::Manufacturer, "msManufacturer"),
    (Tag::Model, "msModel"),
    (Tag::Ionisation, "msIonisation"),
    (Tag::Analyzer, "msMassAnalyzer"),
    (Tag::Detector, "msDetector"),
    (Tag::Resolution, "msResolution"),
];

const V3_TAGS: &[(Tag, &str)] = &[
    (Tag::Robot, "robot"),
    (Tag::Plate, "plate"),
    (Tag::Spot, "spot"),
];

const COMMON_ATTRS: &[(Attr, &str)] = &[
    (Attr::Xmlns, "xmlns"),
    (Attr::XmlnsXsi, "xmlns:xsi"),
    (Attr::Schema, "xsi:schemaLocation"),
    (Attr::ScanCount, "scanCount"),
    (Attr::StartTime, "startTime"),
    (Attr::EndTime, "endTime"),
    (Attr::Id, "id"),
    (Attr::FileName, "fileName"),
    (Attr::FileType, "fileType"),
    (Attr::FileSha1, "fileSha1"),
    (Attr::FirstName, "first"),
    (Attr::LastName, "last"),
    (Attr::Phone, "phone"),
    (Attr::Email, "email"),
    (Attr::Uri, "URI"),
    (Attr::Type, "type"),
    (Attr::Name, "name"),
    (Attr::Value, "value"),
    (Attr::SoftwareVersion, "version"),
    (Attr::CompletionTime, "completionTime"),
    (Attr::Centroided, "centroided"),
    (Attr::Deisotoped, "deisotoped"),
    (Attr::Deconvoluted, "chargeDeconvoluted"),
    (Attr::SpotIntegration, "spotIntegration"),
    (Attr::IntensityCutoff, "intensityCutoff"),
    (Attr::Num, "num"),
    (Attr::MsLevel, "msLevel"),
    (Attr::PeaksCount, "peaksCount"),
    (Attr::Polarity, "polarity"),
    (Attr::ScanType, "scanType"),
    (Attr::RetentionTime, "retentionTime"),
    (Attr::IonisationEnergy, "ionisationEnergy"),
    (Attr::CollisionEnergy, "collisionEnergy"),
    (Attr::CidGasPressure, "cidGasPressure"),
    (Attr::StartMz, "startMz"),
    (Attr::EndMz, "endMz"),
    (Attr::LowMz, "lowMz"),
    (Attr::HighMz, "highMz"),
    (Attr::BasePeakMz, "basePeakMz"),
    (Attr::BasePeakIntensity, "basePeakIntensity"),
    (Attr::TotIonCurrent, "totIonCurrent"),
    (Attr::ParentFileId, "parentFileID"),
    (Attr::PrecursorIntensity, "precursorIntensity"),
    (Attr::PrecursorCharge, "precursorCharge"),
    (Attr::PrecursorScanNum, "precursorScanNum"),
    (Attr::WindowWideness, "windowWideness"),
    (Attr::Precision, "precision"),
    (Attr::ByteOrder, "byteOrder"),
];

const V1_ATTRS: &[(Attr, &str)] = &[
    (Attr::PairOrder, "pairOrder"),
    (Attr::InstrumentManufacturer, "manufacturer"),
    (Attr::InstrumentModel, "model"),
    (Attr::InstrumentIonisation, "ionisation"),
    (Attr::InstrumentAnalyzer, "msType"),
    (Attr::InstrumentDetector, "detector"),
];

const V2_ATTRS: &[(Attr, &str)] = &[
    (Attr::PairOrder, "pairOrder"),
    (Attr::Category, "category"),
];

const V3_ATTRS: &[(Attr, &str)] = &[
    (Attr::PairOrder, "pairOrder"),
    (Attr::Category, "category"),
    (Attr::MsInstrumentId, "msInstrumentID"),
    (Attr::FilterLine, "filterLine"),
    (Attr::ActivationMethod, "activationMethod"),
    (Attr::ContentType, "contentType"),
    (Attr::CompressionType, "compressionType"),
    (Attr::CompressedLen, "compressedLen"),
];

/// Name ↔ code tables of one schema version
#[derive(Debug)]
pub struct SchemaTable {
    version: SchemaVersion,
    tags: HashMap<&'static str, Tag>,
    tag_names: [Option<&'static str>; Tag::COUNT],
    attrs: HashMap<&'static str, Attr>,
    attr_names: [Option<&'static str>; Attr::COUNT],
}

impl SchemaTable {
    fn build(version: SchemaVersion) -> Self {
        let (tag_extra, attr_extra): (&[&[(Tag, &str)]], &[&[(Attr, &str)]]) =
            match version.generation() {
                1 => (&[V1_TAGS], &[V1_ATTRS]),
                2 => (&[V2_TAGS], &[V2_ATTRS]),
                _ => (&[V2_TAGS, V3_TAGS], &[V3_ATTRS]),
            };

        let mut table = SchemaTable {
            version,
            tags: HashMap::new(),
            tag_names: [None; Tag::COUNT],
            attrs: HashMap::new(),
            attr_names: [None; Attr::COUNT],
        };

        for &(tag, name) in COMMON_TAGS.iter().chain(tag_extra.iter().copied().flatten()) {
            table.tags.insert(name, tag);
            table.tag_names[tag.index()] = Some(name);
        }
        for &(attr, name) in COMMON_ATTRS.iter().chain(attr_extra.iter().copied().flatten()) {
            table.attrs.insert(name, attr);
            table.attr_names[attr.index()] = Some(name);
        }
        table
    }

    /// Version this table describes
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Resolve an element name
    pub fn tag(&self, name: &str) -> Option<Tag> {
        self.tags.get(name).copied()
    }

    /// Element name of a code, if the version defines it
    pub fn tag_name(&self, tag: Tag) -> Option<&'static str> {
        self.tag_names[tag.index()]
    }

    /// Resolve an attribute name
    pub fn attr(&self, name: &str) -> Option<Attr> {
        self.attrs.get(name).copied()
    }

    /// Attribute name of a code, if the version defines it
    pub fn attr_name(&self, attr: Attr) -> Option<&'static str> {
        self.attr_names[attr.index()]
    }

    /// Name used in diagnostics, falling back to the code's debug form
    pub fn describe_attr(&self, attr: Attr) -> String {
        self.attr_name(attr)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", attr))
    }
}
