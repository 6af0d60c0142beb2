use std::io::Write;

use base64::prelude::*;
use flate2::write::ZlibEncoder;

use super::*;
use crate::experiment::{
    AnalyzerType, DetectorType, IonizationMethod, Peak, Polarity, ResolutionMethod, SpectrumType,
};

const NONE: &[(&str, &str)] = &[];

const PEAKS_32: &[(&str, &str)] = &[
    ("precision", "32"),
    ("byteOrder", "network"),
    ("pairOrder", "m/z-int"),
];

fn payload(values: &[f64]) -> String {
    PeakCodec::encode(values, Precision::Float32)
}

fn scan_attrs<'a>(ms_level: &'a str, peaks_count: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![("msLevel", ms_level), ("peaksCount", peaks_count)]
}

/// Feed a `<peaks>` element holding `values`
fn peaks(handler: &mut MzXMLHandler<'_>, values: &[f64]) -> Result<(), ParseError> {
    handler.start_element("peaks", PEAKS_32)?;
    handler.characters(&payload(values));
    handler.end_element("peaks")
}

#[test]
fn test_two_peak_scan() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler.start_element("msRun", &[("scanCount", "1")]).unwrap();
    handler
        .start_element(
            "scan",
            &[
                ("num", "1"),
                ("msLevel", "1"),
                ("peaksCount", "2"),
                ("polarity", "+"),
                ("retentionTime", "PT60S"),
            ],
        )
        .unwrap();
    handler.start_element("peaks", PEAKS_32).unwrap();
    // Text arrives in two chunks
    let text = payload(&[100.5, 10.0, 200.25, 5.0]);
    let (head, tail) = text.split_at(5);
    handler.characters(head);
    handler.characters(tail);
    handler.end_element("peaks").unwrap();
    handler.end_element("scan").unwrap();
    handler.end_element("msRun").unwrap();
    let stats = handler.finish().unwrap();

    assert_eq!(stats.declared_scan_count, Some(1));
    assert_eq!(stats.scans, 1);
    assert_eq!(stats.peaks, 2);
    assert_eq!(stats.warnings, 0);

    let scan = &exp.scans()[0];
    assert_eq!(scan.ms_level, 1);
    assert_eq!(scan.retention_time, 60.0);
    assert_eq!(scan.settings.polarity, Polarity::Positive);
    assert_eq!(scan.peaks[0], Peak::new(100.5, 10.0));
    assert_eq!(scan.peaks[1], Peak::new(200.25, 5.0));
}

#[test]
fn test_byte_order_must_be_network() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);
    handler.start_element("scan", &scan_attrs("1", "0")).unwrap();

    let err = handler
        .start_element("peaks", &[("precision", "32"), ("byteOrder", "host")])
        .unwrap_err();

    match err {
        ParseError::InvalidValue {
            attribute,
            value,
            expected,
        } => {
            assert_eq!(attribute, "byteOrder");
            assert_eq!(value, "host");
            assert!(expected.contains("network"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_tag_is_fatal() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    let err = handler.start_element("spectrum", NONE).unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnknownName { role: NameRole::OpeningTag, ref name } if name == "spectrum"
    ));

    let err = handler.end_element("chromatogram").unwrap_err();
    assert!(matches!(err, ParseError::UnknownName { role: NameRole::ClosingTag, .. }));
}

#[test]
fn test_unknown_attribute_strictness() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    // tolerated outside scan and dataProcessing
    handler
        .start_element("parentFile", &[("fileName", "a.raw"), ("vendorExtra", "x")])
        .unwrap();
    handler.end_element("parentFile").unwrap();

    let err = handler
        .start_element("scan", &[("msLevel", "1"), ("peaksCount", "0"), ("bogus", "1")])
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnknownName { role: NameRole::ScanAttribute, ref name } if name == "bogus"
    ));

    let err = handler
        .start_element("dataProcessing", &[("smoothed", "1")])
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnknownName { role: NameRole::DataProcessingAttribute, .. }
    ));
}

#[test]
fn test_missing_required_attributes() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    let err = handler.start_element("scan", &[("peaksCount", "0")]).unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingAttribute { tag: "scan", attribute: "msLevel" }
    ));

    handler.start_element("scan", &scan_attrs("1", "0")).unwrap();
    let err = handler
        .start_element("peaks", &[("byteOrder", "network")])
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingAttribute { tag: "peaks", attribute: "precision" }
    ));
}

#[test]
fn test_peak_count_mismatch() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler.start_element("scan", &scan_attrs("1", "3")).unwrap();
    peaks(&mut handler, &[100.0, 1.0, 200.0, 2.0]).unwrap();
    let err = handler.end_element("scan").unwrap_err();
    assert!(matches!(
        err,
        ParseError::PeakCountMismatch { declared: 3, actual: 2 }
    ));
}

#[test]
fn test_payload_overflowing_declared_count() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler.start_element("scan", &scan_attrs("1", "1")).unwrap();
    let err = peaks(&mut handler, &[100.0, 1.0, 200.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        ParseError::PeakCountMismatch { declared: 1, actual: 2 }
    ));
}

#[test]
fn test_nested_ms2_scans() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler.start_element("msRun", NONE).unwrap();
    handler.start_element("scan", &scan_attrs("1", "1")).unwrap();
    peaks(&mut handler, &[400.0, 1000.0]).unwrap();

    handler.start_element("scan", &scan_attrs("2", "2")).unwrap();
    handler
        .start_element(
            "precursorMz",
            &[("precursorIntensity", "1000"), ("precursorCharge", "2")],
        )
        .unwrap();
    handler.characters("400.25");
    handler.end_element("precursorMz").unwrap();
    peaks(&mut handler, &[150.0, 10.0, 250.0, 20.0]).unwrap();
    handler
        .start_element("nameValue", &[("name", "filter"), ("value", "ms2")])
        .unwrap();
    handler.end_element("nameValue").unwrap();
    handler.start_element("comment", NONE).unwrap();
    handler.characters("child");
    handler.end_element("comment").unwrap();
    handler.end_element("scan").unwrap();

    handler.start_element("comment", NONE).unwrap();
    handler.characters("parent");
    handler.end_element("comment").unwrap();
    handler.end_element("scan").unwrap();
    handler.end_element("msRun").unwrap();
    let stats = handler.finish().unwrap();

    assert_eq!(stats.scans, 2);
    assert_eq!(stats.peaks, 3);

    let scans = exp.scans();
    assert_eq!(scans[0].ms_level, 1);
    assert_eq!(scans[0].comment, "parent");
    assert_eq!(scans[0].precursor, None);
    assert!(scans[0].meta.is_empty());

    assert_eq!(scans[1].ms_level, 2);
    assert_eq!(scans[1].comment, "child");
    assert_eq!(scans[1].meta.get("filter"), Some("ms2"));
    assert_eq!(
        scans[1].precursor,
        Some(PrecursorPeak {
            mz: 400.25,
            intensity: 1000.0,
            charge: 2
        })
    );
}

#[test]
fn test_precursor_intensity_is_optional() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);
    handler.start_element("scan", &scan_attrs("2", "0")).unwrap();

    handler.start_element("precursorMz", NONE).unwrap();
    handler.characters(" 500.5 ");
    handler.end_element("precursorMz").unwrap();

    let err = handler
        .start_element("precursorMz", &[("precursorIntensity", "lots")])
        .unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { field: "precursor intensity", .. }));

    drop(handler);
    let precursor = exp.scans()[0].precursor.unwrap();
    assert_eq!(precursor.mz, 500.5);
    assert_eq!(precursor.intensity, 0.0);
}

#[test]
fn test_instrument_description() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler.start_element("msInstrument", NONE).unwrap();
    for (tag, value) in [
        ("msManufacturer", "Thermo Scientific"),
        ("msModel", "LTQ Orbitrap"),
        ("msIonisation", "ESI"),
        ("msMassAnalyzer", "FTMS"),
        ("msResolution", "FWHM"),
        ("msDetector", "EMT"),
    ] {
        handler
            .start_element(tag, &[("category", tag), ("value", value)])
            .unwrap();
        handler.end_element(tag).unwrap();
    }
    // a mismatched category is ignored
    handler
        .start_element("msModel", &[("category", "msManufacturer"), ("value", "X")])
        .unwrap();
    handler.end_element("msModel").unwrap();
    handler
        .start_element(
            "software",
            &[
                ("type", "acquisition"),
                ("name", "Xcalibur"),
                ("version", "2.0"),
                ("completionTime", "2006-05-09T14:30:00"),
            ],
        )
        .unwrap();
    handler.end_element("software").unwrap();
    handler
        .start_element(
            "operator",
            &[("first", "Ada"), ("last", "Lovelace"), ("phone", "123"), ("URI", "http://x")],
        )
        .unwrap();
    handler.end_element("operator").unwrap();
    handler
        .start_element("nameValue", &[("name", "serial"), ("value", "SN42")])
        .unwrap();
    handler.end_element("nameValue").unwrap();
    handler.start_element("comment", NONE).unwrap();
    handler.characters("calibrated");
    handler.end_element("comment").unwrap();
    handler.end_element("msInstrument").unwrap();
    handler.finish().unwrap();

    let instrument = &exp.instrument;
    assert_eq!(instrument.vendor, "Thermo Scientific");
    assert_eq!(instrument.model, "LTQ Orbitrap");
    assert_eq!(instrument.ion_source.ionization_method, IonizationMethod::Esi);
    assert_eq!(instrument.mass_analyzers.len(), 1);
    assert_eq!(
        instrument.mass_analyzers[0].analyzer_type,
        AnalyzerType::FourierTransform
    );
    assert_eq!(
        instrument.mass_analyzers[0].resolution_method,
        ResolutionMethod::Fwhm
    );
    assert_eq!(
        instrument.ion_detector.detector_type,
        DetectorType::ElectronMultiplier
    );
    assert_eq!(instrument.meta.get(INSTRUMENT_SOFTWARE), Some("Xcalibur"));
    assert_eq!(instrument.meta.get(INSTRUMENT_SOFTWARE_TYPE), Some("acquisition"));
    assert_eq!(
        instrument.meta.get(INSTRUMENT_SOFTWARE_TIME),
        Some("2006-05-09 14:30:00")
    );
    assert_eq!(instrument.meta.get("serial"), Some("SN42"));
    assert_eq!(instrument.meta.get(COMMENT_KEY), Some("calibrated"));

    assert_eq!(exp.contacts.len(), 1);
    assert_eq!(exp.contacts[0].name(), "Ada Lovelace");
    assert_eq!(exp.contacts[0].uri, "http://x");
}

#[test]
fn test_unrecognized_vocabulary_term_is_a_warning() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);
    handler.start_element("msInstrument", NONE).unwrap();
    handler
        .start_element(
            "msIonisation",
            &[("category", "msIonisation"), ("value", "nanoelectrospray")],
        )
        .unwrap();
    handler.end_element("msIonisation").unwrap();
    handler
        .start_element(
            "msDetector",
            &[("category", "msDetector"), ("value", "inductive detector")],
        )
        .unwrap();
    handler.end_element("msDetector").unwrap();
    handler.end_element("msInstrument").unwrap();
    let stats = handler.finish().unwrap();

    assert_eq!(stats.warnings, 2);
    assert_eq!(
        exp.instrument.ion_source.ionization_method,
        IonizationMethod::Unknown
    );
    assert_eq!(exp.instrument.ion_detector.detector_type, DetectorType::Unknown);
}

#[test]
fn test_unknown_attribute_on_lenient_element_is_a_warning() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);
    handler
        .start_element("scan", &[("num", "1"), ("msLevel", "1"), ("peaksCount", "0")])
        .unwrap();
    handler
        .start_element(
            "peaks",
            &[
                ("precision", "32"),
                ("byteOrder", "network"),
                ("pairOrder", "m/z-int"),
                ("byteorder", "little"),
            ],
        )
        .unwrap();
    handler.end_element("peaks").unwrap();
    handler.end_element("scan").unwrap();
    let stats = handler.finish().unwrap();

    assert_eq!(stats.warnings, 1);
    assert_eq!(stats.scans, 1);
}

#[test]
fn test_processing_type_without_name_is_kept() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);
    handler.start_element("dataProcessing", NONE).unwrap();
    handler
        .start_element("processingOperation", &[("type", "smoothing"), ("value", "on")])
        .unwrap();
    handler.end_element("processingOperation").unwrap();
    handler
        .start_element(
            "processingOperation",
            &[("name", "window"), ("type", "smoothing"), ("value", "5")],
        )
        .unwrap();
    handler.end_element("processingOperation").unwrap();
    handler.end_element("dataProcessing").unwrap();
    handler.finish().unwrap();

    assert_eq!(exp.processing.meta.get("smoothing"), Some("on"));
    assert_eq!(exp.processing.meta.get("window#smoothing"), Some("5"));
    assert_eq!(exp.processing.meta.visible().count(), 2);
}

#[test]
fn test_legacy_instrument_attributes() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml1);

    handler
        .start_element(
            "instrument",
            &[
                ("manufacturer", "Micromass"),
                ("model", "Q-Tof"),
                ("ionisation", "ESI"),
                ("msType", "TOF"),
                ("detector", "EMT"),
            ],
        )
        .unwrap();
    handler.end_element("instrument").unwrap();
    handler.finish().unwrap();

    assert_eq!(exp.instrument.vendor, "Micromass");
    assert_eq!(exp.instrument.model, "Q-Tof");
    assert_eq!(exp.instrument.mass_analyzers[0].analyzer_type, AnalyzerType::Tof);
    assert_eq!(
        exp.instrument.ion_detector.detector_type,
        DetectorType::ElectronMultiplier
    );
}

#[test]
fn test_data_processing() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler
        .start_element(
            "dataProcessing",
            &[("deisotoped", "1"), ("chargeDeconvoluted", "false"), ("centroided", "1")],
        )
        .unwrap();
    handler
        .start_element(
            "software",
            &[("type", "conversion"), ("name", "ReAdW"), ("version", "1.1"), ("completionTime", "sometime")],
        )
        .unwrap();
    handler.end_element("software").unwrap();
    handler
        .start_element(
            "processingOperation",
            &[("name", "smoothing"), ("type", "gaussian"), ("value", "3")],
        )
        .unwrap();
    handler.end_element("processingOperation").unwrap();
    handler.start_element("comment", NONE).unwrap();
    handler.characters("picked");
    handler.end_element("comment").unwrap();
    handler.end_element("dataProcessing").unwrap();
    let stats = handler.finish().unwrap();

    // the unparsable completion time is a warning
    assert_eq!(stats.warnings, 1);
    assert!(exp.processing.deisotoping);
    assert!(!exp.processing.charge_deconvolution);
    assert_eq!(exp.processing.spectrum_type, SpectrumType::Peaks);
    assert_eq!(exp.software.name, "ReAdW");
    assert_eq!(exp.software.software_type, "conversion");
    assert_eq!(exp.software.completion_time, None);
    assert_eq!(exp.processing.meta.get("smoothing#gaussian"), Some("3"));
    assert_eq!(exp.processing.meta.get(COMMENT_KEY), Some("picked"));
}

#[test]
fn test_zlib_payload() {
    let values: Vec<u8> = [100.5f32, 10.0, 200.25, 5.0]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&values).unwrap();
    let text = BASE64_STANDARD.encode(encoder.finish().unwrap());

    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml3_0);
    handler.start_element("scan", &scan_attrs("1", "2")).unwrap();
    handler
        .start_element(
            "peaks",
            &[
                ("precision", "32"),
                ("byteOrder", "network"),
                ("contentType", "m/z-int"),
                ("compressionType", "zlib"),
                ("compressedLen", "20"),
            ],
        )
        .unwrap();
    handler.characters(&text);
    handler.end_element("peaks").unwrap();
    handler.end_element("scan").unwrap();
    handler.finish().unwrap();

    assert_eq!(
        exp.scans()[0].peaks,
        vec![Peak::new(100.5, 10.0), Peak::new(200.25, 5.0)]
    );
}

#[test]
fn test_schema_switch_on_root_element() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler
        .start_element(
            "mzXML",
            &[(
                "xsi:schemaLocation",
                "http://sashimi.sourceforge.net/schema_revision/mzXML_3.0 mzXML_idx_3.0.xsd",
            )],
        )
        .unwrap();
    assert_eq!(handler.schema(), SchemaVersion::Mzxml3_0);

    // compressionType only exists in 3.x tables
    handler.start_element("msRun", NONE).unwrap();
    handler.start_element("scan", &scan_attrs("1", "0")).unwrap();
    handler
        .start_element("peaks", &[("precision", "32"), ("compressionType", "none")])
        .unwrap();
    handler.end_element("peaks").unwrap();
    handler.end_element("scan").unwrap();

    // a marker after content was read is ignored
    handler
        .start_element("msRun", &[("xmlns", "http://sashimi.sourceforge.net/schema/MsXML")])
        .unwrap();
    assert_eq!(handler.schema(), SchemaVersion::Mzxml3_0);
    assert_eq!(handler.stats().warnings, 1);
    assert_eq!(handler.stats().schema, SchemaVersion::Mzxml3_0);
}

#[test]
fn test_ignored_and_unhandled_text() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    handler.start_element("index", &[("name", "scan")]).unwrap();
    handler.start_element("offset", &[("id", "1")]).unwrap();
    handler.characters("1234");
    handler.end_element("offset").unwrap();
    handler.end_element("index").unwrap();
    handler.characters("\n  \t");
    assert_eq!(handler.stats().warnings, 0);

    handler.start_element("msRun", NONE).unwrap();
    handler.characters("stray");
    assert_eq!(handler.stats().warnings, 1);

    handler
        .start_element("nameValue", &[("name", "orphan"), ("value", "1")])
        .unwrap();
    assert_eq!(handler.stats().warnings, 2);
}

#[test]
fn test_structure_errors() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    let err = handler.start_element("peaks", PEAKS_32).unwrap_err();
    assert!(matches!(err, ParseError::InvalidStructure(_)));

    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);
    handler.start_element("msRun", NONE).unwrap();
    handler.start_element("scan", &scan_attrs("1", "0")).unwrap();
    let err = handler.finish().unwrap_err();
    assert!(matches!(err, ParseError::InvalidStructure(ref m) if m.contains("2 unclosed")));
}

#[test]
fn test_ms_level_must_be_positive() {
    let mut exp = Experiment::new();
    let mut handler = MzXMLHandler::new(&mut exp, SchemaVersion::Mzxml2_0);

    let err = handler.start_element("scan", &scan_attrs("0", "0")).unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue { ref attribute, .. } if attribute == "msLevel"));

    let err = handler.start_element("scan", &scan_attrs("one", "0")).unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { field: "MS level", .. }));
}
