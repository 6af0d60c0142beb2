//! # mzxml - Streaming mzXML for Rust
//!
//! `mzxml` reads and writes mzXML, the XML format for LC-MS runs introduced
//! by the Institute for Systems Biology. Documents are parsed in a single
//! streaming pass into an in-memory [`Experiment`](experiment::Experiment)
//! and serialized back as mzXML 2.0.
//!
//! ## Key Features
//!
//! - **Every schema revision**: 1.x (`msRun` root, attribute-style
//!   instruments) through 3.2, selected from the document's schema location.
//!
//! - **Strict where it matters**: unknown elements, fixed-value attribute
//!   mismatches and peak count disagreements are errors carrying the byte
//!   position of the offending event.
//!
//! - **Host-independent peak codec**: Base64 payloads in network byte order,
//!   32 or 64 bit, optionally zlib compressed.
//!
//! - **Indexed output**: the writer records the byte offset of every scan.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mzxml::prelude::*;
//!
//! let file = MzXMLFile::new();
//! let mut exp = Experiment::new();
//! let stats = file.load_into("input.mzXML", &mut exp)?;
//! println!("{} scans read with {} tables", stats.scans, stats.schema);
//!
//! for scan in exp.scans().iter().filter(|s| s.ms_level == 2) {
//!     if let Some(precursor) = &scan.precursor {
//!         println!("MS2 of m/z {} with {} peaks", precursor.mz, scan.len());
//!     }
//! }
//!
//! file.store("output.mzXML", &exp)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`experiment`]: format-agnostic model of a run (scans, peaks, instrument,
//!   processing metadata)
//! - [`mzxml`]: schema symbol tables, the parse state machine, the streaming
//!   reader, the writer and the peak codec
//! - [`validator`]: consistency checks over a parsed run

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod experiment;
pub mod mzxml;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::experiment::{
        ContactPerson, Experiment, Instrument, MetaInfo, Peak, Polarity, PrecursorPeak,
        ProcessingMethod, Scan, Software, SourceFile, SpectrumType,
    };
    pub use crate::mzxml::{
        MzXMLError, MzXMLFile, MzXMLReader, MzXMLWriter, ParseError, ParseStats, PeakCodec,
        Precision, ReaderConfig, SchemaVersion, WriterConfig, WriterError, WriterStats,
    };
    pub use crate::validator::{validate_experiment, validate_mzxml_file, ValidationReport};
}
