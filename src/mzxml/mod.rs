//! # mzXML Reader and Writer
//!
//! Streaming support for mzXML, the Institute for Systems Biology's XML
//! format for LC-MS data, in schema revisions 1.x through 3.2.
//!
//! ## mzXML Structure
//!
//! ```text
//! mzXML (msRun is the root in 1.x documents)
//! ├── msRun scanCount
//! │   ├── parentFile*
//! │   ├── msInstrument (1.x: instrument with attributes)
//! │   │   ├── msManufacturer, msModel, msIonisation
//! │   │   ├── msMassAnalyzer, msDetector, msResolution
//! │   │   ├── software, operator, nameValue*, comment*
//! │   ├── dataProcessing
//! │   │   ├── software, processingOperation*, comment*
//! │   └── scan* (MSn scans nest inside their parent scan)
//! │       ├── precursorMz
//! │       ├── peaks (base64, network byte order)
//! │       └── nameValue*, comment*, scan*
//! ├── index
//! │   └── offset*
//! └── indexOffset
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use mzxml::mzxml::MzXMLFile;
//!
//! let file = MzXMLFile::new();
//! let exp = file.load("run.mzXML")?;
//! println!("{} scans", exp.len());
//!
//! let stats = file.store("copy.mzXML", &exp)?;
//! println!("wrote {} bytes", stats.bytes_written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod binary;
mod config;
mod error;
mod handler;
mod reader;
mod schema;
mod terms;
mod writer;


use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

pub use binary::{BinaryError, Compression, PeakCodec, Precision};
pub use config::{ReaderConfig, WriterConfig, DEFAULT_INPUT_BUFFER_SIZE};
pub use error::{MzXMLError, NameRole, ParseError, WriterError};
pub use handler::{AttributeValues, MzXMLHandler, OpenTags, ParseStats};
pub use reader::MzXMLReader;
pub use schema::{Attr, SchemaTable, SchemaVersion, Tag};
pub use terms::{
    format_bool, format_datetime, format_duration, parse_bool, parse_datetime, parse_duration,
    Term,
};
pub use writer::{MzXMLWriter, WriterStats};

use crate::experiment::Experiment;

/// Loads and stores whole mzXML files
#[derive(Debug, Clone, Default)]
pub struct MzXMLFile {
    reader_config: ReaderConfig,
    writer_config: WriterConfig,
}

impl MzXMLFile {
    /// Create a facade with default reader and writer configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the reader configuration
    pub fn with_reader_config(mut self, config: ReaderConfig) -> Self {
        self.reader_config = config;
        self
    }

    /// Replace the writer configuration
    pub fn with_writer_config(mut self, config: WriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Read a file into a new experiment
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Experiment, MzXMLError> {
        let mut exp = Experiment::new();
        self.load_into(path, &mut exp)?;
        Ok(exp)
    }

    /// Read a file into `exp`, replacing its previous contents
    pub fn load_into<P: AsRef<Path>>(
        &self,
        path: P,
        exp: &mut Experiment,
    ) -> Result<ParseStats, MzXMLError> {
        let path = path.as_ref();
        info!("Loading {}", path.display());
        let mut reader = MzXMLReader::open(path, self.reader_config.clone())?;
        reader.read_into(exp)
    }

    /// Write `exp` to a file, replacing it if it exists
    pub fn store<P: AsRef<Path>>(
        &self,
        path: P,
        exp: &Experiment,
    ) -> Result<WriterStats, WriterError> {
        let path = path.as_ref();
        info!("Storing {}", path.display());
        let file = File::create(path)?;
        let mut writer = MzXMLWriter::with_config(BufWriter::new(file), self.writer_config.clone());
        let stats = writer.write_experiment(exp)?;
        writer.into_inner().flush()?;
        Ok(stats)
    }
}
