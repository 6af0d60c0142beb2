use std::fmt;

use crate::mzxml::binary::BinaryError;

/// Where an unresolvable name appeared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRole {
    /// Name of a start tag
    OpeningTag,
    /// Name of an end tag
    ClosingTag,
    /// Attribute of a `scan` element
    ScanAttribute,
    /// Attribute of a `dataProcessing` element
    DataProcessingAttribute,
}

impl fmt::Display for NameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameRole::OpeningTag => "opening tag",
            NameRole::ClosingTag => "closing tag",
            NameRole::ScanAttribute => "scan attribute",
            NameRole::DataProcessingAttribute => "dataProcessing attribute",
        })
    }
}

/// Errors raised by the parse state machine
///
/// These carry no document position; the reader attaches one.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A tag or attribute name is not part of the active schema
    #[error("Unknown {role} \"{name}\"")]
    UnknownName {
        /// Context the name appeared in
        role: NameRole,
        /// The offending name
        name: String,
    },

    /// An attribute with a fixed value carries something else
    #[error("Invalid value \"{value}\" for attribute \"{attribute}\", expected {expected}")]
    InvalidValue {
        /// Attribute name
        attribute: String,
        /// Value found in the document
        value: String,
        /// Accepted value(s)
        expected: String,
    },

    /// A numeric or temporal field could not be parsed
    #[error("Could not parse \"{value}\" as {field}")]
    InvalidNumber {
        /// Field description
        field: &'static str,
        /// The offending text
        value: String,
    },

    /// A required attribute is absent
    #[error("Missing required attribute \"{attribute}\" on <{tag}>")]
    MissingAttribute {
        /// Element name
        tag: &'static str,
        /// Attribute name
        attribute: &'static str,
    },

    /// Decoded peak count disagrees with `peaksCount`
    #[error("Scan declares {declared} peaks but its payload holds {actual}")]
    PeakCountMismatch {
        /// Value of `peaksCount`
        declared: usize,
        /// Peaks materialized from the payload
        actual: usize,
    },

    /// The binary payload is malformed
    #[error("Invalid peak payload: {0}")]
    Binary(#[from] BinaryError),

    /// Elements appear where the state machine cannot place them
    #[error("Invalid mzXML structure: {0}")]
    InvalidStructure(String),
}

/// Errors that can occur while reading an mzXML document
#[derive(Debug, thiserror::Error)]
pub enum MzXMLError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in names
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// The document content is invalid at a known position
    #[error("{source} (at byte {position})")]
    Parse {
        /// Byte offset in the input where the event ended
        position: u64,
        /// What went wrong
        #[source]
        source: ParseError,
    },
}

impl MzXMLError {
    /// The state machine error, when the failure was about document content
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            MzXMLError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
