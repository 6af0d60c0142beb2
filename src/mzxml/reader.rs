//! Streaming mzXML reader using quick-xml
//!
//! Pulls events from a [`quick_xml::Reader`] and forwards them to an
//! [`MzXMLHandler`]. The schema version is taken from the root element
//! before the first event is dispatched, so the handler starts out with the
//! right symbol table.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::config::ReaderConfig;
use super::error::{MzXMLError, ParseError};
use super::handler::{MzXMLHandler, ParseStats};
use super::schema::SchemaVersion;
use crate::experiment::Experiment;

/// Attributes on the root element that may name the schema, in priority order
const SCHEMA_ATTRIBUTES: [&str; 2] = ["xsi:schemaLocation", "xmlns"];

/// Streaming parser for mzXML documents
pub struct MzXMLReader<R: BufRead> {
    reader: Reader<R>,
    config: ReaderConfig,
}

impl MzXMLReader<BufReader<File>> {
    /// Open a file with a buffered reader sized by `config`
    pub fn open<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<Self, MzXMLError> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(config.buffer_size, file);
        Ok(Self::with_config(reader, config))
    }
}

impl<R: BufRead> MzXMLReader<R> {
    /// Create a reader with the default configuration
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ReaderConfig::default())
    }

    /// Create a reader with an explicit configuration
    pub fn with_config(reader: R, config: ReaderConfig) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        // Whitespace inside comments is content
        xml_reader.config_mut().trim_text(false);

        Self {
            reader: xml_reader,
            config,
        }
    }

    /// Parse the whole document into a new [`Experiment`]
    pub fn read_experiment(&mut self) -> Result<Experiment, MzXMLError> {
        let mut exp = Experiment::new();
        self.read_into(&mut exp)?;
        Ok(exp)
    }

    /// Parse the whole document into `exp`, replacing its contents
    pub fn read_into(&mut self, exp: &mut Experiment) -> Result<ParseStats, MzXMLError> {
        exp.clear();
        let mut buf = Vec::new();

        // Skip the prolog up to the root element
        let root = loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) => break Some((e.into_owned(), false)),
                Event::Empty(e) => break Some((e.into_owned(), true)),
                Event::Eof => break None,
                _ => {}
            }
            buf.clear();
        };
        let position = self.reader.buffer_position();
        let Some((root, root_is_empty)) = root else {
            return Err(MzXMLError::Parse {
                position,
                source: ParseError::InvalidStructure("document has no root element".to_string()),
            });
        };

        let root_name = element_name(&root)?;
        let root_attributes = collect_attributes(&root, self.reader.decoder())?;
        let schema = SCHEMA_ATTRIBUTES
            .iter()
            .find_map(|key| {
                root_attributes
                    .iter()
                    .find(|(name, _)| name == key)
                    .and_then(|(_, value)| SchemaVersion::detect(value))
            })
            .unwrap_or(self.config.default_schema);
        info!("Reading {} document rooted at <{}>", schema, root_name);

        let mut handler = MzXMLHandler::new(exp, schema);
        let located = |position: u64| move |source: ParseError| MzXMLError::Parse { position, source };

        handler
            .start_element(root_name, &root_attributes)
            .map_err(located(position))?;
        if root_is_empty {
            handler.end_element(root_name).map_err(located(position))?;
        }

        let decoder = self.reader.decoder();
        loop {
            buf.clear();
            let event = self.reader.read_event_into(&mut buf)?;
            let position = self.reader.buffer_position();

            match event {
                Event::Start(e) => {
                    let name = element_name(&e)?;
                    let attributes = collect_attributes(&e, decoder)?;
                    handler
                        .start_element(name, &attributes)
                        .map_err(located(position))?;
                }
                Event::Empty(e) => {
                    let name = element_name(&e)?;
                    let attributes = collect_attributes(&e, decoder)?;
                    handler
                        .start_element(name, &attributes)
                        .map_err(located(position))?;
                    handler.end_element(name).map_err(located(position))?;
                }
                Event::End(e) => {
                    let name = std::str::from_utf8(e.name().into_inner())?;
                    handler.end_element(name).map_err(located(position))?;
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    handler.characters(&text);
                }
                Event::CData(e) => {
                    let text = std::str::from_utf8(&e)?;
                    handler.characters(text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let position = self.reader.buffer_position();
        let stats = handler.finish().map_err(located(position))?;
        debug!(
            "Parsed {} scans with {} peaks ({} warnings)",
            stats.scans, stats.peaks, stats.warnings
        );
        Ok(stats)
    }
}

fn element_name<'e>(e: &'e BytesStart<'_>) -> Result<&'e str, MzXMLError> {
    Ok(std::str::from_utf8(e.name().into_inner())?)
}

/// Decode all attributes of a start tag in the document's declared encoding
fn collect_attributes<'e>(
    e: &'e BytesStart<'_>,
    decoder: Decoder,
) -> Result<Vec<(&'e str, Cow<'e, str>)>, MzXMLError> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.into_inner())?;
        let value = attr.decode_and_unescape_value(decoder)?;
        attributes.push((key, value));
    }
    Ok(attributes)
}
