use super::schema::SchemaVersion;

/// Default capacity of the buffered input reader
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 1024 * 1024;

/// Configuration for the mzXML reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Schema assumed when the root element names none
    pub default_schema: SchemaVersion,

    /// Capacity of the buffered file reader in bytes
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_schema: SchemaVersion::CURRENT,
            buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Set the schema assumed for documents without a schema attribute
    pub fn with_default_schema(mut self, schema: SchemaVersion) -> Self {
        self.default_schema = schema;
        self
    }

    /// Set the input buffer capacity
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}

/// Configuration for the mzXML writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Escape markup characters in free text (comments, names, values).
    ///
    /// Off by default: legacy writers emitted free text verbatim and files
    /// produced that way must keep comparing equal.
    pub escape_text: bool,

    /// Write a scan offset index and a real `indexOffset`.
    /// When off, `indexOffset` is written as `0`.
    pub write_index: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            escape_text: false,
            write_index: true,
        }
    }
}

impl WriterConfig {
    /// Enable or disable escaping of free text
    pub fn with_escape_text(mut self, escape_text: bool) -> Self {
        self.escape_text = escape_text;
        self
    }

    /// Enable or disable the scan offset index
    pub fn with_index(mut self, write_index: bool) -> Self {
        self.write_index = write_index;
        self
    }
}
