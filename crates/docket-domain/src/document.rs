//! Input documents handed to the extraction service

/// A single uploaded document: its display name and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name shown in tables and exports
    pub file_name: String,

    /// Raw document contents
    pub bytes: Vec<u8>,
}

impl Document {
    /// Create a new document
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Decode the contents as text, replacing invalid UTF-8 sequences
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
