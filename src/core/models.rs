use serde::Serialize;

use crate::errors::ExtractError;

/// An uploaded file: raw bytes plus the name it was uploaded under.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    pub fn format(&self) -> Result<DocumentFormat, ExtractError> {
        DocumentFormat::from_filename(&self.filename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let suffix = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match suffix.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "" => Err(ExtractError::UnsupportedFormat(format!(
                "'{filename}' has no file extension"
            ))),
            other => Err(ExtractError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Sampling parameters sent to the cloud backend. The local backend only
/// receives `stream`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 2048,
            top_p: 1.0,
            stream: false,
        }
    }
}
