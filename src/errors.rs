use thiserror::Error;

/// Failures while turning an uploaded document into plain text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: {0}. Please upload a PDF or DOCX file.")]
    UnsupportedFormat(String),

    #[error("Failed to extract text: {0}")]
    ExtractionFailed(String),
}

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("Please upload a file or enter text.")]
    EmptyInput,

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Backend returned HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Unexpected response from backend: {0}")]
    MalformedResponse(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl SummarizerError {
    /// True for failures raised while talking to the backend, as opposed to
    /// problems with the user's input.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            SummarizerError::HttpError(_)
                | SummarizerError::ApiError { .. }
                | SummarizerError::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for SummarizerError {
    fn from(error: reqwest::Error) -> Self {
        SummarizerError::HttpError(error.to_string())
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(error: zip::result::ZipError) -> Self {
        ExtractError::ExtractionFailed(format!("invalid DOCX container: {error}"))
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(error: quick_xml::Error) -> Self {
        ExtractError::ExtractionFailed(format!("malformed DOCX XML: {error}"))
    }
}
