//! Error types for the page runtime

use thiserror::Error;

/// Errors raised while driving the page
#[derive(Error, Debug)]
pub enum PageError {
    /// An element the operation depends on is not in the document
    #[error("Element missing: {0}")]
    ElementMissing(String),

    /// A file input has no usable upload destination
    #[error("File input '{input_id}' has no upload URL")]
    MissingUploadUrl { input_id: String },

    /// The host document rejected a DOM operation
    #[error("DOM error: {0}")]
    Dom(String),

    /// Page configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl PageError {
    /// Create an element missing error
    pub fn element_missing<S: Into<String>>(what: S) -> Self {
        Self::ElementMissing(what.into())
    }

    /// Create a missing upload URL error
    pub fn missing_upload_url<S: Into<String>>(input_id: S) -> Self {
        Self::MissingUploadUrl {
            input_id: input_id.into(),
        }
    }

    /// Create a DOM error
    pub fn dom<S: Into<String>>(msg: S) -> Self {
        Self::Dom(msg.into())
    }

    /// Whether the error comes from markup that does not match what the page expects.
    ///
    /// These are expected on pages that leave out optional widgets and are
    /// never reported to the user.
    pub fn is_markup(&self) -> bool {
        matches!(self, Self::ElementMissing(_) | Self::MissingUploadUrl { .. })
    }
}

/// Errors raised by an upload request
#[derive(Error, Debug)]
pub enum UploadError {
    /// The multipart body could not be assembled
    #[error("Failed to build upload request: {0}")]
    Request(String),

    /// The request never produced a response
    #[error("Upload transport error: {0}")]
    Transport(String),

    /// The server answered with something that is not JSON
    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),
}

impl UploadError {
    /// Create a request construction error
    pub fn request<S: Into<String>>(msg: S) -> Self {
        Self::Request(msg.into())
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response<S: Into<String>>(msg: S) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if the request failed before any response arrived
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Transport(_))
    }
}

/// Result type for page operations
pub type PageResult<T> = std::result::Result<T, PageError>;

/// Result type for upload requests
pub type UploadResult<T> = std::result::Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PageError::element_missing("#stars");
        assert_eq!(err.to_string(), "Element missing: #stars");

        let err = PageError::missing_upload_url("fileInput");
        assert_eq!(err.to_string(), "File input 'fileInput' has no upload URL");
    }

    #[test]
    fn test_markup_errors() {
        assert!(PageError::element_missing("zone").is_markup());
        assert!(PageError::missing_upload_url("input").is_markup());
        assert!(!PageError::dom("appendChild failed").is_markup());
    }

    #[test]
    fn test_config_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PageError = json_err.into();
        assert!(matches!(err, PageError::Config(_)));
    }

    #[test]
    fn test_upload_error_classification() {
        assert!(UploadError::transport("connection refused").is_transport());
        assert!(UploadError::request("FormData unavailable").is_transport());
        assert!(!UploadError::invalid_response("expected value at line 1").is_transport());
    }
}
