//! Common error type definitions.

use std::io;

use strum::{AsRefStr, Display, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Engine implementations wrap their own parser errors in this type when
/// reporting a failed construction.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur while sniffing files or constructing engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed.
    InvalidInput,
    /// The file or directory does not exist.
    NotFound,
    /// No engine family handles this file.
    UnsupportedFormat,
    /// The document is encrypted and no usable password was supplied.
    PasswordRequired,
    /// Reading the file failed.
    Io,
    /// The file claims a format but its contents do not match.
    Corrupt,
    /// Internal engine error.
    InternalError,
}

/// A structured error type for folio-core operations.
#[derive(Debug, Error)]
#[error("{kind}{}{}",
    .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default(),
    .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional context, usually the path being processed.
    pub context: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
            source: None,
        }
    }

    /// Creates a new error with the given kind and source error.
    pub fn from_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Maps an I/O error, keeping `NotFound` distinct from other failures.
    pub fn from_io(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Io,
        };
        Self::from_source(kind, err)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds context to this error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new unsupported format error.
    pub fn unsupported_format() -> Self {
        Self::new(ErrorKind::UnsupportedFormat)
    }

    /// Creates a new password required error.
    pub fn password_required() -> Self {
        Self::new(ErrorKind::PasswordRequired)
    }

    /// Creates a new corrupt file error.
    pub fn corrupt() -> Self {
        Self::new(ErrorKind::Corrupt)
    }

    /// Creates a new internal error.
    pub fn internal_error() -> Self {
        Self::new(ErrorKind::InternalError)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::from_io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message_and_context() {
        let error = Error::corrupt()
            .with_message("missing %PDF header")
            .with_context("path: a.pdf");
        assert_eq!(error.to_string(), "corrupt: missing %PDF header (path: a.pdf)");
    }

    #[test]
    fn test_display_kind_only() {
        assert_eq!(Error::password_required().to_string(), "password_required");
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(err).kind(), ErrorKind::NotFound);

        let err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let error = Error::from_io(err);
        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_kind_str() {
        assert_eq!(Error::unsupported_format().kind_str(), "unsupported_format");
        assert_eq!(Error::invalid_input().kind_str(), "invalid_input");
    }
}
