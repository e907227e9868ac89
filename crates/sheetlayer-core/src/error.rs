//! Error types for sheetlayer-core

use std::fmt;

use thiserror::Error;

/// Result type alias using [`OverlayError`]
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Per-entity errors raised while building overlays.
///
/// None of these abort a run: callers turn them into [`Diagnostic`]s and carry on
/// with the remaining shapes and images.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    /// Malformed drawing description (the offending shape is skipped)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Raster payload could not be read (the image is excluded)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Zero, negative or non-finite nominal size reached the scale mapper
    #[error("Invalid scale: nominal size {width}x{height}")]
    InvalidScale { width: f64, height: f64 },

    /// Sheet geometry table was absent; default sizes were used
    #[error("Missing collaborator data: {0}")]
    MissingCollaboratorData(String),

    /// Anchor whose end lies before its start
    #[error("Invalid anchor: {0}")]
    InvalidAnchor(String),
}

impl OverlayError {
    /// Create a parse error with a message
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        OverlayError::Parse(msg.into())
    }

    /// Create a decode error with a message
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        OverlayError::Decode(msg.into())
    }

    /// Short category name used in run summaries
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            OverlayError::Parse(_) | OverlayError::InvalidAnchor(_) => DiagnosticKind::Parse,
            OverlayError::Decode(_) => DiagnosticKind::Decode,
            OverlayError::InvalidScale { .. } => DiagnosticKind::InvalidScale,
            OverlayError::MissingCollaboratorData(_) => DiagnosticKind::MissingData,
        }
    }
}

/// Category of a collected diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// A shape was skipped
    Parse,
    /// An image was excluded
    Decode,
    /// An image lost its overlay layer
    InvalidScale,
    /// Defaults were substituted for missing data
    MissingData,
    /// Writing an artifact failed
    Emit,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::Decode => "decode",
            DiagnosticKind::InvalidScale => "invalid-scale",
            DiagnosticKind::MissingData => "missing-data",
            DiagnosticKind::Emit => "emit",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem attached to the entity it concerns
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Identifier of the shape, image or part concerned
    pub subject: String,
    /// Category
    pub kind: DiagnosticKind,
    /// Human-readable reason
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic from an [`OverlayError`]
    pub fn new<S: Into<String>>(subject: S, error: &OverlayError) -> Self {
        Self {
            subject: subject.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Build a diagnostic for a failed output write
    pub fn emit<S: Into<String>, M: fmt::Display>(subject: S, error: M) -> Self {
        Self {
            subject: subject.into(),
            kind: DiagnosticKind::Emit,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}
