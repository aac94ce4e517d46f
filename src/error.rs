//! Error types for the pillow mesher.

use thiserror::Error;

/// Result type alias using MesherError.
pub type Result<T> = std::result::Result<T, MesherError>;

/// The pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Decoding the uploaded image bytes.
    Decode,
    /// Finding the silhouette polygon.
    Extraction,
    /// Validating the shape configuration.
    Config,
    /// Building the solid mesh.
    Geometry,
    /// Serializing the GLB container.
    Export,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Decode => write!(f, "decode"),
            Phase::Extraction => write!(f, "extraction"),
            Phase::Config => write!(f, "config"),
            Phase::Geometry => write!(f, "geometry"),
            Phase::Export => write!(f, "export"),
        }
    }
}

/// Main error type for pillow meshing operations.
#[derive(Error, Debug)]
pub enum MesherError {
    /// No usable silhouette in the input (fully transparent, or a degenerate polygon).
    #[error("Shape extraction error: {0}")]
    ShapeExtraction(String),

    /// Shape configuration values outside sane bounds.
    #[error("Invalid shape config: {0}")]
    InvalidConfig(String),

    /// Mesh assembly produced unusable geometry.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Failed to serialize the final model.
    #[error("Export error: {0}")]
    Export(String),

    /// Failed to decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl MesherError {
    /// The stage that failed.
    pub fn phase(&self) -> Phase {
        match self {
            MesherError::ShapeExtraction(_) => Phase::Extraction,
            MesherError::InvalidConfig(_) => Phase::Config,
            MesherError::Geometry(_) => Phase::Geometry,
            MesherError::Export(_) => Phase::Export,
            MesherError::Image(_) => Phase::Decode,
        }
    }

    /// Returns `true` when the failure is caused by the caller's input
    /// (a 4xx-class response) rather than an internal fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            MesherError::ShapeExtraction(_) | MesherError::InvalidConfig(_) => true,
            MesherError::Image(e) => matches!(
                e,
                image::ImageError::Decoding(_)
                    | image::ImageError::Unsupported(_)
                    | image::ImageError::Limits(_)
            ),
            MesherError::Geometry(_) | MesherError::Export(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_mapping() {
        assert!(MesherError::ShapeExtraction("empty".into()).is_client_error());
        assert!(MesherError::InvalidConfig("bad".into()).is_client_error());
        assert!(!MesherError::Export("boom".into()).is_client_error());
        assert!(!MesherError::Geometry("boom".into()).is_client_error());
    }

    #[test]
    fn test_undecodable_bytes_are_client_errors() {
        let err: MesherError = image::load_from_memory(b"not an image").unwrap_err().into();
        assert_eq!(err.phase(), Phase::Decode);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_phase_display() {
        let err = MesherError::ShapeExtraction("no opaque pixels".into());
        assert_eq!(err.phase().to_string(), "extraction");
        assert!(err.to_string().contains("no opaque pixels"));
    }
}
