//! Errors raised while synthesizing or saving blobs.

use std::path::PathBuf;

/// Errors produced by blob synthesis and the file-system sink.
///
/// `Io` and `Image` are resource failures; everything else is a
/// parameter or construction failure. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// A shape parameter is out of range or could not be parsed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// Angle and radius sequences handed to the interpolant differ in length.
    #[error("boundary samples mismatch: {angles} angles but {radii} radii")]
    SampleLengthMismatch { angles: usize, radii: usize },

    /// The boundary function was asked for a value outside its fitted domain.
    #[error("angle {angle} outside the fitted domain [{min}, {max}]")]
    OutOfDomain { angle: f64, min: f64, max: f64 },

    /// The spline collocation matrix could not be inverted.
    #[error("spline collocation system is singular")]
    SingularSystem,

    #[error("failed to prepare {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl BlobError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for failures of the output directory or an output file.
    #[inline]
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Image { .. })
    }
}

pub type Result<T> = std::result::Result<T, BlobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_classification() {
        let io = BlobError::Io {
            path: PathBuf::from("blobs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(io.is_resource());
        assert!(!BlobError::SingularSystem.is_resource());
        assert!(!BlobError::invalid("height", "must be at least 1").is_resource());
    }

    #[test]
    fn test_messages() {
        let err = BlobError::invalid("interp_kind", "unknown kind `wavy`");
        assert_eq!(
            err.to_string(),
            "invalid parameter `interp_kind`: unknown kind `wavy`"
        );

        let err = BlobError::SampleLengthMismatch { angles: 3, radii: 4 };
        assert_eq!(
            err.to_string(),
            "boundary samples mismatch: 3 angles but 4 radii"
        );
    }
}
