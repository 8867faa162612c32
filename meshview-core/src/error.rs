/// Error types for mesh loading and rendering
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for meshview operations
pub type Result<T> = std::result::Result<T, MeshError>;

/// Everything that can go wrong between a file on disk and a drawn frame.
///
/// None of these are fatal to a running viewer: load failures fall back to the
/// default cube, texture failures leave the material untextured and index
/// errors skip the single element being drawn.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    ParseFailure { path: PathBuf, message: String },

    #[error("failed to load texture {}: {message}", .path.display())]
    TextureLoadFailure { path: PathBuf, message: String },

    #[error("vertex index {index} out of range (vertex count {count})")]
    OutOfRangeIndex { index: usize, count: usize },

    #[error("face with {len} vertices is not a polygon")]
    NotAPolygon { len: usize },
}

impl MeshError {
    /// Map an I/O error on `path` to `FileNotFound` or `Io`
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            MeshError::FileNotFound(path)
        } else {
            MeshError::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_file_not_found() {
        let err = MeshError::from_io("missing.obj", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, MeshError::FileNotFound(_)));

        let err = MeshError::from_io(
            "locked.obj",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, MeshError::Io { .. }));
    }

    #[test]
    fn test_out_of_range_message() {
        let err = MeshError::OutOfRangeIndex { index: 7, count: 3 };
        assert_eq!(err.to_string(), "vertex index 7 out of range (vertex count 3)");
    }
}
