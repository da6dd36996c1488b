use thiserror::Error;

/// Errors returned by segmentation and metric routines in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input image has no pixels.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the image.
    #[error("invalid cluster count: requested {requested}, but image has {n_pixels} pixels")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of pixels in the image.
        n_pixels: usize,
    },

    /// A metric needs more distinct clusters than the partition provides.
    #[error("insufficient clusters: partition has {clusters} over {n_pixels} pixels")]
    InsufficientClusters {
        /// Populated clusters in the partition.
        clusters: usize,
        /// Number of pixels in the partition.
        n_pixels: usize,
    },

    /// RGBA byte buffer does not match the stated image dimensions.
    #[error("buffer size mismatch: expected {expected} bytes, found {found}")]
    BufferSizeMismatch {
        /// Expected byte length (`width * height * 4`).
        expected: usize,
        /// Actual byte length.
        found: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
