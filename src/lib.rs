//! Pixel-clustering primitives for image segmentation.
//!
//! `chromaseg` partitions the pixels of a decoded RGBA image into color groups and
//! scores the resulting partition against internal validity criteria.
//!
//! The primary public API is under [`cluster`], which provides:
//! - k-means (k-means++ or uniform seeding, Lloyd iterations)
//! - mean-shift (kernel mode seeking, data-determined cluster count)
//! - watershed (gradient flooding over a luma projection)
//!
//! Partition quality lives in [`metrics`]: silhouette, Davies-Bouldin, and
//! Calinski-Harabasz scores.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod color;
pub mod error;
pub mod image;
pub mod metrics;

pub use cluster::{Kmeans, MeanShift, Seeding, Segmentation, Segmenter, StopRule, Watershed};
pub use error::{Error, Result};
pub use image::{Palette, PixelBuffer};
pub use metrics::{
    calinski_harabasz_index, davies_bouldin_index, silhouette_score, silhouette_score_sampled,
    ValidityReport,
};
