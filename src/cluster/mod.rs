//! Clustering algorithms for partitioning pixels into color groups.
//!
//! This module provides the segmentation engines of the crate. Each algorithm
//! is a builder struct implementing [`Segmenter`]: it reads a
//! [`PixelBuffer`](crate::image::PixelBuffer), assigns every pixel a cluster
//! label, and returns a [`Segmentation`] holding the labels, the mean color of
//! each cluster, and a freshly rendered output buffer.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! The classic algorithm: assign each pixel to the nearest centroid in RGB
//! space, then update centroids to the mean of their pixels. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Color groups are roughly spherical in RGB space
//! - You know k in advance
//!
//! **When to use**: Palette reduction or posterization with a fixed number of
//! colors, or as the fast baseline to score against the validity metrics.
//!
//! ### Mean-shift
//!
//! Kernel mode seeking: seed points climb the color density surface until they
//! settle on its modes, and nearby modes merge. Discovers the number of
//! clusters from the data; the bandwidth parameter sets the scale.
//!
//! ### Watershed
//!
//! Region growing on a gradient-magnitude map of the image's luma plane.
//! Basins flood outward from local gradient minima and meet at edges, so the
//! partition follows spatial structure rather than color density alone.
//!
//! ## Usage
//!
//! ```rust
//! use chromaseg::{Kmeans, PixelBuffer, Segmenter};
//!
//! let data = vec![
//!     10u8, 10, 10, 255, 12, 12, 12, 255, //
//!     240, 240, 240, 255, 244, 244, 244, 255,
//! ];
//! let image = PixelBuffer::new(2, 2, data).unwrap();
//!
//! let seg = Kmeans::new(2).with_seed(42).segment(&image).unwrap();
//! assert_eq!(seg.labels.len(), 4);
//! assert_eq!(seg.labels[0], seg.labels[1]); // Dark pixels together
//! assert_ne!(seg.labels[0], seg.labels[2]); // Separate from the light pair
//! ```

mod kmeans;
mod mean_shift;
mod traits;
pub(crate) mod util;
mod watershed;

pub use kmeans::{Kmeans, Seeding, StopRule};
pub use mean_shift::MeanShift;
pub use traits::{Segmentation, Segmenter};
pub use watershed::Watershed;
