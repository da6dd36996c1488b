use crate::error::Result;
use crate::image::PixelBuffer;

/// The outcome of one segmentation run, constructed atomically at its end.
///
/// No partial or streaming results are ever exposed: a run either returns a
/// complete `Segmentation` or fails with a typed error before producing output.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Recolored RGBA buffer, same dimensions as the input.
    pub output: PixelBuffer,
    /// One cluster label per pixel, row-major, each in `[0, k)`.
    pub labels: Vec<usize>,
    /// Mean color per cluster; index `i` corresponds to label `i`.
    pub centroids: Vec<[f32; 3]>,
}

impl Segmentation {
    /// Number of clusters in the partition.
    pub fn num_clusters(&self) -> usize {
        self.centroids.len()
    }
}

/// Common interface for pixel segmentation algorithms (one label per pixel).
pub trait Segmenter {
    /// Partition the image's pixels, returning labels, centroids, and a
    /// recolored output buffer.
    fn segment(&self, image: &PixelBuffer) -> Result<Segmentation>;

    /// The configured number of clusters (if applicable).
    ///
    /// For algorithms that discover the number of clusters from the data
    /// (mean-shift, watershed), this returns 0.
    fn n_clusters(&self) -> usize;
}
