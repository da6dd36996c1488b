//! Watershed segmentation over a luma gradient map.
//!
//! # Algorithm Outline
//!
//! 1. **Luma projection**: collapse each RGB pixel to Rec. 709 luma.
//!
//! 2. **Gradient magnitude**: central finite differences on the luma plane,
//!    one-sided at the borders.
//!
//! 3. **Seeding**: 4-connected plateaus of locally minimal gradient with
//!    value at most `sigma` become basins. If no plateau passes the
//!    threshold, the global-minimum plateaus seed the basins so the run
//!    still returns a total partition.
//!
//! 4. **Flooding** (Meyer, 1994): a priority queue ordered by gradient
//!    magnitude grows every basin uphill simultaneously; ridge pixels go to
//!    whichever basin reaches them first.
//!
//! The number of regions is data-determined; `sigma` raises or lowers the
//! bar for which gradient minima count as seeds. Centroids are the mean
//! color of each region's members.
//!
//! # References
//!
//! Meyer, F. (1994). "Topographic distance and watershed lines."
//! Signal Processing 38.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;

use super::traits::{Segmentation, Segmenter};
use super::util::cluster_means;
use crate::color;
use crate::error::{Error, Result};
use crate::image::{self, Palette, PixelBuffer};

const UNLABELED: usize = usize::MAX;

/// Watershed pixel segmenter.
#[derive(Debug, Clone)]
pub struct Watershed {
    sigma: f32,
    palette: Palette,
}

impl Watershed {
    /// Create a new watershed segmenter.
    ///
    /// # Arguments
    ///
    /// * `sigma` - Gradient-magnitude ceiling for seed minima. Plateaus whose
    ///   gradient exceeds it never start a basin.
    pub fn new(sigma: f32) -> Self {
        Self {
            sigma,
            palette: Palette::default(),
        }
    }

    /// Set the output coloring policy.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

impl Segmenter for Watershed {
    fn segment(&self, image: &PixelBuffer) -> Result<Segmentation> {
        if self.sigma <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "sigma",
                message: "must be positive",
            });
        }

        let width = image.width() as usize;
        let height = image.height() as usize;
        let colors = image.colors();
        let luma: Vec<f32> = colors.iter().map(|&c| color::luma(c)).collect();
        let gradient = gradient_magnitude(&luma, width, height);

        let (mut labels, mut basins) = seed_basins(&gradient, width, height, self.sigma);
        if basins == 0 {
            // Nothing under sigma: fall back to the flattest plateaus so the
            // partition stays total.
            let floor = gradient.iter().copied().fold(f32::INFINITY, f32::min);
            (labels, basins) = seed_basins(&gradient, width, height, floor);
        }
        debug!("watershed: {basins} seed basins over {} pixels", labels.len());

        flood(&gradient, width, height, &mut labels);

        let centroids = cluster_means(&colors, &labels, basins);
        let output = image::render(
            image.width(),
            image.height(),
            &labels,
            &centroids,
            self.palette,
        );
        Ok(Segmentation {
            output,
            labels,
            centroids,
        })
    }

    /// Watershed discovers regions dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// 4-neighborhood of pixel `p` in a `width` x `height` grid.
fn neighbors4(p: usize, width: usize, height: usize) -> impl Iterator<Item = usize> {
    let x = p % width;
    let y = p / width;
    let left = (x > 0).then(|| p - 1);
    let right = (x + 1 < width).then(|| p + 1);
    let up = (y > 0).then(|| p - width);
    let down = (y + 1 < height).then(|| p + width);
    [left, right, up, down].into_iter().flatten()
}

/// Gradient magnitude of the luma plane by central finite differences.
fn gradient_magnitude(luma: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; luma.len()];
    for y in 0..height {
        for x in 0..width {
            let p = y * width + x;
            let gx = match (x > 0, x + 1 < width) {
                (true, true) => (luma[p + 1] - luma[p - 1]) * 0.5,
                (false, true) => luma[p + 1] - luma[p],
                (true, false) => luma[p] - luma[p - 1],
                (false, false) => 0.0,
            };
            let gy = match (y > 0, y + 1 < height) {
                (true, true) => (luma[p + width] - luma[p - width]) * 0.5,
                (false, true) => luma[p + width] - luma[p],
                (true, false) => luma[p] - luma[p - width],
                (false, false) => 0.0,
            };
            out[p] = (gx * gx + gy * gy).sqrt();
        }
    }
    out
}

/// Label minimum plateaus with gradient value at most `sigma` as seed basins.
///
/// A plateau is a 4-connected component of equal gradient value; it seeds a
/// basin only if no member has a strictly lower neighbor.
fn seed_basins(
    gradient: &[f32],
    width: usize,
    height: usize,
    sigma: f32,
) -> (Vec<usize>, usize) {
    let n = gradient.len();
    let mut labels = vec![UNLABELED; n];
    let mut visited = vec![false; n];
    let mut basins = 0usize;

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let value = gradient[start];

        let mut stack = vec![start];
        let mut members = Vec::new();
        let mut is_minimum = true;
        while let Some(p) = stack.pop() {
            members.push(p);
            for q in neighbors4(p, width, height) {
                if gradient[q] < value {
                    is_minimum = false;
                } else if gradient[q] == value && !visited[q] {
                    visited[q] = true;
                    stack.push(q);
                }
            }
        }

        if is_minimum && value <= sigma {
            for &p in &members {
                labels[p] = basins;
            }
            basins += 1;
        }
    }

    (labels, basins)
}

/// Grow every basin uphill along ascending gradient (Meyer's flooding).
fn flood(gradient: &[f32], width: usize, height: usize, labels: &mut [usize]) {
    // Non-negative f32 bit patterns sort like the values themselves, so the
    // heap can order on raw bits; `seq` keeps ties first-in-first-out.
    let mut heap: BinaryHeap<Reverse<(u32, u64, usize, usize)>> = BinaryHeap::new();
    let mut seq = 0u64;

    for p in 0..labels.len() {
        if labels[p] == UNLABELED {
            continue;
        }
        for q in neighbors4(p, width, height) {
            if labels[q] == UNLABELED {
                heap.push(Reverse((gradient[q].to_bits(), seq, q, labels[p])));
                seq += 1;
            }
        }
    }

    while let Some(Reverse((_, _, p, basin))) = heap.pop() {
        if labels[p] != UNLABELED {
            continue;
        }
        labels[p] = basin;
        for q in neighbors4(p, width, height) {
            if labels[q] == UNLABELED {
                heap.push(Reverse((gradient[q].to_bits(), seq, q, basin)));
                seq += 1;
            }
        }
    }
}
