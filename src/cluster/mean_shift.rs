//! Mean-shift: kernel mode seeking over pixel colors.
//!
//! # Algorithm Outline
//!
//! 1. **Shift**: every seed point repeatedly moves to the Gaussian-kernel
//!    weighted mean of the whole pixel population until its step falls below
//!    the tolerance or the iteration cap is reached.
//!
//! 2. **Merge**: converged seeds closer than the bandwidth collapse into one
//!    mode, in first-seen order.
//!
//! 3. **Label**: each pixel takes the label of its nearest mode; modes that
//!    win no pixels are dropped and the label space compacted. Centroids are
//!    the mean color of each cluster's members.
//!
//! The number of clusters is data-determined: the bandwidth sets the scale at
//! which color density modes are distinguished, and the caller never supplies
//! a cluster count.
//!
//! ## Complexity
//!
//! - **Time**: O(s·n) per shift pass for `s` seeds over `n` pixels; `s = n`
//!   by default. Bound `s` on large images with [`MeanShift::with_seed_limit`].
//! - **Space**: O(s).
//!
//! ## References
//!
//! Comaniciu, D., Meer, P. (2002). "Mean Shift: A Robust Approach Toward
//! Feature Space Analysis." IEEE PAMI.

use log::debug;
use rand::prelude::*;

use super::traits::{Segmentation, Segmenter};
use super::util::{cluster_means, nearest_centroid, squared_euclidean};
use crate::error::{Error, Result};
use crate::image::{self, Palette, PixelBuffer};

/// Mean-shift pixel segmenter.
#[derive(Debug, Clone)]
pub struct MeanShift {
    bandwidth: f32,
    max_iter: usize,
    tolerance: f32,
    seed_limit: Option<usize>,
    seed: Option<u64>,
    palette: Palette,
}

impl MeanShift {
    /// Create a new mean-shift segmenter.
    ///
    /// # Arguments
    ///
    /// * `bandwidth` - Kernel bandwidth in RGB distance units. Modes closer
    ///   than this merge into one cluster.
    ///
    /// # Typical Values
    ///
    /// - `bandwidth`: 20-80 for 8-bit RGB; smaller values preserve more
    ///   distinct color groups.
    pub fn new(bandwidth: f32) -> Self {
        Self {
            bandwidth,
            max_iter: 50,
            tolerance: 1e-3,
            seed_limit: None,
            seed: None,
            palette: Palette::default(),
        }
    }

    /// Set the per-seed shift iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance (minimum shift step, RGB distance).
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Bound the seed count: images with more pixels shift a uniform random
    /// subset of this size instead of every pixel.
    ///
    /// Pixels are always labeled against the converged mode set, so the
    /// partition stays total; the result approaches the full-seed run as the
    /// limit grows.
    pub fn with_seed_limit(mut self, seed_limit: usize) -> Self {
        self.seed_limit = Some(seed_limit);
        self
    }

    /// Set the RNG seed used when sampling seeds under a seed limit.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the output coloring policy.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

impl Segmenter for MeanShift {
    fn segment(&self, image: &PixelBuffer) -> Result<Segmentation> {
        if self.bandwidth <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "bandwidth",
                message: "must be positive",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.tolerance <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                message: "must be positive",
            });
        }
        if self.seed_limit == Some(0) {
            return Err(Error::InvalidParameter {
                name: "seed_limit",
                message: "must be at least 1",
            });
        }

        let colors = image.colors();
        let n = colors.len();

        // Seed points: every pixel, or a bounded random subset.
        let mut seeds: Vec<[f32; 3]> = match self.seed_limit {
            Some(limit) if limit < n => {
                let mut rng: Box<dyn RngCore> = match self.seed {
                    Some(s) => Box::new(StdRng::seed_from_u64(s)),
                    None => Box::new(rand::rng()),
                };
                rand::seq::index::sample(&mut rng, n, limit)
                    .into_iter()
                    .map(|i| colors[i])
                    .collect()
            }
            _ => colors.clone(),
        };

        let bw_sq = self.bandwidth * self.bandwidth;
        for seed in seeds.iter_mut() {
            *seed = climb(*seed, &colors, bw_sq, self.tolerance, self.max_iter);
        }

        // Merge converged seeds closer than the bandwidth, first-seen order.
        let mut modes: Vec<[f32; 3]> = Vec::new();
        for &seed in &seeds {
            if !modes
                .iter()
                .any(|&mode| squared_euclidean(seed, mode) <= bw_sq)
            {
                modes.push(seed);
            }
        }
        debug!(
            "mean-shift: {} seeds converged to {} modes",
            seeds.len(),
            modes.len()
        );

        let provisional: Vec<usize> = colors
            .iter()
            .map(|&color| nearest_centroid(color, &modes))
            .collect();

        // Drop modes that won no pixels and compact the label space.
        let mut counts = vec![0usize; modes.len()];
        for &label in &provisional {
            counts[label] += 1;
        }
        let mut remap = vec![usize::MAX; modes.len()];
        let mut kept = 0;
        for (i, &count) in counts.iter().enumerate() {
            if count > 0 {
                remap[i] = kept;
                kept += 1;
            }
        }
        let labels: Vec<usize> = provisional.into_iter().map(|l| remap[l]).collect();
        let centroids = cluster_means(&colors, &labels, kept);

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

    /// Mean-shift discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// Shift one seed to its density mode.
fn climb(
    mut point: [f32; 3],
    colors: &[[f32; 3]],
    bw_sq: f32,
    tolerance: f32,
    max_iter: usize,
) -> [f32; 3] {
    let tol_sq = tolerance * tolerance;
    for _ in 0..max_iter {
        let mut sum = [0.0f64; 3];
        let mut total = 0.0f64;
        for color in colors {
            let w = f64::from((-squared_euclidean(point, *color) / (2.0 * bw_sq)).exp());
            sum[0] += w * f64::from(color[0]);
            sum[1] += w * f64::from(color[1]);
            sum[2] += w * f64::from(color[2]);
            total += w;
        }
        if total <= f64::MIN_POSITIVE {
            // Seed is too far from every pixel for the kernel to register.
            break;
        }
        let next = [
            (sum[0] / total) as f32,
            (sum[1] / total) as f32,
            (sum[2] / total) as f32,
        ];
        let step = squared_euclidean(point, next);
        point = next;
        if step <= tol_sq {
            break;
        }
    }
    point
}
