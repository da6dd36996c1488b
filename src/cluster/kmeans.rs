//! K-means over pixel colors, with k-means++ seeding and Lloyd iterations.
//!
//! # Algorithm Outline
//!
//! 1. **Seeding**: pick `k` initial centroids. The default is k-means++
//!    (Arthur & Vassilvitskii, 2007): the first centroid is a uniformly
//!    random pixel; each subsequent centroid is a pixel sampled with
//!    probability proportional to its squared distance from the nearest
//!    already-chosen centroid. This spreads the initial centroids far better
//!    than uniform picks.
//!
//! 2. **Lloyd iterations**: assign every pixel to the nearest centroid by
//!    Euclidean distance in RGB space (ties to the lowest centroid index),
//!    then re-center each centroid on the component-wise mean of its pixels.
//!
//! 3. **Termination**: by default, stop when an assignment pass changes no
//!    label or after 100 passes. A fixed-pass rule with no early exit is also
//!    available; see [`StopRule`].
//!
//! Two seeding/termination conventions are in common use for this engine:
//! k-means++ with convergence detection (capped at 100 passes), and uniform
//! seeding with a fixed 15-pass loop. Both are exposed as explicit
//! configuration ([`Seeding`], [`StopRule`]); the k-means++/convergence pair
//! is the default.
//!
//! # References
//!
//! Arthur, D., Vassilvitskii, S. (2007). "k-means++: The Advantages of
//! Careful Seeding." SODA 2007.

use log::debug;
use rand::prelude::*;

use super::traits::{Segmentation, Segmenter};
use super::util::{cluster_sums, nearest_centroid, squared_euclidean};
use crate::error::{Error, Result};
use crate::image::{self, Palette, PixelBuffer};

/// Initial-centroid selection strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Seeding {
    /// k-means++: first centroid uniform over pixels, each next sampled with
    /// probability proportional to squared distance from the nearest chosen
    /// centroid.
    #[default]
    PlusPlus,
    /// `k` distinct pixels chosen uniformly at random.
    Uniform,
}

/// Termination policy for the Lloyd loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Stop when an assignment pass changes no label, or at `max_iter` passes.
    Converged {
        /// Upper bound on assignment passes.
        max_iter: usize,
    },
    /// Run exactly `iters` passes with no early exit.
    Fixed {
        /// Number of assignment passes.
        iters: usize,
    },
}

impl Default for StopRule {
    fn default() -> Self {
        StopRule::Converged { max_iter: 100 }
    }
}

/// K-means pixel segmenter.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    seeding: Seeding,
    stop: StopRule,
    palette: Palette,
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a new k-means segmenter with `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seeding: Seeding::default(),
            stop: StopRule::default(),
            palette: Palette::default(),
            seed: None,
        }
    }

    /// Set the initial-centroid selection strategy.
    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Set the termination policy.
    pub fn with_stop_rule(mut self, stop: StopRule) -> Self {
        self.stop = stop;
        self
    }

    /// Set the output coloring policy.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Segmenter for Kmeans {
    fn segment(&self, image: &PixelBuffer) -> Result<Segmentation> {
        let n = image.num_pixels();
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_pixels: n,
            });
        }

        let colors = image.colors();
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centroids = match self.seeding {
            Seeding::PlusPlus => seed_plus_plus(&colors, self.k, &mut rng),
            Seeding::Uniform => seed_uniform(&colors, self.k, &mut rng),
        };

        let mut labels = vec![0usize; n];
        assign(&colors, &centroids, &mut labels);

        let (passes, early_stop) = match self.stop {
            StopRule::Converged { max_iter } => (max_iter, true),
            StopRule::Fixed { iters } => (iters, false),
        };

        for pass in 1..=passes {
            update_centroids(&colors, &labels, &mut centroids, &mut rng);
            let changed = assign(&colors, &centroids, &mut labels);
            if early_stop && changed == 0 {
                debug!("k-means converged after {pass} passes");
                break;
            }
        }

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

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// K-means++ seeding via cumulative-sum threshold sampling.
fn seed_plus_plus(colors: &[[f32; 3]], k: usize, rng: &mut dyn RngCore) -> Vec<[f32; 3]> {
    let n = colors.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(colors[rng.random_range(0..n)]);

    // Squared distance from each pixel to its nearest chosen centroid,
    // refreshed incrementally as centroids are added.
    let mut weight = vec![f32::INFINITY; n];
    while centroids.len() < k {
        let newest = centroids[centroids.len() - 1];
        let mut total = 0.0f32;
        for (w, color) in weight.iter_mut().zip(colors) {
            let dist = squared_euclidean(*color, newest);
            if dist < *w {
                *w = dist;
            }
            total += *w;
        }

        let next = if total > 0.0 {
            // A uniform draw scaled by the total mass lands inside some
            // pixel's weight interval.
            let threshold = rng.random::<f32>() * total;
            let mut acc = 0.0f32;
            let mut chosen = n - 1;
            for (i, &w) in weight.iter().enumerate() {
                acc += w;
                if acc >= threshold {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // Every pixel coincides with a chosen centroid.
            rng.random_range(0..n)
        };
        centroids.push(colors[next]);
    }
    centroids
}

/// Uniform seeding: `k` distinct pixel indices.
fn seed_uniform(colors: &[[f32; 3]], k: usize, rng: &mut dyn RngCore) -> Vec<[f32; 3]> {
    rand::seq::index::sample(rng, colors.len(), k)
        .into_iter()
        .map(|i| colors[i])
        .collect()
}

/// Assign every pixel to its nearest centroid. Returns how many labels changed.
fn assign(colors: &[[f32; 3]], centroids: &[[f32; 3]], labels: &mut [usize]) -> usize {
    let mut changed = 0;
    for (color, label) in colors.iter().zip(labels.iter_mut()) {
        let next = nearest_centroid(*color, centroids);
        if next != *label {
            *label = next;
            changed += 1;
        }
    }
    changed
}

/// Re-center each centroid on the mean of its assigned pixels.
///
/// Deliberate policy: starved clusters re-center on a uniformly random
/// member of the current centroid set, not on a pixel.
fn update_centroids(
    colors: &[[f32; 3]],
    labels: &[usize],
    centroids: &mut [[f32; 3]],
    rng: &mut dyn RngCore,
) {
    let k = centroids.len();
    let (sums, counts) = cluster_sums(colors, labels, k);

    let mut starved = Vec::new();
    for (i, (sum, &count)) in sums.iter().zip(&counts).enumerate() {
        if count == 0 {
            starved.push(i);
        } else {
            let n = count as f64;
            centroids[i] = [
                (sum[0] / n) as f32,
                (sum[1] / n) as f32,
                (sum[2] / n) as f32,
            ];
        }
    }
    for i in starved {
        centroids[i] = centroids[rng.random_range(0..k)];
    }
}
