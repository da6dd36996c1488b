//! Internal cluster validity metrics.
//!
//! All scorers take the pixel colors and the label array produced by a
//! segmentation run. Cluster membership is derived from the labels; label
//! values with no members are skipped, so partially used label spaces score
//! the same as compact ones.
//!
//! The silhouette score compares every pixel against the full population and
//! is O(n²); [`silhouette_score_sampled`] is the documented mitigation for
//! large images, scoring a seeded uniform subset of anchor pixels against the
//! full population so the estimate converges to the exact value as the sample
//! grows.

use rand::prelude::*;

use crate::cluster::util::{euclidean, squared_euclidean};
use crate::cluster::Segmentation;
use crate::error::{Error, Result};
use crate::image::PixelBuffer;

/// Internal validity scores for one segmentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidityReport {
    /// Mean silhouette width, nominally in `[-1, 1]`; higher is better.
    pub silhouette: f32,
    /// Davies-Bouldin index; lower is better.
    pub davies_bouldin: f32,
    /// Calinski-Harabasz index; higher is better.
    pub calinski_harabasz: f32,
}

impl ValidityReport {
    /// Score a partition with the full-population silhouette.
    ///
    /// Requires `2 <= k < n` so that every field is defined.
    pub fn compute(colors: &[[f32; 3]], labels: &[usize]) -> Result<Self> {
        Ok(Self {
            silhouette: silhouette_score(colors, labels)?,
            davies_bouldin: davies_bouldin_index(colors, labels)?,
            calinski_harabasz: calinski_harabasz_index(colors, labels)?,
        })
    }

    /// Score a partition, bounding the silhouette anchor set to
    /// `max_samples` pixels drawn with the given seed.
    pub fn compute_sampled(
        colors: &[[f32; 3]],
        labels: &[usize],
        max_samples: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            silhouette: silhouette_score_sampled(colors, labels, max_samples, seed)?,
            davies_bouldin: davies_bouldin_index(colors, labels)?,
            calinski_harabasz: calinski_harabasz_index(colors, labels)?,
        })
    }

    /// Score a finished segmentation run against its input image.
    pub fn of(image: &PixelBuffer, segmentation: &Segmentation) -> Result<Self> {
        Self::compute(&image.colors(), &segmentation.labels)
    }
}

/// A label partition compacted to its populated clusters.
struct Partition {
    /// Member pixel indices per populated cluster.
    members: Vec<Vec<usize>>,
    /// Compacted label per pixel (indexes into `members`).
    labels: Vec<usize>,
    /// Mean color per populated cluster.
    centroids: Vec<[f32; 3]>,
}

fn partition(colors: &[[f32; 3]], labels: &[usize]) -> Result<Partition> {
    if colors.is_empty() {
        return Err(Error::EmptyInput);
    }
    if labels.len() != colors.len() {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "must have one label per pixel",
        });
    }

    let bound = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut counts = vec![0usize; bound];
    for &label in labels {
        counts[label] += 1;
    }

    let mut remap = vec![usize::MAX; bound];
    let mut members: Vec<Vec<usize>> = Vec::new();
    for (label, &count) in counts.iter().enumerate() {
        if count > 0 {
            remap[label] = members.len();
            members.push(Vec::with_capacity(count));
        }
    }

    let compact: Vec<usize> = labels.iter().map(|&l| remap[l]).collect();
    for (i, &label) in compact.iter().enumerate() {
        members[label].push(i);
    }

    let centroids = members.iter().map(|m| mean_color(colors, m)).collect();
    Ok(Partition {
        members,
        labels: compact,
        centroids,
    })
}

fn mean_color(colors: &[[f32; 3]], indices: &[usize]) -> [f32; 3] {
    let mut sum = [0.0f64; 3];
    for &i in indices {
        sum[0] += f64::from(colors[i][0]);
        sum[1] += f64::from(colors[i][1]);
        sum[2] += f64::from(colors[i][2]);
    }
    let n = indices.len() as f64;
    [
        (sum[0] / n) as f32,
        (sum[1] / n) as f32,
        (sum[2] / n) as f32,
    ]
}

/// Mean silhouette width over the full pixel population.
///
/// Per-pixel: `a` is the mean distance to the other members of its cluster
/// (0 for singletons), `b` the smallest mean distance to any other cluster,
/// and the width is `(b - a) / max(a, b)`, or 0 when `a == 0`. Partitions
/// with a single populated cluster score 0 by convention.
pub fn silhouette_score(colors: &[[f32; 3]], labels: &[usize]) -> Result<f32> {
    let part = partition(colors, labels)?;
    if part.members.len() < 2 {
        return Ok(0.0);
    }
    let anchors: Vec<usize> = (0..colors.len()).collect();
    Ok(silhouette_over(&anchors, colors, &part))
}

/// Mean silhouette width over a bounded anchor sample.
///
/// Draws `max_samples` anchor pixels uniformly (seeded) and scores them
/// against the full population. With `max_samples >= n` this equals
/// [`silhouette_score`].
pub fn silhouette_score_sampled(
    colors: &[[f32; 3]],
    labels: &[usize],
    max_samples: usize,
    seed: Option<u64>,
) -> Result<f32> {
    if max_samples == 0 {
        return Err(Error::InvalidParameter {
            name: "max_samples",
            message: "must be at least 1",
        });
    }
    let part = partition(colors, labels)?;
    if part.members.len() < 2 {
        return Ok(0.0);
    }

    let n = colors.len();
    let anchors: Vec<usize> = if max_samples >= n {
        (0..n).collect()
    } else {
        let mut rng: Box<dyn RngCore> = match seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        let mut picks: Vec<usize> = rand::seq::index::sample(&mut rng, n, max_samples)
            .into_iter()
            .collect();
        picks.sort_unstable();
        picks
    };
    Ok(silhouette_over(&anchors, colors, &part))
}

fn silhouette_over(anchors: &[usize], colors: &[[f32; 3]], part: &Partition) -> f32 {
    let mut total = 0.0f64;
    for &i in anchors {
        let own = part.labels[i];
        let own_members = &part.members[own];

        let a = if own_members.len() <= 1 {
            0.0
        } else {
            let sum: f64 = own_members
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| f64::from(euclidean(colors[i], colors[j])))
                .sum();
            sum / (own_members.len() - 1) as f64
        };

        let mut b = f64::INFINITY;
        for (cluster, members) in part.members.iter().enumerate() {
            if cluster == own {
                continue;
            }
            let sum: f64 = members
                .iter()
                .map(|&j| f64::from(euclidean(colors[i], colors[j])))
                .sum();
            b = b.min(sum / members.len() as f64);
        }

        if a > 0.0 {
            total += (b - a) / a.max(b);
        }
    }
    (total / anchors.len() as f64) as f32
}

/// Davies-Bouldin index: mean over clusters of the worst
/// `(scatter_i + scatter_j) / distance(centroid_i, centroid_j)` ratio.
///
/// Scatter is the mean member distance to the cluster centroid. Coincident
/// centroids floor the denominator at machine epsilon rather than raise.
/// Fails with [`Error::InsufficientClusters`] below 2 populated clusters.
pub fn davies_bouldin_index(colors: &[[f32; 3]], labels: &[usize]) -> Result<f32> {
    let part = partition(colors, labels)?;
    let k = part.members.len();
    if k < 2 {
        return Err(Error::InsufficientClusters {
            clusters: k,
            n_pixels: colors.len(),
        });
    }

    let scatter: Vec<f64> = part
        .members
        .iter()
        .zip(&part.centroids)
        .map(|(members, &centroid)| {
            let sum: f64 = members
                .iter()
                .map(|&i| f64::from(euclidean(colors[i], centroid)))
                .sum();
            sum / members.len() as f64
        })
        .collect();

    let mut total = 0.0f64;
    for i in 0..k {
        let mut worst = 0.0f64;
        for j in 0..k {
            if j == i {
                continue;
            }
            let dist = f64::from(euclidean(part.centroids[i], part.centroids[j]))
                .max(f64::from(f32::EPSILON));
            worst = worst.max((scatter[i] + scatter[j]) / dist);
        }
        total += worst;
    }
    Ok((total / k as f64) as f32)
}

/// Calinski-Harabasz index: `(betweenSS / (k - 1)) / (withinSS / (n - k))`.
///
/// Fails with [`Error::InsufficientClusters`] when `k < 2` or `k >= n`.
/// Zero within-cluster scatter yields an infinite index.
pub fn calinski_harabasz_index(colors: &[[f32; 3]], labels: &[usize]) -> Result<f32> {
    let part = partition(colors, labels)?;
    let k = part.members.len();
    let n = colors.len();
    if k < 2 || k >= n {
        return Err(Error::InsufficientClusters {
            clusters: k,
            n_pixels: n,
        });
    }

    let global = mean_color(colors, &(0..n).collect::<Vec<_>>());

    let mut between = 0.0f64;
    let mut within = 0.0f64;
    for (members, &centroid) in part.members.iter().zip(&part.centroids) {
        between += members.len() as f64 * f64::from(squared_euclidean(centroid, global));
        for &i in members {
            within += f64::from(squared_euclidean(colors[i], centroid));
        }
    }

    let index = (between / (k - 1) as f64) / (within / (n - k) as f64);
    Ok(index as f32)
}
