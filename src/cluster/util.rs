#[inline]
pub(crate) fn squared_euclidean(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[inline]
pub(crate) fn euclidean(a: [f32; 3], b: [f32; 3]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// Index of the nearest centroid; ties go to the lowest index.
#[inline]
pub(crate) fn nearest_centroid(color: [f32; 3], centroids: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let dist = squared_euclidean(color, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Per-cluster component sums (f64 accumulators) and member counts.
pub(crate) fn cluster_sums(
    colors: &[[f32; 3]],
    labels: &[usize],
    k: usize,
) -> (Vec<[f64; 3]>, Vec<usize>) {
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];
    for (color, &label) in colors.iter().zip(labels) {
        let sum = &mut sums[label];
        sum[0] += f64::from(color[0]);
        sum[1] += f64::from(color[1]);
        sum[2] += f64::from(color[2]);
        counts[label] += 1;
    }
    (sums, counts)
}

/// Component-wise mean color of each cluster's members.
///
/// Clusters with no members keep a zero color; callers that can produce
/// starved clusters must handle the counts themselves.
pub(crate) fn cluster_means(colors: &[[f32; 3]], labels: &[usize], k: usize) -> Vec<[f32; 3]> {
    let (sums, counts) = cluster_sums(colors, labels, k);
    sums.iter()
        .zip(&counts)
        .map(|(sum, &count)| {
            if count == 0 {
                [0.0; 3]
            } else {
                let n = count as f64;
                [
                    (sum[0] / n) as f32,
                    (sum[1] / n) as f32,
                    (sum[2] / n) as f32,
                ]
            }
        })
        .collect()
}
