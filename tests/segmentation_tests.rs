use chromaseg::{
    Error, Kmeans, MeanShift, Palette, PixelBuffer, Segmenter, ValidityReport, Watershed,
};

fn image_from(pixels: &[[u8; 3]], width: u32, height: u32) -> PixelBuffer {
    let data: Vec<u8> = pixels
        .iter()
        .flat_map(|&[r, g, b]| [r, g, b, 255])
        .collect();
    PixelBuffer::new(width, height, data).unwrap()
}

/// Two dark quadrant pixels, two light: the reference end-to-end case.
fn two_tone_square() -> PixelBuffer {
    image_from(
        &[
            [10, 10, 10],
            [10, 10, 10],
            [240, 240, 240],
            [240, 240, 240],
        ],
        2,
        2,
    )
}

#[test]
fn test_kmeans_end_to_end_on_the_two_tone_square() {
    let image = two_tone_square();
    let seg = Kmeans::new(2).with_seed(17).segment(&image).unwrap();

    assert_eq!(seg.labels[0], seg.labels[1]);
    assert_eq!(seg.labels[2], seg.labels[3]);
    assert_ne!(seg.labels[0], seg.labels[2]);

    let mut centroids = seg.centroids.clone();
    centroids.sort_by(|a, b| a[0].total_cmp(&b[0]));
    for ch in 0..3 {
        assert!((centroids[0][ch] - 10.0).abs() < 1e-3);
        assert!((centroids[1][ch] - 240.0).abs() < 1e-3);
    }
}

#[test]
fn test_every_segmenter_produces_a_total_partition() {
    let mut pixels = vec![[20, 30, 40]; 8];
    pixels.extend_from_slice(&[[220, 210, 200]; 8]);
    let image = image_from(&pixels, 4, 4);

    let runs: Vec<(&str, chromaseg::Segmentation)> = vec![
        ("kmeans", Kmeans::new(2).with_seed(1).segment(&image).unwrap()),
        ("mean-shift", MeanShift::new(60.0).segment(&image).unwrap()),
        ("watershed", Watershed::new(1.0).segment(&image).unwrap()),
    ];

    for (name, seg) in runs {
        assert_eq!(seg.labels.len(), 16, "{name}: label count");
        assert_eq!(
            seg.output.as_bytes().len(),
            image.as_bytes().len(),
            "{name}: output size"
        );
        let k = seg.num_clusters();
        assert!(k >= 1, "{name}: no clusters");
        assert!(
            seg.labels.iter().all(|&l| l < k),
            "{name}: label out of range"
        );
    }
}

#[test]
fn test_input_buffer_is_never_mutated() {
    let image = two_tone_square();
    let before = image.as_bytes().to_vec();

    let _ = Kmeans::new(2).with_seed(4).segment(&image).unwrap();
    let _ = MeanShift::new(40.0).segment(&image).unwrap();
    let _ = Watershed::new(1.0).segment(&image).unwrap();

    assert_eq!(image.as_bytes(), &before[..]);
}

#[test]
fn test_seeded_determinism_across_algorithms() {
    let pixels: Vec<[u8; 3]> = (0..24u8).map(|i| [i * 10, 255 - i * 10, i * 3]).collect();
    let image = image_from(&pixels, 6, 4);

    let a = Kmeans::new(3).with_seed(12).segment(&image).unwrap();
    let b = Kmeans::new(3).with_seed(12).segment(&image).unwrap();
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.centroids, b.centroids);

    let c = MeanShift::new(50.0)
        .with_seed_limit(6)
        .with_seed(12)
        .segment(&image)
        .unwrap();
    let d = MeanShift::new(50.0)
        .with_seed_limit(6)
        .with_seed(12)
        .segment(&image)
        .unwrap();
    assert_eq!(c.labels, d.labels);
}

#[test]
fn test_metrics_on_a_clean_kmeans_partition() {
    let mut pixels = vec![[5, 5, 5], [8, 6, 5], [6, 5, 9], [5, 8, 6]];
    pixels.extend_from_slice(&[[250, 249, 251], [248, 250, 250], [251, 250, 248], [250, 250, 250]]);
    let image = image_from(&pixels, 4, 2);

    let seg = Kmeans::new(2).with_seed(2).segment(&image).unwrap();
    let report = ValidityReport::of(&image, &seg).unwrap();

    assert!(report.silhouette > 0.95, "silhouette = {}", report.silhouette);
    assert!(
        report.davies_bouldin < 0.1,
        "davies_bouldin = {}",
        report.davies_bouldin
    );
    assert!(
        report.calinski_harabasz > 100.0,
        "calinski_harabasz = {}",
        report.calinski_harabasz
    );
}

#[test]
fn test_degenerate_partitions_fail_the_right_metrics() {
    let image = two_tone_square();
    let colors = image.colors();

    // k == 1: silhouette is 0 by convention, the indices are undefined.
    let one = Kmeans::new(1).with_seed(1).segment(&image).unwrap();
    assert_eq!(
        chromaseg::silhouette_score(&colors, &one.labels).unwrap(),
        0.0
    );
    assert!(matches!(
        chromaseg::davies_bouldin_index(&colors, &one.labels),
        Err(Error::InsufficientClusters { .. })
    ));
    assert!(matches!(
        chromaseg::calinski_harabasz_index(&colors, &one.labels),
        Err(Error::InsufficientClusters { .. })
    ));

    // k == n: Davies-Bouldin collapses to 0, Calinski-Harabasz is undefined.
    let singleton_labels: Vec<usize> = (0..4).collect();
    let distinct = image_from(
        &[[0, 0, 0], [80, 0, 0], [0, 160, 0], [0, 0, 240]],
        2,
        2,
    );
    let distinct_colors = distinct.colors();
    assert_eq!(
        chromaseg::davies_bouldin_index(&distinct_colors, &singleton_labels).unwrap(),
        0.0
    );
    assert!(matches!(
        chromaseg::calinski_harabasz_index(&distinct_colors, &singleton_labels),
        Err(Error::InsufficientClusters { .. })
    ));
}

#[test]
fn test_sampled_silhouette_converges_on_the_full_score() {
    let pixels: Vec<[u8; 3]> = (0..40)
        .map(|i| if i % 2 == 0 { [10, 12, 10] } else { [200, 198, 202] })
        .collect();
    let image = image_from(&pixels, 8, 5);
    let colors = image.colors();
    let labels: Vec<usize> = (0..40).map(|i| i % 2).collect();

    let full = chromaseg::silhouette_score(&colors, &labels).unwrap();
    let coarse = chromaseg::silhouette_score_sampled(&colors, &labels, 10, Some(5)).unwrap();
    let fine = chromaseg::silhouette_score_sampled(&colors, &labels, 40, Some(5)).unwrap();

    assert_eq!(full, fine);
    assert!((full - coarse).abs() < 0.1, "full={full} coarse={coarse}");
}

#[test]
fn test_mean_shift_discovers_the_cluster_count() {
    let mut pixels = vec![[15, 10, 12]; 6];
    pixels.extend_from_slice(&[[120, 130, 125]; 6]);
    pixels.extend_from_slice(&[[240, 235, 245]; 6]);
    let image = image_from(&pixels, 6, 3);

    let seg = MeanShift::new(40.0).segment(&image).unwrap();
    assert_eq!(seg.num_clusters(), 3);
}

#[test]
fn test_watershed_follows_spatial_structure() {
    // Same color histogram, different spatial layout: watershed keeps the
    // two flat fields apart because the ridge sits between them.
    let mut pixels = Vec::new();
    for _y in 0..6 {
        for x in 0..6 {
            pixels.push(if x < 3 { [30, 30, 30] } else { [220, 220, 220] });
        }
    }
    let image = image_from(&pixels, 6, 6);

    let seg = Watershed::new(1.0).segment(&image).unwrap();
    assert_eq!(seg.num_clusters(), 2);
    assert_ne!(seg.labels[0], seg.labels[5]);
}

#[test]
fn test_hue_wheel_palette_recolors_distinctly() {
    let image = two_tone_square();
    let seg = Kmeans::new(2)
        .with_seed(6)
        .with_palette(Palette::HueWheel)
        .segment(&image)
        .unwrap();

    let bytes = seg.output.as_bytes();
    // The two clusters get different synthetic colors.
    assert_ne!(&bytes[0..3], &bytes[8..11]);
    // And neither is the centroid color.
    assert_ne!(&bytes[0..3], &[10, 10, 10]);
    assert_ne!(&bytes[8..11], &[240, 240, 240]);
}

#[test]
fn test_empty_and_malformed_buffers_are_rejected() {
    assert!(matches!(
        PixelBuffer::new(0, 0, Vec::new()),
        Err(Error::EmptyInput)
    ));
    assert!(matches!(
        PixelBuffer::new(2, 1, vec![0; 7]),
        Err(Error::BufferSizeMismatch { .. })
    ));
}
