//! K-means, mean-shift, and watershed over a tiny two-field image.

use chromaseg::{
    Kmeans, MeanShift, Palette, PixelBuffer, Segmenter, ValidityReport, Watershed,
};

fn main() {
    // A 6x4 image: warm red field on the left, cool blue on the right.
    let (width, height) = (6u32, 4u32);
    let mut data = Vec::new();
    for _y in 0..height {
        for x in 0..width {
            let [r, g, b]: [u8; 3] = if x < 3 { [200, 40, 40] } else { [40, 60, 200] };
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    let image = PixelBuffer::new(width, height, data).unwrap();

    // --- K-means (k=2) ---
    let kmeans = Kmeans::new(2).with_seed(42);
    let seg = kmeans.segment(&image).unwrap();
    println!("=== K-means (k=2) ===");
    for (i, label) in seg.labels.iter().enumerate() {
        println!("  pixel {:2} ({},{}) => cluster {}", i, i as u32 % width, i as u32 / width, label);
    }
    for (i, c) in seg.centroids.iter().enumerate() {
        println!("  centroid {} = ({:5.1}, {:5.1}, {:5.1})", i, c[0], c[1], c[2]);
    }
    let report = ValidityReport::of(&image, &seg).unwrap();
    println!(
        "  silhouette={:.3}  davies_bouldin={:.3}  calinski_harabasz={:.1}",
        report.silhouette, report.davies_bouldin, report.calinski_harabasz
    );

    // --- Mean-shift (bandwidth=60) ---
    let mean_shift = MeanShift::new(60.0);
    let seg = mean_shift.segment(&image).unwrap();
    println!("\n=== Mean-shift (bandwidth=60) ===");
    println!("  discovered {} clusters", seg.num_clusters());
    for (i, c) in seg.centroids.iter().enumerate() {
        println!("  centroid {} = ({:5.1}, {:5.1}, {:5.1})", i, c[0], c[1], c[2]);
    }

    // --- Watershed (sigma=1.0, hue-wheel recoloring) ---
    let watershed = Watershed::new(1.0).with_palette(Palette::HueWheel);
    let seg = watershed.segment(&image).unwrap();
    println!("\n=== Watershed (sigma=1.0) ===");
    println!("  discovered {} regions", seg.num_clusters());
    let bytes = seg.output.as_bytes();
    for y in 0..height as usize {
        let row: Vec<String> = (0..width as usize)
            .map(|x| {
                let p = (y * width as usize + x) * 4;
                format!("#{:02x}{:02x}{:02x}", bytes[p], bytes[p + 1], bytes[p + 2])
            })
            .collect();
        println!("  {}", row.join(" "));
    }
}
