use image::{ImageBuffer, Luma};
use speckle_stats_lib::*;

/// Example usage of speckle_stats_lib.
/// Write a small stack of synthetic speckle frames and a reference frame to a temporary
/// directory, then compute the mean standard deviation and the correlation with the reference.
pub fn main() {
    inner()
}

#[test]
fn test() {
    inner()
}

//a deterministic "speckle" pattern that drifts a little from frame to frame.
fn speckle_frame(seed: u32, drift: u32) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    ImageBuffer::from_fn(16, 12, |x, y| {
        let v = (x * 37 + y * 101 + seed * 13).wrapping_mul(2654435761) >> 24;
        Luma([((v + drift) % 256) as u8])
    })
}

fn inner() {
    let dir = tempfile::tempdir().unwrap();
    let samples_dir = dir.path().join("Samples");
    let reference_dir = dir.path().join("Reference");
    std::fs::create_dir(&samples_dir).unwrap();
    std::fs::create_dir(&reference_dir).unwrap();

    for i in 0..5 {
        let fname = samples_dir.join(format!("speckle_{i:02}.png"));
        speckle_frame(1, i * 3).save(&fname).unwrap();
    }
    speckle_frame(1, 0)
        .save(reference_dir.join("reference.png"))
        .unwrap();

    //analyse the middle of each frame.
    let options = AnalysisOptions {
        roi: Some(Roi::new(2, 2, 12, 8)),
    };
    let report = SpeckleAnalysisBuilder::from_options(options)
        .analyze_dirs(&samples_dir, &reference_dir)
        .unwrap();

    println!("There are {} images", report.num_images());
    println!("The ROI is {:?}", report.roi_dims());
    println!("The average standard deviation is [{:.6}]", report.mean_std_dev());
    println!(
        "The correlation coefficient with the reference image is [{:.6}]",
        report.correlation()
    );

    //some assertions to check that the example still works
    assert_eq!(report.num_images(), 5);
    assert_eq!(report.roi_dims(), (8, 12));
    assert!(report.mean_std_dev() >= 0.0);
    assert!(report.correlation().abs() < 1.0);
}
