use approx::assert_abs_diff_eq;
use itertools::Itertools;
use ndarray::{array, Array2};
use rand::prelude::*;
use speckle_stats_lib::*;

const EPS: f64 = 1e-9;

fn random_frame(dim: (usize, usize), rng: &mut StdRng) -> Array2<f64> {
    Array2::from_shape_simple_fn(dim, || f64::from(rng.gen_range(0u16..=4095)))
}

fn random_stack(num_frames: usize, dim: (usize, usize), rng: &mut StdRng) -> Vec<Array2<f64>> {
    (0..num_frames).map(|_| random_frame(dim, rng)).collect()
}

#[test]
fn test_outputs_have_frame_shape() {
    let mut rng = StdRng::seed_from_u64(1);

    for dim in [(1, 1), (3, 7), (15, 18)] {
        let stack = random_stack(4, dim, &mut rng);
        let avg = average(&stack).unwrap();
        let disp = dispersion(&stack, &avg).unwrap();

        assert_eq!(avg.dim(), dim);
        assert_eq!(disp.dim(), dim);
    }
}

#[test]
fn test_dispersion_is_non_negative() {
    let mut rng = StdRng::seed_from_u64(2);
    let stack = random_stack(9, (10, 12), &mut rng);

    let avg = average(&stack).unwrap();
    let disp = dispersion(&stack, &avg).unwrap();

    assert!(disp.iter().all(|&v| v >= 0.0));
    assert!(summarize(&disp).unwrap() >= 0.0);
}

#[test]
fn test_average_lies_within_pixel_range() {
    let mut rng = StdRng::seed_from_u64(3);
    let stack = random_stack(6, (5, 5), &mut rng);
    let avg = average(&stack).unwrap();

    for ((row, col), &mean) in avg.indexed_iter() {
        let (lo, hi) = stack
            .iter()
            .map(|frame| frame[[row, col]])
            .minmax()
            .into_option()
            .unwrap();
        assert!(lo - EPS <= mean && mean <= hi + EPS);
    }
}

#[test]
fn test_single_frame_stack() {
    let mut rng = StdRng::seed_from_u64(4);
    let frame = random_frame((6, 4), &mut rng);
    let stack = [frame.clone()];

    let avg = average(&stack).unwrap();
    let disp = dispersion(&stack, &avg).unwrap();

    assert_eq!(avg, frame);
    assert_eq!(disp, Array2::zeros((6, 4)));
    assert_eq!(summarize(&disp).unwrap(), 0.0);
}

#[test]
fn test_frame_order_does_not_matter() {
    let mut rng = StdRng::seed_from_u64(5);
    let stack = random_stack(4, (3, 3), &mut rng);
    let reference = random_frame((3, 3), &mut rng);

    let avg = average(&stack).unwrap();
    let disp = dispersion(&stack, &avg).unwrap();
    let rho = correlate(&avg, &reference).unwrap();

    for order in stack.iter().cloned().permutations(stack.len()) {
        let permuted_avg = average(&order).unwrap();
        let permuted_disp = dispersion(&order, &permuted_avg).unwrap();

        assert_abs_diff_eq!(permuted_avg, avg, epsilon = EPS);
        assert_abs_diff_eq!(permuted_disp, disp, epsilon = EPS);
        assert_abs_diff_eq!(
            correlate(&permuted_avg, &reference).unwrap(),
            rho,
            epsilon = EPS
        );
    }
}

#[test]
fn test_shuffled_stack_gives_same_report() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut frames = random_stack(20, (8, 8), &mut rng);
    let reference = random_frame((8, 8), &mut rng);

    let builder = SpeckleAnalysisBuilder::default();
    let report = builder
        .analyze(&ImageStack::from_frames(frames.clone()).unwrap(), &reference)
        .unwrap();

    frames.shuffle(&mut rng);
    let shuffled = builder
        .analyze(&ImageStack::from_frames(frames).unwrap(), &reference)
        .unwrap();

    assert_abs_diff_eq!(report.mean_std_dev(), shuffled.mean_std_dev(), epsilon = EPS);
    assert_abs_diff_eq!(report.correlation(), shuffled.correlation(), epsilon = EPS);
}

#[test]
fn test_correlation_is_bounded() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let a = random_frame((4, 6), &mut rng);
        let b = random_frame((4, 6), &mut rng);

        let rho = correlate(&a, &b).unwrap();
        assert!(rho.abs() < 1.0, "{rho}");
    }
}

#[test]
fn test_self_correlation_approaches_one() {
    let mut rng = StdRng::seed_from_u64(8);
    let img = random_frame((10, 10), &mut rng);

    let mean = img.mean().unwrap();
    let sum_sq: f64 = img.iter().map(|v| (v - mean) * (v - mean)).sum();
    let exp = sum_sq / (sum_sq + 1.0);

    let rho = correlate(&img, &img).unwrap();
    assert_abs_diff_eq!(rho, exp, epsilon = EPS);
    assert!(rho < 1.0);
    assert!(rho > 0.99);
}

#[test]
fn test_uniform_stack_and_reference() {
    //every pixel of every frame holds the same value: nothing varies anywhere.
    let stack = vec![Array2::<u8>::from_elem((4, 4), 128); 5];
    let reference = Array2::<u8>::from_elem((4, 4), 128);

    let avg = average(&stack).unwrap();
    let disp = dispersion(&stack, &avg).unwrap();

    assert_eq!(avg, Array2::from_elem((4, 4), 128.0));
    assert_eq!(summarize(&disp).unwrap(), 0.0);
    assert_eq!(correlate(&avg, &reference).unwrap(), 0.0);
}

#[test]
fn test_two_frame_scenario() {
    #[rustfmt::skip]
    let stack = [
        array![[0u8, 100], [50, 50]],
        array![[10u8, 100], [70, 30]],
    ];
    let avg = average(&stack).unwrap();
    assert_eq!(avg, array![[5.0, 100.0], [60.0, 40.0]]);

    let disp = dispersion(&stack, &avg).unwrap();
    assert_eq!(disp, array![[5.0, 0.0], [10.0, 10.0]]);
    assert_eq!(summarize(&disp).unwrap(), 6.25);

    //mean-centred average is [-46.25, 48.75, 8.75, -11.25], reference [-1.5, 1.5, 0.5, -0.5]
    let reference = array![[0u16, 3], [2, 1]];
    let cross = 69.375 + 73.125 + 4.375 + 5.625;
    let avg_sq: f64 = 2139.0625 + 2376.5625 + 76.5625 + 126.5625;
    let ref_sq = 5.0;
    let exp = cross / ((avg_sq * ref_sq).sqrt() + 1.0);

    assert_abs_diff_eq!(correlate(&avg, &reference).unwrap(), exp, epsilon = EPS);
}

#[test]
fn test_integer_and_float_stacks_agree() {
    let mut rng = StdRng::seed_from_u64(9);
    let int_stack: Vec<Array2<u16>> = (0..5)
        .map(|_| Array2::from_shape_simple_fn((3, 4), || rng.gen_range(0..=u16::MAX)))
        .collect();
    let float_stack: Vec<Array2<f64>> = int_stack.iter().map(|f| f.mapv(f64::from)).collect();

    let int_avg = average(&int_stack).unwrap();
    let float_avg = average(&float_stack).unwrap();
    assert_abs_diff_eq!(int_avg, float_avg, epsilon = EPS);

    assert_abs_diff_eq!(
        dispersion(&int_stack, &int_avg).unwrap(),
        dispersion(&float_stack, &float_avg).unwrap(),
        epsilon = EPS
    );
}

#[test]
fn test_shape_mismatch_errors() {
    let stack = [Array2::<f64>::zeros((3, 3)), Array2::<f64>::zeros((3, 4))];
    assert!(matches!(average(&stack), Err(Error::ShapeMismatch { .. })));

    let stack = [Array2::<f64>::zeros((3, 3))];
    let avg = average(&stack).unwrap();
    let reference = Array2::<f64>::zeros((4, 3));
    assert!(matches!(
        correlate(&avg, &reference),
        Err(Error::ShapeMismatch {
            expected: (3, 3),
            actual: (4, 3)
        })
    ));

    assert!(matches!(
        ImageStack::from_frames(vec![Array2::zeros((1, 2)), Array2::zeros((2, 1))]),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_empty_stack_errors() {
    let stack: Vec<Array2<f64>> = vec![];
    assert!(matches!(average(&stack), Err(Error::EmptyInput(_))));
    assert!(matches!(
        ImageStack::from_frames(stack),
        Err(Error::EmptyInput(_))
    ));
}
