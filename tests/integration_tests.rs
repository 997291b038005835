use approx::{assert_abs_diff_eq, assert_relative_eq};
use savgol_nonuniform::{
    derivative, smooth, uniform, BoundaryPolicy, CoefficientCache, FilterConfig, NonUniformFilter,
    SavGolError,
};

/// Strictly increasing positions with deterministic irregular spacing.
fn irregular_positions(len: usize) -> Vec<f64> {
    let mut x = Vec::with_capacity(len);
    let mut pos = -1.0;
    for i in 0..len {
        x.push(pos);
        pos += 0.05 + 0.04 * ((i as f64 * 1.37).sin() + 1.0);
    }
    x
}

fn lorentzian(x: f64, eta: f64) -> f64 {
    1.0 / std::f64::consts::PI * eta / (x * x + eta * eta)
}

#[test]
fn test_output_length_matches_input() {
    let x = irregular_positions(37);
    let y: Vec<f64> = x.iter().map(|v| v.cos()).collect();

    for half_window in 1..5 {
        for degree in 0..(2 * half_window).min(5) {
            for order in 0..=2 {
                let out = smooth(&x, &y, half_window, degree, order).unwrap();
                assert_eq!(out.len(), x.len());
            }
        }
    }
}

#[test]
fn test_constant_preservation() {
    let x = irregular_positions(30);
    let y = vec![5.0; 30];

    for half_window in 1..5 {
        for degree in 0..(2 * half_window).min(6) {
            let filtered = smooth(&x, &y, half_window, degree, 0).unwrap();
            for &value in &filtered {
                assert_abs_diff_eq!(value, 5.0, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn test_polynomial_preservation_fixed() {
    // f(x) = x^3 - 2x^2 + x + 1 on an irregular grid
    let x = irregular_positions(25);
    let f = |x: f64| x.powi(3) - 2.0 * x.powi(2) + x + 1.0;
    let df = |x: f64| 3.0 * x.powi(2) - 4.0 * x + 1.0;
    let d2f = |x: f64| 6.0 * x - 4.0;
    let y: Vec<f64> = x.iter().map(|&v| f(v)).collect();

    let value = smooth(&x, &y, 3, 3, 0).unwrap();
    let slope = smooth(&x, &y, 3, 3, 1).unwrap();
    let curvature = smooth(&x, &y, 3, 3, 2).unwrap();

    for i in 3..x.len() - 3 {
        assert_abs_diff_eq!(value[i], f(x[i]), epsilon = 1e-9);
        assert_abs_diff_eq!(slope[i], df(x[i]), epsilon = 1e-8);
        assert_abs_diff_eq!(curvature[i], d2f(x[i]), epsilon = 1e-7);
    }
}

#[test]
fn test_uniform_grid_equivalence() {
    let step = 0.02;
    let x: Vec<f64> = (0..100).map(|i| i as f64 * step).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, &v)| lorentzian(v - 1.0, 0.2) + 0.1 * (i as f64 * 1.7).sin())
        .collect();

    for &(half_window, degree) in &[(2, 2), (3, 3), (4, 2), (5, 4)] {
        for order in 0..=2 {
            let nonuniform = smooth(&x, &y, half_window, degree, order).unwrap();
            let reference = uniform::filter(&y, half_window, degree, order, step).unwrap();

            for i in half_window..x.len() - half_window {
                assert_relative_eq!(
                    nonuniform[i],
                    reference[i],
                    epsilon = 1e-7,
                    max_relative = 1e-9
                );
            }
        }
    }
}

#[test]
fn test_finite_difference_boundary() {
    let x = irregular_positions(15);
    let y: Vec<f64> = x.iter().map(|&v| 3.0 * v * v - v).collect();

    // Interior and edges are exact for a quadratic.
    let slope = smooth(&x, &y, 3, 2, 1).unwrap();
    let curvature = smooth(&x, &y, 3, 2, 2).unwrap();

    // Edge slopes are one-sided differences toward the interior.
    let n = x.len();
    assert_abs_diff_eq!(slope[0], (y[1] - y[0]) / (x[1] - x[0]), epsilon = 1e-12);
    assert_abs_diff_eq!(slope[n - 1], (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]), epsilon = 1e-12);
    for i in 3..n - 3 {
        assert_abs_diff_eq!(slope[i], 6.0 * x[i] - 1.0, epsilon = 1e-9);
    }
    for &value in &curvature {
        assert_abs_diff_eq!(value, 6.0, epsilon = 1e-8);
    }
}

#[test]
fn test_pass_through_boundary() {
    let x = irregular_positions(12);
    let y: Vec<f64> = x.iter().map(|v| (3.0 * v).sin()).collect();

    for order in 0..=2 {
        let config = FilterConfig::new(2, 2)
            .with_derivative(order)
            .with_boundary_policy(BoundaryPolicy::PassThrough);
        let out = NonUniformFilter::with_config(config).apply(&x, &y).unwrap();

        assert_eq!(out[0], y[0]);
        assert_eq!(out[1], y[1]);
        assert_eq!(out[10], y[10]);
        assert_eq!(out[11], y[11]);
    }
}

#[test]
fn test_boundary_values_are_finite() {
    let x = irregular_positions(7);
    let y: Vec<f64> = x.iter().map(|v| v.exp()).collect();

    for policy in [BoundaryPolicy::FiniteDifference, BoundaryPolicy::PassThrough] {
        for order in 0..=2 {
            let config = FilterConfig::new(3, 2)
                .with_derivative(order)
                .with_boundary_policy(policy);
            let out = NonUniformFilter::with_config(config).apply(&x, &y).unwrap();
            assert!(out[0].is_finite());
            assert!(out[x.len() - 1].is_finite());
        }
    }
}

#[test]
fn test_resmoothing_polynomial_is_fixed_point() {
    let x = irregular_positions(40);
    let y: Vec<f64> = x.iter().map(|&v| 0.5 * v * v - 2.0 * v + 3.0).collect();

    let once = smooth(&x, &y, 3, 2, 0).unwrap();
    let twice = smooth(&x, &once, 3, 2, 0).unwrap();

    for (a, b) in once.iter().zip(twice.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn test_error_scenarios() {
    assert!(matches!(
        smooth(&[1.0, 2.0, 3.0], &[1.0, 2.0], 0, 0, 0),
        Err(SavGolError::ShapeMismatch { x_len: 3, y_len: 2 })
    ));
    assert!(matches!(
        smooth(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 2, 1, 0),
        Err(SavGolError::InsufficientData { len: 3, window_size: 5 })
    ));
    assert!(matches!(
        smooth(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0], 1, 2, 0),
        Err(SavGolError::UnderdeterminedFit { window_size: 3, terms: 3 })
    ));
    assert!(matches!(
        smooth(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0], 1, 1, 3),
        Err(SavGolError::UnsupportedDerivative(3))
    ));
    assert!(matches!(
        smooth(&[], &[], 0, 0, 0),
        Err(SavGolError::InsufficientData { len: 0, window_size: 1 })
    ));
}

#[test]
fn test_degenerate_window_is_singular() {
    let x = vec![0.0, 1.0, 1.0, 1.0, 2.0];
    let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    assert!(matches!(smooth(&x, &y, 1, 1, 0), Err(SavGolError::SingularFit { index: 2 })));
}

#[test]
fn test_cached_application_matches_direct() {
    // Integer grid: every window has bit-identical offsets.
    let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| (v * 0.3).sin()).collect();
    let filter = NonUniformFilter::new(3, 3).unwrap().with_derivative(1);

    let mut cache = CoefficientCache::new();
    let cached = filter.apply_with_cache(&x, &y, &mut cache).unwrap();
    let direct = filter.apply(&x, &y).unwrap();

    assert_eq!(cached, direct);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 43);
}

#[test]
fn test_huge_half_window_reports_insufficient_data() {
    let x = [0.0, 1.0, 2.0];
    assert!(matches!(
        smooth(&x, &x, usize::MAX / 2 + 1, 0, 0),
        Err(SavGolError::InsufficientData { len: 3, window_size: usize::MAX })
    ));
    assert!(matches!(
        smooth(&x, &x, usize::MAX, 0, 0),
        Err(SavGolError::InsufficientData { len: 3, .. })
    ));
}

#[test]
fn test_derivative_above_degree_still_detects_singular_window() {
    let x = vec![0.0, 1.0, 2.0, 2.0, 2.0, 3.0, 4.0];
    let y = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    assert!(matches!(smooth(&x, &y, 1, 1, 2), Err(SavGolError::SingularFit { index: 3 })));
}

#[test]
fn test_cache_shared_across_tolerances() {
    let x = vec![0.0, 1.0, 1.0 + 1e-7, 2.0];
    let y = vec![1.0, 2.0, 3.0, 4.0];
    let permissive = NonUniformFilter::with_config(FilterConfig::new(1, 1).with_singular_tolerance(0.0));
    let strict = NonUniformFilter::with_config(FilterConfig::new(1, 1).with_singular_tolerance(0.5));

    let mut cache = CoefficientCache::new();
    assert!(permissive.apply_with_cache(&x, &y, &mut cache).is_ok());

    assert!(matches!(strict.apply(&x, &y), Err(SavGolError::SingularFit { index: 1 })));
    assert!(matches!(
        strict.apply_with_cache(&x, &y, &mut cache),
        Err(SavGolError::SingularFit { index: 1 })
    ));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let x = irregular_positions(5_000);
    let y: Vec<f64> = x.iter().map(|v| v.sin() + 0.1 * (v * 40.0).cos()).collect();
    let filter = NonUniformFilter::new(4, 3).unwrap().with_derivative(2);

    let parallel = filter.apply_parallel(&x, &y).unwrap();
    let sequential = filter.apply(&x, &y).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_noise_reduction() {
    let x = irregular_positions(200);
    let true_signal: Vec<f64> = x.iter().map(|v| v.sin()).collect();

    let mut noisy_signal = true_signal.clone();
    // Add deterministic "noise" for reproducible testing
    for (i, v) in noisy_signal.iter_mut().enumerate() {
        *v += 0.1 * (i as f64 * 1.7).sin();
    }

    let smoothed = smooth(&x, &noisy_signal, 6, 3, 0).unwrap();

    let mse = |a: &[f64]| -> f64 {
        a.iter()
            .zip(true_signal.iter())
            .map(|(v, t)| (v - t).powi(2))
            .sum::<f64>()
            / a.len() as f64
    };

    assert!(mse(&smoothed) < mse(&noisy_signal));
}

#[test]
fn test_convenience_derivative() {
    let x = irregular_positions(20);
    let y: Vec<f64> = x.iter().map(|&v| 2.0 * v + 7.0).collect();

    let deriv = derivative(&x, &y, 2, 1).unwrap();
    for value in deriv {
        assert_abs_diff_eq!(value, 2.0, epsilon = 1e-9);
    }
}
