use savgol_nonuniform::{CoefficientCache, NonUniformFilter};
use std::time::Instant;

fn main() {
    println!("=== Non-uniform Savitzky-Golay Filter Benchmarks ===\n");

    // Test different data sizes
    let sizes = vec![100, 1_000, 10_000, 100_000];

    for size in sizes {
        println!("Benchmarking with {} data points:", size);

        // Generate test data on a jittered grid
        let x: Vec<f64> = (0..size)
            .map(|i| i as f64 * 0.01 + 0.003 * ((i as f64) * 0.7).sin())
            .collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&t| t.sin() + 0.5 * (2.0 * t).cos() + 0.1 * (5.0 * t).sin())
            .collect();

        // Test different filter configurations
        let configs = vec![
            (2, 2, "5-point quadratic"),
            (3, 3, "7-point cubic"),
            (5, 3, "11-point cubic"),
            (7, 4, "15-point quartic"),
        ];

        for (half_window, degree, description) in configs {
            let filter = NonUniformFilter::new(half_window, degree).expect("Valid parameters");

            // Warm up
            let warm = size.min(100);
            let _ = filter.apply(&x[..warm], &y[..warm]);

            let start = Instant::now();
            let _smoothed = filter.apply(&x, &y).expect("smoothing failed");
            let smooth_duration = start.elapsed();

            let derivative_filter = filter.clone().with_derivative(1);
            let start = Instant::now();
            let _derivative = derivative_filter.apply(&x, &y).expect("derivative failed");
            let deriv_duration = start.elapsed();

            println!(
                "  {}: smooth={:?}, derivative={:?}",
                description, smooth_duration, deriv_duration
            );
        }

        println!();
    }

    // Coefficient caching on an integer grid
    println!("Coefficient caching efficiency:");
    let grid: Vec<f64> = (0..100_000).map(|i| i as f64).collect();
    let values: Vec<f64> = grid.iter().map(|t| (t * 0.001).sin()).collect();
    let filter = NonUniformFilter::new(5, 3).unwrap();

    let start = Instant::now();
    let _ = filter.apply(&grid, &values).unwrap();
    println!("  uncached: {:?}", start.elapsed());

    let mut cache = CoefficientCache::new();
    let start = Instant::now();
    let _ = filter.apply_with_cache(&grid, &values, &mut cache).unwrap();
    println!("  cached:   {:?} ({} hits)", start.elapsed(), cache.hits());
}
