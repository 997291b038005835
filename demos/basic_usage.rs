//! Example usage of the non-uniform Savitzky-Golay filter

use savgol_nonuniform::{derivative, smooth, BoundaryPolicy, CoefficientCache, NonUniformFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Non-uniform Savitzky-Golay Filter Examples ===\n");

    // Irregularly spaced sample positions
    let x: Vec<f64> = (0..20)
        .map(|i| {
            let t = i as f64 * 0.1;
            t + 0.03 * (3.1 * t).sin()
        })
        .collect();
    let clean_signal: Vec<f64> = x
        .iter()
        .map(|&t| (2.0 * std::f64::consts::PI * t).sin() + 0.5 * (4.0 * std::f64::consts::PI * t).cos())
        .collect();

    // Add some noise
    let mut noisy_signal = clean_signal.clone();
    for (i, v) in noisy_signal.iter_mut().enumerate() {
        if i % 3 == 0 {
            *v += 0.3 * (i as f64 % 2.0 - 0.5);
        }
    }

    println!("Sample positions:");
    print_signal(&x);
    println!("\nOriginal noisy signal:");
    print_signal(&noisy_signal);

    // Example 1: Basic smoothing with convenience function
    println!("\n1. Basic smoothing (half_window=2, degree=2):");
    let smoothed_basic = smooth(&x, &noisy_signal, 2, 2, 0)?;
    print_signal(&smoothed_basic);

    // Example 2: Wider window, cubic fit
    println!("\n2. Custom smoothing (half_window=3, degree=3):");
    let custom_filter = NonUniformFilter::new(3, 3)?;
    print_signal(&custom_filter.apply(&x, &noisy_signal)?);

    // Example 3: First derivative
    println!("\n3. First derivative:");
    print_signal(&derivative(&x, &clean_signal, 3, 2)?);

    // Example 4: Second derivative with pass-through edges
    println!("\n4. Second derivative (pass-through boundary):");
    let curvature_filter = NonUniformFilter::new(3, 3)?
        .with_derivative(2)
        .with_boundary_policy(BoundaryPolicy::PassThrough);
    print_signal(&curvature_filter.apply(&x, &clean_signal)?);

    // Example 5: Reusing coefficients across calls on an integer grid
    println!("\n5. Cached coefficients on an integer grid:");
    let grid: Vec<f64> = (0..1000).map(|i| i as f64).collect();
    let values: Vec<f64> = grid.iter().map(|t| (t * 0.01).sin()).collect();
    let mut cache = CoefficientCache::new();
    let filter = NonUniformFilter::new(5, 3)?;
    let _ = filter.apply_with_cache(&grid, &values, &mut cache)?;
    println!(
        "{} windows, {} distinct geometries, {} hits",
        cache.hits() + cache.misses(),
        cache.len(),
        cache.hits()
    );

    Ok(())
}

fn print_signal(signal: &[f64]) {
    for (i, &value) in signal.iter().enumerate() {
        print!("{:7.3}", value);
        if i > 0 && (i + 1) % 8 == 0 {
            println!();
        }
    }
    if signal.len() % 8 != 0 {
        println!();
    }
}
