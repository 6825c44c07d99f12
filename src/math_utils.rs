//! Mathematical utility functions for table lookups and the deposition profile
//!
//! This module provides the interpolation primitives used by the EOS tables
//! and the shape functions used by the deposition profile.

use std::convert::Infallible;

/// Assert that the deviation between two values is less than a threshold
///
/// This macro combines deviation calculation with assertion for cleaner test code.
/// It calculates the percentage deviation between `actual` and `expected`, then
/// asserts that this deviation is less than the specified `max_deviation`.
///
/// # Examples
/// See the test cases below for usage examples.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `a` - Start value
/// * `b` - End value
/// * `ratio` - Interpolation ratio (0.0 = a, 1.0 = b)
///
/// # Examples
/// ```
/// use asteroid_edep_rust::math_utils::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// assert_eq!(lerp(100.0, 200.0, 0.25), 125.0);
/// ```
pub fn lerp(a: f64, b: f64, ratio: f64) -> f64 {
    a + (b - a) * ratio
}

/// Inverse linear interpolation - find the ratio for a given value
///
/// # Examples
/// ```
/// use asteroid_edep_rust::math_utils::inverse_lerp;
///
/// let ratio = inverse_lerp(100.0, 200.0, 150.0);
/// assert_eq!(ratio, 0.5);
/// ```
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if (b - a).abs() < f64::EPSILON {
        0.0 // Avoid division by zero
    } else {
        (value - a) / (b - a)
    }
}

/// Check that an axis is strictly increasing
pub fn is_strictly_increasing(axis: &[f64]) -> bool {
    axis.windows(2).all(|w| w[1] > w[0])
}

/// Find the bracketing interval of `x` on a strictly increasing axis.
///
/// Returns the lower index `i` such that `axis[i] <= x <= axis[i + 1]`, or
/// `None` when `x` is outside the axis or the axis has fewer than two points.
/// A value exactly on an interior knot resolves to the interval starting at
/// that knot; the last knot resolves to the final interval.
///
/// # Examples
/// ```
/// use asteroid_edep_rust::math_utils::bracket;
///
/// let axis = [1.0, 2.0, 4.0, 8.0];
/// assert_eq!(bracket(&axis, 3.0), Some(1));
/// assert_eq!(bracket(&axis, 2.0), Some(1));
/// assert_eq!(bracket(&axis, 8.0), Some(2));
/// assert_eq!(bracket(&axis, 9.0), None);
/// ```
pub fn bracket(axis: &[f64], x: f64) -> Option<usize> {
    let n = axis.len();
    if n < 2 || !(x >= axis[0] && x <= axis[n - 1]) {
        return None;
    }

    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if axis[mid] > x {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(lo)
}

/// Piecewise-linear lookup of `ys(x)` on a strictly increasing axis.
pub fn interp1(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let i = bracket(xs, x)?;
    let ratio = inverse_lerp(xs[i], xs[i + 1], x);
    Some(lerp(ys[i], ys[i + 1], ratio))
}

/// Bilinear interpolation on a grid stored with the first axis varying fastest.
///
/// `values[j * xs.len() + i]` holds the value at `(xs[i], ys[j])`.
pub fn bilinear(xs: &[f64], ys: &[f64], values: &[f64], x: f64, y: f64) -> Option<f64> {
    let i = bracket(xs, x)?;
    let j = bracket(ys, y)?;
    let nx = xs.len();

    let tx = inverse_lerp(xs[i], xs[i + 1], x);
    let ty = inverse_lerp(ys[j], ys[j + 1], y);

    let low = lerp(values[j * nx + i], values[j * nx + i + 1], tx);
    let high = lerp(values[(j + 1) * nx + i], values[(j + 1) * nx + i + 1], tx);
    Some(lerp(low, high, ty))
}

/// Logistic sigmoid, 1/(1 + e^-x), evaluated without overflow for large |x|.
pub fn expit(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Unit half-ellipse sqrt(1 - u²) on [-1, 1], zero outside.
///
/// This is the semicircle probability density scaled by π/2.
pub fn half_ellipse(u: f64) -> f64 {
    if u.abs() <= 1.0 {
        (1.0 - u * u).sqrt()
    } else {
        0.0
    }
}

/// Composite Simpson's rule over `[a, b]` with `panels` intervals (rounded up to even).
pub fn simpson<F>(f: F, a: f64, b: f64, panels: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    match try_simpson(|x| Ok::<f64, Infallible>(f(x)), a, b, panels) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Simpson's rule for an integrand that can fail; the first error stops the sum.
pub fn try_simpson<F, E>(mut f: F, a: f64, b: f64, panels: usize) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut n = panels.max(2);
    if n % 2 == 1 {
        n += 1;
    }
    let h = (b - a) / n as f64;

    let mut sum = f(a)? + f(b)?;
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h)?;
    }
    Ok(sum * h / 3.0)
}

/// Calculate the percentage deviation between two values
///
/// Uses the expected value as the reference (base) for the percentage calculation.
///
/// # Examples
/// ```
/// use asteroid_edep_rust::math_utils::deviation;
///
/// // 105 is 5% higher than 100
/// assert_eq!(deviation(105.0, 100.0), 5.0);
///
/// // 95 is 5% lower than 100
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        // Avoid division by zero - if expected is 0, return 0 if actual is also 0
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(100.0, 200.0, 0.25), 125.0);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
        assert_eq!(inverse_lerp(100.0, 200.0, 150.0), 0.5);
        assert_eq!(inverse_lerp(100.0, 200.0, 100.0), 0.0);
        assert_eq!(inverse_lerp(100.0, 200.0, 200.0), 1.0);
    }

    #[test]
    fn test_bracket_edges_and_knots() {
        let axis = [0.5, 1.0, 3.0, 7.0, 7.5];
        assert_eq!(bracket(&axis, 0.5), Some(0));
        assert_eq!(bracket(&axis, 0.75), Some(0));
        assert_eq!(bracket(&axis, 1.0), Some(1));
        assert_eq!(bracket(&axis, 6.9), Some(2));
        assert_eq!(bracket(&axis, 7.5), Some(3));
        assert_eq!(bracket(&axis, 0.49), None);
        assert_eq!(bracket(&axis, 7.51), None);
        assert_eq!(bracket(&axis, f64::NAN), None);
        assert_eq!(bracket(&[1.0], 1.0), None);
    }

    #[test]
    fn test_interp1_on_irregular_axis() {
        let xs = [0.0, 1.0, 4.0];
        let ys = [10.0, 20.0, 50.0];
        assert_eq!(interp1(&xs, &ys, 0.5), Some(15.0));
        assert_eq!(interp1(&xs, &ys, 2.5), Some(35.0));
        assert_eq!(interp1(&xs, &ys, 4.0), Some(50.0));
        assert_eq!(interp1(&xs, &ys, 5.0), None);
    }

    #[test]
    fn test_bilinear_reproduces_plane() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 2.0];
        // f(x, y) = 2x + 3y, x fastest
        let values: Vec<f64> = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| 2.0 * x + 3.0 * y))
            .collect();

        let v = bilinear(&xs, &ys, &values, 2.0, 1.0).unwrap();
        assert_abs_diff_eq!(v, 7.0, epsilon = 1e-12);
        let corner = bilinear(&xs, &ys, &values, 3.0, 2.0).unwrap();
        assert_abs_diff_eq!(corner, 12.0, epsilon = 1e-12);
        assert!(bilinear(&xs, &ys, &values, 3.5, 1.0).is_none());
    }

    #[test]
    fn test_expit() {
        assert_eq!(expit(0.0), 0.5);
        assert_abs_diff_eq!(expit(2.0) + expit(-2.0), 1.0, epsilon = 1e-15);
        assert_eq!(expit(-1.0e4), 0.0);
        assert_eq!(expit(1.0e4), 1.0);
    }

    #[test]
    fn test_half_ellipse() {
        assert_eq!(half_ellipse(0.0), 1.0);
        assert_eq!(half_ellipse(-1.0), 0.0);
        assert_eq!(half_ellipse(1.5), 0.0);
        assert_abs_diff_eq!(half_ellipse(0.6), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_simpson_integrates_cubic_exactly() {
        let integral = simpson(|x| x * x * x - 2.0 * x + 1.0, 0.0, 2.0, 4);
        assert_abs_diff_eq!(integral, 2.0, epsilon = 1e-12);

        // odd panel counts are rounded up
        let integral = simpson(|x| x * x, 0.0, 3.0, 3);
        assert_abs_diff_eq!(integral, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_try_simpson_stops_at_first_error() {
        let mut calls = 0;
        let result = try_simpson(
            |x| {
                calls += 1;
                if x > 0.5 { Err("out of range") } else { Ok(x) }
            },
            0.0,
            1.0,
            10,
        );
        assert_eq!(result, Err("out of range"));
        assert_eq!(calls, 2);

        let ok: Result<f64, ()> = try_simpson(|x| Ok(2.0 * x), 0.0, 1.0, 2);
        assert_abs_diff_eq!(ok.unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deviation() {
        assert_eq!(deviation(105.0, 100.0), 5.0);
        assert_eq!(deviation(95.0, 100.0), 5.0);
        assert_eq!(deviation(100.0, 100.0), 0.0);

        assert_eq!(deviation(0.0, 0.0), 0.0);
        assert_eq!(deviation(10.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_assert_deviation_macro() {
        assert_deviation!(105.0, 100.0, 10.0);
        assert_deviation!(95.0, 100.0, 10.0);
        assert_deviation!(2.0 * 52.5, 100.0, 10.0);
        assert_deviation!(74.5, 74.2, 1.0, "integrated energy should agree within 1%");
    }

    #[test]
    #[should_panic(expected = "assertion failed: deviation")]
    fn test_assert_deviation_macro_fails() {
        assert_deviation!(120.0, 100.0, 10.0);
    }
}
