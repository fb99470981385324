use num_traits::Float;

/// Default tolerance for floating-point comparisons on literal numbers
pub(crate) const FLOAT_TOLERANCE: f64 = 1e-10;

// ===== Float tolerance helpers =====
// These functions provide safe floating-point comparisons to avoid
// precision issues like `1.0/3.0 * 3.0 != 1.0`.

/// Check if a float is approximately zero (within tolerance)
#[inline]
pub(crate) fn is_zero(n: f64) -> bool {
    n.abs() < FLOAT_TOLERANCE
}

/// Check if a float is approximately one (within tolerance)
#[inline]
pub(crate) fn is_one(n: f64) -> bool {
    (n - 1.0).abs() < FLOAT_TOLERANCE
}

/// Check if a float is approximately negative one (within tolerance)
#[inline]
pub(crate) fn is_neg_one(n: f64) -> bool {
    (n + 1.0).abs() < FLOAT_TOLERANCE
}

/// Absolute-tolerance comparison, false when either side is not finite
#[inline]
pub fn approx_eq<T: Float>(a: T, b: T, tolerance: T) -> bool {
    a.is_finite() && b.is_finite() && (a - b).abs() < tolerance
}

/// True when `n` is a finite whole number
#[inline]
pub(crate) fn is_integer<T: Float>(n: T) -> bool {
    n.is_finite() && n.trunc() == n
}

/// Format a number for step text: integers plainly, otherwise four decimals
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if is_integer(n) && n.abs() < 1e15 {
        // Avoid printing "-0"
        return format!("{}", n as i64);
    }
    format!("{n:.4}")
}
