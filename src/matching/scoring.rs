/// Scale factor from relative error to parts per million
pub const PPM: f64 = 1_000_000.0;

/// Signed relative mass error in ppm.
///
/// Positive when the observed mass is heavier than the reference. The
/// observed mass is the denominator and must already be validated as
/// non-zero.
///
/// # Examples
///
/// ```
/// use lipid_match::matching::scoring::ppm_error;
///
/// let ppm = ppm_error(200.0, 100.0);
/// assert_eq!(ppm, 500_000.0);
/// ```
#[inline]
#[must_use]
pub fn ppm_error(observed_mass: f64, reference_mass: f64) -> f64 {
    (observed_mass - reference_mass) / observed_mass * PPM
}

/// Whether a ppm error falls inside the closed window `[-tolerance, +tolerance]`
#[inline]
#[must_use]
pub fn within_tolerance(confidence_ppm: f64, tolerance_ppm: f64) -> bool {
    (-tolerance_ppm..=tolerance_ppm).contains(&confidence_ppm)
}

/// Reference mass range accepted for an observed mass at a given tolerance.
///
/// Returned as `(lowest, highest)` reference mass. Useful for reporting the
/// search window alongside results.
#[must_use]
pub fn reference_mass_window(observed_mass: f64, tolerance_ppm: f64) -> (f64, f64) {
    let delta = observed_mass * tolerance_ppm / PPM;
    (observed_mass - delta, observed_mass + delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppm_error_close_match() {
        let ppm = ppm_error(760.5855, 760.5851);
        let expected = (760.5855 - 760.5851) / 760.5855 * 1e6;
        assert_eq!(ppm, expected);
        assert!((ppm - 0.526).abs() < 0.001);
    }

    #[test]
    fn test_ppm_error_sign() {
        assert!(ppm_error(500.001, 500.0) > 0.0);
        assert!(ppm_error(499.999, 500.0) < 0.0);
        assert_eq!(ppm_error(500.0, 500.0), 0.0);
    }

    #[test]
    fn test_within_tolerance_is_closed() {
        assert!(within_tolerance(5.0, 5.0));
        assert!(within_tolerance(-5.0, 5.0));
        assert!(within_tolerance(0.0, 0.0));
        assert!(!within_tolerance(5.000_001, 5.0));
        assert!(!within_tolerance(-5.000_001, 5.0));
        assert!(!within_tolerance(f64::NAN, 5.0));
    }

    #[test]
    fn test_reference_mass_window() {
        let (lo, hi) = reference_mass_window(1000.0, 5.0);
        assert!((lo - 999.995).abs() < 1e-9);
        assert!((hi - 1000.005).abs() < 1e-9);
    }
}
