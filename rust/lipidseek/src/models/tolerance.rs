use serde::{
    Deserialize,
    Serialize,
};

use crate::utils::TupleRange;

/// Symmetric m/z tolerance.
///
/// Convention: the value is the half width, so an absolute tolerance of 0.5
/// on a mass of 10 means the closed window [9.5, 10.5].
///
/// ```
/// use lipidseek::models::MzTolerance;
///
/// let tol = MzTolerance::Ppm(20.0);
/// let range = tol.mz_range(500.0);
/// assert!((range.start() - 499.99).abs() < 1e-9);
/// assert!((range.end() - 500.01).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum MzTolerance {
    #[serde(rename = "da")]
    Absolute(f64),
    #[serde(rename = "ppm")]
    Ppm(f64),
}

impl Default for MzTolerance {
    fn default() -> Self {
        MzTolerance::Absolute(0.02)
    }
}

impl MzTolerance {
    /// Builds a tolerance from the numeric unit flag used in parameter files
    /// (0 = dalton, anything else = ppm).
    pub fn from_unit_flag(value: f64, unit: f64) -> Self {
        if unit == 0.0 {
            MzTolerance::Absolute(value.abs())
        } else {
            MzTolerance::Ppm(value.abs())
        }
    }

    /// Half width of the window around `mz`, in daltons.
    pub fn half_width(&self, mz: f64) -> f64 {
        match self {
            MzTolerance::Absolute(tol) => tol.abs(),
            MzTolerance::Ppm(tol) => (mz * tol / 1e6).abs(),
        }
    }

    pub fn mz_range(&self, mz: f64) -> TupleRange<f64> {
        let half = self.half_width(mz);
        // Half width is non-negative, the fallback only guards non-finite input.
        TupleRange::try_new(mz - half, mz + half).unwrap_or(TupleRange::point(mz))
    }

    /// Whether a theoretical mass is within tolerance of a peak.
    /// Ppm tolerances are evaluated relative to the peak's own m/z.
    pub fn matches(&self, peak_mz: f64, theoretical_mz: f64) -> bool {
        (peak_mz - theoretical_mz).abs() <= self.half_width(peak_mz)
    }

    /// Number of effective m/z bins covering `range` when each bin spans the
    /// full tolerance window (twice the half width).
    ///
    /// ```
    /// use lipidseek::models::MzTolerance;
    /// use lipidseek::utils::TupleRange;
    ///
    /// let range = TupleRange::try_new(100.0, 1000.0).unwrap();
    /// assert_eq!(MzTolerance::Absolute(0.5).effective_bins(range), 900);
    /// ```
    pub fn effective_bins(&self, range: TupleRange<f64>) -> u64 {
        let bins = match self {
            MzTolerance::Absolute(tol) => {
                if *tol <= 0.0 {
                    return u64::MAX;
                }
                range.width() / (2.0 * tol)
            }
            MzTolerance::Ppm(tol) => {
                if *tol <= 0.0 || range.start() <= 0.0 {
                    return u64::MAX;
                }
                (range.end() / range.start()).ln() / (2.0 * tol * 1e-6).ln_1p()
            }
        };
        if bins.is_finite() && bins > 0.0 {
            bins.ceil() as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_flag() {
        assert_eq!(
            MzTolerance::from_unit_flag(0.5, 0.0),
            MzTolerance::Absolute(0.5)
        );
        assert_eq!(MzTolerance::from_unit_flag(10.0, 1.0), MzTolerance::Ppm(10.0));
    }

    #[test]
    fn test_ppm_relative_to_peak() {
        let tol = MzTolerance::Ppm(10.0);
        assert!(tol.matches(1000.0, 1000.009));
        assert!(!tol.matches(1000.0, 1000.011));
    }

    #[test]
    fn test_ppm_bins() {
        let tol = MzTolerance::Ppm(10.0);
        let range = TupleRange::try_new(100.0, 1000.0).unwrap();
        let bins = tol.effective_bins(range);
        // ln(10) / ln(1 + 2e-5) ~ 115130
        assert!((115_000..116_000).contains(&bins));
    }
}
