//! Summary statistics over a window snapshot.
//!
//! Mean and *population* standard deviation (sum of squared deviations
//! divided by N, not N-1). Deviations are summed in a pass of their own, so
//! the result matches the batch definition without the cancellation error of
//! a running `sum_sq / n - mean^2` estimate.
//!
//! Windows holding values beyond [`LARGE_MAGNITUDE`] are rescaled by an exact
//! power of two before summing, so neither the sum nor the squared
//! deviations overflow for finite input.

/// Magnitude above which values are rescaled before summing.
pub const LARGE_MAGNITUDE: f64 = 1e100;

/// Mean and population standard deviation of a set of observations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowStats {
    /// Number of values.
    pub count: usize,
    /// Arithmetic mean (0 when empty).
    pub mean: f64,
    /// Population standard deviation (0 when empty).
    pub std_dev: f64,
}

impl WindowStats {
    /// Computes statistics over `values`.
    ///
    /// The iterator is cloned for the second pass, so pass something cheap
    /// to clone such as [`crate::window::Iter`] or a slice iterator.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let iter = values.into_iter();

        let mut count = 0usize;
        let mut max_abs = 0.0f64;
        let mut first = None;
        let mut identical = true;
        for v in iter.clone() {
            count += 1;
            max_abs = max_abs.max(v.abs());
            match first {
                None => first = Some(v),
                Some(f) => identical &= v == f,
            }
        }

        let Some(first) = first else {
            return Self::default();
        };
        // Rounding in `sum / n` must not invent spread for a constant window
        if identical {
            return Self {
                count,
                mean: first,
                std_dev: 0.0,
            };
        }

        let scale = if max_abs > LARGE_MAGNITUDE {
            2f64.powi(600)
        } else {
            1.0
        };
        let n = count as f64;
        let mean = iter.clone().map(|v| v / scale).sum::<f64>() / n;
        let sum_sq_dev: f64 = iter
            .map(|v| {
                let dev = v / scale - mean;
                dev * dev
            })
            .sum();

        Self {
            count,
            mean: mean * scale,
            std_dev: (sum_sq_dev / n).sqrt() * scale,
        }
    }

    /// Computes statistics over a slice.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Self {
        Self::from_values(values.iter().copied())
    }

    /// Population variance.
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    /// Returns true if every value was identical (zero spread).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.std_dev == 0.0
    }

    /// Signed number of standard deviations `value` lies from the mean.
    ///
    /// Returns `None` for a degenerate (or non-finite) spread, where no
    /// meaningful z-score exists.
    #[must_use]
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if self.is_degenerate() || !self.std_dev.is_finite() {
            return None;
        }
        let dev = value - self.mean;
        if dev.is_finite() {
            Some(dev / self.std_dev)
        } else {
            Some((value / 2.0 - self.mean / 2.0) / (self.std_dev / 2.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_population_std_dev() {
        // Classic example: population std dev is exactly 2
        let stats = WindowStats::from_slice(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_eq!(stats.count, 8);
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.std_dev, 2.0);
        assert_relative_eq!(stats.variance(), 4.0);
    }

    #[test]
    fn test_divides_by_n_not_n_minus_one() {
        let stats = WindowStats::from_slice(&[1.0, 3.0]);
        // Sample std would be sqrt(2); population is 1
        assert_relative_eq!(stats.std_dev, 1.0);
    }

    #[test]
    fn test_empty_values() {
        let stats = WindowStats::from_slice(&[]);
        assert_eq!(stats, WindowStats::default());
        assert_eq!(stats.z_score(1.0), None);
    }

    #[test]
    fn test_constant_values_are_degenerate() {
        let stats = WindowStats::from_slice(&[0.1; 30]);
        assert!(stats.is_degenerate());
        assert_eq!(stats.z_score(0.1), None);
    }

    #[test]
    fn test_z_score_sign() {
        let stats = WindowStats::from_slice(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_relative_eq!(stats.z_score(9.0).unwrap(), 2.0);
        assert_relative_eq!(stats.z_score(1.0).unwrap(), -2.0);
        assert_relative_eq!(stats.z_score(5.0).unwrap(), 0.0);
    }

    #[test]
    fn test_large_offset_is_stable() {
        // A running sum-of-squares estimate loses all precision here
        let values: Vec<f64> = (0..30).map(|i| 1e9 + f64::from(i % 2)).collect();
        let stats = WindowStats::from_slice(&values);

        assert_relative_eq!(stats.std_dev, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_huge_spike_does_not_overflow() {
        for spike in [1e160, 1e200, f64::MAX] {
            let mut values = vec![0.0; 29];
            values.push(spike);
            let stats = WindowStats::from_slice(&values);

            assert!(stats.std_dev.is_finite(), "spike {spike}");
            assert_relative_eq!(stats.mean, spike / 30.0, max_relative = 1e-12);
            let z = stats.z_score(spike).unwrap();
            assert_relative_eq!(z, 29f64.sqrt(), max_relative = 1e-9);
        }
    }

    #[test]
    fn test_opposite_extremes_do_not_overflow() {
        let values: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { -1e300 } else { 1e300 })
            .collect();
        let stats = WindowStats::from_slice(&values);

        assert_relative_eq!(stats.mean, 0.0);
        assert_relative_eq!(stats.std_dev, 1e300, max_relative = 1e-12);
        assert_relative_eq!(stats.z_score(1e300).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_z_score_of_distant_value_stays_finite() {
        let stats = WindowStats {
            count: 2,
            mean: -f64::MAX / 2.0,
            std_dev: f64::MAX / 2.0,
        };

        assert_relative_eq!(stats.z_score(f64::MAX).unwrap(), 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_nan_propagates() {
        let stats = WindowStats::from_slice(&[1.0, f64::NAN, 3.0]);
        assert!(stats.mean.is_nan());
        assert_eq!(stats.z_score(1.0), None);
    }
}
