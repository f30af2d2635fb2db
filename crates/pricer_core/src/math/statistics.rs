//! Sample statistics for Monte Carlo estimators.
//!
//! [`SampleStatistics`] summarises a sample set (one payoff per trial) into
//! the estimator and its standard error. Summation runs in slice order, so a
//! sample set collected in trial order always yields the same bits no matter
//! how the trials themselves were scheduled.

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Two-sided 99% normal quantile.
pub const Z_99: f64 = 2.576;

/// Summary of a Monte Carlo sample set.
///
/// # Examples
///
/// ```
/// use pricer_core::math::statistics::SampleStatistics;
///
/// let stats = SampleStatistics::from_samples(&[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(stats.count, 4);
/// assert_eq!(stats.mean, 2.5);
/// assert!(stats.std_error > 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleStatistics {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Unbiased sample variance (zero for fewer than two samples).
    pub variance: f64,
    /// Standard error of the mean, `sqrt(variance / count)`.
    pub std_error: f64,
}

impl SampleStatistics {
    /// Computes the statistics of `samples` with a two-pass algorithm.
    ///
    /// An empty slice yields all-zero statistics.
    pub fn from_samples(samples: &[f64]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        let mean = samples.iter().sum::<f64>() / n;

        let variance = if count > 1 {
            samples.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };

        Self {
            count,
            mean,
            variance,
            std_error: (variance / n).sqrt(),
        }
    }

    /// Returns the sample standard deviation.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Returns a copy with mean and dispersion multiplied by `factor`.
    ///
    /// Used to apply a discount factor after aggregation.
    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            count: self.count,
            mean: self.mean * factor,
            variance: self.variance * factor * factor,
            std_error: self.std_error * factor.abs(),
        }
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        Z_95 * self.std_error
    }

    /// Returns the 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> f64 {
        Z_99 * self.std_error
    }
}
