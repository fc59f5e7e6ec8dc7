//! Gaussian kernel density estimate over null-model qualities.

use crate::error::CorePeripheryError;
use special::Error;
use std::f64::consts::{PI, SQRT_2};

/// One-dimensional Gaussian KDE with Scott's rule bandwidth.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit to `samples`.
    ///
    /// Bandwidth `h = σ̂ n^{-1/5}` with the unbiased standard deviation.
    /// Fails with `Validation` on fewer than two samples, non-finite values
    /// or zero spread.
    pub fn fit(samples: &[f64]) -> anyhow::Result<Self> {
        let n = samples.len();
        if n < 2 {
            return Err(CorePeripheryError::Validation(format!(
                "need at least 2 samples for a density estimate, got {}",
                n
            ))
            .into());
        }
        if let Some(bad) = samples.iter().find(|q| !q.is_finite()) {
            return Err(
                CorePeripheryError::Validation(format!("non-finite sample {}", bad)).into(),
            );
        }

        let nf = n as f64;
        let mean = samples.iter().sum::<f64>() / nf;
        let var = samples.iter().map(|q| (q - mean).powi(2)).sum::<f64>() / (nf - 1.0);
        let sd = var.sqrt();

        if sd <= 0.0 || samples.iter().all(|&q| q == samples[0]) {
            return Err(CorePeripheryError::Validation(format!(
                "all {} samples are identical ({}); bandwidth would be zero",
                n, mean
            ))
            .into());
        }

        let bandwidth = sd * nf.powf(-0.2);
        log::debug!(
            "kde: n = {}, mean = {:.6}, sd = {:.6}, bandwidth = {:.6}",
            n,
            mean,
            sd,
            bandwidth
        );

        Ok(GaussianKde {
            samples: samples.to_vec(),
            bandwidth,
        })
    }

    /// Kernel bandwidth `h`
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a fitted estimate
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `P(Q ≤ x)` under the estimate
    pub fn cdf(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let sum: f64 = self
            .samples
            .iter()
            .map(|q| std_normal_cdf((x - q) / h))
            .sum();
        (sum / self.samples.len() as f64).clamp(0.0, 1.0)
    }

    /// Density at `x`
    pub fn pdf(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / ((2.0 * PI).sqrt() * h * self.samples.len() as f64);
        norm * self
            .samples
            .iter()
            .map(|q| (-0.5 * ((x - q) / h).powi(2)).exp())
            .sum::<f64>()
    }
}

/// Φ(z) = erfc(-z / √2) / 2
fn std_normal_cdf(z: f64) -> f64 {
    0.5 * (-z / SQRT_2).compl_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_std_normal_cdf() {
        assert_abs_diff_eq!(std_normal_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(std_normal_cdf(1.959964), 0.975, epsilon = 1e-6);
        assert_abs_diff_eq!(std_normal_cdf(-1.959964), 0.025, epsilon = 1e-6);
    }

    #[test]
    fn test_scott_bandwidth() -> anyhow::Result<()> {
        // mean 2.5, sample variance 5/3
        let kde = GaussianKde::fit(&[1.0, 2.0, 3.0, 4.0])?;
        let expected = (5.0f64 / 3.0).sqrt() * 4f64.powf(-0.2);
        assert_abs_diff_eq!(kde.bandwidth(), expected, epsilon = 1e-12);
        assert_eq!(kde.len(), 4);
        Ok(())
    }

    #[test]
    fn test_cdf_monotone_with_tails() -> anyhow::Result<()> {
        let samples: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        let kde = GaussianKde::fit(&samples)?;

        let mut prev = 0.0;
        for k in -40..=40 {
            let c = kde.cdf(k as f64 * 0.1);
            assert!(c >= prev - 1e-15);
            prev = c;
        }
        assert!(kde.cdf(-100.0) < 1e-12);
        assert!(kde.cdf(100.0) > 1.0 - 1e-12);
        Ok(())
    }

    #[test]
    fn test_cdf_symmetric_samples() -> anyhow::Result<()> {
        let kde = GaussianKde::fit(&[-2.0, -1.0, 1.0, 2.0])?;
        assert_abs_diff_eq!(kde.cdf(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(kde.pdf(0.5), kde.pdf(-0.5), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_pdf_integrates_to_one() -> anyhow::Result<()> {
        let kde = GaussianKde::fit(&[0.1, 0.4, 0.35, 0.8, 0.55])?;
        let step = 1e-3;
        let area: f64 = (-5000..5000)
            .map(|k| kde.pdf(0.5 + k as f64 * step) * step)
            .sum();
        assert_abs_diff_eq!(area, 1.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_degenerate_samples_rejected() {
        for bad in [vec![], vec![1.0], vec![0.3; 10], vec![1.0, f64::NAN]] {
            let err = GaussianKde::fit(&bad).unwrap_err();
            assert!(matches!(
                error_kind(&err),
                Some(CorePeripheryError::Validation(_))
            ));
        }
    }
}
