use super::error::DataError;

/// Least-squares straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least-squares degree-1 fit of `y` on `x`.
    ///
    /// Uses centred sums; `x` and `y` must have the same length.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, DataError> {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len().min(y.len());
        if n < 2 {
            return Err(DataError::TooFewSamples(n));
        }

        let nf = n as f64;
        let mean_x = x[..n].iter().sum::<f64>() / nf;
        let mean_y = y[..n].iter().sum::<f64>() / nf;

        let (sxy, sxx) = x[..n]
            .iter()
            .zip(&y[..n])
            .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
                let dx = xi - mean_x;
                (sxy + dx * (yi - mean_y), sxx + dx * dx)
            });

        if sxx == 0.0 {
            return Err(DataError::ZeroVariance);
        }

        let slope = sxy / sxx;
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Annotation text, four decimals on both terms.
    pub fn equation(&self) -> String {
        format!("y = {:.4}x + {:.4}", self.slope, self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_line() {
        let x: Vec<f64> = (0..50).map(|i| 0.1 + 0.007 * i as f64).collect();
        let y: Vec<f64> = x.iter().map(|m| 2.0 * m + 5.0).collect();
        let fit = LinearFit::fit(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9, "slope {}", fit.slope);
        assert!((fit.intercept - 5.0).abs() < 1e-9, "intercept {}", fit.intercept);
    }

    #[test]
    fn noisy_symmetric_residuals_cancel() {
        let x = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0];
        let y = [2.5, 1.5, 3.5, 2.5, 4.5, 3.5];
        let fit = LinearFit::fit(&x, &y).unwrap();
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.eval(10.0) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(LinearFit::fit(&[0.3], &[20.0]), Err(DataError::TooFewSamples(1)));
        assert_eq!(
            LinearFit::fit(&[0.3, 0.3, 0.3], &[20.0, 21.0, 22.0]),
            Err(DataError::ZeroVariance)
        );
    }

    #[test]
    fn equation_text() {
        let fit = LinearFit {
            slope: -31.41592,
            intercept: 35.0,
        };
        assert_eq!(fit.equation(), "y = -31.4159x + 35.0000");
        let fit = LinearFit {
            slope: 2.0,
            intercept: -0.5,
        };
        assert_eq!(fit.equation(), "y = 2.0000x + -0.5000");
    }
}
