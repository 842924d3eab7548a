//! The exported math object
//!
//! `Calculator` is stateless apart from a call counter. It implements the SDK's
//! `RemoteMath` contract, so the gRPC layer never sees the concrete type.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use remote_math_sdk::{MathError, RemoteMath};
use tracing::debug;

#[derive(Debug, Default)]
pub struct Calculator {
    computations: AtomicU64,
}

impl Calculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, value: f64) -> f64 {
        self.computations.fetch_add(1, Ordering::Relaxed);
        value
    }
}

#[async_trait]
impl RemoteMath for Calculator {
    async fn add(&self, a: f64, b: f64) -> Result<f64, MathError> {
        debug!(a, b, "performing addition");
        Ok(self.record(a + b))
    }

    async fn subtract(&self, a: f64, b: f64) -> Result<f64, MathError> {
        debug!(a, b, "performing subtraction");
        Ok(self.record(a - b))
    }

    async fn multiply(&self, a: f64, b: f64) -> Result<f64, MathError> {
        debug!(a, b, "performing multiplication");
        Ok(self.record(a * b))
    }

    async fn divide(&self, a: f64, b: f64) -> Result<f64, MathError> {
        if b == 0.0 {
            debug!(a, "rejected division by zero");
            return Err(MathError::division_by_zero());
        }
        debug!(a, b, "performing division");
        Ok(self.record(a / b))
    }

    async fn computations(&self) -> Result<u64, MathError> {
        Ok(self.computations.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < f64::EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[tokio::test]
    async fn test_arithmetic() {
        let calc = Calculator::new();
        assert_close(calc.add(10.0, 20.0).await.unwrap(), 30.0);
        assert_close(calc.subtract(-5.0, 3.0).await.unwrap(), -8.0);
        assert_close(calc.multiply(1.5, 4.0).await.unwrap(), 6.0);
        assert_close(calc.divide(9.0, 2.0).await.unwrap(), 4.5);
    }

    #[tokio::test]
    async fn test_division_by_zero_rejected_and_not_counted() {
        let calc = Calculator::new();
        let err = calc.divide(1.0, 0.0).await.unwrap_err();
        assert_eq!(err, MathError::division_by_zero());
        assert_eq!(calc.computations().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_computations_counts_successful_calls() {
        let calc = Calculator::new();
        calc.add(1.0, 1.0).await.unwrap();
        calc.subtract(1.0, 1.0).await.unwrap();
        calc.multiply(2.0, 2.0).await.unwrap();
        assert_eq!(calc.computations().await.unwrap(), 3);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_operations_are_logged() {
        let calc = Calculator::new();
        calc.add(2.0, 3.0).await.unwrap();
        assert!(logs_contain("performing addition"));
    }
}
