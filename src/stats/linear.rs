use crate::error::PushError;

/// Arithmetic mean.
pub fn linear_mean(values: &[f64]) -> Result<f64, PushError> {
    if values.is_empty() {
        return Err(PushError::EmptyInput("values"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_is_arithmetic() {
        assert_eq!(linear_mean(&[1.0, 2.0, 3.0, 6.0]).unwrap(), 3.0);
        assert_eq!(linear_mean(&[-4.5]).unwrap(), -4.5);
    }

    #[test]
    fn mean_of_nothing_fails() {
        assert_eq!(linear_mean(&[]), Err(PushError::EmptyInput("values")));
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(9.5, 0), 10.0);
        assert!(round_to(f64::INFINITY, 1).is_infinite());
    }
}
