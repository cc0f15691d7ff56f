/// Sum-of-squared-errors, per observation/output cell.
pub struct SseLoss;

impl SseLoss {
    /// ½·(y − x)²
    pub fn loss(predicted: f64, expected: f64) -> f64 {
        0.5 * (expected - predicted).powi(2)
    }

    /// x − y
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }
}
