/// Binary cross-entropy, per observation/output cell.
///
/// No epsilon is added inside the logarithms: a prediction of exactly 0 or 1
/// yields a non-finite loss term, which the error summation handles, and a
/// non-finite derivative, which aborts training.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// −(y·ln x + (1 − y)·ln(1 − x))
    pub fn loss(predicted: f64, expected: f64) -> f64 {
        -(expected * predicted.ln() + (1.0 - expected) * (1.0 - predicted).ln())
    }

    /// (1 − y)/(1 − x) − y/x
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        (1.0 - expected) / (1.0 - predicted) - expected / predicted
    }

    /// Derivative of cross-entropy composed with a logistic output, taken
    /// w.r.t. the output neuron's weighted input: x(1 − y) − y(1 − x).
    pub fn logistic_derivative(predicted: f64, expected: f64) -> f64 {
        predicted * (1.0 - expected) - expected * (1.0 - predicted)
    }
}
