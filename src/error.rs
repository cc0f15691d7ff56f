use std::fmt;

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a training run.
///
/// Configuration and data problems are raised before the first step. The three
/// non-finite variants are raised mid-computation and abort the whole run,
/// since every later step would build on corrupted values.
#[derive(Debug)]
pub enum Error {
    /// A configuration value is missing, out of range or names an unknown selector.
    InvalidConfig(String),
    /// The covariate/response matrices do not fit together.
    InvalidData(String),
    /// The exclusion specification or its constant weights are malformed.
    InvalidExclusion(String),
    /// A cached neuron derivative is NaN or infinite.
    NonFiniteNeuronDerivative { layer: usize },
    /// The error derivative evaluated at the network output is NaN or infinite.
    NonFiniteErrorDerivative,
    /// A partial derivative of the error over the weights is NaN or infinite.
    NonFiniteGradient,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::InvalidExclusion(msg) => write!(f, "invalid exclusion: {msg}"),
            Error::NonFiniteNeuronDerivative { layer } => write!(
                f,
                "neuron derivatives of layer {layer} contain a non-finite value; \
                 verify that the derivative function does not divide by 0"
            ),
            Error::NonFiniteErrorDerivative => write!(
                f,
                "the error derivative contains a non-finite value; \
                 verify that the derivative function does not divide by 0 (e.g. cross entropy)"
            ),
            Error::NonFiniteGradient => write!(
                f,
                "the gradient contains a non-finite value; \
                 check the scale of the covariates and the response"
            ),
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Json(value)
    }
}
