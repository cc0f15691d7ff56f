pub mod activation;
pub mod functions;

pub use activation::{ActivationFunction, CustomActivation};
pub use functions::NetFunctions;
