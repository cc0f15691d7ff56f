pub mod activation;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::{ActivationFunction, NetFunctions};
pub use error::{Error, Result};
pub use loss::ErrorFunction;
pub use math::matrix::Matrix;
pub use network::{ExclusionSpec, Network, Topology, WeightPos};
pub use optim::{Algorithm, LearningRateFactor, LearningRateLimit};
pub use train::{train_network, Dataset, StepStats, TrainConfig, TrainedNetwork};
