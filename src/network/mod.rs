pub mod exclusion;
pub mod forward;
pub mod generalized;
pub mod gradient;
pub mod init;
pub mod network;
pub mod topology;

pub use exclusion::{ExclusionMask, ExclusionSpec};
pub use forward::{forward, predict, ForwardPass, Prediction};
pub use generalized::generalized_weights;
pub use gradient::{calculate_gradients, reached_threshold};
pub use init::WeightInitializer;
pub use network::{Network, WeightPos};
pub use topology::Topology;
