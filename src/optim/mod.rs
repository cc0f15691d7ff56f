pub mod algorithm;
pub mod backprop;
pub mod rprop;

pub use algorithm::{Algorithm, LearningRateFactor, LearningRateLimit, UpdateRule};
pub use backprop::Backprop;
pub use rprop::{RpropMinus, RpropPlus, RpropVariant};
