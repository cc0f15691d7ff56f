pub mod cross_entropy;
pub mod loss_type;
pub mod sse;

pub use cross_entropy::CrossEntropyLoss;
pub use loss_type::{CustomError, ErrorFunction};
pub use sse::SseLoss;
