pub mod dataset;
pub mod repetition;
pub mod result;
pub mod setup;
pub mod step_stats;
pub mod train_config;
pub mod trainer;

pub use dataset::Dataset;
pub use repetition::{run_repetition, total_error};
pub use result::{RepetitionOutcome, RepetitionResult, ResultTable, TrainedNetwork};
pub use setup::TrainingSetup;
pub use step_stats::StepStats;
pub use train_config::TrainConfig;
pub use trainer::train_network;
