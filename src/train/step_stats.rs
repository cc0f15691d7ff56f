use serde::{Deserialize, Serialize};

/// Progress snapshot emitted by a running repetition.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, each
/// repetition sends one `StepStats` every `lifesign_step` steps and a final
/// one when it stops. Repetitions run in parallel, so snapshots of different
/// repetitions interleave on the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepStats {
    /// 0-based repetition index.
    pub repetition: usize,
    /// 1-based step counter.
    pub step: usize,
    pub stepmax: usize,
    /// Largest absolute partial derivative at this step.
    pub reached_threshold: f64,
    pub min_reached_threshold: f64,
    /// Set on the last snapshot of the repetition.
    pub finished: bool,
    /// Wall-clock time since the repetition started, in milliseconds.
    pub elapsed_ms: u64,
}
