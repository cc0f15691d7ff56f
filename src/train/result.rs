use serde::Serialize;

use crate::activation::NetFunctions;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::{predict, ExclusionMask, Network, Prediction, Topology};
use crate::train::setup::TrainingSetup;

/// A repetition that reached the threshold.
#[derive(Debug, Clone, Serialize)]
pub struct RepetitionResult {
    /// 0-based repetition index.
    pub repetition: usize,
    pub start_weights: Network,
    pub weights: Network,
    /// Network output on the training covariates.
    pub net_result: Matrix,
    pub steps: usize,
    pub reached_threshold: f64,
    pub min_reached_threshold: f64,
    pub error: f64,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    /// `n_obs x (inputs * outputs)`; only for logistic outputs.
    pub generalized_weights: Option<Matrix>,
}

/// How a repetition ended.
#[derive(Debug, Clone)]
pub enum RepetitionOutcome {
    Converged(RepetitionResult),
    /// Hit `stepmax` before the threshold; no weights are kept.
    Exhausted {
        repetition: usize,
        steps: usize,
        reached_threshold: f64,
        min_reached_threshold: f64,
    },
}

impl RepetitionOutcome {
    pub fn repetition(&self) -> usize {
        match self {
            RepetitionOutcome::Converged(r) => r.repetition,
            RepetitionOutcome::Exhausted { repetition, .. } => *repetition,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, RepetitionOutcome::Converged(_))
    }
}

/// Summary matrix with one column per converged repetition.
///
/// Rows are `error`, `reached.threshold`, `steps`, optionally `aic` and
/// `bic`, then every weight under its `source.to.target` name.
#[derive(Debug, Clone, Serialize)]
pub struct ResultTable {
    pub row_names: Vec<String>,
    /// `columns[c][r]` is row `r` of converged repetition `c`.
    pub columns: Vec<Vec<f64>>,
}

impl ResultTable {
    fn build(results: &[RepetitionResult], weight_names: &[String], likelihood: bool) -> ResultTable {
        let mut row_names: Vec<String> = ["error", "reached.threshold", "steps"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if likelihood {
            row_names.push("aic".to_owned());
            row_names.push("bic".to_owned());
        }
        row_names.extend(weight_names.iter().cloned());

        let columns = results
            .iter()
            .map(|r| {
                let mut col = vec![r.error, r.reached_threshold, r.steps as f64];
                if likelihood {
                    col.push(r.aic.unwrap_or(f64::NAN));
                    col.push(r.bic.unwrap_or(f64::NAN));
                }
                col.extend(r.weights.flatten());
                col
            })
            .collect();

        ResultTable { row_names, columns }
    }

    pub fn value(&self, row: &str, column: usize) -> Option<f64> {
        let r = self.row_names.iter().position(|name| name == row)?;
        self.columns.get(column).map(|col| col[r])
    }

    /// One row across all repetitions.
    pub fn row(&self, row: &str) -> Option<Vec<f64>> {
        let r = self.row_names.iter().position(|name| name == row)?;
        Some(self.columns.iter().map(|col| col[r]).collect())
    }
}

/// Outcome of a full training run.
#[derive(Debug, Clone)]
pub struct TrainedNetwork {
    pub topology: Topology,
    pub functions: NetFunctions,
    pub exclusion: ExclusionMask,
    pub covariate_names: Vec<String>,
    pub response_names: Vec<String>,
    /// Converged repetitions in repetition order.
    pub results: Vec<RepetitionResult>,
    pub requested: usize,
    pub non_converged: usize,
    /// `None` when no repetition converged.
    pub result_table: Option<ResultTable>,
}

impl TrainedNetwork {
    /// Collects repetition outcomes, keeping converged ones only.
    pub fn from_outcomes(setup: &TrainingSetup<'_>, mut outcomes: Vec<RepetitionOutcome>) -> TrainedNetwork {
        outcomes.sort_by_key(RepetitionOutcome::repetition);
        let requested = outcomes.len();

        let results: Vec<RepetitionResult> = outcomes
            .into_iter()
            .filter_map(|o| match o {
                RepetitionOutcome::Converged(r) => Some(r),
                RepetitionOutcome::Exhausted { .. } => None,
            })
            .collect();
        let non_converged = requested - results.len();

        let covariate_names = setup.dataset.covariate_names().to_vec();
        let response_names = setup.dataset.response_names().to_vec();
        let result_table = (!results.is_empty()).then(|| {
            let names = setup.topology.weight_names(&covariate_names, &response_names);
            ResultTable::build(&results, &names, setup.config.likelihood)
        });

        TrainedNetwork {
            topology: setup.topology.clone(),
            functions: setup.functions.clone(),
            exclusion: setup.mask.clone(),
            covariate_names,
            response_names,
            results,
            requested,
            non_converged,
            result_table,
        }
    }

    pub fn converged(&self) -> usize {
        self.results.len()
    }

    pub fn warning(&self) -> Option<String> {
        (self.non_converged > 0).then(|| {
            format!(
                "Algorithm did not converge in {} of {} repetition(s) within the stepmax.",
                self.non_converged, self.requested
            )
        })
    }

    /// Converged repetition with the smallest error, first one on ties.
    pub fn best(&self) -> Option<&RepetitionResult> {
        self.ranked().into_iter().next()
    }

    /// Converged repetitions by ascending error.
    pub fn ranked(&self) -> Vec<&RepetitionResult> {
        let mut ranked: Vec<&RepetitionResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| a.error.total_cmp(&b.error));
        ranked
    }

    /// Runs new covariates (without intercept column) through the weights of
    /// converged repetition `repetition`.
    pub fn compute(&self, covariates: &Matrix, repetition: usize) -> Result<Prediction> {
        if covariates.cols != self.topology.input_count() {
            return Err(Error::InvalidData(format!(
                "expected {} covariate columns, got {}",
                self.topology.input_count(),
                covariates.cols
            )));
        }
        let result = self
            .results
            .iter()
            .find(|r| r.repetition == repetition)
            .ok_or_else(|| {
                Error::InvalidData(format!("repetition {repetition} did not converge or does not exist"))
            })?;
        Ok(predict(&result.weights, &covariates.with_bias_column(), &self.functions))
    }
}
