use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Training data: covariates (intercept column prepended) and responses,
/// one observation per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    covariate: Matrix,
    response: Matrix,
    covariate_names: Vec<String>,
    response_names: Vec<String>,
}

impl Dataset {
    /// Builds a dataset from raw covariates (`n x p`) and responses (`n x q`).
    pub fn new(covariates: Matrix, response: Matrix) -> Result<Dataset> {
        if covariates.rows == 0 {
            return Err(Error::InvalidData("the dataset has no observations".to_owned()));
        }
        if covariates.rows != response.rows {
            return Err(Error::InvalidData(format!(
                "{} covariate rows but {} response rows",
                covariates.rows, response.rows
            )));
        }
        if covariates.cols == 0 || response.cols == 0 {
            return Err(Error::InvalidData(
                "at least one covariate and one response column are required".to_owned(),
            ));
        }
        if !covariates.is_finite() || !response.is_finite() {
            return Err(Error::InvalidData("the dataset contains non-finite values".to_owned()));
        }

        let covariate_names = default_names("x", covariates.cols);
        let response_names = default_names("y", response.cols);
        Ok(Dataset {
            covariate: covariates.with_bias_column(),
            response,
            covariate_names,
            response_names,
        })
    }

    /// Builds a dataset from row vectors.
    pub fn from_rows(covariates: Vec<Vec<f64>>, response: Vec<Vec<f64>>) -> Result<Dataset> {
        let covariates = Matrix::from_rows(covariates)
            .ok_or_else(|| Error::InvalidData("covariate rows differ in length".to_owned()))?;
        let response = Matrix::from_rows(response)
            .ok_or_else(|| Error::InvalidData("response rows differ in length".to_owned()))?;
        Dataset::new(covariates, response)
    }

    /// Replaces the default `x1…`/`y1…` names used for weight labels.
    pub fn with_names(mut self, covariate_names: Vec<String>, response_names: Vec<String>) -> Result<Dataset> {
        if covariate_names.len() != self.input_count() || response_names.len() != self.output_count() {
            return Err(Error::InvalidData(format!(
                "expected {} covariate and {} response names",
                self.input_count(),
                self.output_count()
            )));
        }
        self.covariate_names = covariate_names;
        self.response_names = response_names;
        Ok(self)
    }

    /// Covariates with the intercept column.
    pub fn covariate(&self) -> &Matrix {
        &self.covariate
    }

    pub fn response(&self) -> &Matrix {
        &self.response
    }

    pub fn observations(&self) -> usize {
        self.response.rows
    }

    pub fn input_count(&self) -> usize {
        self.covariate.cols - 1
    }

    pub fn output_count(&self) -> usize {
        self.response.cols
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.covariate_names
    }

    pub fn response_names(&self) -> &[String] {
        &self.response_names
    }

    /// Whether every response is exactly 0 or 1.
    pub fn is_binary_response(&self) -> bool {
        self.response.iter().all(|&y| y == 0.0 || y == 1.0)
    }
}

fn default_names(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intercept_column_is_prepended() {
        let d = Dataset::from_rows(vec![vec![2.0, 3.0]], vec![vec![1.0]]).unwrap();
        assert_eq!(d.covariate().data, vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(d.input_count(), 2);
        assert_eq!(d.covariate_names(), &["x1", "x2"]);
        assert_eq!(d.response_names(), &["y1"]);
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let err = Dataset::from_rows(vec![vec![1.0], vec![2.0]], vec![vec![1.0]]);
        assert!(matches!(err, Err(Error::InvalidData(_))));
        let ragged = Dataset::from_rows(vec![vec![1.0], vec![2.0, 3.0]], vec![vec![1.0], vec![0.0]]);
        assert!(matches!(ragged, Err(Error::InvalidData(_))));
    }

    #[test]
    fn binary_response_detection() {
        let d = Dataset::from_rows(vec![vec![0.0], vec![1.0]], vec![vec![0.0], vec![1.0]]).unwrap();
        assert!(d.is_binary_response());
        let d = Dataset::from_rows(vec![vec![0.0], vec![1.0]], vec![vec![0.5], vec![1.0]]).unwrap();
        assert!(!d.is_binary_response());
    }

    #[test]
    fn names_must_match_the_columns() {
        let d = Dataset::from_rows(vec![vec![0.0]], vec![vec![1.0]]).unwrap();
        assert!(d.clone().with_names(vec!["a".into(), "b".into()], vec!["y".into()]).is_err());
        let named = d.with_names(vec!["dose".into()], vec!["alive".into()]).unwrap();
        assert_eq!(named.covariate_names(), &["dose"]);
    }
}
