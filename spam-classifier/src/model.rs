//! Binary logistic regression
//!
//! Fitting is delegated to `linfa-logistic` (L-BFGS) on the objective
//! `0.5 * ||w||^2 + C * sum(log_loss)` with an unpenalized intercept. The
//! fitted weights are kept in a plain serde struct so the artifact does not
//! depend on linfa's types.

use linfa::prelude::*;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SpamError};
use crate::features::SparseVector;

/// Solver hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    /// Gradient norm at which L-BFGS stops; also the bound on the
    /// per-sample gradient norm used to flag non-convergence
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
        }
    }
}

/// A fitted logistic regression classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    params: LogisticParams,
    weights: Vec<f64>,
    bias: f64,
    /// L2 norm of the objective gradient at the returned solution
    gradient_norm: f64,
    /// Number of training samples the model was fitted on
    n_samples: usize,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    /// Fit on feature rows and 0/1 labels
    pub fn fit(params: LogisticParams, features: &[SparseVector], labels: &[u8]) -> Result<Self> {
        if features.is_empty() {
            return Err(SpamError::InvalidParameter("no training samples".to_string()));
        }
        if features.len() != labels.len() {
            return Err(SpamError::InvalidParameter(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if let Some(bad) = labels.iter().find(|&&y| y > 1) {
            return Err(SpamError::InvalidParameter(format!("label {} is not 0 or 1", bad)));
        }
        if labels.iter().all(|&y| y == labels[0]) {
            return Err(SpamError::SingleClass(labels[0]));
        }
        if params.c <= 0.0 || params.tol < 0.0 || params.max_iter == 0 {
            return Err(SpamError::InvalidParameter(
                "c and max_iter must be positive, tol non-negative".to_string(),
            ));
        }

        let dim = features[0].dim();
        if let Some(row) = features.iter().find(|x| x.dim() != dim) {
            return Err(SpamError::InvalidParameter(format!(
                "feature dimension mismatch: {} vs {}",
                row.dim(),
                dim
            )));
        }

        let x = dense_matrix(features, dim);
        let dataset = Dataset::new(x, Array1::from(labels.to_vec()));

        let fitted = linfa_logistic::LogisticRegression::default()
            .alpha(1.0 / params.c)
            .with_intercept(true)
            .max_iterations(params.max_iter as u64)
            .gradient_tolerance(params.tol)
            .fit(&dataset)
            .map_err(|e| SpamError::Solver(e.to_string()))?;

        let mut weights = fitted.params().to_vec();
        let mut bias = fitted.intercept();

        // linfa picks its own positive class; flip so that a positive
        // decision value always means label 1
        let decisions = dataset.records().dot(fitted.params()) + bias;
        let predicted = fitted.predict(dataset.records());
        if let Some((z, &label)) = decisions
            .iter()
            .zip(predicted.iter())
            .find(|(z, _)| z.abs() > f64::EPSILON)
        {
            if (*z > 0.0) != (label == 1) {
                weights.iter_mut().for_each(|w| *w = -*w);
                bias = -bias;
            }
        }

        let mut model = Self {
            params,
            weights,
            bias,
            gradient_norm: 0.0,
            n_samples: features.len(),
        };
        model.gradient_norm = model.objective_gradient_norm(features, labels);

        if model.converged() {
            debug!(
                "Logistic regression converged (gradient norm {:.3e} over {} samples)",
                model.gradient_norm, model.n_samples
            );
        } else {
            warn!(
                "Logistic regression did not converge within {} iterations (gradient norm {:.3e} over {} samples); consider raising training.max_iter",
                model.params.max_iter, model.gradient_norm, model.n_samples
            );
        }

        Ok(model)
    }

    /// Gradient of `0.5 * ||w||^2 + C * sum(log_loss)` at the current weights
    fn objective_gradient_norm(&self, features: &[SparseVector], labels: &[u8]) -> f64 {
        let mut grad_w = self.weights.clone();
        let mut grad_b = 0.0;
        for (x, &y) in features.iter().zip(labels) {
            let residual = self.params.c * (self.predict_proba(x) - y as f64);
            for (i, v) in x.iter() {
                grad_w[i] += residual * v;
            }
            grad_b += residual;
        }
        (grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b).sqrt()
    }

    /// Whether the per-sample gradient norm is within `tol`
    pub fn converged(&self) -> bool {
        self.gradient_norm / self.n_samples.max(1) as f64 <= self.params.tol
    }

    pub fn gradient_norm(&self) -> f64 {
        self.gradient_norm
    }

    /// Number of feature columns the model expects
    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    /// Signed distance to the decision boundary
    pub fn decision_function(&self, x: &SparseVector) -> f64 {
        x.iter()
            .filter(|&(i, _)| i < self.weights.len())
            .map(|(i, v)| v * self.weights[i])
            .sum::<f64>()
            + self.bias
    }

    /// Probability of label 1
    pub fn predict_proba(&self, x: &SparseVector) -> f64 {
        sigmoid(self.decision_function(x))
    }

    pub fn predict(&self, x: &SparseVector) -> u8 {
        u8::from(self.decision_function(x) > 0.0)
    }

    pub fn predict_batch(&self, features: &[SparseVector]) -> Vec<u8> {
        features.iter().map(|x| self.predict(x)).collect()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }

    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        if !self.bias.is_finite()
            || !self.gradient_norm.is_finite()
            || self.weights.iter().any(|w| !w.is_finite())
        {
            return Err("non-finite model parameter".to_string());
        }
        Ok(())
    }
}

/// Fraction of matching labels; 0.0 for empty input
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(a, b)| a == b)
        .count();
    correct as f64 / y_true.len() as f64
}

/// Densify sparse rows for the solver
fn dense_matrix(features: &[SparseVector], dim: usize) -> Array2<f64> {
    let mut x = Array2::zeros((features.len(), dim));
    for (mut row, features) in x.rows_mut().into_iter().zip(features) {
        for (i, v) in features.iter() {
            row[i] = v;
        }
    }
    x
}
