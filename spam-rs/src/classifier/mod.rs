//! Binary logistic regression
//!
//! Maximum-likelihood fit with L2 regularization on the weights (the
//! intercept is not penalized), minimized with argmin's L-BFGS and a
//! More-Thuente line search. The model only produces P(spam | x); the
//! decision threshold is applied by the caller.

use argmin::core::{CostFunction, Error as ArgminError, Executor, Gradient, State, TerminationReason};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ClassifierError;
use crate::types::Label;
use crate::vectorizer::FeatureVector;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Inverse regularization strength
    pub c: f64,
    /// Optimizer iteration cap
    pub max_iter: usize,
    /// Gradient norm tolerance for convergence
    pub tol: f64,
}

impl ClassifierParams {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !(self.c > 0.0) || !self.c.is_finite() {
            return Err(ClassifierError::InvalidParams(format!("C must be positive, got {}", self.c)));
        }
        if self.max_iter == 0 {
            return Err(ClassifierError::InvalidParams("max_iter must be at least 1".into()));
        }
        if !(self.tol > 0.0) {
            return Err(ClassifierError::InvalidParams(format!("tol must be positive, got {}", self.tol)));
        }
        Ok(())
    }
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
        }
    }
}

/// Optimizer outcome of a fit
#[derive(Clone, Debug, Serialize)]
pub struct FitReport {
    pub iterations: usize,
    pub converged: bool,
    pub final_loss: f64,
    pub gradient_max: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn from_parts(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Fit on vectorized samples. Hitting the iteration cap is logged as a
    /// warning and reported in the `FitReport`, never returned as an error.
    pub fn fit(
        samples: &[FeatureVector],
        labels: &[Label],
        params: &ClassifierParams,
    ) -> Result<(Self, FitReport), ClassifierError> {
        params.validate()?;

        if samples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if samples.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                samples: samples.len(),
                labels: labels.len(),
            });
        }
        let spam = labels.iter().filter(|l| l.is_spam()).count();
        if spam == 0 || spam == labels.len() {
            return Err(ClassifierError::SingleClass);
        }

        let dim = samples[0].dim();
        if let Some((index, sample)) = samples.iter().enumerate().find(|(_, s)| s.dim() != dim) {
            return Err(ClassifierError::DimensionMismatch {
                index,
                found: sample.dim(),
                expected: dim,
            });
        }

        let targets: Vec<f64> = labels
            .iter()
            .map(|l| if l.is_spam() { 1.0 } else { -1.0 })
            .collect();
        let problem = LogLoss {
            samples,
            targets: &targets,
            dim,
            l2: 1.0 / (params.c * samples.len() as f64),
        };

        let solver: Solver = LBFGS::new(MoreThuenteLineSearch::new(), LBFGS_HISTORY)
            .with_tolerance_grad(params.tol)
            .map_err(|e| ClassifierError::Optimizer(e.to_string()))?;

        let result = Executor::new(problem, solver)
            .configure(|state| state.param(Array1::zeros(dim + 1)).max_iters(params.max_iter as u64))
            .run()
            .map_err(|e| ClassifierError::Optimizer(e.to_string()))?;

        let state = result.state();
        let theta = state
            .get_best_param()
            .ok_or_else(|| ClassifierError::Optimizer("solver returned no parameters".into()))?;
        let gradient_max = problem
            .gradient(theta)
            .map_err(|e| ClassifierError::Optimizer(e.to_string()))?
            .iter()
            .fold(0.0_f64, |acc, g| acc.max(g.abs()));

        let report = FitReport {
            iterations: state.get_iter() as usize,
            converged: !matches!(
                state.get_termination_reason(),
                Some(TerminationReason::MaxItersReached)
            ),
            final_loss: state.get_best_cost(),
            gradient_max,
        };

        if report.converged {
            info!(
                iterations = report.iterations,
                loss = report.final_loss,
                "Logistic regression converged"
            );
        } else {
            warn!(
                iterations = report.iterations,
                max_iter = params.max_iter,
                gradient_max = report.gradient_max,
                "Logistic regression failed to converge; increase max_iter or scale the data"
            );
        }

        Ok((
            Self {
                weights: theta.slice(s![..dim]).to_vec(),
                intercept: theta[dim],
            },
            report,
        ))
    }

    /// Linear score w·x + b
    pub fn decision_function(&self, x: &FeatureVector) -> f64 {
        self.intercept + sparse_dot(x, &self.weights)
    }

    /// P(spam | x)
    pub fn predict_proba(&self, x: &FeatureVector) -> f64 {
        sigmoid(self.decision_function(x))
    }

    pub fn predict_proba_all(&self, xs: &[FeatureVector]) -> Vec<f64> {
        xs.iter().map(|x| self.predict_proba(x)).collect()
    }

    pub fn num_features(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

type LineSearch = MoreThuenteLineSearch<Array1<f64>, Array1<f64>, f64>;
type Solver = LBFGS<LineSearch, Array1<f64>, Array1<f64>, f64>;

const LBFGS_HISTORY: usize = 10;

/// Mean log-loss plus `l2/2 * ||w||^2` over `dim` weights followed by the
/// unpenalized intercept
#[derive(Clone, Copy)]
struct LogLoss<'a> {
    samples: &'a [FeatureVector],
    targets: &'a [f64],
    dim: usize,
    l2: f64,
}

impl LogLoss<'_> {
    fn margin(&self, x: &FeatureVector, theta: &Array1<f64>) -> f64 {
        theta[self.dim] + x.iter().map(|(i, v)| theta[i] * v).sum::<f64>()
    }

    fn penalty(&self, theta: &Array1<f64>) -> f64 {
        theta.slice(s![..self.dim]).iter().map(|w| w * w).sum::<f64>()
    }
}

impl CostFunction for LogLoss<'_> {
    type Param = Array1<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, ArgminError> {
        let n = self.samples.len() as f64;
        let loss: f64 = self
            .samples
            .iter()
            .zip(self.targets)
            .map(|(x, &y)| softplus(-y * self.margin(x, theta)))
            .sum();
        Ok(loss / n + 0.5 * self.l2 * self.penalty(theta))
    }
}

impl Gradient for LogLoss<'_> {
    type Param = Array1<f64>;
    type Gradient = Array1<f64>;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, ArgminError> {
        let n = self.samples.len() as f64;
        let mut grad = Array1::zeros(self.dim + 1);
        for (x, &y) in self.samples.iter().zip(self.targets) {
            let dz = -y * sigmoid(-y * self.margin(x, theta));
            grad[self.dim] += dz;
            for (i, v) in x.iter() {
                grad[i] += dz * v;
            }
        }
        grad.mapv_inplace(|g| g / n);
        for i in 0..self.dim {
            grad[i] += self.l2 * theta[i];
        }
        Ok(grad)
    }
}

/// Features beyond the weight vector contribute nothing
fn sparse_dot(x: &FeatureVector, w: &[f64]) -> f64 {
    x.iter()
        .map(|(i, v)| w.get(i).map_or(0.0, |wi| wi * v))
        .sum()
}

/// Numerically stable logistic function
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^t) without overflow
fn softplus(t: f64) -> f64 {
    t.max(0.0) + (-t.abs()).exp().ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::CsVec;

    fn vec2(a: f64, b: f64) -> FeatureVector {
        let mut indices = Vec::new();
        let mut data = Vec::new();
        if a != 0.0 {
            indices.push(0);
            data.push(a);
        }
        if b != 0.0 {
            indices.push(1);
            data.push(b);
        }
        CsVec::new(2, indices, data)
    }

    fn separable() -> (Vec<FeatureVector>, Vec<Label>) {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for i in 0..20 {
            let jitter = i as f64 * 0.01;
            xs.push(vec2(1.0 - jitter, 0.1));
            ys.push(Label::Spam);
            xs.push(vec2(0.1, 1.0 - jitter));
            ys.push(Label::Ham);
        }
        (xs, ys)
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-15);
        assert!((softplus(0.0) - 2f64.ln()).abs() < 1e-15);
        assert!((softplus(1000.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_separates_classes() {
        let (xs, ys) = separable();
        let (model, report) = LogisticRegression::fit(&xs, &ys, &ClassifierParams::default()).unwrap();

        assert!(report.converged);
        assert!(report.iterations < 1000);
        assert!(model.weights()[0] > 0.0);
        assert!(model.weights()[1] < 0.0);
        assert!(model.predict_proba(&vec2(1.0, 0.0)) > 0.5);
        assert!(model.predict_proba(&vec2(0.0, 1.0)) < 0.5);
    }

    #[test]
    fn test_regularization_shrinks_weights() {
        let (xs, ys) = separable();
        let strong = ClassifierParams {
            c: 0.01,
            ..Default::default()
        };
        let (weak_model, _) = LogisticRegression::fit(&xs, &ys, &ClassifierParams::default()).unwrap();
        let (strong_model, _) = LogisticRegression::fit(&xs, &ys, &strong).unwrap();
        assert!(strong_model.weights()[0].abs() < weak_model.weights()[0].abs());
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let (xs, ys) = separable();
        let params = ClassifierParams {
            max_iter: 1,
            tol: 1e-12,
            ..Default::default()
        };
        let (model, report) = LogisticRegression::fit(&xs, &ys, &params).unwrap();
        assert!(!report.converged);
        assert_eq!(report.iterations, 1);
        assert_eq!(model.num_features(), 2);
    }

    #[test]
    fn test_probability_range() {
        let model = LogisticRegression::from_parts(vec![500.0, -500.0], 0.0);
        for x in [vec2(1.0, 0.0), vec2(0.0, 1.0), vec2(0.0, 0.0)] {
            let p = model.predict_proba(&x);
            assert!((0.0..=1.0).contains(&p));
        }
        assert_eq!(model.predict_proba(&vec2(0.0, 0.0)), 0.5);
    }

    #[test]
    fn test_fit_errors() {
        let (xs, ys) = separable();
        let params = ClassifierParams::default();
        assert_eq!(
            LogisticRegression::fit(&[], &[], &params).unwrap_err(),
            ClassifierError::EmptyTrainingSet
        );
        assert!(matches!(
            LogisticRegression::fit(&xs, &ys[..3], &params),
            Err(ClassifierError::LengthMismatch { .. })
        ));
        let all_spam = vec![Label::Spam; xs.len()];
        assert_eq!(
            LogisticRegression::fit(&xs, &all_spam, &params).unwrap_err(),
            ClassifierError::SingleClass
        );
        let bad = ClassifierParams {
            c: 0.0,
            ..Default::default()
        };
        assert!(LogisticRegression::fit(&xs, &ys, &bad).is_err());
    }
}
