//! Evaluation metrics for the held-out test split.
//!
//! Confusion matrix at a fixed decision threshold, per-class
//! precision/recall/F1/support with macro and weighted averages, and
//! ROC-AUC over the predicted probabilities.

use serde::Serialize;
use std::fmt;

use crate::types::Label;

/// Threshold used when turning probabilities into evaluation labels
pub const EVALUATION_THRESHOLD: f64 = 0.5;

/// Confusion matrix with spam as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_count: usize,
}

impl ConfusionMatrix {
    pub fn from_labels(predicted: &[Label], actual: &[Label]) -> Self {
        assert_eq!(
            predicted.len(),
            actual.len(),
            "predictions and labels must have same length"
        );

        let mut matrix = Self::default();
        for (pred, label) in predicted.iter().zip(actual) {
            match (pred, label) {
                (Label::Spam, Label::Spam) => matrix.tp += 1,
                (Label::Spam, Label::Ham) => matrix.fp += 1,
                (Label::Ham, Label::Ham) => matrix.tn += 1,
                (Label::Ham, Label::Spam) => matrix.fn_count += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn new(true_pos: usize, false_pos: usize, false_neg: usize) -> Self {
        let precision = ratio(true_pos, true_pos + false_pos);
        let recall = ratio(true_pos, true_pos + false_neg);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
            support: true_pos + false_neg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub threshold: f64,
    pub confusion: ConfusionMatrix,
    pub ham: ClassMetrics,
    pub spam: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: Averages,
    pub weighted_avg: Averages,
    /// `None` when the evaluated labels contain a single class
    pub roc_auc: Option<f64>,
}

/// Evaluate spam probabilities against ground truth.
pub fn evaluate(probabilities: &[f64], actual: &[Label]) -> EvaluationReport {
    let predicted: Vec<Label> = probabilities
        .iter()
        .map(|&p| {
            if p >= EVALUATION_THRESHOLD {
                Label::Spam
            } else {
                Label::Ham
            }
        })
        .collect();

    let confusion = ConfusionMatrix::from_labels(&predicted, actual);
    let spam = ClassMetrics::new(confusion.tp, confusion.fp, confusion.fn_count);
    let ham = ClassMetrics::new(confusion.tn, confusion.fn_count, confusion.fp);

    let total = confusion.total();
    let accuracy = ratio(confusion.tp + confusion.tn, total);

    let macro_avg = Averages {
        precision: (ham.precision + spam.precision) / 2.0,
        recall: (ham.recall + spam.recall) / 2.0,
        f1: (ham.f1 + spam.f1) / 2.0,
    };

    let weight = |h: f64, s: f64| {
        if total == 0 {
            0.0
        } else {
            (h * ham.support as f64 + s * spam.support as f64) / total as f64
        }
    };
    let weighted_avg = Averages {
        precision: weight(ham.precision, spam.precision),
        recall: weight(ham.recall, spam.recall),
        f1: weight(ham.f1, spam.f1),
    };

    EvaluationReport {
        threshold: EVALUATION_THRESHOLD,
        confusion,
        ham,
        spam,
        accuracy,
        macro_avg,
        weighted_avg,
        roc_auc: roc_auc(probabilities, actual),
    }
}

/// Area under the ROC curve via the Mann-Whitney U statistic.
///
/// Tied scores receive the average of their ranks. Returns `None` unless both
/// classes are present.
pub fn roc_auc(scores: &[f64], actual: &[Label]) -> Option<f64> {
    assert_eq!(scores.len(), actual.len(), "scores and labels must have same length");

    let positives = actual.iter().filter(|l| l.is_spam()).count();
    let negatives = actual.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // Ranks are 1-based; a tie group shares the mean of its ranks
        let mean_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            if actual[idx].is_spam() {
                positive_rank_sum += mean_rank;
            }
        }
        start = end;
    }

    let p = positives as f64;
    let u = positive_rank_sum - p * (p + 1.0) / 2.0;
    Some(u / (p * negatives as f64))
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        for (name, m) in [("ham", &self.ham), ("spam", &self.spam)] {
            writeln!(
                f,
                "{:>14} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        let total = self.confusion.total();
        writeln!(f, "{:>14} {:>9} {:>9} {:>9.4} {:>9}", "accuracy", "", "", self.accuracy, total)?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                name, avg.precision, avg.recall, avg.f1, total
            )?;
        }
        writeln!(f)?;
        writeln!(f, "confusion matrix (rows = actual, columns = predicted)")?;
        writeln!(f, "{:>14} {:>9} {:>9}", "", "ham", "spam")?;
        writeln!(f, "{:>14} {:>9} {:>9}", "ham", self.confusion.tn, self.confusion.fp)?;
        writeln!(f, "{:>14} {:>9} {:>9}", "spam", self.confusion.fn_count, self.confusion.tp)?;
        match self.roc_auc {
            Some(auc) => write!(f, "roc-auc: {:.4}", auc),
            None => write!(f, "roc-auc: undefined (single class)"),
        }
    }
}
