//! Jackknife evaluation of the tagger chain.
//!
//! The sentences are cut into consecutive folds of `fold_size`. Each fold in turn is
//! held out as the test set while every tagger order is trained on the remaining
//! sentences.

use log::info;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::sentence::Sentence;
use crate::tagger::{Accuracy, MAX_ORDER, evaluate, tagger_chain};

pub const DEFAULT_FOLD_SIZE: usize = 1000;

/// Display names of the chain members, by order.
pub const TAGGER_NAMES: [&str; MAX_ORDER + 1] =
    ["Default", "Unigram", "Bigram", "Trigram", "Quadgram"];

#[derive(Clone, Debug, PartialEq)]
pub struct FoldResult {
    pub train_sentences: usize,
    pub test_sentences: usize,
    /// Accuracy per tagger order.
    pub accuracy: [Accuracy; MAX_ORDER + 1],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JackknifeReport {
    pub folds: Vec<FoldResult>,
}

impl JackknifeReport {
    /// Mean over folds of the per-fold accuracy percentage of one tagger order.
    pub fn average(&self, order: usize) -> f64 {
        if self.folds.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.folds.iter().map(|f| f.accuracy[order].percent()).sum();
        sum / self.folds.len() as f64
    }

    /// Per-fold and average accuracies, plus each order's gain over the default tagger.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let count = self.folds.len();
        for (index, fold) in self.folds.iter().enumerate() {
            out.push_str(&format!(
                "Fold {}/{}: training on {} sentences, testing on {}\n",
                index + 1,
                count,
                fold.train_sentences,
                fold.test_sentences
            ));
            for (name, accuracy) in TAGGER_NAMES.iter().zip(&fold.accuracy) {
                let label = format!("{name}:");
                out.push_str(&format!("  {label:<9} {:.2}%\n", accuracy.percent()));
            }
        }
        out.push_str(&format!("\nAverage over {count} folds:\n"));
        let baseline = self.average(0);
        for (order, name) in TAGGER_NAMES.iter().enumerate() {
            let average = self.average(order);
            let label = format!("{name}:");
            out.push_str(&format!("  {label:<9} {average:.2}%"));
            if order > 0 {
                out.push_str(&format!(" ({:+.2} over default)", average - baseline));
            }
            out.push('\n');
        }
        out
    }
}

fn run_fold(sentences: &[Sentence], start: usize, end: usize) -> FoldResult {
    let test = &sentences[start..end];
    let train: Vec<Sentence> = sentences[..start]
        .iter()
        .chain(&sentences[end..])
        .cloned()
        .collect();
    let chain = tagger_chain(MAX_ORDER, &train);
    let mut accuracy = [Accuracy::default(); MAX_ORDER + 1];
    for (slot, tagger) in accuracy.iter_mut().zip(&chain) {
        *slot = evaluate(tagger.as_ref(), test);
    }
    info!(
        "fold {}..{}: quadgram accuracy {:.2}%",
        start,
        end,
        accuracy[MAX_ORDER].percent()
    );
    FoldResult {
        train_sentences: train.len(),
        test_sentences: test.len(),
        accuracy,
    }
}

/// Evaluates every tagger order over consecutive folds, on the rayon pool when
/// `parallel` is set. Fold order in the report follows the sentence order.
pub fn jackknife(
    sentences: &[Sentence],
    fold_size: usize,
    parallel: bool,
) -> Result<JackknifeReport> {
    if fold_size == 0 {
        return Err(Error::InvalidOption("fold size must be at least 1".into()));
    }
    let bounds: Vec<(usize, usize)> = (0..sentences.len())
        .step_by(fold_size)
        .map(|start| (start, (start + fold_size).min(sentences.len())))
        .collect();
    info!(
        "jackknife over {} sentences in {} folds",
        sentences.len(),
        bounds.len()
    );
    let folds: Vec<FoldResult> = if parallel {
        bounds
            .par_iter()
            .map(|&(start, end)| run_fold(sentences, start, end))
            .collect()
    } else {
        bounds
            .iter()
            .map(|&(start, end)| run_fold(sentences, start, end))
            .collect()
    };
    Ok(JackknifeReport { folds })
}
