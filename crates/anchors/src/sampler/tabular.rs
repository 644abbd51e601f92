//! Tabular sampler over categorical or discretized features.
//!
//! Predicate `j` of the instance is `feature_j == instance[j]`. Perturbations
//! are rows drawn uniformly from a reference dataset with the anchored
//! columns overwritten by the instance's values.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use anchors_core::{
    AnchorCandidate, AnchorError, AnchorResult, CoverageData, SampleBatch, Sampler, SamplerError,
};

/// A black-box model returning one class label per row.
///
/// Plain functions `Fn(&[Vec<f64>]) -> Vec<usize>` are classifiers that never
/// fail. Wrap a function returning `Result` in [`Fallible`] to report model
/// errors instead.
pub trait Classifier {
    /// Predict a label for every row of `rows`.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>, SamplerError>;
}

impl<F> Classifier for F
where
    F: Fn(&[Vec<f64>]) -> Vec<usize>,
{
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>, SamplerError> {
        Ok(self(rows))
    }
}

/// Classifier backed by a function that can fail.
///
/// ```
/// use anchors::{Fallible, SamplerError};
///
/// let model = Fallible(|rows: &[Vec<f64>]| {
///     if rows.iter().any(|r| r.iter().any(|v| v.is_nan())) {
///         return Err(SamplerError::Prediction("NaN input".to_string()));
///     }
///     Ok(vec![0usize; rows.len()])
/// });
/// # let _ = model;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F> Classifier for Fallible<F>
where
    F: Fn(&[Vec<f64>]) -> Result<Vec<usize>, SamplerError>,
{
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>, SamplerError> {
        (self.0)(rows)
    }
}

/// Task options for tabular explanations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularOptions {
    /// Reference rows, each as wide as the instance.
    pub dataset: Vec<Vec<f64>>,

    /// Column names. Defaults to `x0`, `x1`, ...
    pub feature_names: Option<Vec<String>>,
}

impl TabularOptions {
    /// Options over `dataset` with default feature names.
    pub fn new(dataset: Vec<Vec<f64>>) -> Self {
        Self {
            dataset,
            feature_names: None,
        }
    }

    /// Set the column names.
    pub fn feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Sampler for one tabular instance.
pub struct TabularSampler<C: Classifier> {
    instance: Vec<f64>,
    dataset: Vec<Vec<f64>>,
    feature_names: Vec<String>,
    classifier: C,
    target: usize,
    rng: Xoshiro256PlusPlus,
}

impl<C: Classifier> TabularSampler<C> {
    /// Bind `classifier` to `instance` and label the instance.
    ///
    /// # Errors
    ///
    /// - [`AnchorError::InvalidInput`] if the dataset is empty, a row or the
    ///   name list differs in width from the instance
    /// - [`AnchorError::ExplanationFailure`] if the classifier fails or does
    ///   not return exactly one label for the instance
    pub fn new(
        instance: &[f64],
        options: TabularOptions,
        classifier: C,
        seed: u64,
    ) -> AnchorResult<Self> {
        let TabularOptions {
            dataset,
            feature_names,
        } = options;

        if dataset.is_empty() {
            return Err(AnchorError::InvalidInput("dataset is empty".to_string()));
        }
        if let Some((i, row)) = dataset
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != instance.len())
        {
            return Err(AnchorError::InvalidInput(format!(
                "dataset row {i} has {} columns, instance has {}",
                row.len(),
                instance.len()
            )));
        }

        let feature_names = match feature_names {
            Some(names) if names.len() != instance.len() => {
                return Err(AnchorError::InvalidInput(format!(
                    "{} feature names for {} features",
                    names.len(),
                    instance.len()
                )));
            }
            Some(names) => names,
            None => (0..instance.len()).map(|i| format!("x{i}")).collect(),
        };

        let labels = classifier.predict(&[instance.to_vec()])?;
        let target = match labels.as_slice() {
            [label] => *label,
            _ => {
                return Err(SamplerError::Prediction(format!(
                    "expected 1 label for the instance, got {}",
                    labels.len()
                ))
                .into());
            }
        };
        debug!(target, features = instance.len(), rows = dataset.len(), "tabular sampler ready");

        Ok(Self {
            instance: instance.to_vec(),
            dataset,
            feature_names,
            classifier,
            target,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }

    /// The instance being explained.
    pub fn instance(&self) -> &[f64] {
        &self.instance
    }

    /// Label predicted for the instance.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Column names.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Human-readable predicate per feature, e.g. `age = 3`.
    pub fn predicate_names(&self) -> Vec<String> {
        self.feature_names
            .iter()
            .zip(&self.instance)
            .map(|(name, value)| format!("{name} = {value}"))
            .collect()
    }

    fn activation(&self, row: &[f64]) -> Vec<bool> {
        row.iter().zip(&self.instance).map(|(a, b)| a == b).collect()
    }
}

impl<C: Classifier> Sampler for TabularSampler<C> {
    fn num_features(&self) -> usize {
        self.instance.len()
    }

    fn sample(
        &mut self,
        candidate: &AnchorCandidate,
        n: usize,
        compute_labels: bool,
    ) -> Result<SampleBatch, SamplerError> {
        if let Some(&f) = candidate.feature_mask.iter().find(|&&f| f >= self.instance.len()) {
            return Err(SamplerError::Perturbation(format!(
                "feature {f} out of range for {} features",
                self.instance.len()
            )));
        }

        let mut rows = Vec::with_capacity(n);
        for _ in 0..n {
            let index = self.rng.random_range(0..self.dataset.len());
            let mut row = self.dataset[index].clone();
            for &f in &candidate.feature_mask {
                row[f] = self.instance[f];
            }
            rows.push(row);
        }

        let mut coverage_rows = CoverageData::new(self.instance.len());
        for row in &rows {
            coverage_rows
                .push_row(&self.activation(row))
                .map_err(|e| SamplerError::Perturbation(e.to_string()))?;
        }

        let positives = if compute_labels && n > 0 {
            let labels = self.classifier.predict(&rows)?;
            if labels.len() != n {
                return Err(SamplerError::Prediction(format!(
                    "expected {n} labels, got {}",
                    labels.len()
                )));
            }
            labels.iter().filter(|&&label| label == self.target).count()
        } else {
            0
        };

        Ok(SampleBatch {
            positives,
            n_samples: n,
            coverage_rows,
        })
    }
}
