//! Isolation forest outlier detector.
//!
//! Each tree recursively partitions a random subsample on a random feature at
//! a random threshold. Points that are isolated after few splits are likely
//! outliers. The decision threshold is calibrated so that a `contamination`
//! fraction of the training population falls on the outlier side.
//!
//! # Example
//!
//! ```
//! use pricewarden::domain::{FeatureVector, ForestParams, IsolationForest, Label};
//!
//! let rows: Vec<FeatureVector> = (0..64)
//!     .map(|i| FeatureVector::new([100.0 + f64::from(i % 8), 90.0, 110.0, 20.0, 0.1, 0.5]))
//!     .collect();
//! let forest = IsolationForest::fit(&rows, ForestParams::default()).unwrap();
//! let query = FeatureVector::new([103.0, 90.0, 110.0, 20.0, 0.1, 0.5]);
//! assert_eq!(forest.predict(&query).unwrap(), Label::Inlier);
//! ```

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT};
use crate::error::ModelError;

const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Fraction of training rows expected to be outliers.
pub const CONTAMINATION: f64 = 0.05;

/// Fixed seed so retraining on the same snapshot reproduces the same model.
pub const RANDOM_SEED: u64 = 42;

/// Binary output of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Inlier,
    Outlier,
}

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub trees: usize,
    pub max_samples: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_samples: 256,
            contamination: CONTAMINATION,
            seed: RANDOM_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

/// A single isolation tree stored as a flat node arena. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn grow(
        rows: &[FeatureVector],
        sample: Vec<usize>,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(rows, sample, 0, height_limit, rng);
        tree
    }

    fn grow_node(
        &mut self,
        rows: &[FeatureVector],
        members: Vec<usize>,
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            size: members.len(),
        });

        if depth >= height_limit || members.len() <= 1 {
            return id;
        }

        let mut splittable = Vec::with_capacity(FEATURE_COUNT);
        for feature in 0..FEATURE_COUNT {
            let (lo, hi) = members.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), &row| {
                    let value = rows[row].values()[feature];
                    (lo.min(value), hi.max(value))
                },
            );
            // An infinite span cannot be sampled.
            if hi > lo && (hi - lo).is_finite() {
                splittable.push((feature, lo, hi));
            }
        }
        if splittable.is_empty() {
            return id;
        }

        let (feature, lo, hi) = splittable[rng.gen_range(0..splittable.len())];
        let threshold = rng.gen_range(lo..hi);
        let (left, right): (Vec<usize>, Vec<usize>) = members
            .into_iter()
            .partition(|&row| rows[row].values()[feature] <= threshold);

        let left = self.grow_node(rows, left, depth + 1, height_limit, rng);
        let right = self.grow_node(rows, right, depth + 1, height_limit, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    fn path_length(&self, x: &FeatureVector) -> f64 {
        let mut id = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x.values()[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                    depth += 1.0;
                }
                Node::Leaf { size } => return depth + average_path_length(*size),
            }
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Untrained);
        }
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    return Err(ModelError::DimensionMismatch {
                        expected: FEATURE_COUNT,
                        actual: feature + 1,
                    });
                }
                // Children are always pushed after their parent.
                let in_arena = |child: usize| child > id && child < self.nodes.len();
                if !in_arena(*left) || !in_arena(*right) {
                    return Err(ModelError::Untrained);
                }
            }
        }
        Ok(())
    }
}

/// Expected path length of an unsuccessful search in a binary search tree
/// of `n` points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile of an ascending slice, `q` in `[0, 1]`.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lo = position.floor() as usize;
    let hi = position.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (position - lo as f64)
}

/// Trained isolation forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    params: ForestParams,
    sample_size: usize,
    training_rows: usize,
    offset: f64,
    trees: Vec<Tree>,
}

impl IsolationForest {
    /// Fit a forest on `rows`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyTrainingSet`] for an empty matrix and
    /// [`ModelError::NonFiniteFeature`] if any cell is NaN or infinite.
    pub fn fit(rows: &[FeatureVector], params: ForestParams) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if params.trees == 0 {
            return Err(ModelError::Untrained);
        }
        if let Some((feature, value)) = rows.iter().find_map(FeatureVector::first_non_finite) {
            return Err(ModelError::NonFiniteFeature { feature, value });
        }

        let sample_size = params.max_samples.clamp(1, rows.len());
        let height_limit = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let trees = (0..params.trees)
            .map(|_| {
                let sample = index::sample(&mut rng, rows.len(), sample_size).into_vec();
                Tree::grow(rows, sample, height_limit, &mut rng)
            })
            .collect();

        let mut forest = Self {
            params,
            sample_size,
            training_rows: rows.len(),
            offset: 0.0,
            trees,
        };

        let mut scores: Vec<f64> = rows.iter().map(|row| forest.raw_score(row)).collect();
        scores.sort_by(f64::total_cmp);
        forest.offset = percentile(&scores, params.contamination.clamp(0.0, 1.0));
        Ok(forest)
    }

    fn raw_score(&self, x: &FeatureVector) -> f64 {
        let mean_depth = self
            .trees
            .iter()
            .map(|tree| tree.path_length(x))
            .sum::<f64>()
            / self.trees.len() as f64;
        let normalizer = average_path_length(self.sample_size);
        let ratio = if normalizer > 0.0 {
            mean_depth / normalizer
        } else {
            1.0
        };
        -(2f64.powf(-ratio))
    }

    fn check_input(&self, x: &FeatureVector) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Untrained);
        }
        match x.first_non_finite() {
            Some((feature, value)) => Err(ModelError::NonFiniteFeature { feature, value }),
            None => Ok(()),
        }
    }

    /// Anomaly score in `[-1, 0)`; lower means more anomalous.
    pub fn score(&self, x: &FeatureVector) -> Result<f64, ModelError> {
        self.check_input(x)?;
        Ok(self.raw_score(x))
    }

    /// Score shifted by the calibrated offset; negative means outlier.
    pub fn decision(&self, x: &FeatureVector) -> Result<f64, ModelError> {
        Ok(self.score(x)? - self.offset)
    }

    pub fn predict(&self, x: &FeatureVector) -> Result<Label, ModelError> {
        Ok(if self.decision(x)? < 0.0 {
            Label::Outlier
        } else {
            Label::Inlier
        })
    }

    /// Check structural consistency, used after deserialization.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Untrained);
        }
        self.trees.iter().try_for_each(Tree::validate)
    }

    #[must_use]
    pub const fn params(&self) -> &ForestParams {
        &self.params
    }

    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    #[must_use]
    pub const fn training_rows(&self) -> usize {
        self.training_rows
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }
}
