//! Atom-atom-path similarity.
//!
//! Two molecules are compared by scoring every atom pair from the overlap of their path sets,
//! assigning atoms of the smaller molecule to atoms of the larger one, and normalizing the
//! summed pair scores.

use std::str::FromStr;

pub mod assignment;
pub mod atom;
pub mod comparator;
pub mod matcher;
pub mod matrix;

pub use assignment::{AssignmentAlgorithm, AtomPair, TieBreak};
pub use atom::{atom_similarity, HeadAtomPolicy};
pub use comparator::{AtomPathComparator, Comparator, FingerprintComparator};
pub use matcher::{similarity_upper_bound, MatchResult, MoleculeMatcher};
pub use matrix::{SimilarityMatrix, MISSING_ATOM};

use crate::paths::DEFAULT_MAX_BONDS;

/// Longest walk the extractor accepts; path counts grow exponentially with depth.
pub const MAX_SUPPORTED_BONDS: usize = 32;

/// Normalization used for atom pairs (`f`) and for the molecule total (`g`).
///
/// The two always come from the same variant so their scales agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// `f = c / (n1 + n2 - c)`, `g = S / (n1 + n2 - S)`
    Tanimoto,
    /// `f = (c + h) / (2 max(n1, n2) - c + h)`, `g = S / (2 max(n1, n2) - S)`
    #[default]
    SizeSymmetric,
    /// `f = c / max(n1, n2)`, `g = S / max(n1, n2)`
    MaxNormalized,
}

impl FromStr for Aggregation {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tanimoto" => Ok(Aggregation::Tanimoto),
            "size-symmetric" => Ok(Aggregation::SizeSymmetric),
            "max-normalized" => Ok(Aggregation::MaxNormalized),
            other => Err(eyre::eyre!("Unknown aggregation '{}'", other)),
        }
    }
}

impl Aggregation {
    /// Path overlap score of one atom pair: `c` shared paths out of `n1` and `n2`.
    pub fn atom_score(self, n1: usize, n2: usize, common: usize, head: f64) -> f64 {
        let c = common as f64;
        let max = n1.max(n2) as f64;
        match self {
            Aggregation::Tanimoto => c / (n1 + n2 - common) as f64,
            Aggregation::SizeSymmetric => (c + head) / (2.0 * max - c + head),
            Aggregation::MaxNormalized => c / max,
        }
    }

    /// Molecule score from the summed similarity of the assigned pairs.
    pub fn molecule_score(self, n1: usize, n2: usize, total: f64) -> f64 {
        let max = n1.max(n2) as f64;
        let denominator = match self {
            Aggregation::Tanimoto => (n1 + n2) as f64 - total,
            Aggregation::SizeSymmetric => 2.0 * max - total,
            Aggregation::MaxNormalized => max,
        };
        if denominator <= 0.0 {
            return 0.0;
        }
        (total / denominator).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    pub max_bonds: usize,
    /// Assigned pairs below this similarity do not count toward the molecule score.
    pub min_atom_similarity: f64,
    pub head_atom: HeadAtomPolicy,
    pub aggregation: Aggregation,
    pub assignment: AssignmentAlgorithm,
    /// Start every path with the root atom token instead of scoring it through `head_atom`
    /// alone.
    pub head_atom_in_paths: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            max_bonds: DEFAULT_MAX_BONDS,
            min_atom_similarity: 0.0,
            head_atom: HeadAtomPolicy::Exact,
            aggregation: Aggregation::SizeSymmetric,
            assignment: AssignmentAlgorithm::GreedySorted,
            head_atom_in_paths: false,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.max_bonds == 0 || self.max_bonds > MAX_SUPPORTED_BONDS {
            return Err(eyre::eyre!(
                "max_bonds must be between 1 and {}, got {}",
                MAX_SUPPORTED_BONDS,
                self.max_bonds
            ));
        }
        if !(0.0..=1.0).contains(&self.min_atom_similarity) {
            return Err(eyre::eyre!(
                "min_atom_similarity must be within [0, 1], got {}",
                self.min_atom_similarity
            ));
        }
        Ok(())
    }
}

/// Named comparator settings: depth and head-atom typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparatorPreset {
    #[default]
    Default,
    Intermediate,
    Fast,
    Fuzzy,
    FuzzyIntermediate,
    FuzzyFast,
}

impl FromStr for ComparatorPreset {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ComparatorPreset::Default),
            "intermediate" => Ok(ComparatorPreset::Intermediate),
            "fast" => Ok(ComparatorPreset::Fast),
            "fuzzy" => Ok(ComparatorPreset::Fuzzy),
            "fuzzy-intermediate" | "fuzzyintermediate" => Ok(ComparatorPreset::FuzzyIntermediate),
            "fuzzy-fast" | "fuzzyfast" => Ok(ComparatorPreset::FuzzyFast),
            other => Err(eyre::eyre!("Unknown comparator preset '{}'", other)),
        }
    }
}

impl ComparatorPreset {
    pub fn config(self) -> MatcherConfig {
        let (max_bonds, head_atom) = match self {
            ComparatorPreset::Default => (7, HeadAtomPolicy::Exact),
            ComparatorPreset::Intermediate => (5, HeadAtomPolicy::Exact),
            ComparatorPreset::Fast => (4, HeadAtomPolicy::Exact),
            ComparatorPreset::Fuzzy => (7, HeadAtomPolicy::Fuzzy),
            ComparatorPreset::FuzzyIntermediate => (5, HeadAtomPolicy::Fuzzy),
            ComparatorPreset::FuzzyFast => (4, HeadAtomPolicy::Fuzzy),
        };
        MatcherConfig {
            max_bonds,
            head_atom,
            ..MatcherConfig::default()
        }
    }
}
