//! Uniform interface over the similarity methods.
//!
//! A comparator turns molecules into comparables once and then scores pairs of them. Scoring
//! only reads the comparables, so a prepared reference set can be shared between threads.
//! Resources held by a comparator are released on drop.

use std::sync::RwLock;

use crate::fingerprint::dictionary::{DictionaryMode, FeatureDictionary};
use crate::fingerprint::fingerprinter::LinearPathFingerprinter;
use crate::fingerprint::{Fingerprint, SimilarityMeasure};
use crate::molecule::Molecule;
use crate::paths::{MoleculePaths, PathEncoder, PathExtractor};
use crate::similarity::matcher::MoleculeMatcher;
use crate::similarity::MatcherConfig;

pub trait Comparator: Send + Sync {
    type Comparable: Send + Sync;

    fn prepare(&self, mol: &Molecule) -> eyre::Result<Self::Comparable>;

    /// Similarity in `[0, 1]`.
    fn similarity(&self, a: &Self::Comparable, b: &Self::Comparable) -> f64;

    /// Same as `similarity`, except that any result below `min_similarity` may be reported as
    /// 0 when that saves work.
    fn similarity_with_hint(
        &self,
        a: &Self::Comparable,
        b: &Self::Comparable,
        _min_similarity: f64,
    ) -> f64 {
        self.similarity(a, b)
    }
}

/// Atom-atom-path comparison of hydrogen-suppressed molecules.
#[derive(Debug, Clone)]
pub struct AtomPathComparator<E: PathEncoder> {
    extractor: PathExtractor<E>,
    matcher: MoleculeMatcher,
}

impl<E: PathEncoder> AtomPathComparator<E> {
    pub fn new(encoder: E, config: MatcherConfig) -> eyre::Result<Self> {
        let matcher = MoleculeMatcher::new(config)?;
        let extractor =
            PathExtractor::new(encoder, config.max_bonds).with_head_atom(config.head_atom_in_paths);
        Ok(AtomPathComparator { extractor, matcher })
    }

    pub fn matcher(&self) -> &MoleculeMatcher {
        &self.matcher
    }
}

impl<E: PathEncoder> Comparator for AtomPathComparator<E> {
    type Comparable = MoleculePaths<E::Code>;

    fn prepare(&self, mol: &Molecule) -> eyre::Result<Self::Comparable> {
        Ok(self.extractor.molecule_paths(&mol.without_hydrogens()))
    }

    fn similarity(&self, a: &Self::Comparable, b: &Self::Comparable) -> f64 {
        self.matcher.similarity(a, b)
    }

    fn similarity_with_hint(
        &self,
        a: &Self::Comparable,
        b: &Self::Comparable,
        min_similarity: f64,
    ) -> f64 {
        self.matcher.similarity_with_hint(a, b, min_similarity)
    }
}

/// Linear path fingerprints compared with a Tanimoto measure.
#[derive(Debug)]
pub struct FingerprintComparator {
    fingerprinter: LinearPathFingerprinter,
    dictionary: RwLock<FeatureDictionary>,
    measure: SimilarityMeasure,
    fold: Option<u32>,
}

impl FingerprintComparator {
    pub fn new(
        fingerprinter: LinearPathFingerprinter,
        dictionary: FeatureDictionary,
        measure: SimilarityMeasure,
    ) -> Self {
        FingerprintComparator {
            fingerprinter,
            dictionary: RwLock::new(dictionary),
            measure,
            fold: None,
        }
    }

    /// Fold every prepared fingerprint to `bits` positions.
    pub fn with_fold(mut self, bits: u32) -> Self {
        self.fold = Some(bits);
        self
    }

    /// Gives back the dictionary, including anything learned while preparing molecules.
    pub fn into_dictionary(self) -> eyre::Result<FeatureDictionary> {
        self.dictionary
            .into_inner()
            .map_err(|_| eyre::eyre!("Dictionary lock was poisoned"))
    }
}

impl Comparator for FingerprintComparator {
    type Comparable = Fingerprint;

    fn prepare(&self, mol: &Molecule) -> eyre::Result<Fingerprint> {
        let mol = mol.without_hydrogens();

        let fp = {
            let learning = self
                .dictionary
                .read()
                .map_err(|_| eyre::eyre!("Dictionary lock was poisoned"))?
                .mode()
                == DictionaryMode::Learning;

            if learning {
                let mut dictionary = self
                    .dictionary
                    .write()
                    .map_err(|_| eyre::eyre!("Dictionary lock was poisoned"))?;
                self.fingerprinter
                    .fingerprint(&mol, |feature_type, name| dictionary.index_of(feature_type, name))
            } else {
                let dictionary = self
                    .dictionary
                    .read()
                    .map_err(|_| eyre::eyre!("Dictionary lock was poisoned"))?;
                self.fingerprinter
                    .fingerprint(&mol, |feature_type, name| dictionary.lookup(feature_type, name))
            }
        };

        match self.fold {
            Some(bits) => Ok(Fingerprint::Sparse(fp.fold(bits)?)),
            None => Ok(Fingerprint::Sparse(fp)),
        }
    }

    fn similarity(&self, a: &Fingerprint, b: &Fingerprint) -> f64 {
        a.similarity(b, self.measure)
    }
}
