use crate::paths::MoleculePaths;
use crate::similarity::assignment::{AtomPair, TieBreak};
use crate::similarity::atom::atom_similarity;
use crate::similarity::matrix::SimilarityMatrix;
use crate::similarity::MatcherConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub similarity: f64,
    /// Assigned atoms as (atom of the first argument, atom of the second argument).
    pub pairs: Vec<AtomPair>,
}

/// Compares molecules from their precomputed path sets. Holds no per-comparison state.
#[derive(Debug, Clone)]
pub struct MoleculeMatcher {
    config: MatcherConfig,
}

impl MoleculeMatcher {
    pub fn new(config: MatcherConfig) -> eyre::Result<Self> {
        config.validate()?;
        Ok(MoleculeMatcher { config })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Pair similarities with rows from `m1` and columns from `m2`.
    pub fn atom_matrix<C: Ord>(&self, m1: &MoleculePaths<C>, m2: &MoleculePaths<C>) -> SimilarityMatrix {
        let mut matrix = SimilarityMatrix::new(m1.atom_slots(), m2.atom_slots());
        for (row, a1) in m1.atoms() {
            for (col, a2) in m2.atoms() {
                let head = self.config.head_atom.score(&a1.atom, &a2.atom);
                let similarity =
                    atom_similarity(head, &a1.paths, &a2.paths, self.config.aggregation);
                matrix.set(row, col, similarity);
            }
        }
        matrix
    }

    pub fn compare<C: Ord>(&self, a: &MoleculePaths<C>, b: &MoleculePaths<C>) -> MatchResult {
        let (n_a, n_b) = (a.num_atoms(), b.num_atoms());
        if n_a == 0 || n_b == 0 {
            let similarity = if n_a == n_b { 1.0 } else { 0.0 };
            return MatchResult {
                similarity,
                pairs: Vec::new(),
            };
        }

        // rows always belong to the molecule with fewer atoms
        let swapped = n_b < n_a;
        let (m1, m2) = if swapped { (b, a) } else { (a, b) };

        let matrix = self.atom_matrix(m1, m2);
        let ties = content_ranks(m1, m2);
        let mut pairs = self
            .config
            .assignment
            .assign(&matrix, &ties, self.config.min_atom_similarity);

        let total: f64 = pairs.iter().map(|pair| pair.similarity).sum();
        let similarity =
            self.config
                .aggregation
                .molecule_score(m1.num_atoms(), m2.num_atoms(), total);

        log::debug!(
            "Assigned {} of {} atoms, summed similarity {:.4}, score {:.4}",
            pairs.len(),
            m1.num_atoms(),
            total,
            similarity
        );

        if swapped {
            for pair in pairs.iter_mut() {
                std::mem::swap(&mut pair.first, &mut pair.second);
            }
        }

        MatchResult { similarity, pairs }
    }

    pub fn similarity<C: Ord>(&self, a: &MoleculePaths<C>, b: &MoleculePaths<C>) -> f64 {
        self.compare(a, b).similarity
    }

    /// Like [`MoleculeMatcher::similarity`], but returns 0 without matching when the atom
    /// counts alone rule out reaching `min_similarity`.
    pub fn similarity_with_hint<C: Ord>(
        &self,
        a: &MoleculePaths<C>,
        b: &MoleculePaths<C>,
        min_similarity: f64,
    ) -> f64 {
        if similarity_upper_bound(a.num_atoms(), b.num_atoms()) < min_similarity {
            return 0.0;
        }
        self.similarity(a, b)
    }
}

/// Best score any aggregation can give molecules of `n1` and `n2` atoms.
///
/// At most `min(n1, n2)` pairs of similarity 1 exist, which bounds every normalization by
/// `min / max`.
pub fn similarity_upper_bound(n1: usize, n2: usize) -> f64 {
    let max = n1.max(n2);
    if max == 0 {
        return 1.0;
    }
    n1.min(n2) as f64 / max as f64
}

/// Dense ranks of atom content shared by both molecules.
fn content_ranks<C: Ord>(m1: &MoleculePaths<C>, m2: &MoleculePaths<C>) -> TieBreak {
    let mut keyed: Vec<((u16, u8, u8, &[C]), bool, usize)> = m1
        .atoms()
        .map(|(idx, a)| (idx, a, false))
        .chain(m2.atoms().map(|(idx, a)| (idx, a, true)))
        .map(|(idx, a, second)| {
            let key = (
                a.atom.atom_type(),
                a.atom.valence,
                a.atom.heavy_degree,
                &a.paths[..],
            );
            (key, second, idx)
        })
        .collect();
    keyed.sort_by(|x, y| x.0.cmp(&y.0));

    let mut row_keys = vec![usize::MAX; m1.atom_slots()];
    let mut col_keys = vec![usize::MAX; m2.atom_slots()];
    let mut rank = 0;
    for i in 0..keyed.len() {
        if i > 0 && keyed[i].0 != keyed[i - 1].0 {
            rank += 1;
        }
        let (_, second, idx) = keyed[i];
        if second {
            col_keys[idx] = rank;
        } else {
            row_keys[idx] = rank;
        }
    }

    TieBreak::new(row_keys, col_keys)
}
