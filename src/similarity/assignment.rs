//! Atom assignment between two molecules.
//!
//! All algorithms read a [`SimilarityMatrix`] whose rows belong to the smaller molecule and
//! return an injective set of atom pairs. Pairs with similarity 0 or below the configured
//! minimum are never returned.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::similarity::matrix::SimilarityMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomPair {
    pub first: usize,
    pub second: usize,
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentAlgorithm {
    /// Every round, each open row offers its best open column and the best offer is taken.
    GreedyRanked,
    /// All candidate pairs are sorted once and taken in order while both atoms are open.
    #[default]
    GreedySorted,
    /// Maximum total similarity (Kuhn-Munkres on `1 - similarity`).
    Optimal,
}

impl FromStr for AssignmentAlgorithm {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy-ranked" => Ok(AssignmentAlgorithm::GreedyRanked),
            "greedy-sorted" | "greedy" => Ok(AssignmentAlgorithm::GreedySorted),
            "optimal" => Ok(AssignmentAlgorithm::Optimal),
            other => Err(eyre::eyre!("Unknown assignment algorithm '{}'", other)),
        }
    }
}

impl AssignmentAlgorithm {
    pub fn assign(
        &self,
        matrix: &SimilarityMatrix,
        ties: &TieBreak,
        min_atom_similarity: f64,
    ) -> Vec<AtomPair> {
        match self {
            AssignmentAlgorithm::GreedyRanked => greedy_ranked(matrix, ties, min_atom_similarity),
            AssignmentAlgorithm::GreedySorted => greedy_sorted(matrix, ties, min_atom_similarity),
            AssignmentAlgorithm::Optimal => optimal(matrix, min_atom_similarity),
        }
    }
}

/// Total order on candidate pairs: similarity descending, then by the keys of the two atoms.
///
/// Keys describe atom content, so atoms with equal keys have identical matrix rows (or
/// columns) and the choice between them cannot change the result. The key of a pair is the
/// unordered pair of its atom keys, which keeps the order the same when the molecules are
/// passed the other way round.
#[derive(Debug, Clone)]
pub struct TieBreak {
    row_keys: Vec<usize>,
    col_keys: Vec<usize>,
}

impl TieBreak {
    pub fn new(row_keys: Vec<usize>, col_keys: Vec<usize>) -> Self {
        TieBreak { row_keys, col_keys }
    }

    /// Keys from positions alone, for matrices without atom content.
    pub fn by_position(rows: usize, cols: usize) -> Self {
        TieBreak {
            row_keys: (0..rows).collect(),
            col_keys: (0..cols).collect(),
        }
    }

    fn pair_key(&self, (row, col): (usize, usize)) -> (usize, usize) {
        let r = self.row_keys.get(row).copied().unwrap_or(usize::MAX);
        let c = self.col_keys.get(col).copied().unwrap_or(usize::MAX);
        (r.min(c), r.max(c))
    }

    pub fn compare(&self, matrix: &SimilarityMatrix, a: (usize, usize), b: (usize, usize)) -> Ordering {
        let sim_a = matrix.get(a.0, a.1);
        let sim_b = matrix.get(b.0, b.1);
        sim_b
            .partial_cmp(&sim_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.pair_key(a).cmp(&self.pair_key(b)))
            .then_with(|| a.cmp(&b))
    }
}

fn counts(similarity: f64, min_atom_similarity: f64) -> bool {
    similarity > 0.0 && similarity >= min_atom_similarity
}

pub fn greedy_ranked(
    matrix: &SimilarityMatrix,
    ties: &TieBreak,
    min_atom_similarity: f64,
) -> Vec<AtomPair> {
    let rows = matrix.present_rows();
    let cols = matrix.present_cols();

    let ranked: Vec<Vec<usize>> = rows
        .iter()
        .map(|&row| {
            let mut candidates: Vec<usize> = cols
                .iter()
                .copied()
                .filter(|&col| counts(matrix.get(row, col), min_atom_similarity))
                .collect();
            candidates.sort_by(|&a, &b| ties.compare(matrix, (row, a), (row, b)));
            candidates
        })
        .collect();

    let mut cursors = vec![0; rows.len()];
    let mut row_done = vec![false; rows.len()];
    let mut col_taken = vec![false; matrix.cols()];
    let mut pairs = Vec::with_capacity(rows.len());

    for _ in 0..rows.len() {
        let mut best: Option<(usize, usize)> = None;
        for (i, &row) in rows.iter().enumerate() {
            if row_done[i] {
                continue;
            }
            while cursors[i] < ranked[i].len() && col_taken[ranked[i][cursors[i]]] {
                cursors[i] += 1;
            }
            let Some(&col) = ranked[i].get(cursors[i]) else {
                continue;
            };
            best = match best {
                Some((best_i, best_col))
                    if ties.compare(matrix, (rows[best_i], best_col), (row, col))
                        != Ordering::Greater =>
                {
                    Some((best_i, best_col))
                }
                _ => Some((i, col)),
            };
        }

        let Some((i, col)) = best else {
            break;
        };
        row_done[i] = true;
        col_taken[col] = true;
        pairs.push(AtomPair {
            first: rows[i],
            second: col,
            similarity: matrix.get(rows[i], col),
        });
    }

    pairs
}

pub fn greedy_sorted(
    matrix: &SimilarityMatrix,
    ties: &TieBreak,
    min_atom_similarity: f64,
) -> Vec<AtomPair> {
    let rows = matrix.present_rows();
    let cols = matrix.present_cols();

    let mut candidates: Vec<(usize, usize)> = rows
        .iter()
        .flat_map(|&row| cols.iter().map(move |&col| (row, col)))
        .filter(|&(row, col)| counts(matrix.get(row, col), min_atom_similarity))
        .collect();
    candidates.sort_by(|&a, &b| ties.compare(matrix, a, b));

    let mut row_taken = vec![false; matrix.rows()];
    let mut col_taken = vec![false; matrix.cols()];
    let mut pairs = Vec::with_capacity(rows.len());
    for (row, col) in candidates {
        if row_taken[row] || col_taken[col] {
            continue;
        }
        row_taken[row] = true;
        col_taken[col] = true;
        pairs.push(AtomPair {
            first: row,
            second: col,
            similarity: matrix.get(row, col),
        });
        if pairs.len() == rows.len() {
            break;
        }
    }

    pairs
}

/// Cost of pairing a padding row with any column; above every real cost.
const PADDING_COST: f64 = 2.0;

pub fn optimal(matrix: &SimilarityMatrix, min_atom_similarity: f64) -> Vec<AtomPair> {
    let rows = matrix.present_rows();
    let cols = matrix.present_cols();
    let n = rows.len().max(cols.len());
    if n == 0 {
        return Vec::new();
    }

    let mut cost = vec![PADDING_COST; n * n];
    for (i, &row) in rows.iter().enumerate() {
        for (j, &col) in cols.iter().enumerate() {
            cost[i * n + j] = 1.0 - matrix.get(row, col);
        }
    }

    let assignment = hungarian(&cost, n);
    rows.iter()
        .enumerate()
        .filter_map(|(i, &row)| {
            let &col = cols.get(assignment[i])?;
            let similarity = matrix.get(row, col);
            counts(similarity, min_atom_similarity).then_some(AtomPair {
                first: row,
                second: col,
                similarity,
            })
        })
        .collect()
}

/// Minimum cost perfect matching on a square `n x n` row-major cost matrix.
///
/// Returns the column assigned to each row.
pub fn hungarian(cost: &[f64], n: usize) -> Vec<usize> {
    // potentials and matching are 1-based; column 0 is a virtual start
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    let mut row_of_col = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        row_of_col[0] = i;
        let mut j0 = 0;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = row_of_col[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let slack = cost[(i0 - 1) * n + (j - 1)] - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[row_of_col[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }
            j0 = j1;
            if row_of_col[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            row_of_col[j0] = row_of_col[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0; n];
    for j in 1..=n {
        if row_of_col[j] != 0 {
            assignment[row_of_col[j] - 1] = j - 1;
        }
    }
    assignment
}
