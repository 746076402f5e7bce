/// Similarity stored for atom slots that do not hold an atom. Never assigned.
pub const MISSING_ATOM: f64 = -0.1;

/// Row-major atom pair similarities; rows are atom slots of the first molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        SimilarityMatrix {
            rows,
            cols,
            values: vec![MISSING_ATOM; rows * cols],
        }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> eyre::Result<Self> {
        let cols = rows.first().map(|row| row.len()).unwrap_or(0);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(eyre::eyre!("Similarity matrix rows differ in length"));
        }
        Ok(SimilarityMatrix {
            rows: rows.len(),
            cols,
            values: rows.concat(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// Rows and columns that hold at least one real atom.
    pub fn present_rows(&self) -> Vec<usize> {
        (0..self.rows)
            .filter(|&r| self.row(r).iter().any(|&v| v != MISSING_ATOM))
            .collect()
    }

    pub fn present_cols(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&c| (0..self.rows).any(|r| self.get(r, c) != MISSING_ATOM))
            .collect()
    }
}
