use std::str::FromStr;

pub mod dense;
pub mod dictionary;
pub mod fingerprinter;
pub mod sparse;

pub use dense::DenseFingerprint;
pub use sparse::SparseFingerprint;

/// An immutable set of bit positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    Dense(DenseFingerprint),
    Sparse(SparseFingerprint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMeasure {
    /// `|A n B| / |A u B|`
    Tanimoto,
    /// `|A n B| / (2 max(|A|, |B|) - |A n B|)`
    ModifiedTanimoto,
}

impl FromStr for SimilarityMeasure {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tanimoto" => Ok(SimilarityMeasure::Tanimoto),
            "modified-tanimoto" | "mtanimoto" => Ok(SimilarityMeasure::ModifiedTanimoto),
            other => Err(eyre::eyre!("Unknown similarity measure '{}'", other)),
        }
    }
}

impl Fingerprint {
    pub fn from_hex(hex: &str) -> eyre::Result<Fingerprint> {
        Ok(Fingerprint::Dense(DenseFingerprint::from_hex(hex)?))
    }

    pub fn from_bin(bin: &str) -> eyre::Result<Fingerprint> {
        Ok(Fingerprint::Dense(DenseFingerprint::from_bin(bin)?))
    }

    pub fn from_positions<I: IntoIterator<Item = u32>>(positions: I) -> Fingerprint {
        Fingerprint::Sparse(SparseFingerprint::from_positions(positions))
    }

    pub fn bit_count(&self) -> usize {
        match self {
            Fingerprint::Dense(fp) => fp.bit_count(),
            Fingerprint::Sparse(fp) => fp.bit_count(),
        }
    }

    pub fn bit_positions(&self) -> Vec<u32> {
        match self {
            Fingerprint::Dense(fp) => fp.bit_positions(),
            Fingerprint::Sparse(fp) => fp.positions().to_vec(),
        }
    }

    fn common_bits(&self, other: &Fingerprint) -> usize {
        match (self, other) {
            (Fingerprint::Dense(a), Fingerprint::Dense(b)) => a.common_bits(b),
            (Fingerprint::Sparse(a), Fingerprint::Sparse(b)) => a.common_bits(b),
            _ => sparse::count_common(&self.bit_positions(), &other.bit_positions()),
        }
    }

    pub fn tanimoto(&self, other: &Fingerprint) -> f64 {
        let common = self.common_bits(other);
        let union = self.bit_count() + other.bit_count() - common;
        if union == 0 {
            return 1.0;
        }
        common as f64 / union as f64
    }

    pub fn modified_tanimoto(&self, other: &Fingerprint) -> f64 {
        dense::modified_tanimoto(
            self.common_bits(other),
            self.bit_count(),
            other.bit_count(),
        )
    }

    pub fn similarity(&self, other: &Fingerprint, measure: SimilarityMeasure) -> f64 {
        match measure {
            SimilarityMeasure::Tanimoto => self.tanimoto(other),
            SimilarityMeasure::ModifiedTanimoto => self.modified_tanimoto(other),
        }
    }

    /// Folds into `target` bits. Only sparse fingerprints support folding.
    pub fn fold(&self, target: u32) -> eyre::Result<Fingerprint> {
        match self {
            Fingerprint::Sparse(fp) => Ok(Fingerprint::Sparse(fp.fold(target)?)),
            Fingerprint::Dense(_) => Err(eyre::eyre!(
                "Folding is not supported for dense fingerprints"
            )),
        }
    }

    pub fn to_dense(&self) -> DenseFingerprint {
        match self {
            Fingerprint::Dense(fp) => fp.clone(),
            Fingerprint::Sparse(fp) => fp.to_dense(),
        }
    }

    pub fn to_hex(&self) -> String {
        match self {
            Fingerprint::Dense(fp) => fp.to_hex(),
            Fingerprint::Sparse(fp) => fp.to_hex(),
        }
    }

    pub fn to_bin(&self) -> String {
        match self {
            Fingerprint::Dense(fp) => fp.to_bin(),
            Fingerprint::Sparse(fp) => fp.to_bin(),
        }
    }
}
