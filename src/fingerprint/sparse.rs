use crate::fingerprint::dense::{modified_tanimoto, DenseFingerprint};

/// Fingerprint stored as the sorted, distinct positions of its set bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SparseFingerprint {
    positions: Vec<u32>,
}

impl SparseFingerprint {
    pub fn from_positions<I: IntoIterator<Item = u32>>(positions: I) -> Self {
        let mut positions: Vec<u32> = positions.into_iter().collect();
        positions.sort_unstable();
        positions.dedup();
        SparseFingerprint { positions }
    }

    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    pub fn bit_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn common_bits(&self, other: &SparseFingerprint) -> usize {
        count_common(&self.positions, &other.positions)
    }

    pub fn tanimoto(&self, other: &SparseFingerprint) -> f64 {
        let common = self.common_bits(other);
        let union = self.bit_count() + other.bit_count() - common;
        if union == 0 {
            return 1.0;
        }
        common as f64 / union as f64
    }

    pub fn modified_tanimoto(&self, other: &SparseFingerprint) -> f64 {
        modified_tanimoto(
            self.common_bits(other),
            self.bit_count(),
            other.bit_count(),
        )
    }

    /// Folds positions into `[0, target)`.
    ///
    /// Bits past the end are shifted down by 80% of the target, then by 64%, and whatever is
    /// still out of range is spread over the top 48% of the vector by modulus.
    pub fn fold(&self, target: u32) -> eyre::Result<SparseFingerprint> {
        if target == 0 {
            return Err(eyre::eyre!("Cannot fold a fingerprint to zero bits"));
        }
        let target = target as u64;
        let first_shift = target * 8 / 10;
        let second_shift = target * 64 / 100;
        let fold_start = target * 52 / 100;
        let fold_size = target - fold_start;

        let folded = self.positions.iter().map(|&pos| {
            let mut bit = pos as u64;
            if bit >= target {
                bit -= first_shift;
                if bit >= target {
                    bit -= second_shift;
                    if bit >= target {
                        bit = fold_start + bit % fold_size;
                    }
                }
            }
            bit as u32
        });

        Ok(SparseFingerprint::from_positions(folded))
    }

    pub fn to_dense(&self) -> DenseFingerprint {
        DenseFingerprint::from_positions(&self.positions, 0)
    }

    pub fn to_hex(&self) -> String {
        self.to_dense().to_hex()
    }

    pub fn to_bin(&self) -> String {
        self.to_dense().to_bin()
    }
}

/// Size of the intersection of two sorted, duplicate-free slices.
pub fn count_common<T: Ord>(a: &[T], b: &[T]) -> usize {
    let (mut i, mut j, mut common) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                common += 1;
                i += 1;
                j += 1;
            }
        }
    }
    common
}
