use bitvec::prelude::*;

/// Byte-backed fingerprint. Bit 0 is the most significant bit of the first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseFingerprint {
    bits: BitVec<u8, Msb0>,
    n_bits: usize,
}

impl DenseFingerprint {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bits = BitVec::<u8, Msb0>::from_slice(bytes);
        let n_bits = bits.count_ones();
        DenseFingerprint { bits, n_bits }
    }

    /// Parses hexadecimal text; an odd trailing digit fills the high nibble of the last byte.
    pub fn from_hex(hex: &str) -> eyre::Result<Self> {
        let mut bytes = Vec::with_capacity((hex.len() + 1) / 2);
        for pair in hex.as_bytes().chunks(2) {
            let high = hex_digit(pair[0])?;
            let low = match pair.get(1) {
                Some(&digit) => hex_digit(digit)?,
                None => 0,
            };
            bytes.push(high << 4 | low);
        }
        Ok(DenseFingerprint::from_bytes(&bytes))
    }

    /// Parses `0`/`1` text; the last byte is padded with unset bits.
    pub fn from_bin(bin: &str) -> eyre::Result<Self> {
        let mut bits = BitVec::<u8, Msb0>::with_capacity(bin.len());
        for c in bin.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => {
                    return Err(eyre::eyre!(
                        "Invalid character '{}' in binary fingerprint",
                        other
                    ))
                }
            }
        }
        bits.set_uninitialized(false);
        Ok(DenseFingerprint::from_bytes(bits.as_raw_slice()))
    }

    /// Sets the given positions in a vector of `n_bytes` bytes, growing it if needed.
    pub fn from_positions(positions: &[u32], n_bytes: usize) -> Self {
        let needed = positions
            .iter()
            .max()
            .map(|&max| max as usize / 8 + 1)
            .unwrap_or(0);
        let mut bits = bitvec![u8, Msb0; 0; n_bytes.max(needed) * 8];
        for &pos in positions {
            bits.set(pos as usize, true);
        }
        let n_bits = bits.count_ones();
        DenseFingerprint { bits, n_bits }
    }

    /// Number of set bits, computed once at construction.
    pub fn bit_count(&self) -> usize {
        self.n_bits
    }

    /// Length of the vector in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn bit_positions(&self) -> Vec<u32> {
        self.bits.iter_ones().map(|pos| pos as u32).collect()
    }

    /// Set bits present in both vectors; only the overlapping bytes can contribute.
    pub fn common_bits(&self, other: &DenseFingerprint) -> usize {
        self.as_bytes()
            .iter()
            .zip(other.as_bytes())
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    pub fn tanimoto(&self, other: &DenseFingerprint) -> f64 {
        let common = self.common_bits(other);
        let union = self.n_bits + other.n_bits - common;
        if union == 0 {
            return 1.0;
        }
        common as f64 / union as f64
    }

    pub fn modified_tanimoto(&self, other: &DenseFingerprint) -> f64 {
        let common = self.common_bits(other);
        modified_tanimoto(common, self.n_bits, other.n_bits)
    }

    /// Two lowercase digits per byte. Input hex is accepted in either case, so the round trip
    /// reproduces a string only up to case and a trailing padding nibble.
    pub fn to_hex(&self) -> String {
        self.as_bytes()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }

    pub fn to_bin(&self) -> String {
        self.bits
            .iter()
            .map(|bit| if *bit { '1' } else { '0' })
            .collect()
    }
}

pub(crate) fn modified_tanimoto(common: usize, n1: usize, n2: usize) -> f64 {
    let denominator = 2 * n1.max(n2) - common;
    if denominator == 0 {
        return 1.0;
    }
    common as f64 / denominator as f64
}

fn hex_digit(digit: u8) -> eyre::Result<u8> {
    (digit as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(eyre::eyre!(
            "Invalid character '{}' in hex fingerprint",
            digit as char
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_layout() {
        let fp = DenseFingerprint::from_hex("80").unwrap();
        assert_eq!(fp.bit_positions(), vec![0]);
        assert_eq!(fp.to_bin(), "10000000");
    }

    #[test]
    fn test_odd_hex_fills_high_nibble() {
        let fp = DenseFingerprint::from_hex("FFA").unwrap();
        assert_eq!(fp.as_bytes(), &[0xff, 0xa0]);
        assert_eq!(fp.to_hex(), "ffa0");
        assert_eq!(fp.bit_count(), 10);
    }

    #[test]
    fn test_hex_output_is_lowercase() {
        let fp = DenseFingerprint::from_hex("0AF3").unwrap();
        assert_eq!(fp.to_hex(), "0af3");
        assert_eq!(DenseFingerprint::from_hex(&fp.to_hex()).unwrap(), fp);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(DenseFingerprint::from_hex("0g").is_err());
        assert!(DenseFingerprint::from_bin("0120").is_err());
    }
}
