//! Linear path fingerprints.
//!
//! Every walk of one or more bonds is written as alternating atom and bond symbols and
//! canonicalized so that the same path read from either end, or a ring entered at any atom,
//! yields one code. Codes are mapped to bit positions through a feature dictionary.

use crate::fingerprint::SparseFingerprint;
use crate::molecule::MoleculeGraph;
use crate::paths::{for_each_walk, Walk};

pub const DEFAULT_FEATURE_TYPE: &str = "lin74";
pub const DEFAULT_MAX_BONDS: usize = 7;
pub const DEFAULT_STAR_ATOM_DEPTH: usize = 4;

const STAR_ATOM: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearPathFingerprinter {
    feature_type: String,
    max_bonds: usize,
    star_atom_depth: usize,
}

impl Default for LinearPathFingerprinter {
    fn default() -> Self {
        LinearPathFingerprinter {
            feature_type: DEFAULT_FEATURE_TYPE.to_string(),
            max_bonds: DEFAULT_MAX_BONDS,
            star_atom_depth: DEFAULT_STAR_ATOM_DEPTH,
        }
    }
}

impl LinearPathFingerprinter {
    /// Paths with at least `star_atom_depth` bonds have their atoms written as `*`.
    pub fn new(feature_type: &str, max_bonds: usize, star_atom_depth: usize) -> eyre::Result<Self> {
        if max_bonds == 0 {
            return Err(eyre::eyre!("Linear paths need at least one bond"));
        }
        Ok(LinearPathFingerprinter {
            feature_type: feature_type.to_string(),
            max_bonds,
            star_atom_depth,
        })
    }

    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    /// Distinct canonical path codes of the molecule, sorted.
    pub fn codes<G: MoleculeGraph + ?Sized>(&self, mol: &G) -> Vec<String> {
        let mut codes = Vec::new();
        for root in mol.atom_indices() {
            for_each_walk(mol, root, self.max_bonds, |walk| {
                if walk.n_bonds() > 0 {
                    self.walk_codes(mol, walk, &mut codes);
                }
            });
        }
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Maps each code through `index_of(feature_type, code)`; unmapped codes set no bit.
    pub fn fingerprint<G, F>(&self, mol: &G, mut index_of: F) -> SparseFingerprint
    where
        G: MoleculeGraph + ?Sized,
        F: FnMut(&str, &str) -> Option<u32>,
    {
        let codes = self.codes(mol);
        SparseFingerprint::from_positions(
            codes
                .iter()
                .filter_map(|code| index_of(&self.feature_type, code)),
        )
    }

    fn walk_codes<G: MoleculeGraph + ?Sized>(&self, mol: &G, walk: &Walk<'_>, codes: &mut Vec<String>) {
        let starred = walk.n_bonds() >= self.star_atom_depth;
        let typed_atoms: Vec<String> = walk
            .atoms
            .iter()
            .map(|&idx| {
                mol.atom(idx)
                    .map(|atom| atom.symbol())
                    .unwrap_or_else(|| STAR_ATOM.to_string())
            })
            .collect();
        let star_atoms: Vec<String> = vec![STAR_ATOM.to_string(); walk.atoms.len()];
        let atoms = if starred { &star_atoms } else { &typed_atoms };
        let bonds: Vec<&str> = walk
            .bonds
            .iter()
            .map(|&idx| mol.bond(idx).map(|bond| bond.symbol()).unwrap_or("~"))
            .collect();

        if !walk.is_ring_closure() {
            codes.push(canonical_chain(atoms, &bonds));
            return;
        }

        let closes_at = walk
            .bonds
            .last()
            .zip(walk.atoms.last())
            .and_then(|(&bond, &last)| mol.bond(bond).map(|b| b.neighbor(last)))
            .and_then(|closing| walk.atoms.iter().position(|&idx| idx == closing))
            .unwrap_or(0);

        if closes_at == 0 {
            codes.push(canonical_ring(atoms, &bonds));
            if starred {
                codes.push(canonical_ring(&typed_atoms, &bonds));
            }
        } else {
            codes.push(canonical_lasso(atoms, &bonds, closes_at));
        }
    }
}

/// Smaller of the chain read forwards and backwards.
fn canonical_chain(atoms: &[String], bonds: &[&str]) -> String {
    let mut forward = String::new();
    let mut backward = String::new();
    let last = atoms.len() - 1;
    for i in 0..atoms.len() {
        forward.push_str(&atoms[i]);
        backward.push_str(&atoms[last - i]);
        if i < bonds.len() {
            forward.push_str(bonds[i]);
            backward.push_str(bonds[bonds.len() - 1 - i]);
        }
    }
    forward.min(backward)
}

/// Smallest reading of a ring over every starting atom and both directions.
///
/// `bonds[i]` joins `atoms[i]` to `atoms[(i + 1) % n]`.
fn canonical_ring(atoms: &[String], bonds: &[&str]) -> String {
    let n = atoms.len();
    let mut best: Option<String> = None;

    for start in 0..n {
        let mut forward = String::new();
        let mut backward = String::new();
        for step in 0..n {
            let ahead = (start + step) % n;
            forward.push_str(&atoms[ahead]);
            forward.push_str(bonds[ahead]);

            let behind = (start + n - step) % n;
            backward.push_str(&atoms[behind]);
            backward.push_str(bonds[(behind + n - 1) % n]);
        }
        for candidate in [forward, backward] {
            if best.as_ref().map_or(true, |b| candidate < *b) {
                best = Some(candidate);
            }
        }
    }

    best.unwrap_or_default()
}

/// A chain ending in a ring that closes at `atoms[ring_start]`. Only the ring part can be
/// read in two directions.
fn canonical_lasso(atoms: &[String], bonds: &[&str], ring_start: usize) -> String {
    let mut tail = String::new();
    for i in 0..ring_start {
        tail.push_str(&atoms[i]);
        tail.push_str(bonds[i]);
    }

    let last = atoms.len() - 1;
    let mut forward = tail.clone();
    for i in ring_start..=last {
        forward.push_str(&atoms[i]);
        forward.push_str(bonds[i]);
    }

    let mut backward = tail;
    backward.push_str(&atoms[ring_start]);
    backward.push_str(bonds[last]);
    for i in (ring_start + 1..=last).rev() {
        backward.push_str(&atoms[i]);
        backward.push_str(bonds[i - 1]);
    }

    forward.min(backward)
}
