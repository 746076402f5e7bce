//! Per-atom path features.
//!
//! Every atom is described by the set of bounded walks that start at it, each walk encoded as
//! a token sequence by a [`PathEncoder`]. Two atoms with similar neighborhoods share many
//! paths; the matcher counts the shared ones.

use std::collections::HashMap;
use std::sync::Arc;

use crate::molecule::symmetry::symmetry_classes;
use crate::molecule::{Atom, MoleculeGraph};

pub mod encoding;
pub mod walk;

pub use encoding::{PackedEncoder, PathEncoder, PathEncoding, TextEncoder, Token};
pub use walk::{for_each_walk, Walk};

pub const DEFAULT_MAX_BONDS: usize = 7;

#[derive(Debug, Clone)]
pub struct PathExtractor<E: PathEncoder> {
    encoder: E,
    max_bonds: usize,
    head_atom_in_paths: bool,
}

impl<E: PathEncoder> PathExtractor<E> {
    pub fn new(encoder: E, max_bonds: usize) -> Self {
        PathExtractor {
            encoder,
            max_bonds,
            head_atom_in_paths: false,
        }
    }

    /// Whether paths start with the root atom's own token. When they do, the bare root is a
    /// path of length zero; otherwise every path starts with a bond.
    pub fn with_head_atom(mut self, head_atom_in_paths: bool) -> Self {
        self.head_atom_in_paths = head_atom_in_paths;
        self
    }

    pub fn max_bonds(&self) -> usize {
        self.max_bonds
    }

    /// Sorted, distinct path codes of the walks rooted at `atom`.
    pub fn paths_of<G: MoleculeGraph + ?Sized>(&self, mol: &G, atom: usize) -> Vec<E::Code> {
        let mut codes = Vec::new();
        let mut tokens: Vec<Token> = Vec::with_capacity(2 * self.max_bonds + 1);

        for_each_walk(mol, atom, self.max_bonds, |walk| {
            if walk.n_bonds() == 0 && !self.head_atom_in_paths {
                return;
            }

            tokens.clear();
            if self.head_atom_in_paths {
                if let Some(root) = mol.atom(walk.atoms[0]) {
                    tokens.push(root.into());
                }
            }
            for (step, &bond_idx) in walk.bonds.iter().enumerate() {
                if let Some(bond) = mol.bond(bond_idx) {
                    tokens.push(bond.into());
                }
                if let Some(next) = walk.atoms.get(step + 1).and_then(|&idx| mol.atom(idx)) {
                    tokens.push(next.into());
                }
            }
            codes.push(self.encoder.encode(&tokens));
        });

        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Path sets for every atom. Atoms in one symmetry class that turn out to have equal sets
    /// share a single allocation.
    pub fn molecule_paths<G: MoleculeGraph + ?Sized>(&self, mol: &G) -> MoleculePaths<E::Code> {
        let classes = symmetry_classes(mol);
        let mut by_class: HashMap<usize, Vec<Arc<[E::Code]>>> = HashMap::new();
        let mut shared = 0;

        let atoms = (0..mol.atom_slots())
            .map(|idx| {
                let atom = mol.atom(idx)?;
                let codes = self.paths_of(mol, idx);
                let paths = match classes[idx] {
                    Some(class) => {
                        // refinement classes are only candidates; members can still differ
                        let candidates = by_class.entry(class).or_default();
                        match candidates.iter().find(|paths| paths[..] == codes[..]) {
                            Some(paths) => {
                                shared += 1;
                                paths.clone()
                            }
                            None => {
                                let paths: Arc<[E::Code]> = codes.into();
                                candidates.push(paths.clone());
                                paths
                            }
                        }
                    }
                    None => codes.into(),
                };
                Some(AtomPaths { atom, paths })
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Extracted paths for {} atoms in {} symmetry classes, {} sets shared",
            mol.num_atoms(),
            by_class.len(),
            shared
        );
        MoleculePaths::new(atoms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomPaths<C> {
    pub atom: Atom,
    pub paths: Arc<[C]>,
}

/// Path sets of one molecule, indexed by atom slot.
#[derive(Debug, Clone)]
pub struct MoleculePaths<C> {
    atoms: Vec<Option<AtomPaths<C>>>,
    n_atoms: usize,
}

impl<C> MoleculePaths<C> {
    pub fn new(atoms: Vec<Option<AtomPaths<C>>>) -> Self {
        let n_atoms = atoms.iter().filter(|atom| atom.is_some()).count();
        MoleculePaths { atoms, n_atoms }
    }

    pub fn num_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn atom_slots(&self) -> usize {
        self.atoms.len()
    }

    pub fn get(&self, idx: usize) -> Option<&AtomPaths<C>> {
        self.atoms.get(idx).and_then(|atom| atom.as_ref())
    }

    pub fn atoms(&self) -> impl Iterator<Item = (usize, &AtomPaths<C>)> {
        self.atoms
            .iter()
            .enumerate()
            .filter_map(|(idx, atom)| atom.as_ref().map(|atom| (idx, atom)))
    }
}
