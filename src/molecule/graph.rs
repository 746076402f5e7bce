use serde::{Deserialize, Serialize};

use crate::molecule::{element_count, Atom, Bond, MoleculeGraph};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub element: u8,
    #[serde(default)]
    pub aromatic: bool,
    /// Total valence; derived from the bonds and `hydrogens` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<u8>,
    #[serde(default)]
    pub hydrogens: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondRecord {
    pub begin: usize,
    pub end: usize,
    #[serde(default = "default_bond_order")]
    pub order: u8,
    #[serde(default)]
    pub aromatic: bool,
}

fn default_bond_order() -> u8 {
    1
}

/// Serialized form of a molecule, one JSON object per line in command line inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoleculeRecord {
    #[serde(default)]
    pub id: String,
    pub atoms: Vec<AtomRecord>,
    #[serde(default)]
    pub bonds: Vec<BondRecord>,
}

impl MoleculeRecord {
    pub fn new(id: &str) -> Self {
        MoleculeRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, element: u8, aromatic: bool, hydrogens: u8) -> usize {
        self.atoms.push(AtomRecord {
            element,
            aromatic,
            valence: None,
            hydrogens,
        });
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, begin: usize, end: usize, order: u8, aromatic: bool) -> usize {
        self.bonds.push(BondRecord {
            begin,
            end,
            order,
            aromatic,
        });
        self.bonds.len() - 1
    }
}

/// Arena implementation of [`MoleculeGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    id: String,
    atoms: Vec<Option<Atom>>,
    bonds: Vec<Option<Bond>>,
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    pub fn from_record(record: &MoleculeRecord) -> eyre::Result<Molecule> {
        let n_atoms = record.atoms.len();
        let max_element = element_count();

        for (idx, atom) in record.atoms.iter().enumerate() {
            if atom.element == 0 || atom.element as usize > max_element {
                return Err(eyre::eyre!(
                    "Molecule '{}': atom {} has invalid element {}",
                    record.id,
                    idx,
                    atom.element
                ));
            }
        }

        let mut bonds = Vec::with_capacity(record.bonds.len());
        for (idx, bond) in record.bonds.iter().enumerate() {
            if bond.begin >= n_atoms || bond.end >= n_atoms {
                return Err(eyre::eyre!(
                    "Molecule '{}': bond {} references a missing atom",
                    record.id,
                    idx
                ));
            }
            if bond.begin == bond.end {
                return Err(eyre::eyre!(
                    "Molecule '{}': bond {} is a self loop",
                    record.id,
                    idx
                ));
            }
            bonds.push(Some(Bond {
                begin: bond.begin,
                end: bond.end,
                order: bond.order,
                aromatic: bond.aromatic,
            }));
        }

        let adjacency = build_adjacency(n_atoms, &bonds);

        let atoms = record
            .atoms
            .iter()
            .enumerate()
            .map(|(idx, rec)| {
                let mut heavy_degree = 0u8;
                let mut bond_order_sum = 0.0f64;
                for &bond_idx in &adjacency[idx] {
                    if let Some(bond) = &bonds[bond_idx] {
                        if record.atoms[bond.neighbor(idx)].element != 1 {
                            heavy_degree = heavy_degree.saturating_add(1);
                        }
                        bond_order_sum += if bond.aromatic {
                            1.5
                        } else {
                            bond.order as f64
                        };
                    }
                }
                let valence = match rec.valence {
                    Some(valence) => valence,
                    None => {
                        let total = bond_order_sum.floor() + rec.hydrogens as f64;
                        if total > u8::MAX as f64 {
                            return Err(eyre::eyre!(
                                "Molecule '{}': atom {} has valence {} out of range",
                                record.id,
                                idx,
                                total
                            ));
                        }
                        total as u8
                    }
                };

                Ok(Some(Atom {
                    element: rec.element,
                    aromatic: rec.aromatic,
                    valence,
                    heavy_degree,
                }))
            })
            .collect::<eyre::Result<Vec<_>>>()?;

        Ok(Molecule {
            id: record.id.clone(),
            atoms,
            bonds,
            adjacency,
        })
    }

    pub fn from_json(line: &str) -> eyre::Result<Molecule> {
        let record: MoleculeRecord = serde_json::from_str(line)?;
        Molecule::from_record(&record)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Copy with every hydrogen slot emptied; indices of the remaining atoms are unchanged.
    pub fn without_hydrogens(&self) -> Molecule {
        let atoms: Vec<Option<Atom>> = self
            .atoms
            .iter()
            .map(|atom| atom.filter(|a| a.element != 1))
            .collect();
        let bonds: Vec<Option<Bond>> = self
            .bonds
            .iter()
            .map(|bond| {
                bond.filter(|b| atoms[b.begin].is_some() && atoms[b.end].is_some())
            })
            .collect();
        let adjacency = build_adjacency(atoms.len(), &bonds);

        Molecule {
            id: self.id.clone(),
            atoms,
            bonds,
            adjacency,
        }
    }

    /// Same graph with atom slot `i` taken from `atom_order[i]` and bond slot `j` from
    /// `bond_order[j]`. Both orders must be permutations of the current slots.
    pub fn renumbered(&self, atom_order: &[usize], bond_order: &[usize]) -> eyre::Result<Molecule> {
        let new_atom_index = inverse_permutation(atom_order, self.atoms.len())
            .ok_or(eyre::eyre!("Atom order is not a permutation"))?;
        inverse_permutation(bond_order, self.bonds.len())
            .ok_or(eyre::eyre!("Bond order is not a permutation"))?;

        let atoms = atom_order.iter().map(|&old| self.atoms[old]).collect();
        let bonds: Vec<Option<Bond>> = bond_order
            .iter()
            .map(|&old| {
                self.bonds[old].map(|b| Bond {
                    begin: new_atom_index[b.begin],
                    end: new_atom_index[b.end],
                    ..b
                })
            })
            .collect();
        let adjacency = build_adjacency(atom_order.len(), &bonds);

        Ok(Molecule {
            id: self.id.clone(),
            atoms,
            bonds,
            adjacency,
        })
    }
}

impl MoleculeGraph for Molecule {
    fn atom_slots(&self) -> usize {
        self.atoms.len()
    }

    fn bond_slots(&self) -> usize {
        self.bonds.len()
    }

    fn atom(&self, idx: usize) -> Option<Atom> {
        self.atoms.get(idx).copied().flatten()
    }

    fn bond(&self, idx: usize) -> Option<Bond> {
        self.bonds.get(idx).copied().flatten()
    }

    fn atom_bonds(&self, idx: usize) -> &[usize] {
        self.adjacency.get(idx).map(|b| b.as_slice()).unwrap_or(&[])
    }
}

fn build_adjacency(n_atoms: usize, bonds: &[Option<Bond>]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); n_atoms];
    for (bond_idx, bond) in bonds.iter().enumerate() {
        if let Some(bond) = bond {
            adjacency[bond.begin].push(bond_idx);
            adjacency[bond.end].push(bond_idx);
        }
    }
    adjacency
}

fn inverse_permutation(order: &[usize], len: usize) -> Option<Vec<usize>> {
    if order.len() != len {
        return None;
    }
    let mut inverse = vec![usize::MAX; len];
    for (new, &old) in order.iter().enumerate() {
        if old >= len || inverse[old] != usize::MAX {
            return None;
        }
        inverse[old] = new;
    }
    Some(inverse)
}
