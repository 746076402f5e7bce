//! Molecule graph input contract.
//!
//! Everything downstream (path extraction, fingerprinting, matching) reads molecules through
//! [`MoleculeGraph`]. Atom and bond indices are slots: a slot may be empty, which models
//! index gaps left behind by hydrogen suppression or deleted atoms in the producing toolkit.

pub mod graph;
pub mod symmetry;

pub use graph::{AtomRecord, BondRecord, Molecule, MoleculeRecord};

/// Aromatic atoms are typed as `element + AROMATIC_TYPE_OFFSET`.
pub const AROMATIC_TYPE_OFFSET: u16 = 108;

/// Largest atom type value produced by [`Atom::atom_type`].
pub const MAX_ATOM_TYPE: u16 = 118 + AROMATIC_TYPE_OFFSET;

/// Bond type used for aromatic bonds, one past the largest plain order.
pub const AROMATIC_BOND_TYPE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    pub element: u8,
    pub aromatic: bool,
    /// Total valence, including implicit hydrogens.
    pub valence: u8,
    /// Number of heavy (non-hydrogen) neighbors.
    pub heavy_degree: u8,
}

impl Atom {
    /// Element and aromaticity folded into one compatibility key.
    pub fn atom_type(&self) -> u16 {
        atom_type(self.element, self.aromatic)
    }

    pub fn symbol(&self) -> String {
        let symbol = element_symbol(self.element);
        if self.aromatic {
            symbol.to_lowercase()
        } else {
            symbol.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: u8,
    pub aromatic: bool,
}

impl Bond {
    /// The endpoint opposite to `atom`.
    pub fn neighbor(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }

    pub fn bond_type(&self) -> u8 {
        bond_type(self.order, self.aromatic)
    }

    pub fn symbol(&self) -> &'static str {
        bond_symbol(self.order, self.aromatic)
    }
}

pub fn atom_type(element: u8, aromatic: bool) -> u16 {
    if aromatic {
        element as u16 + AROMATIC_TYPE_OFFSET
    } else {
        element as u16
    }
}

pub fn bond_type(order: u8, aromatic: bool) -> u8 {
    if aromatic {
        AROMATIC_BOND_TYPE
    } else {
        order.min(AROMATIC_BOND_TYPE - 1)
    }
}

pub fn bond_symbol(order: u8, aromatic: bool) -> &'static str {
    if aromatic {
        return ":";
    }
    match order {
        0 => "~",
        1 => "-",
        2 => "=",
        3 => "#",
        _ => "%",
    }
}

/// Read access to a molecular graph.
///
/// Implementations must keep indices stable while a comparison is running.
pub trait MoleculeGraph {
    /// Number of atom slots, including empty ones.
    fn atom_slots(&self) -> usize;

    fn bond_slots(&self) -> usize;

    fn atom(&self, idx: usize) -> Option<Atom>;

    fn bond(&self, idx: usize) -> Option<Bond>;

    /// Indices of the bonds incident to atom `idx`; empty for an empty slot.
    fn atom_bonds(&self, idx: usize) -> &[usize];

    fn num_atoms(&self) -> usize {
        (0..self.atom_slots())
            .filter(|&idx| self.atom(idx).is_some())
            .count()
    }

    fn atom_indices(&self) -> Vec<usize> {
        (0..self.atom_slots())
            .filter(|&idx| self.atom(idx).is_some())
            .collect()
    }
}

static ELEMENT_SYMBOLS: [&str; 119] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Element symbol for an atomic number; `*` for 0 and anything out of range.
pub fn element_symbol(element: u8) -> &'static str {
    ELEMENT_SYMBOLS
        .get(element as usize)
        .copied()
        .unwrap_or("*")
}

pub fn element_count() -> usize {
    ELEMENT_SYMBOLS.len() - 1
}
