#![allow(dead_code)]

use chemsim::molecule::{Molecule, MoleculeRecord};
use rand::seq::SliceRandom;
use rand::Rng;

pub const H: u8 = 1;
pub const C: u8 = 6;
pub const N: u8 = 7;
pub const O: u8 = 8;
pub const F: u8 = 9;
pub const NA: u8 = 11;
pub const S: u8 = 16;
pub const CL: u8 = 17;

/// Aromatic six-ring of `ring` elements, each carrying one hydrogen unless substituted.
fn aromatic_ring(record: &mut MoleculeRecord, ring: [u8; 6]) -> Vec<usize> {
    let atoms: Vec<usize> = ring
        .iter()
        .map(|&element| {
            let hydrogens = if element == C { 1 } else { 0 };
            record.add_atom(element, true, hydrogens)
        })
        .collect();
    for i in 0..6 {
        record.add_bond(atoms[i], atoms[(i + 1) % 6], 1, true);
    }
    atoms
}

fn build(record: &MoleculeRecord) -> Molecule {
    Molecule::from_record(record).unwrap()
}

pub fn benzene() -> Molecule {
    let mut record = MoleculeRecord::new("benzene");
    aromatic_ring(&mut record, [C; 6]);
    build(&record)
}

pub fn pyridine() -> Molecule {
    let mut record = MoleculeRecord::new("pyridine");
    aromatic_ring(&mut record, [N, C, C, C, C, C]);
    build(&record)
}

/// Benzene with one ring hydrogen replaced by `element` carrying `hydrogens`.
fn substituted_benzene(id: &str, element: u8, hydrogens: u8) -> Molecule {
    let mut record = MoleculeRecord::new(id);
    let ring = aromatic_ring(&mut record, [C; 6]);
    record.atoms[ring[0]].hydrogens = 0;
    let substituent = record.add_atom(element, false, hydrogens);
    record.add_bond(ring[0], substituent, 1, false);
    build(&record)
}

pub fn toluene() -> Molecule {
    substituted_benzene("toluene", C, 3)
}

pub fn phenol() -> Molecule {
    substituted_benzene("phenol", O, 1)
}

pub fn fluorobenzene() -> Molecule {
    substituted_benzene("fluorobenzene", F, 0)
}

pub fn chlorobenzene() -> Molecule {
    substituted_benzene("chlorobenzene", CL, 0)
}

pub fn ethanol() -> Molecule {
    let mut record = MoleculeRecord::new("ethanol");
    let c1 = record.add_atom(C, false, 3);
    let c2 = record.add_atom(C, false, 2);
    let o = record.add_atom(O, false, 1);
    record.add_bond(c1, c2, 1, false);
    record.add_bond(c2, o, 1, false);
    build(&record)
}

/// Ethanol with every hydrogen written as an atom.
pub fn ethanol_explicit_h() -> Molecule {
    let mut record = MoleculeRecord::new("ethanol-h");
    let h0 = record.add_atom(H, false, 0);
    let c1 = record.add_atom(C, false, 0);
    let h1 = record.add_atom(H, false, 0);
    let c2 = record.add_atom(C, false, 0);
    let h2 = record.add_atom(H, false, 0);
    let o = record.add_atom(O, false, 0);
    let h3 = record.add_atom(H, false, 0);
    let h4 = record.add_atom(H, false, 0);
    let h5 = record.add_atom(H, false, 0);
    record.add_bond(h0, c1, 1, false);
    record.add_bond(c1, c2, 1, false);
    record.add_bond(c1, h1, 1, false);
    record.add_bond(c1, h4, 1, false);
    record.add_bond(c2, h2, 1, false);
    record.add_bond(c2, h5, 1, false);
    record.add_bond(c2, o, 1, false);
    record.add_bond(o, h3, 1, false);
    build(&record)
}

pub fn propanol() -> Molecule {
    let mut record = MoleculeRecord::new("propanol");
    let c1 = record.add_atom(C, false, 3);
    let c2 = record.add_atom(C, false, 2);
    let c3 = record.add_atom(C, false, 2);
    let o = record.add_atom(O, false, 1);
    record.add_bond(c1, c2, 1, false);
    record.add_bond(c2, c3, 1, false);
    record.add_bond(c3, o, 1, false);
    build(&record)
}

pub fn acetic_acid() -> Molecule {
    let mut record = MoleculeRecord::new("acetic-acid");
    let c1 = record.add_atom(C, false, 3);
    let c2 = record.add_atom(C, false, 0);
    let o1 = record.add_atom(O, false, 0);
    let o2 = record.add_atom(O, false, 1);
    record.add_bond(c1, c2, 1, false);
    record.add_bond(c2, o1, 2, false);
    record.add_bond(c2, o2, 1, false);
    build(&record)
}

pub fn cyclohexane() -> Molecule {
    let mut record = MoleculeRecord::new("cyclohexane");
    let atoms: Vec<usize> = (0..6).map(|_| record.add_atom(C, false, 2)).collect();
    for i in 0..6 {
        record.add_bond(atoms[i], atoms[(i + 1) % 6], 1, false);
    }
    build(&record)
}

/// Ten carbons, every one with three ring bonds. Color refinement cannot tell all of its
/// inequivalent atoms apart.
pub fn cubic_cage() -> Molecule {
    let mut record = MoleculeRecord::new("cubic-cage");
    let atoms: Vec<usize> = (0..10).map(|_| record.add_atom(C, false, 1)).collect();
    for (a, b) in [
        (0, 1),
        (7, 9),
        (1, 9),
        (0, 2),
        (3, 4),
        (1, 6),
        (6, 9),
        (3, 6),
        (2, 7),
        (0, 3),
        (4, 5),
        (4, 8),
        (5, 8),
        (2, 5),
        (7, 8),
    ] {
        record.add_bond(atoms[a], atoms[b], 1, false);
    }
    build(&record)
}

/// Sodium acetate as two components; the sodium has no bonds at all.
pub fn sodium_acetate() -> Molecule {
    let mut record = MoleculeRecord::new("sodium-acetate");
    let c1 = record.add_atom(C, false, 3);
    let c2 = record.add_atom(C, false, 0);
    let o1 = record.add_atom(O, false, 0);
    let o2 = record.add_atom(O, false, 0);
    record.add_atom(NA, false, 0);
    record.add_bond(c1, c2, 1, false);
    record.add_bond(c2, o1, 2, false);
    record.add_bond(c2, o2, 1, false);
    build(&record)
}

pub fn single_atom(id: &str, element: u8) -> Molecule {
    let mut record = MoleculeRecord::new(id);
    record.add_atom(element, false, 0);
    build(&record)
}

pub fn empty_molecule() -> Molecule {
    build(&MoleculeRecord::new("empty"))
}

/// Unbranched chain of `n` carbons.
pub fn alkane(n: usize) -> Molecule {
    let mut record = MoleculeRecord::new(&format!("C{}", n));
    let atoms: Vec<usize> = (0..n).map(|_| record.add_atom(C, false, 2)).collect();
    for pair in atoms.windows(2) {
        record.add_bond(pair[0], pair[1], 1, false);
    }
    build(&record)
}

pub fn all_molecules() -> Vec<Molecule> {
    vec![
        benzene(),
        pyridine(),
        toluene(),
        phenol(),
        fluorobenzene(),
        chlorobenzene(),
        ethanol(),
        propanol(),
        acetic_acid(),
        cyclohexane(),
        sodium_acetate(),
    ]
}

/// Same molecule with atoms and bonds listed in random order. Returns the molecule and the
/// old atom index stored at each new slot.
pub fn scrambled<R: Rng>(mol: &Molecule, rng: &mut R) -> (Molecule, Vec<usize>) {
    use chemsim::molecule::MoleculeGraph;

    let mut atom_order: Vec<usize> = (0..mol.atom_slots()).collect();
    let mut bond_order: Vec<usize> = (0..mol.bond_slots()).collect();
    atom_order.shuffle(rng);
    bond_order.shuffle(rng);
    let renumbered = mol.renumbered(&atom_order, &bond_order).unwrap();
    (renumbered, atom_order)
}
