use crate::molecule::MoleculeGraph;

/// A bounded walk from a root atom.
///
/// `atoms[0]` is the root. A plain walk has one bond fewer than atoms; a walk that ends in a
/// ring closure carries one extra bond leading back to an atom already on the walk.
#[derive(Debug, Clone, Copy)]
pub struct Walk<'a> {
    pub atoms: &'a [usize],
    pub bonds: &'a [usize],
}

impl<'a> Walk<'a> {
    pub fn is_ring_closure(&self) -> bool {
        !self.bonds.is_empty() && self.bonds.len() == self.atoms.len()
    }

    pub fn n_bonds(&self) -> usize {
        self.bonds.len()
    }
}

/// Calls `visit` for the root alone and for every walk of up to `max_bonds` bonds.
///
/// Atoms and bonds are only excluded while they are on the current walk, so the same atom
/// shows up in many walks. A bond to an atom already on the walk is reported as a ring
/// closure and not followed.
pub fn for_each_walk<G, F>(mol: &G, root: usize, max_bonds: usize, mut visit: F)
where
    G: MoleculeGraph + ?Sized,
    F: FnMut(&Walk<'_>),
{
    if mol.atom(root).is_none() {
        return;
    }

    let mut atoms = vec![root];
    let mut bonds: Vec<usize> = Vec::with_capacity(max_bonds);
    let mut atom_on_walk = vec![false; mol.atom_slots()];
    let mut bond_on_walk = vec![false; mol.bond_slots()];
    // next incident bond to try, one cursor per atom on the walk
    let mut cursors = vec![0usize];
    atom_on_walk[root] = true;

    visit(&Walk {
        atoms: &atoms,
        bonds: &bonds,
    });

    while let Some(&cursor) = cursors.last() {
        let depth = cursors.len() - 1;
        let current = atoms[depth];
        let incident = mol.atom_bonds(current);

        if bonds.len() >= max_bonds || cursor >= incident.len() {
            cursors.pop();
            if depth == 0 {
                break;
            }
            atom_on_walk[current] = false;
            atoms.pop();
            if let Some(bond_idx) = bonds.pop() {
                bond_on_walk[bond_idx] = false;
            }
            continue;
        }

        cursors[depth] += 1;
        let bond_idx = incident[cursor];
        if bond_on_walk[bond_idx] {
            continue;
        }
        let Some(bond) = mol.bond(bond_idx) else {
            continue;
        };
        let next = bond.neighbor(current);
        if mol.atom(next).is_none() {
            continue;
        }

        bonds.push(bond_idx);
        if atom_on_walk[next] {
            visit(&Walk {
                atoms: &atoms,
                bonds: &bonds,
            });
            bonds.pop();
            continue;
        }

        bond_on_walk[bond_idx] = true;
        atom_on_walk[next] = true;
        atoms.push(next);
        cursors.push(0);
        visit(&Walk {
            atoms: &atoms,
            bonds: &bonds,
        });
    }
}
