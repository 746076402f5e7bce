//! Topological symmetry classes.
//!
//! Atoms are partitioned by iterative refinement of local invariants: each round an atom's
//! class becomes its previous class plus the sorted multiset of (neighbor class, bond type).
//! Refinement stops when the number of classes no longer grows. Class ids are dense ranks
//! of the invariants, so they do not depend on atom numbering.

use std::collections::VecDeque;

use crate::molecule::MoleculeGraph;

/// Symmetry class per atom slot; `None` for empty slots.
pub fn symmetry_classes<G: MoleculeGraph + ?Sized>(mol: &G) -> Vec<Option<usize>> {
    let atoms = mol.atom_indices();
    if atoms.is_empty() {
        return vec![None; mol.atom_slots()];
    }

    let components = component_sizes(mol);
    let initial: Vec<(usize, Vec<usize>)> = atoms
        .iter()
        .filter_map(|&idx| {
            mol.atom(idx).map(|atom| {
                let invariant = vec![
                    atom.element as usize,
                    atom.aromatic as usize,
                    atom.heavy_degree as usize,
                    atom.valence as usize,
                    components[idx],
                    smallest_ring(mol, idx),
                ];
                (idx, invariant)
            })
        })
        .collect();
    let mut classes = rank(mol.atom_slots(), initial);
    let mut n_classes = count_classes(&classes);

    loop {
        let refined: Vec<(usize, Vec<usize>)> = atoms
            .iter()
            .map(|&idx| {
                let mut neighbors: Vec<usize> = mol
                    .atom_bonds(idx)
                    .iter()
                    .filter_map(|&bond_idx| mol.bond(bond_idx))
                    .filter_map(|bond| {
                        classes[bond.neighbor(idx)]
                            .map(|class| class * 8 + bond.bond_type() as usize)
                    })
                    .collect();
                neighbors.sort_unstable();

                let mut invariant = Vec::with_capacity(neighbors.len() + 1);
                invariant.push(classes[idx].unwrap_or(0));
                invariant.extend(neighbors);
                (idx, invariant)
            })
            .collect();

        let next = rank(mol.atom_slots(), refined);
        let n_next = count_classes(&next);
        classes = next;
        if n_next <= n_classes {
            break;
        }
        n_classes = n_next;
    }

    classes
}

fn rank(slots: usize, mut keyed: Vec<(usize, Vec<usize>)>) -> Vec<Option<usize>> {
    keyed.sort_by(|a, b| a.1.cmp(&b.1));

    let mut classes = vec![None; slots];
    let mut class = 0;
    for i in 0..keyed.len() {
        if i > 0 && keyed[i].1 != keyed[i - 1].1 {
            class += 1;
        }
        classes[keyed[i].0] = Some(class);
    }
    classes
}

fn count_classes(classes: &[Option<usize>]) -> usize {
    classes
        .iter()
        .flatten()
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}

fn component_sizes<G: MoleculeGraph + ?Sized>(mol: &G) -> Vec<usize> {
    let mut sizes = vec![0; mol.atom_slots()];
    let mut seen = vec![false; mol.atom_slots()];

    for start in mol.atom_indices() {
        if seen[start] {
            continue;
        }
        let mut members = vec![start];
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(atom) = stack.pop() {
            for bond in mol.atom_bonds(atom).iter().filter_map(|&b| mol.bond(b)) {
                let next = bond.neighbor(atom);
                if !seen[next] && mol.atom(next).is_some() {
                    seen[next] = true;
                    members.push(next);
                    stack.push(next);
                }
            }
        }
        for &member in &members {
            sizes[member] = members.len();
        }
    }

    sizes
}

/// Size of the smallest ring through `atom`, 0 for acyclic atoms.
fn smallest_ring<G: MoleculeGraph + ?Sized>(mol: &G, atom: usize) -> usize {
    let mut best = 0;

    for &first_bond in mol.atom_bonds(atom) {
        let Some(bond) = mol.bond(first_bond) else {
            continue;
        };
        let start = bond.neighbor(atom);

        let mut distance = vec![usize::MAX; mol.atom_slots()];
        distance[start] = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if best != 0 && distance[current] + 2 >= best {
                break;
            }
            for &bond_idx in mol.atom_bonds(current) {
                if bond_idx == first_bond {
                    continue;
                }
                let Some(bond) = mol.bond(bond_idx) else {
                    continue;
                };
                let next = bond.neighbor(current);
                if next == atom {
                    let ring = distance[current] + 2;
                    if best == 0 || ring < best {
                        best = ring;
                    }
                } else if distance[next] == usize::MAX {
                    distance[next] = distance[current] + 1;
                    queue.push_back(next);
                }
            }
        }
    }

    best
}
