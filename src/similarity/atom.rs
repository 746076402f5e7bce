use std::str::FromStr;

use crate::fingerprint::sparse::count_common;
use crate::molecule::Atom;
use crate::similarity::Aggregation;

const CARBON: u8 = 6;
const NITROGEN: u8 = 7;
const OXYGEN: u8 = 8;
const FLUORINE: u8 = 9;
const SULFUR: u8 = 16;
const CHLORINE: u8 = 17;
const BROMINE: u8 = 35;

/// How compatible two root atoms are, independent of their surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadAtomPolicy {
    /// 1 for equal atom types, 0 otherwise.
    #[default]
    Exact,
    /// Empirical partial credit between related elements.
    Fuzzy,
}

impl FromStr for HeadAtomPolicy {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(HeadAtomPolicy::Exact),
            "fuzzy" => Ok(HeadAtomPolicy::Fuzzy),
            other => Err(eyre::eyre!("Unknown head atom policy '{}'", other)),
        }
    }
}

impl HeadAtomPolicy {
    pub fn score(&self, a: &Atom, b: &Atom) -> f64 {
        match self {
            HeadAtomPolicy::Exact => {
                if a.atom_type() == b.atom_type() {
                    1.0
                } else {
                    0.0
                }
            }
            HeadAtomPolicy::Fuzzy => fuzzy_score(a, b),
        }
    }
}

fn fuzzy_score(a: &Atom, b: &Atom) -> f64 {
    let (a, b) = if a.element <= b.element { (a, b) } else { (b, a) };

    let same_type = a.atom_type() == b.atom_type();
    let same_aromaticity = a.aromatic == b.aromatic;
    let same_valence = a.valence == b.valence;
    let by_degree = if a.heavy_degree == b.heavy_degree {
        0.2
    } else {
        0.0
    };

    match (a.element, b.element) {
        (CARBON, CARBON) if same_type => 1.0,
        (CARBON, CARBON) => 0.8,
        (CARBON, _) if same_aromaticity => 0.3,
        (CARBON, _) => by_degree,

        (NITROGEN, NITROGEN) if same_type && same_valence => 1.0,
        (NITROGEN, NITROGEN) => 0.6,
        (NITROGEN, OXYGEN) if same_aromaticity => 0.5,
        (NITROGEN, OXYGEN) => 0.25,
        (NITROGEN, _) if same_aromaticity => 0.3,
        (NITROGEN, _) => by_degree,

        (OXYGEN, OXYGEN) if same_type => 1.0,
        (OXYGEN, OXYGEN) => 0.8,
        (OXYGEN, SULFUR) if same_aromaticity && same_valence => 0.5,
        (OXYGEN, SULFUR) => 0.0,
        (OXYGEN, _) if same_aromaticity => 0.3,
        (OXYGEN, _) => by_degree,

        (FLUORINE, FLUORINE) => 1.0,
        (FLUORINE, CHLORINE) if same_valence => 0.5,
        (FLUORINE, _) => by_degree,

        (SULFUR, SULFUR) if same_valence => 1.0,
        (SULFUR, SULFUR) if a.valence > 2 && b.valence > 2 => 0.8,
        (SULFUR, SULFUR) => 0.0,
        (SULFUR, _) => by_degree,

        (CHLORINE, CHLORINE) if same_valence => 1.0,
        (CHLORINE, CHLORINE) => 0.0,
        (CHLORINE, BROMINE) if same_valence => 0.6,
        (CHLORINE, BROMINE) => 0.0,
        (CHLORINE, _) => by_degree,

        (BROMINE, BROMINE) if same_valence => 1.0,
        (BROMINE, BROMINE) => 0.0,
        (BROMINE, _) => by_degree,

        _ if same_type => 1.0,
        _ => by_degree,
    }
}

/// Similarity of two atoms from their head-atom score and sorted path sets.
pub fn atom_similarity<C: Ord>(
    head: f64,
    paths1: &[C],
    paths2: &[C],
    aggregation: Aggregation,
) -> f64 {
    if head <= 0.0 {
        return 0.0;
    }

    let (n1, n2) = (paths1.len(), paths2.len());
    if n1 == 0 || n2 == 0 {
        if n1 == n2 {
            return head;
        }
        // the head atom counts as one shared feature of weight `head`
        return head * head / (head + (n1 + n2) as f64);
    }

    let common = count_common(paths1, paths2);
    head * aggregation.atom_score(n1, n2, common, head)
}
