use std::fmt::Debug;
use std::str::FromStr;

use crate::molecule::{atom_type, bond_symbol, bond_type, element_symbol, Atom, Bond, MAX_ATOM_TYPE};

/// One step of a path: an atom or the bond leading to the next atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Atom { element: u8, aromatic: bool },
    Bond { order: u8, aromatic: bool },
}

impl From<Atom> for Token {
    fn from(atom: Atom) -> Self {
        Token::Atom {
            element: atom.element,
            aromatic: atom.aromatic,
        }
    }
}

impl From<Bond> for Token {
    fn from(bond: Bond) -> Self {
        Token::Bond {
            order: bond.order,
            aromatic: bond.aromatic,
        }
    }
}

/// Turns a token sequence into a comparable path code.
pub trait PathEncoder: Send + Sync {
    type Code: Ord + Clone + Debug + Send + Sync;

    fn encode(&self, tokens: &[Token]) -> Self::Code;
}

/// Exact encoding as SMILES-like text: `c:c-O`, `C=O`, ring closures end in a bond symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEncoder;

impl PathEncoder for TextEncoder {
    type Code = String;

    fn encode(&self, tokens: &[Token]) -> String {
        let mut code = String::with_capacity(tokens.len() * 2);
        for token in tokens {
            match *token {
                Token::Atom { element, aromatic } => {
                    let symbol = element_symbol(element);
                    if aromatic {
                        code.push_str(&symbol.to_lowercase());
                    } else {
                        code.push_str(symbol);
                    }
                }
                Token::Bond { order, aromatic } => code.push_str(bond_symbol(order, aromatic)),
            }
        }
        code
    }
}

/// Radix applied after an atom token: the number of bond types, rounded up to a prime.
pub const BOND_RADIX: u64 = 5;

/// Radix applied after a bond token: the number of atom types, rounded up to a prime.
pub const ATOM_RADIX: u64 = 227;

/// Polynomial `u64` encoding of a path.
///
/// Much cheaper to compare than text, but long paths overflow and wrap, so two different
/// paths may share a code.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackedEncoder;

impl PathEncoder for PackedEncoder {
    type Code = u64;

    fn encode(&self, tokens: &[Token]) -> u64 {
        tokens.iter().fold(0u64, |code, token| match *token {
            Token::Atom { element, aromatic } => {
                let atom_type = atom_type(element, aromatic) as u64;
                code.wrapping_add(atom_type).wrapping_mul(BOND_RADIX)
            }
            Token::Bond { order, aromatic } => {
                let bond_type = bond_type(order, aromatic) as u64;
                code.wrapping_add(bond_type).wrapping_mul(ATOM_RADIX)
            }
        })
    }
}

/// Path encoding selectable at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathEncoding {
    #[default]
    Text,
    Packed,
}

impl FromStr for PathEncoding {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(PathEncoding::Text),
            "packed" => Ok(PathEncoding::Packed),
            other => Err(eyre::eyre!("Unknown path encoding '{}'", other)),
        }
    }
}

const _: () = assert!(ATOM_RADIX > MAX_ATOM_TYPE as u64);
