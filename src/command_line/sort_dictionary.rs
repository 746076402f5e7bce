use rand::Rng;
use rayon::prelude::*;

use crate::command_line::prelude::*;
use crate::fingerprint::dictionary::{count_bit_frequencies, DictionaryMode, FeatureDictionary};
use crate::fingerprint::fingerprinter::{
    LinearPathFingerprinter, DEFAULT_FEATURE_TYPE, DEFAULT_MAX_BONDS, DEFAULT_STAR_ATOM_DEPTH,
};
use crate::fingerprint::SparseFingerprint;
use crate::molecule::Molecule;
use crate::search::read_molecules;

pub const NAME: &str = "sort-dictionary";

pub fn command() -> Command {
    Command::new(NAME)
        .about("Renumbers a dictionary so that frequent features get low bit positions")
        .arg(
            Arg::new("input")
                .required(true)
                .long("input")
                .short('i')
                .num_args(1),
        )
        .arg(
            Arg::new("dictionary")
                .required(true)
                .long("dictionary")
                .short('d')
                .num_args(1),
        )
        .arg(
            Arg::new("sample-fraction")
                .required(false)
                .long("sample-fraction")
                .short('s')
                .help("Fraction of input molecules used for counting, 1.0 by default")
                .num_args(1),
        )
        .arg(
            Arg::new("feature-type")
                .required(false)
                .long("feature-type")
                .short('t')
                .num_args(1),
        )
        .arg(
            Arg::new("max-bonds")
                .required(false)
                .long("max-bonds")
                .num_args(1),
        )
        .arg(
            Arg::new("star-atom-depth")
                .required(false)
                .long("star-atom-depth")
                .num_args(1),
        )
}

pub fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let input = required_arg(matches, "input")?;
    let dictionary_path = required_arg(matches, "dictionary")?;
    let sample_fraction = parse_arg(matches, "sample-fraction", 1.0f64)?;
    let feature_type = parse_arg(matches, "feature-type", DEFAULT_FEATURE_TYPE.to_string())?;
    let max_bonds = parse_arg(matches, "max-bonds", DEFAULT_MAX_BONDS)?;
    let star_atom_depth = parse_arg(matches, "star-atom-depth", DEFAULT_STAR_ATOM_DEPTH)?;

    if !(sample_fraction > 0.0 && sample_fraction <= 1.0) {
        return Err(eyre::eyre!(
            "sample-fraction must be within (0, 1], got {}",
            sample_fraction
        ));
    }

    let molecules = read_molecules(input)?;
    let mut dictionary = FeatureDictionary::load(dictionary_path, DictionaryMode::Closed)?;
    let fingerprinter = LinearPathFingerprinter::new(&feature_type, max_bonds, star_atom_depth)?;

    let sample = sample_molecules(&molecules, sample_fraction, &mut rand::thread_rng());
    log::info!(
        "counting features over {} of {} molecules",
        sample.len(),
        molecules.len()
    );

    let counts = feature_counts(&fingerprinter, &dictionary, &sample);
    dictionary.reorder_by_frequency(&counts)?;
    dictionary.persist()?;

    Ok(())
}

pub fn sample_molecules<'a, R: Rng>(
    molecules: &'a [Molecule],
    fraction: f64,
    rng: &mut R,
) -> Vec<&'a Molecule> {
    if fraction >= 1.0 {
        return molecules.iter().collect();
    }
    molecules
        .iter()
        .filter(|_| rng.gen::<f64>() < fraction)
        .collect()
}

/// How often each dictionary bit is set over `molecules`.
pub fn feature_counts(
    fingerprinter: &LinearPathFingerprinter,
    dictionary: &FeatureDictionary,
    molecules: &[&Molecule],
) -> Vec<u64> {
    let fingerprints: Vec<SparseFingerprint> = molecules
        .par_iter()
        .map(|mol| {
            fingerprinter.fingerprint(&mol.without_hydrogens(), |feature_type, name| {
                dictionary.lookup(feature_type, name)
            })
        })
        .collect();
    count_bit_frequencies(&fingerprints)
}
