use std::io::Write;
use std::str::FromStr;

use crate::command_line::prelude::*;
use crate::fingerprint::dictionary::{DictionaryMode, FeatureDictionary};
use crate::fingerprint::fingerprinter::{
    LinearPathFingerprinter, DEFAULT_FEATURE_TYPE, DEFAULT_MAX_BONDS, DEFAULT_STAR_ATOM_DEPTH,
};
use crate::fingerprint::{DenseFingerprint, SparseFingerprint};
use crate::search::read_molecules;

pub const NAME: &str = "fingerprint";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Hex,
    Folded512,
    Folded2048,
    BitList,
    FragList,
}

impl FromStr for OutputFormat {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(OutputFormat::Hex),
            "folded512" => Ok(OutputFormat::Folded512),
            "folded2048" => Ok(OutputFormat::Folded2048),
            "bitlist" => Ok(OutputFormat::BitList),
            "fraglist" => Ok(OutputFormat::FragList),
            other => Err(eyre::eyre!("Unknown output format '{}'", other)),
        }
    }
}

pub fn command() -> Command {
    Command::new(NAME)
        .about("Computes linear path fingerprints for JSON-lines molecules")
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
            Arg::new("mode")
                .required(false)
                .long("mode")
                .short('m')
                .help("closed, learning or hashing")
                .num_args(1),
        )
        .arg(
            Arg::new("format")
                .required(false)
                .long("format")
                .short('f')
                .help("hex, folded512, folded2048, bitlist or fraglist")
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
        .arg(
            Arg::new("write-dictionary")
                .required(false)
                .long("write-dictionary")
                .short('w')
                .help("Persist features learned while fingerprinting")
                .action(ArgAction::SetTrue),
        )
}

pub fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let input = required_arg(matches, "input")?;
    let dictionary_path = required_arg(matches, "dictionary")?;
    let mode = parse_arg(matches, "mode", DictionaryMode::Closed)?;
    let format = parse_arg(matches, "format", OutputFormat::Hex)?;
    let feature_type = parse_arg(matches, "feature-type", DEFAULT_FEATURE_TYPE.to_string())?;
    let max_bonds = parse_arg(matches, "max-bonds", DEFAULT_MAX_BONDS)?;
    let star_atom_depth = parse_arg(matches, "star-atom-depth", DEFAULT_STAR_ATOM_DEPTH)?;
    let write_dictionary = matches.get_flag("write-dictionary");

    log::info!(
        "fingerprinting input={}, dictionary={}, mode={:?}",
        input,
        dictionary_path,
        mode
    );

    let molecules = read_molecules(input)?;
    let mut dictionary = FeatureDictionary::load(dictionary_path, mode)?;
    let fingerprinter = LinearPathFingerprinter::new(&feature_type, max_bonds, star_atom_depth)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for mol in &molecules {
        let mol = mol.without_hydrogens();

        if format == OutputFormat::FragList {
            let codes: Vec<String> = fingerprinter
                .codes(&mol)
                .into_iter()
                .filter(|code| dictionary.index_of(&feature_type, code).is_some())
                .collect();
            writeln!(out, "{}\t{}\t{}", mol.id(), codes.len(), codes.join("|"))?;
            continue;
        }

        let fp = fingerprinter.fingerprint(&mol, |feature_type, name| {
            dictionary.index_of(feature_type, name)
        });
        let payload = render(&fp, format)?;
        writeln!(out, "{}\t{}\t{}", mol.id(), fp.bit_count(), payload)?;
    }

    if write_dictionary {
        dictionary.persist()?;
    }

    Ok(())
}

fn render(fp: &SparseFingerprint, format: OutputFormat) -> eyre::Result<String> {
    let folded_hex = |bits: u32| -> eyre::Result<String> {
        let folded = fp.fold(bits)?;
        Ok(DenseFingerprint::from_positions(folded.positions(), bits as usize / 8).to_hex())
    };

    match format {
        OutputFormat::Hex => Ok(fp.to_hex()),
        OutputFormat::Folded512 => folded_hex(512),
        OutputFormat::Folded2048 => folded_hex(2048),
        OutputFormat::BitList => Ok(fp
            .positions()
            .iter()
            .map(|pos| pos.to_string())
            .collect::<Vec<_>>()
            .join(",")),
        OutputFormat::FragList => Err(eyre::eyre!("Fragment lists are written from codes")),
    }
}
