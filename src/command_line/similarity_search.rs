use std::io::Write;

use crate::command_line::prelude::*;
use crate::fingerprint::dictionary::{DictionaryMode, FeatureDictionary};
use crate::fingerprint::fingerprinter::LinearPathFingerprinter;
use crate::fingerprint::SimilarityMeasure;
use crate::paths::{PackedEncoder, PathEncoding, TextEncoder};
use crate::search::{read_molecules, similarity_search, QueryResult};
use crate::similarity::{
    Aggregation, AssignmentAlgorithm, AtomPathComparator, ComparatorPreset,
    FingerprintComparator, MatcherConfig,
};

pub const NAME: &str = "similarity-search";

pub fn command() -> Command {
    Command::new(NAME)
        .about("Ranks reference molecules by similarity to each query molecule")
        .arg(
            Arg::new("query")
                .required(true)
                .long("query")
                .short('q')
                .num_args(1),
        )
        .arg(
            Arg::new("reference")
                .required(true)
                .long("reference")
                .short('r')
                .num_args(1),
        )
        .arg(
            Arg::new("comparator")
                .required(false)
                .long("comparator")
                .short('c')
                .help("aapath (default) or fingerprint")
                .num_args(1),
        )
        .arg(
            Arg::new("preset")
                .required(false)
                .long("preset")
                .short('p')
                .help("default, intermediate, fast, fuzzy, fuzzy-intermediate or fuzzy-fast")
                .num_args(1),
        )
        .arg(
            Arg::new("assignment")
                .required(false)
                .long("assignment")
                .help("greedy-sorted (default), greedy-ranked or optimal")
                .num_args(1),
        )
        .arg(
            Arg::new("aggregation")
                .required(false)
                .long("aggregation")
                .help("size-symmetric (default), tanimoto or max-normalized")
                .num_args(1),
        )
        .arg(
            Arg::new("encoding")
                .required(false)
                .long("encoding")
                .short('e')
                .help("text (default) or packed")
                .num_args(1),
        )
        .arg(
            Arg::new("min-atom-similarity")
                .required(false)
                .long("min-atom-similarity")
                .num_args(1),
        )
        .arg(
            Arg::new("dictionary")
                .required(false)
                .long("dictionary")
                .short('d')
                .help("Feature dictionary, required by the fingerprint comparator")
                .num_args(1),
        )
        .arg(
            Arg::new("mode")
                .required(false)
                .long("mode")
                .short('m')
                .num_args(1),
        )
        .arg(
            Arg::new("measure")
                .required(false)
                .long("measure")
                .help("tanimoto (default) or modified-tanimoto")
                .num_args(1),
        )
        .arg(
            Arg::new("result-limit")
                .required(false)
                .long("result-limit")
                .short('l')
                .num_args(1),
        )
        .arg(
            Arg::new("min-similarity")
                .required(false)
                .long("min-similarity")
                .short('s')
                .num_args(1),
        )
}

pub fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let query_path = required_arg(matches, "query")?;
    let reference_path = required_arg(matches, "reference")?;
    let comparator = parse_arg(matches, "comparator", "aapath".to_string())?;
    let result_limit = parse_arg(matches, "result-limit", 10usize)?;
    let min_similarity = parse_arg(matches, "min-similarity", 0.0f64)?;

    let queries = read_molecules(query_path)?;
    let references = read_molecules(reference_path)?;

    let results = match comparator.as_str() {
        "aapath" => {
            let config = matcher_config(matches)?;
            match parse_arg(matches, "encoding", PathEncoding::Text)? {
                PathEncoding::Text => similarity_search(
                    &AtomPathComparator::new(TextEncoder, config)?,
                    &queries,
                    &references,
                    result_limit,
                    min_similarity,
                )?,
                PathEncoding::Packed => similarity_search(
                    &AtomPathComparator::new(PackedEncoder, config)?,
                    &queries,
                    &references,
                    result_limit,
                    min_similarity,
                )?,
            }
        }
        "fingerprint" => {
            let dictionary_path = matches
                .get_one::<String>("dictionary")
                .ok_or(eyre::eyre!("The fingerprint comparator needs --dictionary"))?;
            let mode = parse_arg(matches, "mode", DictionaryMode::Closed)?;
            let measure = parse_arg(matches, "measure", SimilarityMeasure::Tanimoto)?;
            let dictionary = FeatureDictionary::load(dictionary_path, mode)?;
            let comparator =
                FingerprintComparator::new(LinearPathFingerprinter::default(), dictionary, measure);
            similarity_search(
                &comparator,
                &queries,
                &references,
                result_limit,
                min_similarity,
            )?
        }
        other => return Err(eyre::eyre!("Unknown comparator '{}'", other)),
    };

    write_results(&results)
}

/// Builds the matcher configuration from the preset and any explicit overrides.
pub fn matcher_config(matches: &ArgMatches) -> eyre::Result<MatcherConfig> {
    let preset = parse_arg(matches, "preset", ComparatorPreset::Default)?;
    let defaults = preset.config();

    let config = MatcherConfig {
        assignment: parse_arg(matches, "assignment", AssignmentAlgorithm::GreedySorted)?,
        aggregation: parse_arg(matches, "aggregation", Aggregation::SizeSymmetric)?,
        min_atom_similarity: parse_arg(
            matches,
            "min-atom-similarity",
            defaults.min_atom_similarity,
        )?,
        ..defaults
    };
    config.validate()?;
    Ok(config)
}

fn write_results(results: &[QueryResult]) -> eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for result in results {
        writeln!(out, "{}", serde_json::to_string(result)?)?;
    }
    Ok(())
}
