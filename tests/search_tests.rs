mod common;

use std::io::Write;

use chemsim::fingerprint::dictionary::{DictionaryMode, FeatureDictionary};
use chemsim::fingerprint::fingerprinter::LinearPathFingerprinter;
use chemsim::fingerprint::SimilarityMeasure;
use chemsim::molecule::MoleculeRecord;
use chemsim::paths::TextEncoder;
use chemsim::search::{nearest_neighbors, prepare_all, read_molecules, similarity_search};
use chemsim::similarity::{AtomPathComparator, Comparator, FingerprintComparator, MatcherConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempdir::TempDir;

use common::*;

#[test]
fn test_linear_codes() {
    let fingerprinter = LinearPathFingerprinter::default();
    assert_eq!(fingerprinter.codes(&ethanol()), vec!["C-C", "C-C-O", "C-O"]);
}

#[test]
fn test_star_atoms_on_long_paths() {
    let fingerprinter = LinearPathFingerprinter::new("lin74", 7, 4).unwrap();
    let codes = fingerprinter.codes(&alkane(6));

    assert!(codes.contains(&"C-C-C-C".to_string()));
    assert!(codes.contains(&"*-*-*-*-*".to_string()));
    assert!(!codes.contains(&"C-C-C-C-C".to_string()));
}

#[test]
fn test_linear_codes_do_not_depend_on_numbering() {
    let mut rng = StdRng::seed_from_u64(3);
    let fingerprinter = LinearPathFingerprinter::default();

    for mol in all_molecules() {
        let (renumbered, _) = scrambled(&mol, &mut rng);
        assert_eq!(
            fingerprinter.codes(&renumbered),
            fingerprinter.codes(&mol),
            "{}",
            mol.id()
        );
    }
}

#[test]
fn test_fingerprinter_needs_bonds() {
    assert!(LinearPathFingerprinter::new("lin74", 0, 4).is_err());
}

#[test]
fn test_learned_dictionary_reproduces_fingerprints() -> eyre::Result<()> {
    let molecules = all_molecules();

    let learning = FingerprintComparator::new(
        LinearPathFingerprinter::default(),
        FeatureDictionary::new(DictionaryMode::Learning)?,
        SimilarityMeasure::Tanimoto,
    );
    let learned: Vec<_> = molecules
        .iter()
        .map(|mol| learning.prepare(mol))
        .collect::<eyre::Result<_>>()?;
    let dictionary = learning.into_dictionary()?;
    assert!(!dictionary.is_empty());

    let closed = FingerprintComparator::new(
        LinearPathFingerprinter::default(),
        FeatureDictionary::parse(&dictionary_text(&dictionary), DictionaryMode::Closed)?,
        SimilarityMeasure::Tanimoto,
    );
    let replayed = prepare_all(&closed, &molecules)?;
    assert_eq!(replayed, learned);

    for fp in &learned {
        assert_eq!(closed.similarity(fp, fp), 1.0);
    }
    Ok(())
}

fn dictionary_text(dictionary: &FeatureDictionary) -> String {
    dictionary
        .entries()
        .iter()
        .map(|entry| format!("{}\t{}\t{}\n", entry.feature_type, entry.index, entry.name))
        .collect()
}

#[test]
fn test_folded_fingerprints() -> eyre::Result<()> {
    let comparator = FingerprintComparator::new(
        LinearPathFingerprinter::default(),
        FeatureDictionary::new(DictionaryMode::Learning)?,
        SimilarityMeasure::ModifiedTanimoto,
    )
    .with_fold(64);

    for mol in all_molecules() {
        let fp = comparator.prepare(&mol)?;
        assert!(fp.bit_positions().iter().all(|&pos| pos < 64));
    }
    Ok(())
}

#[test]
fn test_nearest_neighbors_order() {
    let comparator = AtomPathComparator::new(TextEncoder, MatcherConfig::default()).unwrap();
    let references = vec![ethanol(), benzene(), toluene(), benzene()];
    let queries = vec![benzene()];

    let prepared_references = prepare_all(&comparator, &references).unwrap();
    let prepared_queries = prepare_all(&comparator, &queries).unwrap();

    let hits = nearest_neighbors(&comparator, &prepared_queries, &prepared_references, 3, 0.0);
    assert_eq!(hits.len(), 1);
    let hits = &hits[0];
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0], (1, 1.0));
    assert_eq!(hits[1], (3, 1.0));
    assert_eq!(hits[2].0, 2);
    assert!(hits[2].1 < 1.0);

    let strict = nearest_neighbors(&comparator, &prepared_queries, &prepared_references, 10, 0.99);
    assert_eq!(strict[0].len(), 2);
}

#[test]
fn test_similarity_search() -> eyre::Result<()> {
    let comparator = AtomPathComparator::new(TextEncoder, MatcherConfig::default())?;
    let references = all_molecules();
    let queries = vec![ethanol(), phenol()];

    let results = similarity_search(&comparator, &queries, &references, 2, 0.0)?;
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].query, "ethanol");
    assert_eq!(results[0].neighbors[0].id, "ethanol");
    assert_eq!(results[0].neighbors[0].similarity, 1.0);
    assert_eq!(results[1].neighbors[0].id, "phenol");
    assert!(results
        .iter()
        .all(|result| result.neighbors.len() == 2
            && result.neighbors[0].similarity >= result.neighbors[1].similarity));
    Ok(())
}

#[test]
fn test_read_molecules() -> eyre::Result<()> {
    let dir = TempDir::new("chemsim-molecules")?;
    let path = dir.path().join("molecules.jsonl");

    let mut record = MoleculeRecord::new("methanol");
    let c = record.add_atom(C, false, 3);
    let o = record.add_atom(O, false, 1);
    record.add_bond(c, o, 1, false);

    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "{}", serde_json::to_string(&record)?)?;
    writeln!(file)?;
    writeln!(
        file,
        r#"{{"id": "water", "atoms": [{{"element": 8, "hydrogens": 2}}]}}"#
    )?;
    drop(file);

    let molecules = read_molecules(&path)?;
    assert_eq!(molecules.len(), 2);
    assert_eq!(molecules[0].id(), "methanol");
    assert_eq!(molecules[1].id(), "water");
    Ok(())
}

#[test]
fn test_read_molecules_reports_line() -> eyre::Result<()> {
    let dir = TempDir::new("chemsim-molecules")?;
    let path = dir.path().join("broken.jsonl");
    std::fs::write(
        &path,
        "{\"id\": \"ok\", \"atoms\": [{\"element\": 6}]}\n{\"id\": \"bad\", \"atoms\": [{\"element\": 0}]}\n",
    )?;

    let err = read_molecules(&path).unwrap_err();
    assert!(err.to_string().contains(":2:"));
    Ok(())
}
