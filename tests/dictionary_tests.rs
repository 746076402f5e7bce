use chemsim::fingerprint::dictionary::{
    bkdr_hash, count_bit_frequencies, DictionaryMode, FeatureDictionary, DICTIONARY_HEADER,
};
use chemsim::fingerprint::SparseFingerprint;
use tempdir::TempDir;

const DICTIONARY: &str = "//type\tidx\tcodeName
lin74\t0\tC-C
lin74\t1\tC-O
// a comment line

lin74\t2\tc:c // trailing comment
ring\t3\tC1-C-C-1
";

#[test]
fn test_parse() {
    let dictionary = FeatureDictionary::parse(DICTIONARY, DictionaryMode::Closed).unwrap();

    assert_eq!(dictionary.len(), 4);
    assert_eq!(dictionary.lookup("lin74", "C-C"), Some(0));
    assert_eq!(dictionary.lookup("lin74", "c:c"), Some(2));
    assert_eq!(dictionary.lookup("ring", "C1-C-C-1"), Some(3));
    assert_eq!(dictionary.lookup("ring", "C-C"), None);
    assert_eq!(dictionary.name_of(1), Some("C-O"));
    assert_eq!(dictionary.min_index(), Some(0));
    assert_eq!(dictionary.max_index(), Some(3));
}

#[test]
fn test_malformed_lines_are_skipped() {
    let text = "lin74\t0\tC-C\nlin74\tzero\tC-N\nonly two\tcolumns\nlin74\t5\tC=O\n";
    let dictionary = FeatureDictionary::parse(text, DictionaryMode::Closed).unwrap();

    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.lookup("lin74", "C-N"), None);
    assert_eq!(dictionary.lookup("lin74", "C=O"), Some(5));
}

#[test]
fn test_closed_mode_never_grows() {
    let mut dictionary = FeatureDictionary::parse(DICTIONARY, DictionaryMode::Closed).unwrap();
    assert_eq!(dictionary.index_of("lin74", "N#C"), None);
    assert_eq!(dictionary.index_of("lin74", "C-O"), Some(1));
    assert_eq!(dictionary.len(), 4);
}

#[test]
fn test_learning_mode_appends() {
    let mut dictionary = FeatureDictionary::parse(DICTIONARY, DictionaryMode::Learning).unwrap();

    assert_eq!(dictionary.index_of("lin74", "N#C"), Some(4));
    assert_eq!(dictionary.index_of("lin74", "O=C"), Some(5));
    assert_eq!(dictionary.index_of("lin74", "N#C"), Some(4));
    assert_eq!(dictionary.index_of("lin74", "C-C"), Some(0));
    assert_eq!(dictionary.len(), 6);
}

#[test]
fn test_learning_from_empty() {
    let mut dictionary = FeatureDictionary::new(DictionaryMode::Learning).unwrap();
    assert!(dictionary.is_empty());

    let indices: Vec<u32> = ["a", "b", "c", "b"]
        .iter()
        .filter_map(|name| dictionary.index_of("lin74", name))
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 1]);
}

#[test]
fn test_lookup_does_not_learn() {
    let dictionary = FeatureDictionary::new(DictionaryMode::Learning).unwrap();
    assert_eq!(dictionary.lookup("lin74", "C-C"), None);
    assert!(dictionary.is_empty());
}

fn hashing_text() -> String {
    format!("{}\nlin74\t0\tC-C\nlin74\t120\tC-O\n", DICTIONARY_HEADER)
}

#[test]
fn test_hashing_mode() {
    let mut dictionary = FeatureDictionary::parse(&hashing_text(), DictionaryMode::Hashing).unwrap();
    assert_eq!(dictionary.hash_range(), 40);
    assert_eq!(dictionary.max_index(), Some(160));

    let index = dictionary.index_of("lin74", "Cl-c:c:c").unwrap();
    assert!((121..161).contains(&index));
    assert_eq!(dictionary.index_of("lin74", "Cl-c:c:c"), Some(index));
    assert_eq!(dictionary.lookup("lin74", "Cl-c:c:c"), Some(index));
    assert_eq!(dictionary.lookup("lin74", "C-O"), Some(120));
    assert_eq!(dictionary.len(), 2);
}

#[test]
fn test_hashing_needs_large_dictionary() {
    assert!(FeatureDictionary::parse(DICTIONARY, DictionaryMode::Hashing).is_err());
    assert!(FeatureDictionary::new(DictionaryMode::Hashing).is_err());
}

#[test]
fn test_learning_stops_at_largest_index() {
    let text = format!("lin74\t{}\tC-C\n", u32::MAX);
    let mut dictionary = FeatureDictionary::parse(&text, DictionaryMode::Learning).unwrap();

    assert_eq!(dictionary.index_of("lin74", "C-O"), None);
    assert_eq!(dictionary.index_of("lin74", "C-C"), Some(u32::MAX));
    assert_eq!(dictionary.len(), 1);
}

#[test]
fn test_hashing_range_must_fit() {
    let text = format!(
        "lin74\t{}\tC-C\nlin74\t{}\tC-O\n",
        u32::MAX - 295,
        u32::MAX
    );
    assert!(FeatureDictionary::parse(&text, DictionaryMode::Hashing).is_err());
}

#[test]
fn test_mode_from_str() {
    assert_eq!(
        "learning".parse::<DictionaryMode>().unwrap(),
        DictionaryMode::Learning
    );
    assert_eq!(
        "hashing".parse::<DictionaryMode>().unwrap(),
        DictionaryMode::Hashing
    );
    assert!("open".parse::<DictionaryMode>().is_err());
}

#[test]
fn test_hashed_index_follows_bkdr() {
    let dictionary = FeatureDictionary::parse(&hashing_text(), DictionaryMode::Hashing).unwrap();
    let name = "N#C-c:c";
    let expected = 121 + ((bkdr_hash(name) & i64::MAX) as u64 % 40) as u32;
    assert_eq!(dictionary.lookup("lin74", name), Some(expected));
}

#[test]
fn test_reorder_by_frequency() {
    let mut dictionary = FeatureDictionary::parse(
        "lin74\t0\tA\nlin74\t1\tB\nlin74\t2\tC\nlin74\t3\tD\n",
        DictionaryMode::Closed,
    )
    .unwrap();

    dictionary.reorder_by_frequency(&[1, 5, 5]).unwrap();

    assert_eq!(dictionary.lookup("lin74", "B"), Some(0));
    assert_eq!(dictionary.lookup("lin74", "C"), Some(1));
    assert_eq!(dictionary.lookup("lin74", "A"), Some(2));
    assert_eq!(dictionary.lookup("lin74", "D"), Some(3));
    assert_eq!(dictionary.name_of(0), Some("B"));
}

#[test]
fn test_count_bit_frequencies() {
    let fingerprints = vec![
        SparseFingerprint::from_positions([0, 2]),
        SparseFingerprint::from_positions([2, 5]),
        SparseFingerprint::from_positions([]),
    ];
    assert_eq!(count_bit_frequencies(&fingerprints), vec![1, 0, 2, 0, 0, 1]);
}

#[test]
fn test_persist_and_reload() -> eyre::Result<()> {
    let dir = TempDir::new("chemsim-dictionary")?;
    let path = dir.path().join("features.txt");

    let mut dictionary = FeatureDictionary::load(&path, DictionaryMode::Learning)?;
    assert!(dictionary.is_empty());
    dictionary.index_of("lin74", "C-C");
    dictionary.index_of("lin74", "C=O");
    dictionary.index_of("ring", "c1:c:c:c:c:c:1");
    dictionary.persist()?;

    assert!(path.exists());
    assert!(!dir.path().join("features.bak").exists());

    let written = std::fs::read_to_string(&path)?;
    assert!(written.starts_with(DICTIONARY_HEADER));

    let reloaded = FeatureDictionary::load(&path, DictionaryMode::Closed)?;
    assert_eq!(reloaded.entries(), dictionary.entries());
    assert_eq!(reloaded.lookup("ring", "c1:c:c:c:c:c:1"), Some(2));

    reloaded.persist()?;
    assert!(dir.path().join("features.bak").exists());

    Ok(())
}

#[test]
fn test_persist_without_file() {
    let dictionary = FeatureDictionary::new(DictionaryMode::Closed).unwrap();
    assert!(dictionary.persist().is_err());
}
