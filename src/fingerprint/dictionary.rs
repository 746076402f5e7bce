//! Mapping from structural feature names to fingerprint bit positions.
//!
//! The dictionary file is tab separated, one `type<TAB>index<TAB>name` record per line. `//`
//! starts a comment that runs to the end of the line.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::fingerprint::SparseFingerprint;

lazy_static::lazy_static! {
    static ref COMMENT_RE: regex::Regex = regex::Regex::new(r"//.*").unwrap();
}

pub const DICTIONARY_HEADER: &str = "//type\tidx\tcodeName";

/// Hashing needs room for a hash range above the known indices.
pub const MIN_HASHING_MAX_INDEX: u32 = 100;

/// How lookups of unknown features are resolved. Fixed for the lifetime of a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryMode {
    /// Unknown features have no index.
    Closed,
    /// Unknown features get the next free index and are remembered.
    Learning,
    /// Unknown features are hashed into a reserved range above the known indices.
    Hashing,
}

impl FromStr for DictionaryMode {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(DictionaryMode::Closed),
            "learning" => Ok(DictionaryMode::Learning),
            "hashing" => Ok(DictionaryMode::Hashing),
            other => Err(eyre::eyre!("Unknown dictionary mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub feature_type: String,
    pub index: u32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct FeatureDictionary {
    path: Option<PathBuf>,
    mode: DictionaryMode,
    codes: BTreeMap<String, HashMap<String, u32>>,
    names: HashMap<u32, String>,
    min_index: Option<u32>,
    max_index: Option<u32>,
    hash_range: u32,
}

impl FeatureDictionary {
    /// An empty in-memory dictionary.
    pub fn new(mode: DictionaryMode) -> eyre::Result<Self> {
        FeatureDictionary::parse("", mode)
    }

    /// Reads `path`; a missing file yields an empty dictionary that will be written there.
    pub fn load<P: AsRef<Path>>(path: P, mode: DictionaryMode) -> eyre::Result<Self> {
        let path = path.as_ref();
        let text = if path.exists() {
            std::fs::read_to_string(path)?
        } else {
            log::warn!(
                "Dictionary {} does not exist, starting empty",
                path.display()
            );
            String::new()
        };

        let mut dictionary = FeatureDictionary::parse(&text, mode)?;
        dictionary.path = Some(path.to_path_buf());
        Ok(dictionary)
    }

    pub fn parse(text: &str, mode: DictionaryMode) -> eyre::Result<Self> {
        let mut dictionary = FeatureDictionary {
            path: None,
            mode,
            codes: BTreeMap::new(),
            names: HashMap::new(),
            min_index: None,
            max_index: None,
            hash_range: 0,
        };

        for (line_no, line) in text.lines().enumerate() {
            let line = COMMENT_RE.replace(line, "");
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() != 3 {
                log::warn!(
                    "Skipping dictionary line {}: expected 3 columns, found {}",
                    line_no + 1,
                    columns.len()
                );
                continue;
            }
            let index = match columns[1].trim().parse::<u32>() {
                Ok(index) => index,
                Err(_) => {
                    log::warn!(
                        "Skipping dictionary line {}: invalid index '{}'",
                        line_no + 1,
                        columns[1]
                    );
                    continue;
                }
            };

            dictionary.insert(columns[0], columns[2], index);
        }

        if mode == DictionaryMode::Hashing {
            dictionary.hash_range = dictionary.compute_hash_range()?;
        }

        Ok(dictionary)
    }

    fn compute_hash_range(&self) -> eyre::Result<u32> {
        match (self.min_index, self.max_index) {
            (Some(min), Some(max)) if max >= MIN_HASHING_MAX_INDEX && max - min >= 3 => {
                let range = (max - min) / 3;
                if max.checked_add(range).is_none() {
                    return Err(eyre::eyre!(
                        "Dictionary index {} leaves no room for {} hashed indices",
                        max,
                        range
                    ));
                }
                Ok(range)
            }
            _ => Err(eyre::eyre!(
                "Hashing requires a dictionary with indices up to at least {}",
                MIN_HASHING_MAX_INDEX
            )),
        }
    }

    fn insert(&mut self, feature_type: &str, name: &str, index: u32) {
        self.codes
            .entry(feature_type.to_string())
            .or_default()
            .insert(name.to_string(), index);
        self.names.insert(index, name.to_string());
        self.min_index = Some(self.min_index.map_or(index, |min| min.min(index)));
        self.max_index = Some(self.max_index.map_or(index, |max| max.max(index)));
    }

    fn known(&self, feature_type: &str, name: &str) -> Option<u32> {
        self.codes
            .get(feature_type)
            .and_then(|codes| codes.get(name))
            .copied()
    }

    fn hashed(&self, name: &str) -> Option<u32> {
        let base = self.max_index?.checked_add(1)?;
        let hash = (bkdr_hash(name) & 0x7fff_ffff_ffff_ffff) as u64;
        base.checked_add((hash % self.hash_range as u64) as u32)
    }

    /// Index for a feature, learning it when the dictionary is in learning mode.
    pub fn index_of(&mut self, feature_type: &str, name: &str) -> Option<u32> {
        if let Some(index) = self.known(feature_type, name) {
            return Some(index);
        }

        match self.mode {
            DictionaryMode::Closed => None,
            DictionaryMode::Hashing => self.hashed(name),
            DictionaryMode::Learning => {
                let Some(index) = self.max_index.map_or(Some(0), |max| max.checked_add(1)) else {
                    log::warn!("Dictionary is full, cannot learn '{}'", name);
                    return None;
                };
                self.insert(feature_type, name, index);
                Some(index)
            }
        }
    }

    /// Index for a feature without ever modifying the dictionary.
    pub fn lookup(&self, feature_type: &str, name: &str) -> Option<u32> {
        match self.known(feature_type, name) {
            Some(index) => Some(index),
            None if self.mode == DictionaryMode::Hashing => self.hashed(name),
            None => None,
        }
    }

    pub fn name_of(&self, index: u32) -> Option<&str> {
        self.names.get(&index).map(|name| name.as_str())
    }

    pub fn mode(&self) -> DictionaryMode {
        self.mode
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn min_index(&self) -> Option<u32> {
        self.min_index
    }

    /// Largest index this dictionary can return, hash range included.
    pub fn max_index(&self) -> Option<u32> {
        self.max_index.map(|max| max.saturating_add(self.hash_range))
    }

    pub fn hash_range(&self) -> u32 {
        self.hash_range
    }

    pub fn len(&self) -> usize {
        self.codes.values().map(|codes| codes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All known features, ordered by type and then index.
    pub fn entries(&self) -> Vec<DictionaryEntry> {
        let mut entries = Vec::with_capacity(self.len());
        for (feature_type, codes) in &self.codes {
            let mut typed: Vec<DictionaryEntry> = codes
                .iter()
                .map(|(name, &index)| DictionaryEntry {
                    feature_type: feature_type.clone(),
                    index,
                    name: name.clone(),
                })
                .collect();
            typed.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)));
            entries.extend(typed);
        }
        entries
    }

    /// Reassigns indices so that the most frequent features come first.
    ///
    /// `counts[i]` is how often index `i` was set. Features without a count sort last; ties
    /// keep their previous relative order.
    pub fn reorder_by_frequency(&mut self, counts: &[u64]) -> eyre::Result<()> {
        let mut entries = self.entries();
        entries.sort_by(|a, b| {
            let count_a = counts.get(a.index as usize).copied().unwrap_or(0);
            let count_b = counts.get(b.index as usize).copied().unwrap_or(0);
            count_b
                .cmp(&count_a)
                .then_with(|| a.index.cmp(&b.index))
                .then_with(|| a.feature_type.cmp(&b.feature_type))
        });

        self.codes.clear();
        self.names.clear();
        self.min_index = None;
        self.max_index = None;
        for (index, entry) in entries.iter().enumerate() {
            self.insert(&entry.feature_type, &entry.name, index as u32);
        }
        if self.mode == DictionaryMode::Hashing {
            self.hash_range = self.compute_hash_range()?;
        }

        Ok(())
    }

    /// Writes the dictionary back to the file it was loaded from.
    pub fn persist(&self) -> eyre::Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or(eyre::eyre!("Dictionary has no backing file"))?;
        self.persist_to(path)
    }

    /// Writes to `path`, first renaming an existing file there to `<stem>.bak`.
    pub fn persist_to<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let path = path.as_ref();
        if path.exists() {
            let backup = path.with_extension("bak");
            std::fs::rename(path, &backup)?;
            log::info!("Saved previous dictionary as {}", backup.display());
        }

        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", DICTIONARY_HEADER)?;
        for entry in self.entries() {
            writeln!(
                writer,
                "{}\t{}\t{}",
                entry.feature_type, entry.index, entry.name
            )?;
        }
        writer.flush()?;

        log::info!("Wrote {} features to {}", self.len(), path.display());
        Ok(())
    }
}

/// BKDR string hash over UTF-16 code units with seed 131.
pub fn bkdr_hash(s: &str) -> i64 {
    s.encode_utf16().fold(0i64, |hash, unit| {
        hash.wrapping_mul(131).wrapping_add(unit as i64)
    })
}

/// Number of times each bit position is set across `fingerprints`.
pub fn count_bit_frequencies(fingerprints: &[SparseFingerprint]) -> Vec<u64> {
    let mut counts: Vec<u64> = Vec::new();
    for fp in fingerprints {
        for &pos in fp.positions() {
            let pos = pos as usize;
            if pos >= counts.len() {
                counts.resize(pos + 1, 0);
            }
            counts[pos] += 1;
        }
    }
    counts
}
