use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::molecule::Molecule;
use crate::similarity::Comparator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: String,
    /// Position of the neighbor in the reference set.
    pub index: usize,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub query: String,
    pub neighbors: Vec<Neighbor>,
}

/// Reads one JSON molecule record per line, skipping blank lines.
pub fn read_molecules<P: AsRef<Path>>(path: P) -> eyre::Result<Vec<Molecule>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut molecules = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mol = Molecule::from_json(&line).map_err(|e| {
            eyre::eyre!("{}:{}: invalid molecule: {}", path.display(), line_no + 1, e)
        })?;
        molecules.push(mol);
    }

    log::info!("Read {} molecules from {}", molecules.len(), path.display());
    Ok(molecules)
}

pub fn prepare_all<C: Comparator>(
    comparator: &C,
    molecules: &[Molecule],
) -> eyre::Result<Vec<C::Comparable>> {
    molecules
        .par_iter()
        .map(|mol| comparator.prepare(mol))
        .collect()
}

/// Ranks `references` for every query, best first, keeping at most `limit` neighbors with
/// similarity of at least `min_similarity`. Ties keep reference order.
pub fn nearest_neighbors<C: Comparator>(
    comparator: &C,
    queries: &[C::Comparable],
    references: &[C::Comparable],
    limit: usize,
    min_similarity: f64,
) -> Vec<Vec<(usize, f64)>> {
    queries
        .par_iter()
        .map(|query| {
            let mut hits: Vec<(usize, f64)> = references
                .iter()
                .enumerate()
                .map(|(idx, reference)| {
                    (
                        idx,
                        comparator.similarity_with_hint(query, reference, min_similarity),
                    )
                })
                .filter(|(_, similarity)| *similarity >= min_similarity)
                .collect();

            hits.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            hits.truncate(limit);
            hits
        })
        .collect()
}

/// Prepares both sets with `comparator` and ranks the references for each query.
pub fn similarity_search<C: Comparator>(
    comparator: &C,
    queries: &[Molecule],
    references: &[Molecule],
    limit: usize,
    min_similarity: f64,
) -> eyre::Result<Vec<QueryResult>> {
    let prepared_references = prepare_all(comparator, references)?;
    let prepared_queries = prepare_all(comparator, queries)?;

    let ranked = nearest_neighbors(
        comparator,
        &prepared_queries,
        &prepared_references,
        limit,
        min_similarity,
    );

    Ok(queries
        .iter()
        .zip(ranked)
        .map(|(query, hits)| QueryResult {
            query: query.id().to_string(),
            neighbors: hits
                .into_iter()
                .map(|(index, similarity)| Neighbor {
                    id: references[index].id().to_string(),
                    index,
                    similarity,
                })
                .collect(),
        })
        .collect())
}
