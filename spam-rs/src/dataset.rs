//! Training corpus assembly
//!
//! Loads several labeled CSV sources, normalizes each to the canonical
//! `label`/`message` schema, filters labels, concatenates and shuffles.

use csv::{ByteRecord, ReaderBuilder};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TrainError};
use crate::types::{Dataset, Label, LabeledMessage};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Per-source row accounting
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub rows_read: usize,
    pub rows_kept: usize,
}

impl SourceSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Outcome of a merge, reported by the trainer
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeSummary {
    pub sources: Vec<SourceSummary>,
    pub ham: usize,
    pub spam: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.ham + self.spam
    }
}

/// Merges labeled sources into one shuffled dataset
#[derive(Debug, Clone)]
pub struct DatasetMerger {
    sources: Vec<PathBuf>,
    seed: u64,
}

impl DatasetMerger {
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self {
            sources,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Read every source from disk and merge them in configured order
    pub fn merge(&self) -> Result<(Dataset, MergeSummary)> {
        let mut parts = Vec::with_capacity(self.sources.len());

        for path in &self.sources {
            let file = std::fs::File::open(path).map_err(|source| TrainError::DatasetIo {
                path: path.clone(),
                source,
            })?;
            let name = path.display().to_string();
            parts.push(read_source(&name, path, file)?);
        }

        Ok(self.merge_parts(parts))
    }

    /// Merge already-read sources: concatenate, then shuffle with the fixed seed
    pub fn merge_parts(&self, parts: Vec<(Vec<LabeledMessage>, SourceSummary)>) -> (Dataset, MergeSummary) {
        let mut dataset: Dataset = Vec::new();
        let mut summary = MergeSummary::default();

        for (rows, source) in parts {
            debug!(
                source = %source.name,
                kept = source.rows_kept,
                dropped = source.rows_dropped(),
                "Source normalized"
            );
            dataset.extend(rows);
            summary.sources.push(source);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        dataset.shuffle(&mut rng);

        summary.spam = dataset.iter().filter(|m| m.label.is_spam()).count();
        summary.ham = dataset.len() - summary.spam;

        info!(
            total = summary.total(),
            ham = summary.ham,
            spam = summary.spam,
            "Datasets merged"
        );

        (dataset, summary)
    }
}

/// Parse one CSV source. The header row is skipped; the first column is the
/// label and the second the message, anything further is ignored.
pub fn read_source<R: Read>(
    name: &str,
    path: &Path,
    reader: R,
) -> Result<(Vec<LabeledMessage>, SourceSummary)> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut summary = SourceSummary {
        name: name.to_string(),
        ..Default::default()
    };

    let mut record = ByteRecord::new();
    loop {
        match csv.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            // Undecodable rows are dropped like any other malformed row
            Err(e) if !matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                summary.rows_read += 1;
                continue;
            }
            Err(source) => {
                return Err(TrainError::DatasetCsv {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        summary.rows_read += 1;
        if let Some(message) = normalize_row(&record) {
            rows.push(message);
            summary.rows_kept += 1;
        }
    }

    Ok((rows, summary))
}

fn normalize_row(record: &ByteRecord) -> Option<LabeledMessage> {
    let label = decode_field(record.get(0)?);
    let text = decode_field(record.get(1)?);

    let label = Label::parse(&label)?;
    if text.is_empty() {
        return None;
    }

    Some(LabeledMessage { text, label })
}

/// UTF-8 when valid, Latin-1 otherwise (common for SMS corpora)
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
