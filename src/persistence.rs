// File: src/persistence.rs
use crate::core::tables::{BasketSizeTable, FrequencyTables, RatioTable};
use crate::core::types::{GroundTruthRow, OrderHistory, UserId};
use crate::error::BasketResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Everything one scoring run reads, as handed over by the aggregation stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringSnapshot {
    pub frequencies: FrequencyTables,
    pub basket_sizes: BasketSizeTable,
    #[serde(default)]
    pub ratios: Option<RatioTable>,
    /// Order histories, used to derive ratios when none are supplied.
    #[serde(default)]
    pub histories: Option<HashMap<UserId, OrderHistory>>,
    pub ground_truth: Vec<GroundTruthRow>,
}

impl ScoringSnapshot {
    /// The supplied ratio table, or one measured from the order histories.
    pub fn ratios_or_derived(&self, last_n: usize) -> Option<RatioTable> {
        self.ratios.clone().or_else(|| {
            self.histories
                .as_ref()
                .map(|histories| RatioTable::from_histories(histories, last_n))
        })
    }
}

/// Writes the snapshot as bincode, atomically replacing `path`.
pub fn save_to_disk(snapshot: &ScoringSnapshot, path: &Path) -> BasketResult<()> {
    let parent_dir = parent_or_cwd(path);
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, snapshot)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    info!(path = %path.display(), rows = snapshot.ground_truth.len(), "snapshot saved");
    Ok(())
}

pub fn load_from_disk(path: &Path) -> BasketResult<ScoringSnapshot> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: ScoringSnapshot = bincode::deserialize_from(reader)?;
    info!(path = %path.display(), rows = snapshot.ground_truth.len(), "snapshot loaded");
    Ok(snapshot)
}

/// Writes the snapshot as pretty JSON, atomically replacing `path`.
pub fn save_json(snapshot: &ScoringSnapshot, path: &Path) -> BasketResult<()> {
    let parent_dir = parent_or_cwd(path);
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_json(path: &Path) -> BasketResult<ScoringSnapshot> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
