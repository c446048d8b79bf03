//! Writes collected groups as chunk-relative JSON records.

use std::path::PathBuf;

use strata_blocks::{BlockListError, BlockListIndex, write_records};
use strata_config::ExportConfig;
use strata_pos::{BlockPos, ChunkPos};
use tracing::info;

/// Exports every group of `index` into one file under `output_dir`.
///
/// Returns the written path. Nothing is written if any position falls
/// outside the serialization window.
pub(crate) fn export_index(index: &BlockListIndex, export: &ExportConfig) -> Result<PathBuf, BlockListError> {
    let chunk = ChunkPos::new(export.chunk_x, export.chunk_z);
    let [ox, oy, oz] = export.offset;
    let records = index.to_records(BlockPos::new(ox, oy, oz), chunk)?;

    std::fs::create_dir_all(&export.output_dir)?;
    let path = export
        .output_dir
        .join(format!("blocks_{}_{}.json", chunk.x, chunk.z));
    write_records(&path, &records, export.pretty)?;

    info!(
        path = %path.display(),
        %chunk,
        groups = records.len(),
        positions = index.position_count(),
        "exported block records"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use strata_blocks::{BlockListRecord, BlockState};

    use super::*;

    fn export_config(dir: PathBuf) -> ExportConfig {
        ExportConfig {
            output_dir: dir,
            ..ExportConfig::default()
        }
    }

    #[test]
    fn test_export_writes_one_record_per_group() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = BlockListIndex::new();
        index.put(&BlockState::new("stone"), BlockPos::new(1, 2, 3));
        index.put(&BlockState::new("dirt"), BlockPos::new(4, 5, 6));
        index.put(&BlockState::new("stone"), BlockPos::new(7, 8, 9));

        let path = export_index(&index, &export_config(dir.path().join("out"))).unwrap();
        assert!(path.ends_with("blocks_0_0.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        let records: Vec<BlockListRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].positions.len(), 2);
    }

    #[test]
    fn test_export_rejects_positions_below_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = BlockListIndex::new();
        index.put(&BlockState::new("stone"), BlockPos::new(-1, 0, 0));

        let err = export_index(&index, &export_config(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, BlockListError::OutOfWindow { .. }));
        assert!(!dir.path().join("blocks_0_0.json").exists());
    }
}
