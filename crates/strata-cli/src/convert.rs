//! Conversions between chunk files on disk and interchange files.
//!
//! Chunk documents are named `c.<x>.<z>.dat`. From data version 2679 on,
//! entities live in a same-named document under the configured entities
//! subdirectory.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use strata_config::Config;
use strata_level::Level;
use strata_nbt::{Compound, NbtFile};
use strata_region::{ChunkCodec, ChunkColumn, DataVersion};
use strata_wire::{LevelData, decode_level, encode_level};

use crate::error::CliError;

const CHUNK_EXTENSION: &str = "dat";

/// Counts reported after a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub chunks: usize,
    pub cells: usize,
    pub entities: usize,
}

impl ConversionSummary {
    fn add(&mut self, column: &ChunkColumn) {
        self.chunks += 1;
        self.cells += column.sections.len();
        self.entities += column.entities.len();
    }
}

/// File name of the chunk document for column `(x, z)`.
pub fn chunk_file_name(x: i32, z: i32) -> String {
    format!("c.{x}.{z}.{CHUNK_EXTENSION}")
}

fn read_document(path: &Path, gzip: bool) -> Result<Compound, CliError> {
    let file = File::open(path).map_err(CliError::io(path))?;
    let mut reader = BufReader::new(file);
    let document = if gzip {
        NbtFile::read_gzip(reader)
    } else {
        NbtFile::read(&mut reader)
    };
    Ok(document.map_err(CliError::document(path))?.root)
}

fn write_document(path: &Path, root: Compound, gzip: bool) -> Result<(), CliError> {
    let file = File::create(path).map_err(CliError::io(path))?;
    let mut writer = BufWriter::new(file);
    let document = NbtFile::new("", root);
    let written = if gzip {
        document.write_gzip(&mut writer)
    } else {
        document.write(&mut writer)
    };
    written.map_err(CliError::document(path))?;
    writer.flush().map_err(CliError::io(path))
}

/// A single file, or every `.dat` file directly inside a directory, sorted.
fn chunk_files(input: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input).map_err(CliError::io(input))? {
        let path = entry.map_err(CliError::io(input))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == CHUNK_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads chunk documents from `input` (a file or a directory) and writes
/// them to `output` as one interchange file.
pub fn to_wire(input: &Path, output: &Path, config: &Config) -> Result<ConversionSummary, CliError> {
    let gzip = config.io.gzip;
    let min_bits = config.conversion.min_block_state_bits;
    let entities_dir = input.is_dir().then(|| input.join(&config.io.entities_dir));

    let mut level = Level::new();
    let mut summary = ConversionSummary::default();
    for path in chunk_files(input)? {
        let root = read_document(&path, gzip)?;
        let codec = ChunkCodec::for_document(&root, min_bits)?;
        let mut column = codec.decode(&root)?;

        if let Some(dir) = &entities_dir
            && codec.version().is_entity_directory_supported()
        {
            let entity_path = dir.join(chunk_file_name(column.x, column.z));
            if entity_path.is_file() {
                let document = read_document(&entity_path, gzip)?;
                codec.decode_entities(&document, &mut column)?;
            }
        }

        tracing::debug!(
            path = %path.display(),
            x = column.x,
            z = column.z,
            version = codec.version().0,
            "read chunk"
        );
        summary.add(&column);
        column.merge_into(&mut level);
    }

    let bytes = encode_level(&LevelData::from_level(&level)?)?;
    std::fs::write(output, bytes).map_err(CliError::io(output))?;
    tracing::info!(
        chunks = summary.chunks,
        cells = summary.cells,
        output = %output.display(),
        "wrote interchange file"
    );
    Ok(summary)
}

/// Reads an interchange file and writes one chunk document per column into
/// `output_dir`, in the configured data version.
pub fn to_region(input: &Path, output_dir: &Path, config: &Config) -> Result<ConversionSummary, CliError> {
    let gzip = config.io.gzip;
    let version = DataVersion(config.conversion.data_version);
    let codec = ChunkCodec::new(version, config.conversion.min_block_state_bits)?;

    let bytes = std::fs::read(input).map_err(CliError::io(input))?;
    let level = decode_level(&bytes)?.to_level()?;
    let columns = ChunkColumn::from_level(&level, version)?;

    std::fs::create_dir_all(output_dir).map_err(CliError::io(output_dir))?;
    let entities_dir = output_dir.join(&config.io.entities_dir);

    let mut summary = ConversionSummary::default();
    for column in &columns {
        let name = chunk_file_name(column.x, column.z);
        write_document(&output_dir.join(&name), codec.encode(column)?, gzip)?;
        if let Some(document) = codec.encode_entities(column)? {
            std::fs::create_dir_all(&entities_dir).map_err(CliError::io(&entities_dir))?;
            write_document(&entities_dir.join(&name), document, gzip)?;
        }
        summary.add(column);
    }

    tracing::info!(
        chunks = summary.chunks,
        cells = summary.cells,
        version = version.0,
        output = %output_dir.display(),
        "wrote chunk files"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strata_bits::BitPacker;
    use strata_level::{BlockState, CELL_VOLUME, Cell, CellCoord, Palette};
    use strata_nbt::Tag;

    fn sample_level() -> Level {
        let palette = Arc::new(Palette::new(
            "sample",
            2586,
            vec![
                BlockState::new("minecraft:air"),
                BlockState::new("minecraft:stone"),
                BlockState::new("minecraft:gravel"),
            ],
        ));
        let values: Vec<u32> = (0..CELL_VOLUME as u32).map(|i| (i % 5).min(2)).collect();
        let cell = Cell::new(Arc::clone(&palette), BitPacker::from_values(&values)).unwrap();

        let mut level = Level::new();
        level.put(CellCoord::new(0, 0, 0), cell.clone());
        level.put(CellCoord::new(0, 4, 0), cell.clone());
        level.put(CellCoord::new(3, -1, -2), cell);

        let mut pig = Compound::new();
        pig.insert("id".into(), Tag::from("minecraft:pig"));
        pig.insert(
            "Pos".into(),
            Tag::List(vec![Tag::Double(4.0), Tag::Double(64.0), Tag::Double(4.0)]),
        );
        level.entities.push(pig);
        level
    }

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("level.bin");
        let bytes = encode_level(&LevelData::from_level(&sample_level()).unwrap()).unwrap();
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn config(version: i32, gzip: bool) -> Config {
        let mut config = Config::default();
        config.conversion.data_version = version;
        config.io.gzip = gzip;
        config
    }

    fn read_back(path: &Path) -> Level {
        decode_level(&std::fs::read(path).unwrap())
            .unwrap()
            .to_level()
            .unwrap()
    }

    #[test]
    fn test_chunk_file_name() {
        assert_eq!(chunk_file_name(-3, 12), "c.-3.12.dat");
    }

    #[test]
    fn test_region_roundtrip_through_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let chunks = dir.path().join("chunks");

        let written = to_region(&input, &chunks, &config(2586, true)).unwrap();
        assert_eq!(written.chunks, 2);
        assert_eq!(written.cells, 3);
        assert!(chunks.join("c.0.0.dat").is_file());
        assert!(chunks.join("c.3.-2.dat").is_file());
        assert!(!chunks.join("entities").exists());

        let output = dir.path().join("again.bin");
        let read = to_wire(&chunks, &output, &config(2586, true)).unwrap();
        assert_eq!(read, written);

        let level = read_back(&output);
        let expected = sample_level();
        assert_eq!(level.len(), 3);
        for (coord, cell) in &expected {
            let other = level.get(*coord).unwrap();
            assert_eq!(cell.state_at(1, 2, 3).unwrap(), other.state_at(1, 2, 3).unwrap());
            assert_eq!(cell.state_at(15, 15, 15).unwrap(), other.state_at(15, 15, 15).unwrap());
        }
        assert_eq!(level.entities, expected.entities);
    }

    #[test]
    fn test_entity_directory_written_from_2679() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let chunks = dir.path().join("chunks");

        to_region(&input, &chunks, &config(2730, false)).unwrap();
        let entity_path = chunks.join("entities").join("c.0.0.dat");
        assert!(entity_path.is_file());
        let chunk = read_document(&chunks.join("c.0.0.dat"), false).unwrap();
        let level_tag = chunk.get("Level").and_then(Tag::as_compound).unwrap();
        assert!(level_tag.get("Entities").is_none());

        let output = dir.path().join("again.bin");
        let summary = to_wire(&chunks, &output, &config(2730, false)).unwrap();
        assert_eq!(summary.entities, 1);
        assert_eq!(read_back(&output).entities.len(), 1);
    }

    #[test]
    fn test_single_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let chunks = dir.path().join("chunks");
        to_region(&input, &chunks, &config(2586, true)).unwrap();

        let output = dir.path().join("one.bin");
        let summary = to_wire(&chunks.join("c.3.-2.dat"), &output, &config(2586, true)).unwrap();
        assert_eq!(summary.chunks, 1);
        assert!(read_back(&output).get(CellCoord::new(3, -1, -2)).is_some());
    }

    #[test]
    fn test_compression_mismatch_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let chunks = dir.path().join("chunks");
        to_region(&input, &chunks, &config(2586, false)).unwrap();

        let output = dir.path().join("bad.bin");
        let err = to_wire(&chunks, &output, &config(2586, true)).unwrap_err();
        assert!(matches!(err, CliError::Document { .. }));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = to_region(
            &dir.path().join("absent.bin"),
            dir.path(),
            &Config::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
