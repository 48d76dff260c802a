//! File I/O for caching the move and pruning tables between runs.
//!
//! Binary format (little endian):
//! - 8 bytes: magic `2PHASETB`
//! - u32: format version
//! - u64: FxHash checksum of the table contents below
//! - repeat for the twist, flip, udslice, edge4, edge8 and corner move tables:
//!   - u32: row count
//!   - repeat per row: 18 x u16 entries
//! - repeat for the udslice-twist, udslice-flip, edge4-edge8 and
//!   edge4-corner pruning tables:
//!   - u32: stride
//!   - u32: entry count
//!   - entry count x u8 depths

use std::fs::File;
use std::hash::Hasher;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{info, warn};
use rustc_hash::FxHasher;

use crate::coord::{N_CORNER, N_EDGE4, N_EDGE8, N_FLIP, N_TWIST, N_UDSLICE};
use crate::move_table::{MoveTable, DISALLOWED};
use crate::moves::NUM_MOVES;
use crate::pruning::{PruningTable, UNVISITED};
use crate::tables::Tables;

const MAGIC: &[u8; 8] = b"2PHASETB";
const VERSION: u32 = 2;

/// Row counts of the move tables, in file order.
const MOVE_TABLE_SIZES: [usize; 6] = [N_TWIST, N_FLIP, N_UDSLICE, N_EDGE4, N_EDGE8, N_CORNER];

/// (primary, stride) sizes of the pruning tables, in file order.
const PRUNING_TABLE_SIZES: [(usize, usize); 4] = [
    (N_UDSLICE, N_TWIST),
    (N_UDSLICE, N_FLIP),
    (N_EDGE4, N_EDGE8),
    (N_EDGE4, N_CORNER),
];

/// Hashes the contents of every table.
///
/// Catches in-range corruption that the shape checks in `load` accept.
fn checksum(tables: &Tables) -> u64 {
    let mut hasher = FxHasher::default();
    for table in tables.move_tables() {
        hasher.write_usize(table.len());
        for row in table.entries() {
            for &entry in row {
                hasher.write_u16(entry);
            }
        }
    }
    for table in tables.pruning_tables() {
        hasher.write_usize(table.stride());
        hasher.write(table.depths());
    }
    hasher.finish()
}

/// Writes all tables to `path`, replacing any existing file.
pub fn save(path: &Path, tables: &Tables) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    file.write_all(MAGIC)?;
    file.write_all(&VERSION.to_le_bytes())?;
    file.write_all(&checksum(tables).to_le_bytes())?;

    for table in tables.move_tables() {
        file.write_all(&(table.len() as u32).to_le_bytes())?;
        for row in table.entries() {
            for entry in row {
                file.write_all(&entry.to_le_bytes())?;
            }
        }
    }

    for table in tables.pruning_tables() {
        file.write_all(&(table.stride() as u32).to_le_bytes())?;
        file.write_all(&(table.depths().len() as u32).to_le_bytes())?;
        file.write_all(table.depths())?;
    }

    file.flush()
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

fn read_u32(file: &mut impl Read) -> io::Result<u32> {
    let mut u32_buffer = [0u8; 4];
    file.read_exact(&mut u32_buffer)?;
    Ok(u32::from_le_bytes(u32_buffer))
}

/// Checks the magic and version without reading the tables.
fn read_header(file: &mut impl Read) -> io::Result<()> {
    let mut magic = [0u8; 8];
    file.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(invalid_data("not a table cache file".to_string()));
    }
    let version = read_u32(file)?;
    if version != VERSION {
        return Err(invalid_data(format!(
            "unsupported table cache version {version}"
        )));
    }
    Ok(())
}

fn read_move_table(file: &mut impl Read, expected_rows: usize) -> io::Result<MoveTable> {
    let rows = read_u32(file)? as usize;
    if rows != expected_rows {
        return Err(invalid_data(format!(
            "move table has {rows} rows, expected {expected_rows}"
        )));
    }

    let mut row_buffer = [0u8; 2 * NUM_MOVES];
    let mut entries = Vec::with_capacity(rows);
    for _ in 0..rows {
        file.read_exact(&mut row_buffer)?;
        let mut row = [0u16; NUM_MOVES];
        for (entry, bytes) in row.iter_mut().zip(row_buffer.chunks_exact(2)) {
            *entry = u16::from_le_bytes([bytes[0], bytes[1]]);
            if *entry != DISALLOWED && *entry as usize >= rows {
                return Err(invalid_data(format!(
                    "move table entry {entry} out of range"
                )));
            }
        }
        entries.push(row);
    }

    Ok(MoveTable::from_entries(entries))
}

fn read_pruning_table(
    file: &mut impl Read,
    (primary, expected_stride): (usize, usize),
) -> io::Result<PruningTable> {
    let stride = read_u32(file)? as usize;
    let len = read_u32(file)? as usize;
    if stride != expected_stride || len != primary * expected_stride {
        return Err(invalid_data(format!(
            "pruning table has stride {stride} and {len} entries, expected {expected_stride} and {}",
            primary * expected_stride
        )));
    }

    let mut depths = vec![0u8; len];
    file.read_exact(&mut depths)?;
    if depths.contains(&UNVISITED) {
        return Err(invalid_data("pruning table is incomplete".to_string()));
    }

    Ok(PruningTable::from_depths(stride, depths))
}

/// Loads all tables from `path`.
///
/// Fails with `InvalidData` if the file is not a complete cache of the
/// expected shape or its contents do not match the stored checksum.
pub fn load(path: &Path) -> io::Result<Tables> {
    let mut file = BufReader::new(File::open(path)?);
    read_header(&mut file)?;
    let mut checksum_buffer = [0u8; 8];
    file.read_exact(&mut checksum_buffer)?;
    let expected_checksum = u64::from_le_bytes(checksum_buffer);

    let [twist_move, flip_move, udslice_move, edge4_move, edge8_move, corner_move] = {
        let mut tables = Vec::with_capacity(MOVE_TABLE_SIZES.len());
        for rows in MOVE_TABLE_SIZES {
            tables.push(read_move_table(&mut file, rows)?);
        }
        <[MoveTable; 6]>::try_from(tables).map_err(|_| invalid_data("move tables".into()))?
    };

    let [udslice_twist_prune, udslice_flip_prune, edge4_edge8_prune, edge4_corner_prune] = {
        let mut tables = Vec::with_capacity(PRUNING_TABLE_SIZES.len());
        for sizes in PRUNING_TABLE_SIZES {
            tables.push(read_pruning_table(&mut file, sizes)?);
        }
        <[PruningTable; 4]>::try_from(tables).map_err(|_| invalid_data("pruning tables".into()))?
    };

    // trailing bytes mean the file was written by something else
    let mut trailing = [0u8; 1];
    if file.read(&mut trailing)? != 0 {
        return Err(invalid_data("trailing data after tables".to_string()));
    }

    let tables = Tables {
        twist_move,
        flip_move,
        udslice_move,
        edge4_move,
        edge8_move,
        corner_move,
        udslice_twist_prune,
        udslice_flip_prune,
        edge4_edge8_prune,
        edge4_corner_prune,
    };
    if checksum(&tables) != expected_checksum {
        return Err(invalid_data("table cache checksum mismatch".to_string()));
    }
    Ok(tables)
}

/// Returns true if `path` starts with a valid cache header.
///
/// Lets callers warn that the first solve will be slow without loading the
/// whole file.
pub fn is_cached(path: &Path) -> bool {
    File::open(path)
        .map(BufReader::new)
        .and_then(|mut file| read_header(&mut file))
        .is_ok()
}

/// Loads the tables from `path`, or builds them and writes the cache.
///
/// A missing or corrupt cache is treated as a miss. Failing to write the new
/// cache is logged and otherwise ignored.
pub fn load_or_build(path: &Path) -> Tables {
    match load(path) {
        Ok(tables) => {
            info!("Loaded tables from {}", path.display());
            return tables;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No table cache at {}, building tables", path.display());
        }
        Err(e) => {
            warn!(
                "Table cache {} is unusable ({e}), rebuilding",
                path.display()
            );
        }
    }

    let tables = Tables::build();
    match save(path, &tables) {
        Ok(()) => info!("Wrote table cache to {}", path.display()),
        Err(e) => warn!("Failed to write table cache {}: {e}", path.display()),
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("twophase-{}-{name}.bin", std::process::id()))
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let tables = Tables::global();

        save(&path, tables).unwrap();
        assert!(is_cached(&path));
        let loaded = load(&path).unwrap();
        assert!(loaded == *tables);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let path = temp_path("missing");
        assert!(!is_cached(&path));
        assert_eq!(load(&path).unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let path = temp_path("garbage");
        std::fs::write(&path, b"definitely not a table cache").unwrap();
        assert!(!is_cached(&path));
        assert_eq!(load(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_truncated_cache_is_rebuilt() {
        let path = temp_path("truncated");
        let tables = Tables::global();
        save(&path, tables).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(is_cached(&path));
        assert!(load(&path).is_err());

        let rebuilt = load_or_build(&path);
        assert!(rebuilt == *tables);
        // the cache was rewritten in full
        assert_eq!(std::fs::read(&path).unwrap().len(), bytes.len());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupted_depth_is_rebuilt() {
        let path = temp_path("corrupted");
        let tables = Tables::global();
        save(&path, tables).unwrap();

        // the last byte is an edge4 x corner depth; keep it in range
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == 0 { 1 } else { bytes[last] - 1 };
        std::fs::write(&path, &bytes).unwrap();

        assert!(is_cached(&path));
        assert_eq!(
            load(&path).unwrap_err().kind(),
            io::ErrorKind::InvalidData,
            "A changed depth should fail the checksum"
        );

        let rebuilt = load_or_build(&path);
        assert!(rebuilt == *tables);
        assert!(load(&path).unwrap() == *tables, "The rewritten cache should load");

        std::fs::remove_file(&path).unwrap();
    }
}
