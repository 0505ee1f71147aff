use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;
use crate::error::TableCacheError;
use once_cell::sync::OnceCell;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const MAGIC_SEED: u64 = 0x45;

static TABLES: OnceCell<MagicTables> = OnceCell::new();

/// Process-wide slider tables, generated on first use.
pub fn load_magic_tables() -> &'static MagicTables {
    TABLES.get_or_init(generate_with_fallback)
}

/// Make `tables` the process-wide set. Returns false if tables were already
/// in use, in which case the argument is dropped.
pub fn install_magic_tables(tables: MagicTables) -> bool {
    TABLES.set(tables).is_ok()
}

fn generate_with_fallback() -> MagicTables {
    let mut seed = MAGIC_SEED;
    loop {
        match generate_magic_tables(MagicTableSeed::Fixed(seed)) {
            Ok(tables) => return tables,
            Err(e) => {
                warn!(seed, error = %e, "magic search failed, retrying with next seed");
                seed = seed.wrapping_add(1);
            }
        }
    }
}

/// Write tables to `path` in bincode form.
pub fn save_magic_tables<P: AsRef<Path>>(
    tables: &MagicTables,
    path: P,
) -> Result<(), TableCacheError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let bytes = bincode::serialize(tables)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), "magic tables cached");
    Ok(())
}

/// Read tables previously written by [`save_magic_tables`]. Every entry's
/// table must be exactly as large as its shift addresses.
pub fn read_magic_tables<P: AsRef<Path>>(path: P) -> Result<MagicTables, TableCacheError> {
    let bytes = fs::read(path)?;
    let tables: MagicTables = bincode::deserialize(&bytes)?;
    tables.check()?;
    Ok(tables)
}

/// Load tables from a cache file, or generate and write it when missing or
/// unreadable. Installs the result as the process-wide set.
pub fn load_or_build_cache<P: AsRef<Path>>(
    path: P,
) -> Result<&'static MagicTables, TableCacheError> {
    let path = path.as_ref();
    let tables = match read_magic_tables(path) {
        Ok(t) => t,
        Err(e) => {
            info!(path = %path.display(), reason = %e, "building magic table cache");
            let t = generate_with_fallback();
            save_magic_tables(&t, path)?;
            t
        }
    };
    install_magic_tables(tables);
    Ok(load_magic_tables())
}
