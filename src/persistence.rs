// File: src/persistence.rs
use crate::core::term_store::TermStore;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Writes the store with bincode. The data goes to a temporary file in the
/// target directory first and is moved into place only once complete, so a
/// reader never sees a half-written store.
pub fn save_store(store: &TermStore, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let mut writer = BufWriter::new(&temp_file);
    bincode::serialize_into(&mut writer, store)?;
    writer.flush()?;
    drop(writer);

    temp_file.persist(path).map_err(|e| e.error)?;
    info!("Saved {} terms to {}", store.len(), path.display());
    Ok(())
}

/// Reads a store written by [`save_store`]. Every term is checked before the
/// store is handed out, so a damaged file fails here and not during lookup.
pub fn load_store(path: &Path) -> Result<TermStore> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let store: TermStore = bincode::deserialize_from(reader)?;
    let store = store.verified()?;
    info!("Loaded {} terms from {}", store.len(), path.display());
    Ok(store)
}
