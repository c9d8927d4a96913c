//! Stats directory loader.
//!
//! Mirrors a directory tree into one `NestedRecord`: each directory becomes
//! a subtree keyed by its name, each stats file becomes the filtered record
//! of its JSON document keyed by its file name.
//!
//! ```text
//! formatted/BR-FDIP-NOPREF-NOPREF-NOPREF-LRU-1core/server/app.trace1.100.10.stats
//! => {"BR-FDIP-...-1core": {"server": {"app.trace1.100.10.stats": {...}}}}
//! ```

use super::schema::NestedRecord;
use super::stats_file::{parse_stats, KeyFilter};
use crate::utils::config::LoaderConfig;
use crate::utils::error::LoadError;
use log::{debug, info};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Load every stats file below `dir`
///
/// **Public** - main entry point for input loading
///
/// # Errors
/// * `LoadError::Walk` / `LoadError::Io` - directory or file cannot be read
/// * any error from `parse_stats`
pub fn load_stats_dir(dir: impl AsRef<Path>, config: &LoaderConfig) -> Result<NestedRecord, LoadError> {
    let dir = dir.as_ref();
    info!("Loading stats from: {}", dir.display());

    let filter = KeyFilter::from_config(config)?;
    let mut root = NestedRecord::new();
    let mut files = 0usize;

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or_else(|_| entry.path());
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if entry.file_type().is_dir() {
            descend(&mut root, &components)?;
            continue;
        }

        let has_extension = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == config.extension.as_str());
        if !has_extension {
            debug!("Skipping non-stats file: {}", entry.path().display());
            continue;
        }

        let Some((file_name, parents)) = components.split_last() else {
            continue;
        };

        let record = load_stats_file(entry.path(), &filter)?;
        descend(&mut root, parents)?.insert(file_name.clone(), record);
        files += 1;
    }

    info!("Loaded {} stats files", files);
    Ok(root)
}

/// Load and filter a single stats file
pub fn load_stats_file(path: &Path, filter: &KeyFilter) -> Result<NestedRecord, LoadError> {
    debug!("Reading stats file: {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_stats(&text, path, filter)
}

/// Walk (creating as needed) the subtree at `components`
fn descend<'a>(
    root: &'a mut NestedRecord,
    components: &[String],
) -> Result<&'a mut NestedRecord, LoadError> {
    let mut node = root;
    for component in components {
        node = node
            .child_mut(component)
            .ok_or_else(|| LoadError::DuplicateKey(components.join("/")))?;
    }
    Ok(node)
}
