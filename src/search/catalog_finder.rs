use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::CATALOG_EXTENSION;
use crate::error::Result;

/// How many leading bytes are inspected for a `<TS` root
const SNIFF_LEN: usize = 512;

/// Finds Linguist catalogs below a directory
pub struct CatalogFinder {
    base_dir: PathBuf,
    exclusions: Vec<String>,
}

impl CatalogFinder {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            exclusions: Vec::new(),
        }
    }

    pub fn add_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        // The root itself is never excluded, even if it's named "build"
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.exclusions.iter().any(|ex| name == ex.as_str())
    }

    /// Every `.ts` file that looks like a Linguist catalog, sorted by path.
    /// A path that is itself a file is returned as-is.
    pub fn find(&self) -> Result<Vec<PathBuf>> {
        if self.base_dir.is_file() {
            return Ok(vec![self.base_dir.clone()]);
        }

        let mut catalogs = Vec::new();
        let walker = WalkDir::new(&self.base_dir)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != CATALOG_EXTENSION) {
                continue;
            }
            if looks_like_catalog(path)? {
                catalogs.push(path.to_path_buf());
            } else {
                debug!(file = %path.display(), "skipping .ts file without <TS> root");
            }
        }

        catalogs.sort();
        Ok(catalogs)
    }
}

/// Distinguish Linguist XML from TypeScript sources sharing the extension
pub fn looks_like_catalog(path: &Path) -> Result<bool> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    let head = String::from_utf8_lossy(&head);
    Ok(head.contains("<TS") || head.contains("<!DOCTYPE TS"))
}
