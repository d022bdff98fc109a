//! Scanner module - classifies and lists the files of each category folder
//!
//! Every call re-reads the filesystem. Folders are read one level deep, so
//! each operation is a short, bounded sequence of directory reads and stats.
//! A symlink is catalogued only when it resolves to a regular file inside
//! its own category folder. Filesystem faults never reach the
//! caller: each call site degrades to an omitted category, a shorter listing
//! or an absent item, and logs what happened.

use chrono::{DateTime, Local};
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::CatalogConfig;
use crate::error::{classify_io_error, classify_walk_error, FsErrorKind, LookupError};
use crate::models::{Category, MediaItem, MediaType};

/// Read-only catalog engine over one root directory
#[derive(Debug)]
pub struct MediaScanner {
    config: CatalogConfig,
    pool: Option<rayon::ThreadPool>,
}

impl MediaScanner {
    /// Create a scanner owning the given configuration
    pub fn new(config: CatalogConfig) -> Self {
        let pool = if config.num_threads == 0 {
            None
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(config.num_threads)
                .build()
            {
                Ok(pool) => Some(pool),
                Err(e) => {
                    log::warn!("Failed to build thread pool, using global pool: {}", e);
                    None
                }
            }
        };
        Self { config, pool }
    }

    /// The configuration this scanner was built with
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Every configured category whose folder exists, with its live item count.
    ///
    /// Categories keep the declared order of the mapping. A folder that is
    /// missing or not a directory leaves its category out of the result.
    pub fn list_categories(&self) -> Vec<Category> {
        self.config
            .categories
            .iter()
            .filter_map(|entry| {
                let path = self.config.root.join(&entry.folder);
                match fs::metadata(&path) {
                    Ok(metadata) if metadata.is_dir() => {}
                    Ok(_) => {
                        log::debug!("Skipping category {}: {:?} is not a directory", entry.key, path);
                        return None;
                    }
                    Err(e) => {
                        match classify_io_error(&e) {
                            FsErrorKind::NotFound => {
                                log::debug!("Skipping category {}: {:?} does not exist", entry.key, path)
                            }
                            kind => log::warn!(
                                "Skipping category {}: cannot stat {:?} ({}): {}",
                                entry.key,
                                path,
                                kind,
                                e
                            ),
                        }
                        return None;
                    }
                }

                let item_count = self.scan_folder(&path).len();
                Some(Category {
                    name: entry.key.clone(),
                    display_name: entry.folder.clone(),
                    path,
                    item_count,
                })
            })
            .collect()
    }

    /// Classified items of one category, sorted case-insensitively by filename.
    ///
    /// Files that disappear between listing and stat are dropped.
    pub fn list_media_items(&self, category: &str) -> Result<Vec<MediaItem>, LookupError> {
        let folder = self.resolve_folder(category)?;
        let files = self.scan_folder(&folder);

        let items: Vec<MediaItem> = self.install(|| {
            files
                .par_iter()
                .filter_map(|path| self.build_item(path))
                .collect()
        });
        Ok(items)
    }

    /// Resolve one item by its exact filename inside a category folder.
    ///
    /// Returns `Ok(None)` when no regular file by that name exists. The
    /// filename must be a single plain path component; anything that could
    /// point outside the folder is rejected before touching the filesystem,
    /// and a symlink resolving outside the folder is rejected after it.
    pub fn get_media_item_by_name(
        &self,
        category: &str,
        filename: &str,
    ) -> Result<Option<MediaItem>, LookupError> {
        let folder = self.resolve_folder(category)?;
        validate_filename(filename)?;

        let path = folder.join(filename);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) => {
                log::debug!("Lookup of {:?} failed ({}): {}", path, classify_io_error(&e), e);
                return Ok(None);
            }
        }

        match is_inside(&folder, &path) {
            Some(true) => {}
            Some(false) => {
                log::warn!("Rejected {:?}: resolves outside {:?}", path, folder);
                return Err(LookupError::InvalidFilename(filename.to_string()));
            }
            None => return Ok(None),
        }

        Ok(self.build_item(&path))
    }

    /// Classify an extension with the configured sets
    pub fn classify(&self, extension: &str) -> MediaType {
        self.config.media_type_for(extension)
    }

    fn resolve_folder(&self, category: &str) -> Result<PathBuf, LookupError> {
        self.config
            .folder_for(category)
            .ok_or_else(|| LookupError::UnknownCategory(category.to_string()))
    }

    /// Supported regular files directly inside `folder`, in presentation order.
    ///
    /// Enumeration stops at the first error; files gathered before it are kept.
    fn scan_folder(&self, folder: &Path) -> Vec<PathBuf> {
        let mut media_files = Vec::new();
        let canonical_folder = fs::canonicalize(folder).ok();

        let walker = WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if self.is_media_file(entry.path())
                        && is_catalogued_file(&entry, canonical_folder.as_deref())
                    {
                        media_files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    match classify_walk_error(&e) {
                        FsErrorKind::PermissionDenied => {
                            log::warn!("Permission denied reading {:?}: {}", folder, e)
                        }
                        FsErrorKind::NotFound => {
                            log::debug!("Folder {:?} vanished while reading: {}", folder, e)
                        }
                        FsErrorKind::Other => log::warn!("Failed to read {:?}: {}", folder, e),
                    }
                    break;
                }
            }
        }

        media_files.sort_by_cached_key(|path| {
            let name = file_name_of(path);
            (name.to_lowercase(), name)
        });
        media_files
    }

    fn is_media_file(&self, path: &Path) -> bool {
        self.config.is_supported_extension(&extension_of(path))
    }

    /// Stat one file into a MediaItem, or None if it is gone or no longer a regular file
    fn build_item(&self, path: &Path) -> Option<MediaItem> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                log::debug!("Dropping {:?}: no longer a regular file", path);
                return None;
            }
            Err(e) => {
                log::debug!("Dropping {:?} ({}): {}", path, classify_io_error(&e), e);
                return None;
            }
        };

        let modified_date: DateTime<Local> = match metadata.modified() {
            Ok(time) => time.into(),
            Err(e) => {
                log::debug!("Dropping {:?}: no modification time: {}", path, e);
                return None;
            }
        };
        let created_date = metadata
            .created()
            .map(DateTime::<Local>::from)
            .unwrap_or(modified_date);

        let extension = extension_of(path);
        Some(MediaItem {
            name: stem_of(path),
            file_path: path.to_path_buf(),
            file_size: metadata.len(),
            created_date,
            modified_date,
            media_type: self.classify(&extension),
            extension,
        })
    }

    fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

/// Lowercase extension including the dot, or empty string if none
pub fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}

/// File name without its extension
fn stem_of(path: &Path) -> String {
    match (path.extension(), path.file_stem()) {
        (Some(ext), Some(stem)) if !ext.is_empty() => stem.to_string_lossy().into_owned(),
        _ => file_name_of(path),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn validate_filename(filename: &str) -> Result<(), LookupError> {
    let invalid = || LookupError::InvalidFilename(filename.to_string());

    if filename.contains(std::path::is_separator) || filename.contains('\0') {
        return Err(invalid());
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid()),
    }
}

/// Regular files pass as-is; a symlink passes when it resolves to a regular file under `canonical_folder`
fn is_catalogued_file(entry: &walkdir::DirEntry, canonical_folder: Option<&Path>) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if !file_type.is_symlink() {
        return false;
    }
    let Some(folder) = canonical_folder else {
        return false;
    };

    match fs::canonicalize(entry.path()) {
        Ok(target) if target.starts_with(folder) => target.is_file(),
        Ok(target) => {
            log::debug!("Skipping {:?}: links outside {:?} to {:?}", entry.path(), folder, target);
            false
        }
        Err(e) => {
            log::debug!("Skipping {:?}: broken link ({}): {}", entry.path(), classify_io_error(&e), e);
            false
        }
    }
}

/// Whether `path` canonicalizes to a location under `folder`; None if either cannot be resolved
fn is_inside(folder: &Path, path: &Path) -> Option<bool> {
    let folder = fs::canonicalize(folder).ok()?;
    let path = fs::canonicalize(path).ok()?;
    Some(path.starts_with(&folder))
}
