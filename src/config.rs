//! Configuration for the media catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::MediaType;

/// Default root directory holding every category folder
pub const DEFAULT_ROOT: &str = "/home/usuario/ROOT";

/// Environment variable overriding the root directory
pub const ROOT_ENV_VAR: &str = "MEDIA_VAULT_ROOT";

/// Settings-style name for the same override, used when ROOT_ENV_VAR is unset
pub const LEGACY_ROOT_ENV_VAR: &str = "ROOT_MEDIA_PATH";

/// Errors raised while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for this schema
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One category key mapped to its folder under the root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFolder {
    /// Stable identifier (e.g. "peliculas")
    pub key: String,
    /// Folder name below the root, also used as display name
    pub folder: String,
}

impl CategoryFolder {
    pub fn new(key: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            folder: folder.into(),
        }
    }
}

/// Catalog configuration, immutable once handed to the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory under which all category folders live
    pub root: PathBuf,

    /// Category mapping in declared order
    pub categories: Vec<CategoryFolder>,

    /// Video extensions (lowercase, with leading dot)
    pub video_extensions: BTreeSet<String>,

    /// Audio extensions (lowercase, with leading dot)
    pub audio_extensions: BTreeSet<String>,

    /// Document extensions (lowercase, with leading dot)
    pub document_extensions: BTreeSet<String>,

    /// Number of threads for per-file stat work
    /// 0 means auto-detect
    pub num_threads: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            categories: Self::default_categories(),
            video_extensions: Self::default_video_extensions(),
            audio_extensions: Self::default_audio_extensions(),
            document_extensions: Self::default_document_extensions(),
            num_threads: 0,
        }
    }
}

impl CatalogConfig {
    /// Create a config builder
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::new()
    }

    /// Load defaults, overlay an optional JSON file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(root) = root_override(|name| std::env::var_os(name)) {
            config.root = root;
        }

        Ok(config)
    }

    /// Read a JSON configuration file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.normalized())
    }

    /// Get the default category mapping
    pub fn default_categories() -> Vec<CategoryFolder> {
        vec![
            CategoryFolder::new("peliculas", "Peliculas"),
            CategoryFolder::new("series", "Series TV"),
            CategoryFolder::new("libros", "Libros"),
            CategoryFolder::new("musica", "Musica"),
        ]
    }

    /// Get the default video extensions
    pub fn default_video_extensions() -> BTreeSet<String> {
        normalize_extensions([".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"])
    }

    /// Get the default audio extensions
    pub fn default_audio_extensions() -> BTreeSet<String> {
        normalize_extensions([".mp3", ".flac", ".wav", ".aac", ".ogg", ".m4a"])
    }

    /// Get the default document extensions
    pub fn default_document_extensions() -> BTreeSet<String> {
        normalize_extensions([".pdf", ".epub", ".mobi", ".azw3"])
    }

    /// Re-apply extension normalization, e.g. after deserializing user input
    pub fn normalized(mut self) -> Self {
        self.video_extensions = normalize_extensions(self.video_extensions);
        self.audio_extensions = normalize_extensions(self.audio_extensions);
        self.document_extensions = normalize_extensions(self.document_extensions);
        self
    }

    /// Check whether a category key is configured
    pub fn contains_category(&self, key: &str) -> bool {
        self.category(key).is_some()
    }

    /// Look up a category entry by key
    pub fn category(&self, key: &str) -> Option<&CategoryFolder> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Absolute folder for a category key
    pub fn folder_for(&self, key: &str) -> Option<PathBuf> {
        self.category(key).map(|c| self.root.join(&c.folder))
    }

    /// Check if an extension belongs to the combined extension set
    pub fn is_supported_extension(&self, ext: &str) -> bool {
        self.media_type_for(ext) != MediaType::Unknown
    }

    /// Classify an extension, testing video, then audio, then document
    pub fn media_type_for(&self, ext: &str) -> MediaType {
        let ext = ext.to_lowercase();
        if self.video_extensions.contains(&ext) {
            MediaType::Video
        } else if self.audio_extensions.contains(&ext) {
            MediaType::Audio
        } else if self.document_extensions.contains(&ext) {
            MediaType::Document
        } else {
            MediaType::Unknown
        }
    }

    /// Get the effective number of threads
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        } else {
            self.num_threads
        }
    }
}

/// Root directory taken from the environment, preferring ROOT_ENV_VAR
fn root_override<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<std::ffi::OsString>,
{
    [ROOT_ENV_VAR, LEGACY_ROOT_ENV_VAR]
        .into_iter()
        .find_map(|name| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .map(|value| (name, value))
        })
        .map(|(name, value)| {
            log::debug!("Root overridden by {}: {:?}", name, value);
            PathBuf::from(value)
        })
}

/// Lowercase each extension and make sure it starts with a dot
pub fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .filter_map(|ext| {
            let ext = ext.as_ref().trim().to_lowercase();
            match ext.trim_start_matches('.') {
                "" => None,
                bare => Some(format!(".{}", bare)),
            }
        })
        .collect()
}

/// Builder for CatalogConfig
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root directory
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Replace the whole category mapping
    pub fn categories(mut self, categories: Vec<CategoryFolder>) -> Self {
        self.config.categories = categories;
        self
    }

    /// Append a category, or remap its folder if the key already exists
    pub fn add_category(mut self, key: impl Into<String>, folder: impl Into<String>) -> Self {
        let entry = CategoryFolder::new(key, folder);
        match self.config.categories.iter_mut().find(|c| c.key == entry.key) {
            Some(existing) => existing.folder = entry.folder,
            None => self.config.categories.push(entry),
        }
        self
    }

    /// Set the video extensions
    pub fn video_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.video_extensions = normalize_extensions(extensions);
        self
    }

    /// Set the audio extensions
    pub fn audio_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.audio_extensions = normalize_extensions(extensions);
        self
    }

    /// Set the document extensions
    pub fn document_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.document_extensions = normalize_extensions(extensions);
        self
    }

    /// Set the number of threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Build the config
    pub fn build(self) -> CatalogConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.root, PathBuf::from(DEFAULT_ROOT));
        let keys: Vec<&str> = config.categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["peliculas", "series", "libros", "musica"]);
        assert_eq!(config.category("series").unwrap().folder, "Series TV");
        assert_eq!(config.num_threads, 0);
    }

    #[test]
    fn test_default_extensions() {
        let config = CatalogConfig::default();
        assert!(config.video_extensions.contains(".mkv"));
        assert!(config.audio_extensions.contains(".flac"));
        assert!(config.document_extensions.contains(".azw3"));
        assert!(!config.is_supported_extension(".txt"));
    }

    #[test]
    fn test_media_type_for() {
        let config = CatalogConfig::default();
        assert_eq!(config.media_type_for(".mp4"), MediaType::Video);
        assert_eq!(config.media_type_for(".MP4"), MediaType::Video);
        assert_eq!(config.media_type_for(".ogg"), MediaType::Audio);
        assert_eq!(config.media_type_for(".epub"), MediaType::Document);
        assert_eq!(config.media_type_for(".txt"), MediaType::Unknown);
        assert_eq!(config.media_type_for(""), MediaType::Unknown);
    }

    #[test]
    fn test_classification_priority_on_overlap() {
        let config = CatalogConfig::builder()
            .video_extensions([".ogg"])
            .audio_extensions([".ogg", ".mp3"])
            .document_extensions([".mp3"])
            .build();
        assert_eq!(config.media_type_for(".ogg"), MediaType::Video);
        assert_eq!(config.media_type_for(".mp3"), MediaType::Audio);
    }

    #[test]
    fn test_folder_for() {
        let config = CatalogConfig::builder()
            .root("/srv/media")
            .categories(vec![CategoryFolder::new("peliculas", "Peliculas")])
            .build();
        assert_eq!(
            config.folder_for("peliculas"),
            Some(PathBuf::from("/srv/media/Peliculas"))
        );
        assert_eq!(config.folder_for("musica"), None);
        assert!(config.contains_category("peliculas"));
        assert!(!config.contains_category("Peliculas"));
    }

    #[test]
    fn test_builder_add_category_remaps_existing_key() {
        let config = CatalogConfig::builder()
            .categories(Vec::new())
            .add_category("anime", "Anime")
            .add_category("docs", "Docs")
            .add_category("anime", "Animacion")
            .build();
        assert_eq!(
            config.categories,
            vec![
                CategoryFolder::new("anime", "Animacion"),
                CategoryFolder::new("docs", "Docs"),
            ]
        );
    }

    #[test]
    fn test_normalize_extensions() {
        let set = normalize_extensions(["MP4", ".Mkv", "", ".", " avi "]);
        let expected: BTreeSet<String> = [".avi", ".mkv", ".mp4"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_from_file_partial_overrides_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        std::fs::write(
            &path,
            r#"{"root": "/data", "video_extensions": ["MP4", "m2ts"]}"#,
        )
        .unwrap();

        let config = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert!(config.video_extensions.contains(".m2ts"));
        assert!(config.video_extensions.contains(".mp4"));
        assert!(!config.video_extensions.contains(".mkv"));
        assert_eq!(config.categories, CatalogConfig::default_categories());
        assert_eq!(config.audio_extensions, CatalogConfig::default_audio_extensions());
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            CatalogConfig::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            CatalogConfig::from_file(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_root_override_precedence() {
        let both = |name: &str| match name {
            ROOT_ENV_VAR => Some("/vault".into()),
            LEGACY_ROOT_ENV_VAR => Some("/legacy".into()),
            _ => None,
        };
        assert_eq!(root_override(both), Some(PathBuf::from("/vault")));

        let legacy_only = |name: &str| match name {
            LEGACY_ROOT_ENV_VAR => Some("/legacy".into()),
            _ => None,
        };
        assert_eq!(root_override(legacy_only), Some(PathBuf::from("/legacy")));

        let empty = |name: &str| match name {
            ROOT_ENV_VAR => Some("".into()),
            _ => None,
        };
        assert_eq!(root_override(empty), None);
        assert_eq!(root_override(|_: &str| None), None);
    }

    #[test]
    fn test_effective_threads() {
        let config = CatalogConfig::builder().num_threads(8).build();
        assert_eq!(config.effective_threads(), 8);

        let auto_config = CatalogConfig::default();
        assert!(auto_config.effective_threads() > 0);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(exts in proptest::collection::vec("[.A-Za-z0-9]{0,6}", 0..8)) {
            let once = normalize_extensions(&exts);
            let twice = normalize_extensions(&once);
            prop_assert_eq!(&once, &twice);
            for ext in &once {
                prop_assert!(ext.starts_with('.'));
                prop_assert_eq!(ext.clone(), ext.to_lowercase());
            }
        }

        #[test]
        fn prop_classification_is_total_and_consistent(ext in "\\.?[a-zA-Z0-9]{0,5}") {
            let config = CatalogConfig::default();
            let media_type = config.media_type_for(&ext);
            prop_assert_eq!(media_type != MediaType::Unknown, config.is_supported_extension(&ext));
            let lower = ext.to_lowercase();
            if config.video_extensions.contains(&lower) {
                prop_assert_eq!(media_type, MediaType::Video);
            }
        }
    }
}
