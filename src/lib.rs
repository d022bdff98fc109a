//! Read-only media catalog over a single root directory
//!
//! This library groups the files of configured category folders, classifies
//! them by extension and resolves single items by filename, without ever
//! failing on filesystem anomalies.

pub mod config;
pub mod error;
pub mod metadata;
pub mod models;
pub mod scanner;

pub use config::{CatalogConfig, CatalogConfigBuilder, CategoryFolder, ConfigError};
pub use error::{FsErrorKind, LookupError};
pub use metadata::{extract_metadata, ExtendedMetadata, MediaDetails};
pub use models::{Category, MediaItem, MediaType};
pub use scanner::MediaScanner;
