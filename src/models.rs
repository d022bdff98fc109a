//! Core data models for the media catalog

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Media type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Video files (mp4, mkv, avi, etc.)
    Video,
    /// Audio files (mp3, flac, wav, etc.)
    Audio,
    /// Document files (pdf, epub, mobi, etc.)
    Document,
    /// Extension outside every configured set
    Unknown,
}

impl MediaType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Document => "document",
            MediaType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One catalogued file, rebuilt from a stat on every query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// File name without extension
    pub name: String,
    /// Absolute path to the file
    pub file_path: PathBuf,
    /// File size in bytes
    pub file_size: u64,
    /// Creation time (birth time, or modification time where unavailable)
    pub created_date: DateTime<Local>,
    /// Modification time
    pub modified_date: DateTime<Local>,
    /// Type derived from the extension
    pub media_type: MediaType,
    /// Lowercase extension including the dot, empty if none
    pub extension: String,
}

impl MediaItem {
    /// File size in megabytes, rounded to two decimals
    pub fn file_size_mb(&self) -> f64 {
        round2(self.file_size as f64 / BYTES_PER_MB)
    }

    /// File size in gigabytes, rounded to two decimals
    pub fn file_size_gb(&self) -> f64 {
        round2(self.file_size as f64 / BYTES_PER_GB)
    }

    /// JSON shape handed to presentation code, including derived sizes
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "file_path": self.file_path.to_string_lossy(),
            "file_size": self.file_size,
            "file_size_mb": self.file_size_mb(),
            "file_size_gb": self.file_size_gb(),
            "created_date": self.created_date.to_rfc3339(),
            "modified_date": self.modified_date.to_rfc3339(),
            "media_type": self.media_type,
            "extension": self.extension,
        })
    }
}

/// A configured top-level folder grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category key (e.g. "peliculas")
    pub name: String,
    /// Folder name, shown to users
    pub display_name: String,
    /// Absolute folder path
    pub path: PathBuf,
    /// Number of supported files directly inside the folder
    pub item_count: usize,
}

impl Category {
    /// JSON shape handed to presentation code
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "display_name": self.display_name,
            "path": self.path.to_string_lossy(),
            "item_count": self.item_count,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
