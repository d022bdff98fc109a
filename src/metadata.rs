//! Per-type metadata placeholders for the detail view
//!
//! Deep extraction (duration, codec, author, ...) is not performed; every
//! field is reported as absent so the shape stays stable for consumers.

use serde::Serialize;

use crate::models::{MediaItem, MediaType};

/// Extended metadata, one shape per media type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtendedMetadata {
    Video {
        duration: Option<u64>,
        resolution: Option<String>,
        codec: Option<String>,
        fps: Option<u32>,
    },
    Audio {
        duration: Option<u64>,
        bitrate: Option<u32>,
        artist: Option<String>,
        album: Option<String>,
        year: Option<u16>,
    },
    Document {
        page_count: Option<u32>,
        author: Option<String>,
        title: Option<String>,
        subject: Option<String>,
    },
    Empty {},
}

impl ExtendedMetadata {
    /// Empty placeholder matching the media type
    pub fn placeholder(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Video => ExtendedMetadata::Video {
                duration: None,
                resolution: None,
                codec: None,
                fps: None,
            },
            MediaType::Audio => ExtendedMetadata::Audio {
                duration: None,
                bitrate: None,
                artist: None,
                album: None,
                year: None,
            },
            MediaType::Document => ExtendedMetadata::Document {
                page_count: None,
                author: None,
                title: None,
                subject: None,
            },
            MediaType::Unknown => ExtendedMetadata::Empty {},
        }
    }
}

/// Basic file info plus extended metadata, as shown on a detail page
#[derive(Debug, Clone)]
pub struct MediaDetails {
    pub basic_info: MediaItem,
    pub extended_metadata: ExtendedMetadata,
}

impl MediaDetails {
    /// JSON shape of the detail view
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "basic_info": self.basic_info.to_json(),
            "extended_metadata": self.extended_metadata,
        })
    }
}

/// Collect the details for one item
pub fn extract_metadata(item: &MediaItem) -> MediaDetails {
    MediaDetails {
        basic_info: item.clone(),
        extended_metadata: ExtendedMetadata::placeholder(item.media_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::path::PathBuf;

    fn item(media_type: MediaType, extension: &str) -> MediaItem {
        let now = Local::now();
        MediaItem {
            name: "sample".to_string(),
            file_path: PathBuf::from(format!("/media/sample{}", extension)),
            file_size: 42,
            created_date: now,
            modified_date: now,
            media_type,
            extension: extension.to_string(),
        }
    }

    #[test]
    fn test_video_placeholder_fields() {
        let details = extract_metadata(&item(MediaType::Video, ".mkv"));
        let json = details.to_json();
        let extended = json["extended_metadata"].as_object().unwrap();

        let mut keys: Vec<&str> = extended.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["codec", "duration", "fps", "resolution"]);
        assert!(extended.values().all(serde_json::Value::is_null));
        assert_eq!(json["basic_info"]["extension"], ".mkv");
    }

    #[test]
    fn test_audio_and_document_placeholders() {
        let audio = serde_json::to_value(ExtendedMetadata::placeholder(MediaType::Audio)).unwrap();
        assert_eq!(audio.as_object().unwrap().len(), 5);
        assert!(audio["artist"].is_null());

        let document =
            serde_json::to_value(ExtendedMetadata::placeholder(MediaType::Document)).unwrap();
        assert_eq!(document.as_object().unwrap().len(), 4);
        assert!(document.get("page_count").is_some());
    }

    #[test]
    fn test_unknown_placeholder_is_empty_object() {
        let details = extract_metadata(&item(MediaType::Unknown, ".bin"));
        assert_eq!(details.to_json()["extended_metadata"], serde_json::json!({}));
    }
}
