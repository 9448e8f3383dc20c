//! Domain models for the media ingestion pipeline.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Visibility of an uploaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

impl FromStr for Privacy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Privacy::Public),
            "private" => Ok(Privacy::Private),
            _ => Err(anyhow::anyhow!("Invalid privacy value: {}", s)),
        }
    }
}

impl Display for Privacy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Privacy::Public => write!(f, "public"),
            Privacy::Private => write!(f, "private"),
        }
    }
}

/// One upload as received from the HTTP layer. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub data: Bytes,
    pub content_type: String,
    pub original_filename: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub privacy: Privacy,
}

impl UploadRequest {
    pub fn new(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        original_filename: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            original_filename: original_filename.into(),
            title: None,
            caption: None,
            alt_text: None,
            privacy: Privacy::default(),
        }
    }
}

/// An object that exists in the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Finalized asset descriptor handed to the persistence layer after both
/// storage writes succeeded. The durable-record write itself is the caller's
/// responsibility; if it fails, the stored objects become orphans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommittedAsset {
    pub original: StoredObject,
    pub thumbnail: StoredObject,
    pub width: u32,
    pub height: u32,
    pub tags: HashMap<String, String>,
    pub mime_type: String,
    pub byte_size: u64,
    pub original_filename: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub privacy: Privacy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_parse_and_default() {
        assert_eq!(Privacy::from_str("public").unwrap(), Privacy::Public);
        assert_eq!(Privacy::from_str("PRIVATE").unwrap(), Privacy::Private);
        assert!(Privacy::from_str("friends").is_err());
        assert_eq!(Privacy::default(), Privacy::Public);
    }

    #[test]
    fn test_committed_asset_serialization() {
        let asset = CommittedAsset {
            original: StoredObject {
                key: "images/abc.jpg".to_string(),
                url: "https://cdn.example.com/images/abc.jpg".to_string(),
            },
            thumbnail: StoredObject {
                key: "thumbnails/def".to_string(),
                url: "https://cdn.example.com/thumbnails/def".to_string(),
            },
            width: 1200,
            height: 800,
            tags: HashMap::new(),
            mime_type: "image/jpeg".to_string(),
            byte_size: 10240,
            original_filename: "holiday.jpg".to_string(),
            title: Some("Holiday".to_string()),
            caption: None,
            alt_text: None,
            privacy: Privacy::Public,
        };

        let json = serde_json::to_string(&asset).unwrap();
        let back: CommittedAsset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.original, asset.original);
        assert_eq!(back.width, 1200);
        assert_eq!(back.privacy, Privacy::Public);
    }
}
