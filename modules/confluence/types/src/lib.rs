//! Wire types for the Confluence content REST API (`/rest/api/content/{id}`).

use serde::{Deserialize, Serialize};

/// Representation sent with every body update.
pub const EDITOR_REPRESENTATION: &str = "editor";

// =====================================================
// Response Types
// =====================================================

/// A content document as returned by `GET /rest/api/content/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// "page", "blogpost", ...
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub title: String,
    pub version: ContentVersion,
    /// Only present when the request expands `body.storage`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ContentBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentVersion {
    pub number: u64,
}

impl ContentVersion {
    /// The following version number, saturating at `u64::MAX`
    pub fn next(self) -> Self {
        Self {
            number: self.number.saturating_add(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBody {
    pub storage: StorageValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageValue {
    pub value: String,
    #[serde(default)]
    pub representation: String,
}

// =====================================================
// Request Types
// =====================================================

/// Body of `PUT /rest/api/content/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    pub version: ContentVersion,
    #[serde(rename = "type")]
    pub content_type: String,
    pub title: String,
    pub body: ContentBody,
}

impl UpdateContentRequest {
    /// Build the replacement for `current`: version bumped, type carried over,
    /// title and storage value replaced.
    pub fn replacing(current: &ContentDocument, title: &str, storage_value: String) -> Self {
        Self {
            version: current.version.next(),
            content_type: current.content_type.clone(),
            title: title.to_string(),
            body: ContentBody {
                storage: StorageValue {
                    value: storage_value,
                    representation: EDITOR_REPRESENTATION.to_string(),
                },
            },
        }
    }
}
