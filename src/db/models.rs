use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of a Content Item. Stored as lowercase text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub const ALLOWED: [&'static str; 2] = ["draft", "published"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

/// One stored blog post, as served over the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    /// Rich-text body; stored and returned as an opaque formatted string.
    pub body: String,
    pub author: Option<String>,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for inserting a new post; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author: Option<String>,
    pub status: PostStatus,
    pub tags: Vec<String>,
}
