use crate::twoface::{Cause, ExternalError};
use chrono::{offset::Utc, DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Nanoseconds per millisecond. Post timestamps are nanoseconds since the Unix epoch.
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// A blog post. Posts are never edited or deleted once the store has accepted them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// Assigned by the store, increasing with every accepted post.
    pub id: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub category: String,
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Post {
    /// Millisecond view of the timestamp, the resolution readers actually see.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp / NANOS_PER_MILLI
    }

    /// When the store accepted this post, to the millisecond.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_millis()).single()
    }
}

/// Parameters for a post the store hasn't accepted yet. Missing fields are empty strings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author: String,
    pub category: String,
}

impl NewPost {
    /// The only validation a post ever gets. Body and category are allowed to be empty.
    pub fn validate(&self) -> Result<(), ExternalError> {
        if self.title.trim().is_empty() {
            return Err(ExternalError {
                cause: Cause::UserInvalidField,
                text: "Title must not be empty",
            });
        }
        if self.author.trim().is_empty() {
            return Err(ExternalError {
                cause: Cause::UserInvalidField,
                text: "Author must not be empty",
            });
        }
        Ok(())
    }

    /// Stamp this post with its store-assigned ID and creation time.
    pub fn into_post(self, id: u64, created_at: DateTime<Utc>) -> Option<Post> {
        Some(Post {
            id,
            title: self.title,
            body: self.body,
            author: self.author,
            category: self.category,
            timestamp: created_at.timestamp_nanos_opt()?,
        })
    }
}

/// Outcome of asking the store to create a post. Serializes as `{"ok": id}` or `{"err": message}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum CreateResult {
    #[serde(rename = "ok")]
    Ok(u64),
    #[serde(rename = "err")]
    Err(String),
}

impl From<CreateResult> for Result<u64, String> {
    fn from(result: CreateResult) -> Self {
        match result {
            CreateResult::Ok(id) => Ok(id),
            CreateResult::Err(message) => Err(message),
        }
    }
}
