pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod structs;
#[cfg(feature = "postgres")]
pub mod tables;

use crate::twoface::{Cause, ExternalError, Fallible};
use async_trait::async_trait;
pub use structs::{CreateResult, NewPost, Post};

/// What users see when a store can't be reached. The cause stays in the internal error.
pub const STORE_UNAVAILABLE: ExternalError = ExternalError {
    cause: Cause::ServerError,
    text: "Post store is unavailable",
};

#[async_trait]
/// The interface for storing blog posts.
pub trait PostStore: Clone + Send + Sync {
    /// Assign the post an ID and timestamp, then keep it forever. Callers validate first.
    async fn create_post(&self, new_post: NewPost) -> Fallible<Post>;
    /// Every post, oldest first.
    async fn list_posts(&self) -> Fallible<Vec<Post>>;
    /// Can the store currently serve reads and writes?
    async fn health(&self) -> Fallible<()>;
}
