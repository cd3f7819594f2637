//! The reader/writer side of the blog: remote calls to the post store, and the view-model a front
//! end renders from.
#[cfg(test)]
pub mod fake;
pub mod filter;
pub mod http;
pub mod view;

use crate::datastore::{CreateResult, NewPost, Post};
use async_trait::async_trait;

pub use filter::CategoryFilter;
pub use http::HttpBackend;
pub use view::{BlogView, DraftField};

#[async_trait(?Send)]
/// The remote calls the post store answers. Each one either resolves or fails; nothing retries.
pub trait Backend {
    async fn create_post(&self, new_post: &NewPost) -> Result<CreateResult, anyhow::Error>;
    async fn get_posts(&self) -> Result<Vec<Post>, anyhow::Error>;
    async fn health_check(&self) -> Result<String, anyhow::Error>;
}
