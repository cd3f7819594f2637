//! Talks to a running cryptoblog server over HTTP.
use crate::client::Backend;
use crate::datastore::{CreateResult, NewPost, Post};
use actix_web::{error::PayloadError, http::StatusCode, web::Bytes};
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use awc::Client;
use url::Url;

/// Largest post list the client is willing to buffer.
const MAX_LIST_BYTES: usize = 64 * 1024 * 1024;

/// A Backend that calls the blog API at `base`.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: &str) -> Result<Self, anyhow::Error> {
        let mut base = Url::parse(base).with_context(|| format!("{} isn't a valid URL", base))?;
        if base.cannot_be_a_base() {
            bail!("{} can't be used as a base URL", base);
        }
        // Url::join replaces the last path segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::default(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, anyhow::Error> {
        self.base
            .join(path)
            .with_context(|| format!("couldn't build URL for {}", path))
    }
}

/// Turn a non-2xx response into an error that includes whatever the server said.
async fn check_status<S>(
    call: &'static str,
    resp: &mut awc::ClientResponse<S>,
) -> Result<(), anyhow::Error>
where
    S: futures::Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp
        .body()
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    Err(anyhow!("{} failed with {}: {}", call, describe(status), body))
}

fn describe(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn create_post(&self, new_post: &NewPost) -> Result<CreateResult, anyhow::Error> {
        let url = self.endpoint("posts")?;
        let mut resp = self
            .http
            .post(url.as_str())
            .send_json(new_post)
            .await
            .map_err(|e| anyhow!("createPost request to {} failed: {}", url, e))?;
        check_status("createPost", &mut resp).await?;
        resp.json::<CreateResult>()
            .await
            .map_err(|e| anyhow!("createPost returned an unreadable result: {}", e))
    }

    async fn get_posts(&self) -> Result<Vec<Post>, anyhow::Error> {
        let url = self.endpoint("posts")?;
        let mut resp = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| anyhow!("getPosts request to {} failed: {}", url, e))?;
        check_status("getPosts", &mut resp).await?;
        resp.json::<Vec<Post>>()
            .limit(MAX_LIST_BYTES)
            .await
            .map_err(|e| anyhow!("getPosts returned an unreadable list: {}", e))
    }

    async fn health_check(&self) -> Result<String, anyhow::Error> {
        let url = self.endpoint("health")?;
        let mut resp = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| anyhow!("healthCheck request to {} failed: {}", url, e))?;
        check_status("healthCheck", &mut resp).await?;
        resp.json::<String>()
            .await
            .map_err(|e| anyhow!("healthCheck returned an unreadable status: {}", e))
    }
}
