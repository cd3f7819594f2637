//! A post store that lives in the server's memory. Posts survive as long as the process does.
use crate::datastore::{NewPost, Post, PostStore, STORE_UNAVAILABLE};
use crate::twoface::{DescribeErr, Fallible};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::offset::Utc;
use prometheus::{
    core::{Collector, Desc},
    proto::MetricFamily,
    IntGauge, Opts,
};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Posts {
    next_id: u64,
    posts: Vec<Post>,
}

/// An implementation of datastore::PostStore backed by a Vec. Clones share the same posts.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Posts>>,
    stored: IntGauge,
}

impl MemoryStore {
    pub fn new() -> Result<Self, anyhow::Error> {
        let stored = IntGauge::with_opts(Opts::new(
            "cryptoblog_posts_stored",
            "How many posts the in-memory store holds",
        ))?;
        Ok(Self {
            inner: Default::default(),
            stored,
        })
    }

    fn lock(&self) -> Fallible<MutexGuard<'_, Posts>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("in-memory post store mutex was poisoned"))
            .describe_err(STORE_UNAVAILABLE)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, new_post: NewPost) -> Fallible<Post> {
        let mut store = self.lock()?;
        let id = store.next_id;
        let post = new_post
            .into_post(id, Utc::now())
            .ok_or_else(|| anyhow!("current time doesn't fit in an i64 of nanoseconds"))?;
        // Only advance the ID once the post is definitely going to be stored.
        store.next_id += 1;
        store.posts.push(post.clone());
        Ok(post)
    }

    async fn list_posts(&self) -> Fallible<Vec<Post>> {
        Ok(self.lock()?.posts.clone())
    }

    async fn health(&self) -> Fallible<()> {
        self.lock().map(|_| ())
    }
}

impl Collector for MemoryStore {
    fn desc(&self) -> Vec<&Desc> {
        self.stored.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        if let Ok(store) = self.inner.lock() {
            self.stored.set(store.posts.len() as i64);
        }
        self.stored.collect()
    }
}
