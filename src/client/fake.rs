//! A scripted Backend for testing the view-model without a server.
use crate::client::Backend;
use crate::datastore::{CreateResult, NewPost, Post};
use anyhow::anyhow;
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Script {
    posts: Vec<Post>,
    next_id: u64,
    fail_reads: bool,
    fail_reads_after_write: bool,
    fail_writes: bool,
    reject_writes: Option<String>,
    reads: usize,
}

/// Clones share the same script, so a test can keep a handle after giving one to a BlogView.
#[derive(Clone, Default)]
pub struct FakeBackend {
    script: Rc<RefCell<Script>>,
}

impl FakeBackend {
    /// Store a post directly, as another writer would.
    pub fn insert(&self, title: &str, category: &str) -> u64 {
        let mut script = self.script.borrow_mut();
        let id = script.next_id;
        script.next_id += 1;
        script.posts.push(Post {
            id,
            title: title.to_owned(),
            body: String::new(),
            author: "someone".to_owned(),
            category: category.to_owned(),
            timestamp: id as i64 * 1_000_000,
        });
        id
    }

    pub fn posts(&self) -> Vec<Post> {
        self.script.borrow().posts.clone()
    }

    pub fn set_next_id(&self, id: u64) {
        self.script.borrow_mut().next_id = id;
    }

    /// Make getPosts fail as if the network were down.
    pub fn fail_reads(&self, fail: bool) {
        self.script.borrow_mut().fail_reads = fail;
    }

    /// Let the next createPost succeed, then make every getPosts after it fail.
    pub fn fail_reads_after_write(&self) {
        self.script.borrow_mut().fail_reads_after_write = true;
    }

    /// Make createPost fail as if the network were down.
    pub fn fail_writes(&self, fail: bool) {
        self.script.borrow_mut().fail_writes = fail;
    }

    /// Make createPost answer with the store's failure variant.
    pub fn reject_writes(&self, message: Option<&str>) {
        self.script.borrow_mut().reject_writes = message.map(str::to_owned);
    }

    /// How many times getPosts has been called.
    pub fn reads(&self) -> usize {
        self.script.borrow().reads
    }
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
    async fn create_post(&self, new_post: &NewPost) -> Result<CreateResult, anyhow::Error> {
        let mut script = self.script.borrow_mut();
        if script.fail_writes {
            return Err(anyhow!("createPost request failed: connection refused"));
        }
        if let Some(message) = &script.reject_writes {
            return Ok(CreateResult::Err(message.clone()));
        }
        let id = script.next_id;
        script.next_id += 1;
        script.posts.push(Post {
            id,
            title: new_post.title.clone(),
            body: new_post.body.clone(),
            author: new_post.author.clone(),
            category: new_post.category.clone(),
            timestamp: id as i64 * 1_000_000,
        });
        if script.fail_reads_after_write {
            script.fail_reads = true;
        }
        Ok(CreateResult::Ok(id))
    }

    async fn get_posts(&self) -> Result<Vec<Post>, anyhow::Error> {
        let mut script = self.script.borrow_mut();
        script.reads += 1;
        if script.fail_reads {
            return Err(anyhow!("getPosts request failed: connection refused"));
        }
        Ok(script.posts.clone())
    }

    async fn health_check(&self) -> Result<String, anyhow::Error> {
        Ok("ok".to_owned())
    }
}
