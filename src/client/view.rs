//! `BlogView` owns everything a blog front end shows: the loaded posts, the loading spinner, the
//! "new post" dialog and its draft, and the category selection. Front ends read it by reference and
//! change it only through its methods.
use crate::client::{Backend, CategoryFilter};
use crate::datastore::{NewPost, Post};
use anyhow::anyhow;
use chrono::TimeZone;
use std::fmt::Display;
use tracing::{error, info};

/// The editable fields of the new-post dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Body,
    Author,
    Category,
}

pub struct BlogView<B> {
    backend: B,
    /// The store's posts as of the last successful load.
    posts: Vec<Post>,
    loading: bool,
    dialog_open: bool,
    draft: NewPost,
    filter: CategoryFilter,
    last_error: Option<String>,
}

impl<B: Backend> BlogView<B> {
    /// A view that hasn't loaded anything yet, so it starts out loading.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            posts: Vec::new(),
            loading: true,
            dialog_open: false,
            draft: NewPost::default(),
            filter: CategoryFilter::All,
            last_error: None,
        }
    }

    /// Build the view and do its first load.
    pub async fn mount(backend: B) -> Self {
        let mut view = Self::new(backend);
        view.load().await;
        view
    }

    /// Replace the posts with the store's current list. If the store can't be reached, the old
    /// posts stay. Either way, loading is over. Returns whether the load succeeded.
    pub async fn load(&mut self) -> bool {
        let loaded = match self.backend.get_posts().await {
            Ok(posts) => {
                info!(count = posts.len(), "loaded posts");
                self.posts = posts;
                self.last_error = None;
                true
            }
            Err(e) => {
                error!("Error fetching posts: {:#}", e);
                self.last_error = Some(format!("{:#}", e));
                false
            }
        };
        self.loading = false;
        loaded
    }

    /// Send the draft to the store. On success the dialog closes, the draft is cleared and the
    /// whole list is reloaded. On failure nothing is reloaded and the draft is kept.
    pub async fn submit(&mut self) -> Option<u64> {
        self.loading = true;
        let created = self
            .backend
            .create_post(&self.draft)
            .await
            .and_then(|result| {
                Result::<u64, String>::from(result)
                    .map_err(|message| anyhow!("store rejected post: {}", message))
            });
        match created {
            Ok(id) => {
                info!(id, "created post");
                self.dialog_open = false;
                self.draft = NewPost::default();
                self.load().await;
                Some(id)
            }
            Err(e) => {
                error!("Error creating post: {:#}", e);
                self.last_error = Some(format!("{:#}", e));
                self.loading = false;
                None
            }
        }
    }

    pub fn open_dialog(&mut self) {
        self.dialog_open = true;
    }

    /// Close the dialog without submitting. The draft is kept for next time.
    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    pub fn edit(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Title => self.draft.title = value,
            DraftField::Body => self.draft.body = value,
            DraftField::Author => self.draft.author = value,
            DraftField::Category => self.draft.category = value,
        }
    }

    pub fn select_category(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Every loaded post, in the order the store returned them.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// The loaded posts that pass the category selection.
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.filter.apply(&self.posts)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn draft(&self) -> &NewPost {
        &self.draft
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.filter
    }

    /// The most recent failure, cleared by the next successful load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

}

/// "By alice | 2024-09-03 19:33:36", with the time shown in `tz`.
pub fn byline<Tz>(post: &Post, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match post.created_at() {
        Some(when) => format!(
            "By {} | {}",
            post.author,
            when.with_timezone(tz).format("%Y-%m-%d %H:%M:%S")
        ),
        None => format!("By {}", post.author),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeBackend;
    use chrono::Utc;

    fn fill_draft<B: Backend>(view: &mut BlogView<B>) {
        view.open_dialog();
        view.edit(DraftField::Title, "Zero-Day");
        view.edit(DraftField::Author, "alice");
        view.edit(DraftField::Body, "...");
        view.edit(DraftField::Category, "Malware Analysis");
    }

    #[actix_rt::test]
    async fn test_mount_shows_exactly_what_the_store_returned() {
        let backend = FakeBackend::default();
        backend.insert("b", "Red Team");
        backend.insert("a", "Malware Analysis");
        backend.insert("b", "Red Team");

        let view = BlogView::new(backend.clone());
        assert!(view.is_loading());

        let view = BlogView::mount(backend.clone()).await;
        assert!(!view.is_loading());
        assert_eq!(view.posts(), &backend.posts()[..]);
        assert_eq!(view.visible_posts().len(), 3);
    }

    #[actix_rt::test]
    async fn test_failed_load_keeps_old_posts() {
        let backend = FakeBackend::default();
        backend.insert("first", "Red Team");
        let mut view = BlogView::mount(backend.clone()).await;
        let before = view.posts().to_vec();

        backend.insert("second", "Red Team");
        backend.fail_reads(true);
        assert!(!view.load().await);
        assert_eq!(view.posts(), &before[..]);
        assert!(!view.is_loading());
        assert!(view.last_error().unwrap().contains("getPosts"));

        backend.fail_reads(false);
        assert!(view.load().await);
        assert_eq!(view.posts().len(), 2);
        assert!(view.last_error().is_none());
    }

    #[actix_rt::test]
    async fn test_submit_reloads_and_shows_new_post_once() {
        let backend = FakeBackend::default();
        backend.set_next_id(7);
        let mut view = BlogView::mount(backend.clone()).await;
        fill_draft(&mut view);

        assert_eq!(view.submit().await, Some(7));
        assert_eq!(backend.reads(), 2);
        assert!(!view.is_loading());
        assert!(!view.is_dialog_open());
        assert_eq!(view.draft(), &NewPost::default());

        let matching: Vec<&Post> = view.posts().iter().filter(|p| p.id == 7).collect();
        assert_eq!(matching.len(), 1);
        let post = matching[0];
        assert_eq!(post.title, "Zero-Day");
        assert_eq!(post.author, "alice");
        assert_eq!(post.body, "...");
        assert_eq!(post.category, "Malware Analysis");
    }

    #[actix_rt::test]
    async fn test_created_but_reload_failed() {
        let backend = FakeBackend::default();
        backend.insert("existing", "Red Team");
        let mut view = BlogView::mount(backend.clone()).await;
        let before = view.posts().to_vec();
        fill_draft(&mut view);

        backend.fail_reads_after_write();
        assert_eq!(view.submit().await, Some(1));
        assert_eq!(backend.reads(), 2);
        assert_eq!(backend.posts().len(), 2);
        // The post exists in the store, but the view still shows the last good list.
        assert_eq!(view.posts(), &before[..]);
        assert!(!view.is_loading());
        assert!(!view.is_dialog_open());
        assert_eq!(view.draft(), &NewPost::default());
        assert!(view.last_error().unwrap().contains("getPosts"));
    }

    #[actix_rt::test]
    async fn test_reload_picks_up_other_writers() {
        let backend = FakeBackend::default();
        let mut view = BlogView::mount(backend.clone()).await;
        // Someone else posts between our load and our submit.
        backend.insert("elsewhere", "Cloud Security");
        fill_draft(&mut view);
        assert_eq!(view.submit().await, Some(1));
        let ids: Vec<u64> = view.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[actix_rt::test]
    async fn test_transport_failure_on_submit() {
        let backend = FakeBackend::default();
        backend.insert("existing", "Red Team");
        let mut view = BlogView::mount(backend.clone()).await;
        fill_draft(&mut view);

        backend.fail_writes(true);
        assert_eq!(view.submit().await, None);
        assert_eq!(backend.reads(), 1, "a failed create must not reload");
        assert_eq!(view.posts().len(), 1);
        assert!(!view.is_loading());
        assert!(view.is_dialog_open());
        assert_eq!(view.draft().title, "Zero-Day");
        assert!(view.last_error().unwrap().contains("createPost"));
    }

    #[actix_rt::test]
    async fn test_store_rejection_is_handled_like_transport_failure() {
        let backend = FakeBackend::default();
        let mut view = BlogView::mount(backend.clone()).await;
        fill_draft(&mut view);

        backend.reject_writes(Some("Title must not be empty"));
        assert_eq!(view.submit().await, None);
        assert_eq!(backend.reads(), 1);
        assert!(view.posts().is_empty());
        assert!(backend.posts().is_empty());
        assert!(!view.is_loading());
        assert_eq!(
            view.last_error(),
            Some("store rejected post: Title must not be empty")
        );
    }

    #[actix_rt::test]
    async fn test_category_selection() {
        let backend = FakeBackend::default();
        backend.insert("one", "Malware Analysis");
        backend.insert("two", "Red Team");
        backend.insert("three", "Malware Analysis");
        let mut view = BlogView::mount(backend.clone()).await;

        view.select_category("Malware Analysis".parse().unwrap());
        let titles: Vec<&str> = view.visible_posts().iter().map(|p| &p.title[..]).collect();
        assert_eq!(titles, vec!["one", "three"]);
        // Filtering never touches the loaded list.
        assert_eq!(view.posts().len(), 3);

        // A newly loaded post shows up under the current selection.
        backend.insert("four", "Malware Analysis");
        view.load().await;
        assert_eq!(view.visible_posts().len(), 3);

        view.select_category(CategoryFilter::All);
        assert_eq!(view.visible_posts().len(), 4);
    }

    #[actix_rt::test]
    async fn test_closing_dialog_keeps_draft() {
        let mut view = BlogView::mount(FakeBackend::default()).await;
        fill_draft(&mut view);
        view.close_dialog();
        assert!(!view.is_dialog_open());
        assert_eq!(view.draft().author, "alice");
    }

    #[test]
    fn test_byline() {
        let post = Post {
            id: 0,
            title: "t".to_owned(),
            body: String::new(),
            author: "alice".to_owned(),
            category: String::new(),
            timestamp: 1_725_392_016_000_000_000,
        };
        assert_eq!(byline(&post, &Utc), "By alice | 2024-09-03 19:33:36");

        // Shown at millisecond resolution, so nanoseconds never round up a second.
        let late = Post {
            timestamp: 1_725_392_016_999_999_999,
            ..post
        };
        assert_eq!(byline(&late, &Utc), "By alice | 2024-09-03 19:33:36");
    }
}
