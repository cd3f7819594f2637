//! The three calls the blog client makes: create a post, list every post, and check health.
use crate::api::{observe, State};
use crate::datastore::{CreateResult, NewPost, Post, PostStore};
use crate::twoface::Fallible;
use actix_web::web;
use tracing::{info, warn};

/// What `/health` answers while the store is usable.
pub const HEALTHY: &str = "ok";

pub fn configure<DS: PostStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::post().to(create_post::<DS>))
            .route(web::get().to(list_posts::<DS>)),
    )
    .service(web::resource("/health").route(web::get().to(health_check::<DS>)));
}

// Validate and store a new post. Validation failures are part of the result, not HTTP errors.
async fn create_post<DS: PostStore>(
    state: web::Data<State<DS>>,
    body: web::Json<NewPost>,
) -> Fallible<web::Json<CreateResult>> {
    observe("create_post", move || async move {
        let new_post = body.into_inner();
        if let Err(external) = new_post.validate() {
            warn!(reason = external.text, "rejected new post");
            return Ok(web::Json(CreateResult::Err(external.text.to_owned())));
        }
        let post = state.ds.create_post(new_post).await?;
        info!(id = post.id, category = %post.category, "created post");
        Ok(web::Json(CreateResult::Ok(post.id)))
    })
    .await
}

// Every post, oldest first. No paging or filtering happens server-side.
async fn list_posts<DS: PostStore>(state: web::Data<State<DS>>) -> Fallible<web::Json<Vec<Post>>> {
    observe("list_posts", || async {
        let posts = state.ds.list_posts().await?;
        Ok(web::Json(posts))
    })
    .await
}

async fn health_check<DS: PostStore>(
    state: web::Data<State<DS>>,
) -> Fallible<web::Json<&'static str>> {
    observe("health_check", || async {
        state.ds.health().await?;
        Ok(web::Json(HEALTHY))
    })
    .await
}
