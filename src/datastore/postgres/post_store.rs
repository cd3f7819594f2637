use crate::datastore::{
    postgres::{errors::BlockingResp, PostgresStore},
    tables::posts,
    NewPost, Post, PostStore, STORE_UNAVAILABLE,
};
use crate::twoface::{DescribeErr, Fallible, TfError};
use actix_web::web::block;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::offset::Utc;
use diesel::prelude::*;
use std::convert::TryFrom;

/// A row of the `posts` table. Postgres has no unsigned integers, so IDs are stored signed.
#[derive(Queryable)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    author: String,
    category: String,
    created_ns: i64,
}

impl TryFrom<PostRow> for Post {
    type Error = anyhow::Error;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: u64::try_from(row.id).map_err(|_| anyhow!("post has negative id {}", row.id))?,
            title: row.title,
            body: row.body,
            author: row.author,
            category: row.category,
            timestamp: row.created_ns,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = posts)]
struct NewPostRow<'a> {
    title: &'a str,
    body: &'a str,
    author: &'a str,
    category: &'a str,
    created_ns: i64,
}

#[async_trait]
impl PostStore for PostgresStore {
    async fn create_post(&self, new_post: NewPost) -> Fallible<Post> {
        let pool = self.pool.clone();
        let created_ns = Utc::now()
            .timestamp_nanos_opt()
            .ok_or_else(|| anyhow!("current time doesn't fit in an i64 of nanoseconds"))?;
        let row: PostRow = block(move || -> Result<PostRow, TfError> {
            let mut conn = pool.get().describe_err(STORE_UNAVAILABLE)?;
            let row = NewPostRow {
                title: &new_post.title,
                body: &new_post.body,
                author: &new_post.author,
                category: &new_post.category,
                created_ns,
            };
            let inserted = diesel::insert_into(posts::table)
                .values(&row)
                .get_result::<PostRow>(&mut conn)?;
            Ok(inserted)
        })
        .await
        .to_resp()?;
        Ok(Post::try_from(row)?)
    }

    async fn list_posts(&self) -> Fallible<Vec<Post>> {
        let pool = self.pool.clone();
        let rows: Vec<PostRow> = block(move || -> Result<Vec<PostRow>, TfError> {
            let mut conn = pool.get().describe_err(STORE_UNAVAILABLE)?;
            let rows = posts::table
                .order_by(posts::id.asc())
                .load::<PostRow>(&mut conn)?;
            Ok(rows)
        })
        .await
        .to_resp()?;
        let posts = rows
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    async fn health(&self) -> Fallible<()> {
        let pool = self.pool.clone();
        block(move || -> Result<usize, TfError> {
            let mut conn = pool.get().describe_err(STORE_UNAVAILABLE)?;
            Ok(diesel::sql_query("SELECT 1").execute(&mut conn)?)
        })
        .await
        .to_resp()?;
        Ok(())
    }
}
