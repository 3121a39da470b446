// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Post repository (read side, plus inserts for seeding).

use async_trait::async_trait;
use hearth_community_core::{
	CommunityId, Post, PostCommunity, PostFilter, PostId, PostListing, PostStore, StoreError,
	UserId,
};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::rows::{format_timestamp, parse_timestamp, parse_uuid};

#[derive(Clone)]
pub struct PostRepository {
	pool: SqlitePool,
}

impl PostRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, post), fields(post_id = %post.id, community_id = %post.community_id))]
	pub async fn create_post(&self, post: &Post) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO posts (id, community_id, author_id, title, content, post_type, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(post.id.to_string())
		.bind(post.community_id.to_string())
		.bind(post.author_id.to_string())
		.bind(&post.title)
		.bind(&post.content)
		.bind(&post.post_type)
		.bind(format_timestamp(&post.created_at))
		.execute(&self.pool)
		.await?;

		tracing::debug!(post_id = %post.id, "post created");
		Ok(())
	}

	/// List posts newest first, joined with their community and author.
	///
	/// # Arguments
	/// * `filter` - Optional community and post type to match
	/// * `limit` - Maximum number of rows returned
	#[tracing::instrument(skip(self), fields(community_id = ?filter.community_id, post_type = ?filter.post_type))]
	pub async fn list_posts(
		&self,
		filter: &PostFilter,
		limit: u32,
	) -> Result<Vec<PostListing>, DbError> {
		let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
			r#"
			SELECT p.id, p.community_id, p.author_id, p.title, p.content, p.post_type, p.created_at,
			       c.name AS community_name, c.slug AS community_slug, u.full_name AS author_name
			FROM posts p
			JOIN communities c ON c.id = p.community_id
			JOIN users u ON u.id = p.author_id
			WHERE 1 = 1
			"#,
		);
		if let Some(community_id) = filter.community_id {
			query
				.push(" AND p.community_id = ")
				.push_bind(community_id.to_string());
		}
		if let Some(post_type) = &filter.post_type {
			query.push(" AND p.post_type = ").push_bind(post_type.clone());
		}
		query
			.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ")
			.push_bind(i64::from(limit));

		let rows = query.build().fetch_all(&self.pool).await?;
		let posts = rows
			.iter()
			.map(|r| self.row_to_listing(r))
			.collect::<Result<Vec<_>, _>>()?;

		tracing::debug!(count = posts.len(), "listed posts");
		Ok(posts)
	}

	fn row_to_listing(&self, row: &sqlx::sqlite::SqliteRow) -> Result<PostListing, DbError> {
		let id: String = row.get("id");
		let community_id: String = row.get("community_id");
		let author_id: String = row.get("author_id");
		let created_at: String = row.get("created_at");

		Ok(PostListing {
			post: Post {
				id: PostId::new(parse_uuid(&id, "post ID")?),
				community_id: CommunityId::new(parse_uuid(&community_id, "community_id")?),
				author_id: UserId::new(parse_uuid(&author_id, "author_id")?),
				title: row.get("title"),
				content: row.get("content"),
				post_type: row.get("post_type"),
				created_at: parse_timestamp(&created_at, "created_at")?,
			},
			community: PostCommunity {
				name: row.get("community_name"),
				slug: row.get("community_slug"),
			},
			author_name: row.get("author_name"),
		})
	}
}

#[async_trait]
impl PostStore for PostRepository {
	async fn list_posts(
		&self,
		filter: &PostFilter,
		limit: u32,
	) -> Result<Vec<PostListing>, StoreError> {
		Ok(self.list_posts(filter, limit).await?)
	}
}
