// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read side of community posts.
//!
//! Posts are authored elsewhere; this crate only lists them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::CommunityError;
use crate::store::PostStore;
use crate::types::{CommunityId, PostId, UserId};

pub const DEFAULT_POST_LIMIT: u32 = 50;
pub const MAX_POST_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Post {
	pub id: PostId,
	pub community_id: CommunityId,
	pub author_id: UserId,
	pub title: String,
	pub content: String,
	/// Free-form category such as `announcement` or `event`.
	pub post_type: String,
	pub created_at: DateTime<Utc>,
}

/// Community a listed post belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PostCommunity {
	pub name: String,
	pub slug: String,
}

/// A post as it appears in listings, with its community and author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PostListing {
	#[serde(flatten)]
	pub post: Post,
	pub community: PostCommunity,
	pub author_name: String,
}

/// Optional narrowing for post listings. Empty means all posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
	pub community_id: Option<CommunityId>,
	pub post_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Paging {
	pub has_more: bool,
	pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PostPage {
	pub posts: Vec<PostListing>,
	pub paging: Paging,
}

impl PostPage {
	/// Wraps a page fetched with `limit`. A full page implies more may follow.
	pub fn new(posts: Vec<PostListing>, limit: u32) -> Self {
		let total = posts.len() as u64;
		Self {
			paging: Paging {
				has_more: total == u64::from(limit),
				total,
			},
			posts,
		}
	}
}

/// Resolves a requested page size to one in `1..=MAX_POST_LIMIT`.
pub fn effective_limit(requested: Option<u32>) -> u32 {
	requested
		.unwrap_or(DEFAULT_POST_LIMIT)
		.clamp(1, MAX_POST_LIMIT)
}

/// Lists posts newest first.
pub struct PostFeed<S: ?Sized> {
	store: Arc<S>,
}

impl<S: ?Sized> Clone for PostFeed<S> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
		}
	}
}

impl<S> PostFeed<S>
where
	S: PostStore + ?Sized,
{
	pub fn new(store: Arc<S>) -> Self {
		Self { store }
	}

	#[instrument(level = "debug", skip(self), fields(community_id = ?filter.community_id))]
	pub async fn list_posts(
		&self,
		filter: &PostFilter,
		limit: Option<u32>,
	) -> Result<PostPage, CommunityError> {
		let limit = effective_limit(limit);
		let posts = self.store.list_posts(filter, limit).await?;
		Ok(PostPage::new(posts, limit))
	}
}
