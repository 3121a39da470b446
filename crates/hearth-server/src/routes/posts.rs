// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Post listing handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use hearth_community_core::{PostFilter, PostListing};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
	api::AppState,
	api_response::ApiResponse,
	error::{ApiError, ErrorResponse},
	validation::{parse_community_id, ApiQuery},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
	/// Only posts of this type, e.g. `event`.
	#[serde(rename = "type")]
	pub post_type: Option<String>,
	/// Only posts in this community.
	#[serde(rename = "communityId")]
	pub community_id: Option<String>,
	/// Page size, default 50, at most 100.
	pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts, newest first, with paging", body = [PostListing]),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "posts"
)]
/// List posts newest first, each with its community name and slug and the
/// author's full name.
#[tracing::instrument(skip(state))]
pub async fn list_posts(
	State(state): State<AppState>,
	ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> Result<impl IntoResponse, ApiError> {
	let community_id = query
		.community_id
		.as_deref()
		.filter(|s| !s.is_empty())
		.map(parse_community_id)
		.transpose()?;

	let filter = PostFilter {
		community_id,
		post_type: query.post_type.filter(|t| !t.is_empty()),
	};
	let page = state.feed.list_posts(&filter, query.limit).await?;

	Ok((
		StatusCode::OK,
		Json(ApiResponse::paged(page.posts, page.paging)),
	))
}
