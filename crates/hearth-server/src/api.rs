// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router.

use std::sync::Arc;

use axum::{
	routing::{delete, get, patch, post},
	Json, Router,
};
use hearth_community_core::{CommunityDirectory, MembershipLifecycle, PostFeed};
use hearth_server_config::{AuthConfig, SecretString};
use hearth_server_db::{CommunityRepository, PostRepository, UserRepository};
use sqlx::SqlitePool;
use utoipa::OpenApi;

use crate::{api_docs::ApiDoc, routes};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub community_repo: Arc<CommunityRepository>,
	pub user_repo: Arc<UserRepository>,
	pub post_repo: Arc<PostRepository>,
	pub lifecycle: MembershipLifecycle<CommunityRepository>,
	pub directory: CommunityDirectory<CommunityRepository>,
	pub feed: PostFeed<PostRepository>,
	pub auth_secret: SecretString,
}

/// Build the repositories and core services over one pool.
pub fn create_app_state(pool: SqlitePool, auth: &AuthConfig) -> AppState {
	let community_repo = Arc::new(CommunityRepository::new(pool.clone()));
	let user_repo = Arc::new(UserRepository::new(pool.clone()));
	let post_repo = Arc::new(PostRepository::new(pool.clone()));

	AppState {
		lifecycle: MembershipLifecycle::new(Arc::clone(&community_repo)),
		directory: CommunityDirectory::new(Arc::clone(&community_repo)),
		feed: PostFeed::new(Arc::clone(&post_repo)),
		pool,
		community_repo,
		user_repo,
		post_repo,
		auth_secret: auth.secret.clone(),
	}
}

pub fn create_router(state: AppState) -> Router {
	// matchit allows one parameter name per segment, so `{id}` also carries
	// the slug on the lookup route.
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(openapi_json))
		.route("/api/posts", get(routes::posts::list_posts))
		.route("/api/communities", post(routes::communities::create_community))
		.route(
			"/api/communities/{id}",
			get(routes::communities::get_community_by_slug),
		)
		.route(
			"/api/communities/{id}/members",
			get(routes::communities::list_members),
		)
		.route(
			"/api/communities/{id}/join",
			post(routes::communities::join_community),
		)
		.route(
			"/api/communities/{id}/membership",
			delete(routes::communities::leave_community),
		)
		.route(
			"/api/communities/{id}/join-requests",
			post(routes::communities::request_to_join).get(routes::communities::list_join_requests),
		)
		.route(
			"/api/communities/{id}/members/approve",
			post(routes::communities::approve_member),
		)
		.route(
			"/api/communities/{id}/members/reject",
			post(routes::communities::reject_member),
		)
		.route(
			"/api/communities/{id}/members/{user_id}",
			patch(routes::communities::change_member_role)
				.delete(routes::communities::remove_member),
		)
		.with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
	Json(ApiDoc::openapi())
}
