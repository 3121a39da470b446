// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header::AUTHORIZATION, HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use chrono::{Duration, Utc};
use hearth_community_core::{
	Community, CommunityRole, JoinPolicy, Membership, NewCommunity, Post, PostId, User,
};
use hearth_server::{create_app_state, create_router, issue_token, AppState};
use hearth_server_config::{AuthConfig, Environment, SecretString};
use serde::Serialize;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "authz-test-secret";

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> HeaderValue {
		HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap()
	}
}

#[derive(Clone)]
pub struct Fixtures {
	/// Open community with an admin and one member.
	pub oak: Community,
	/// Approval-required community.
	pub elm: Community,
	/// Invite-only community.
	pub pine: Community,
	pub oak_admin: TestUser,
	pub oak_member: TestUser,
	pub elm_admin: TestUser,
	/// Belongs to no community.
	pub outsider: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_authz.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = hearth_server_db::create_pool(&db_url, 5).await.unwrap();
		hearth_server_db::run_migrations(&pool).await.unwrap();

		let auth = AuthConfig {
			secret: SecretString::new(TEST_SECRET.to_string()),
			environment: Environment::Test,
		};
		let state = create_app_state(pool, &auth);
		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	/// GET with a raw `Authorization` header value.
	pub async fn get_with_authorization(&self, path: &str, authorization: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.header(AUTHORIZATION, authorization)
			.body(Body::empty())
			.unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			builder = builder.header(AUTHORIZATION, test_user.auth_header());
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}

	pub async fn create_user(&self, email: &str, full_name: &str) -> TestUser {
		create_test_user(&self.state, email, full_name).await
	}
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

/// Runs cases in order; later cases see the effects of earlier ones.
pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, None) if *m == Method::POST => {
				app
					.post(&case.path, case.user.as_ref(), serde_json::json!({}))
					.await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

async fn create_test_user(state: &AppState, email: &str, full_name: &str) -> TestUser {
	let user = User::new(email, full_name);
	state.user_repo.create_user(&user).await.unwrap();
	let token = issue_token(&state.auth_secret, user.id).unwrap();
	TestUser { user, token }
}

async fn create_community(
	state: &AppState,
	slug: &str,
	join_policy: JoinPolicy,
	admin: &TestUser,
) -> Community {
	let community =
		Community::from_new(NewCommunity::new(slug, slug).with_join_policy(join_policy));
	let membership = Membership::new(admin.user.id, community.id, CommunityRole::Admin);
	state
		.community_repo
		.create_community_with_admin(&community, &membership)
		.await
		.unwrap();
	community
}

async fn create_post(
	state: &AppState,
	community: &Community,
	author: &TestUser,
	post_type: &str,
	age_minutes: i64,
) {
	let post = Post {
		id: PostId::generate(),
		community_id: community.id,
		author_id: author.user.id,
		title: format!("{post_type} in {}", community.slug),
		content: "content".to_string(),
		post_type: post_type.to_string(),
		created_at: Utc::now() - Duration::minutes(age_minutes),
	};
	state.post_repo.create_post(&post).await.unwrap();
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let oak_admin = create_test_user(state, "oak-admin@test.com", "Oak Admin").await;
	let oak_member = create_test_user(state, "oak-member@test.com", "Oak Member").await;
	let elm_admin = create_test_user(state, "elm-admin@test.com", "Elm Admin").await;
	let outsider = create_test_user(state, "outsider@test.com", "Outsider").await;

	let oak = create_community(state, "oak-street", JoinPolicy::Open, &oak_admin).await;
	let elm = create_community(
		state,
		"elm-street",
		JoinPolicy::ApprovalRequired,
		&elm_admin,
	)
	.await;
	let pine = create_community(state, "pine-street", JoinPolicy::InviteOnly, &elm_admin).await;

	state
		.community_repo
		.add_member(&Membership::new(
			oak_member.user.id,
			oak.id,
			CommunityRole::Member,
		))
		.await
		.unwrap();

	create_post(state, &oak, &oak_admin, "announcement", 30).await;
	create_post(state, &oak, &oak_member, "event", 20).await;
	create_post(state, &elm, &elm_admin, "event", 10).await;

	Fixtures {
		oak,
		elm,
		pine,
		oak_admin,
		oak_member,
		elm_admin,
		outsider,
	}
}
