// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use hearth_community_core::CommunityId;
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_community_authorization() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();
	let oak_id = f.oak.id.to_string();

	let cases = vec![
		AuthzCase {
			name: "anonymous_can_read_community",
			method: Method::GET,
			path: "/api/communities/oak-street".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "malformed_slug_is_rejected",
			method: Method::GET,
			path: "/api/communities/Oak_Street".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "unknown_slug_is_not_found",
			method: Method::GET,
			path: "/api/communities/no-such-place".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "anonymous_cannot_create_community",
			method: Method::POST,
			path: "/api/communities".to_string(),
			user: None,
			body: Some(json!({"slug": "maple-lane", "name": "Maple Lane"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "non_admin_cannot_create_community",
			method: Method::POST,
			path: "/api/communities".to_string(),
			user: Some(f.oak_member.clone()),
			body: Some(json!({"slug": "maple-lane", "name": "Maple Lane"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "outsider_cannot_create_community",
			method: Method::POST,
			path: "/api/communities".to_string(),
			user: Some(f.outsider.clone()),
			body: Some(json!({"slug": "maple-lane", "name": "Maple Lane"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_of_any_community_can_create_community",
			method: Method::POST,
			path: "/api/communities".to_string(),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"slug": "maple-lane", "name": "Maple Lane"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "duplicate_slug_conflicts",
			method: Method::POST,
			path: "/api/communities".to_string(),
			user: Some(f.elm_admin.clone()),
			body: Some(json!({"slug": "oak-street", "name": "Another Oak"})),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "invalid_slug_is_rejected_on_create",
			method: Method::POST,
			path: "/api/communities".to_string(),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"slug": "-bad-", "name": "Bad"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "missing_name_is_rejected_on_create",
			method: Method::POST,
			path: "/api/communities".to_string(),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"slug": "birch-road"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "anonymous_can_list_members",
			method: Method::GET,
			path: format!("/api/communities/{oak_id}/members"),
			user: None,
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "malformed_community_id_is_rejected",
			method: Method::GET,
			path: "/api/communities/not-a-uuid/members".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "unknown_community_members_not_found",
			method: Method::GET,
			path: format!("/api/communities/{}/members", CommunityId::generate()),
			user: None,
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn community_lookup_includes_counts() {
	let app = TestApp::new().await;

	let response = app.get("/api/communities/oak-street", None).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	let data = &body["data"];
	assert_eq!(data["slug"], "oak-street");
	assert_eq!(data["id"], app.fixtures.oak.id.to_string());
	assert_eq!(data["join_policy"], "OPEN");
	assert_eq!(data["member_count"], 2);
	assert_eq!(data["post_count"], 2);
}

#[tokio::test]
async fn not_found_uses_error_envelope() {
	let app = TestApp::new().await;

	let body = body_json(app.get("/api/communities/no-such-place", None).await).await;
	assert_eq!(body["error"]["code"], "NOT_FOUND");
	assert!(body["error"]["message"]
		.as_str()
		.unwrap()
		.contains("not found"));
}

#[tokio::test]
async fn created_community_makes_creator_admin() {
	let app = TestApp::new().await;
	let creator = app.fixtures.oak_admin.clone();

	let response = app
		.post(
			"/api/communities",
			Some(&creator),
			json!({
				"slug": "maple-lane",
				"name": "Maple Lane",
				"description": "Up the hill",
				"join_policy": "APPROVAL_REQUIRED"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let created = body_json(response).await;
	assert_eq!(created["data"]["join_policy"], "APPROVAL_REQUIRED");
	let id = created["data"]["id"].as_str().unwrap().to_string();

	let members = body_json(
		app.get(&format!("/api/communities/{id}/members"), None)
			.await,
	)
	.await;
	let members = members["data"].as_array().unwrap();
	assert_eq!(members.len(), 1);
	assert_eq!(members[0]["user_id"], creator.user.id.to_string());
	assert_eq!(members[0]["role"], "ADMIN");
}

#[tokio::test]
async fn forbidden_create_reports_deny_reason() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/communities",
			Some(&app.fixtures.outsider),
			json!({"slug": "maple-lane", "name": "Maple Lane"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let body = body_json(response).await;
	assert_eq!(body["error"]["code"], "FORBIDDEN");
	assert_eq!(body["error"]["reason"], "NOT_PLATFORM_ADMIN");
}

#[tokio::test]
async fn members_are_listed_in_join_order_with_profiles() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(
		app.get(&format!("/api/communities/{}/members", f.oak.id), None)
			.await,
	)
	.await;
	let members = body["data"].as_array().unwrap();

	assert_eq!(members.len(), 2);
	assert_eq!(members[0]["user_id"], f.oak_admin.user.id.to_string());
	assert_eq!(members[0]["role"], "ADMIN");
	assert_eq!(members[0]["user"]["full_name"], "Oak Admin");
	assert_eq!(members[1]["user_id"], f.oak_member.user.id.to_string());
	assert_eq!(members[1]["role"], "MEMBER");
	assert_eq!(members[1]["user"]["email"], "oak-member@test.com");
}

#[tokio::test]
async fn missing_or_bad_tokens_are_unauthorized() {
	let app = TestApp::new().await;
	let path = format!("/api/communities/{}/join-requests", app.fixtures.elm.id);

	let response = app.get(&path, None).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");

	let response = app.get_with_authorization(&path, "Bearer garbage").await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let forged = format!("{}.{}", app.fixtures.elm_admin.user.id, "00".repeat(32));
	let response = app
		.get_with_authorization(&path, &format!("Bearer {forged}"))
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let basic = app
		.get_with_authorization(&path, "Basic dXNlcjpwYXNz")
		.await;
	assert_eq!(basic.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_unknown_user_is_unauthorized() {
	let app = TestApp::new().await;
	let stranger = hearth_community_core::UserId::generate();
	let token = hearth_server::issue_token(&app.state.auth_secret, stranger).unwrap();

	let response = app
		.get_with_authorization(
			&format!("/api/communities/{}/join-requests", app.fixtures.elm.id),
			&format!("Bearer {token}"),
		)
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
