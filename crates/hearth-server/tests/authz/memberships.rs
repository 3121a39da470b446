// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use hearth_community_core::UserId;
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_membership_authorization() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();
	let oak = f.oak.id;
	let elm = f.elm.id;
	let pine = f.pine.id;
	let outsider_id = f.outsider.user.id;
	let member_id = f.oak_member.user.id;

	let cases = vec![
		AuthzCase {
			name: "anonymous_cannot_join",
			method: Method::POST,
			path: format!("/api/communities/{oak}/join"),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "outsider_can_join_open_community",
			method: Method::POST,
			path: format!("/api/communities/{oak}/join"),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "member_cannot_join_twice",
			method: Method::POST,
			path: format!("/api/communities/{oak}/join"),
			user: Some(f.oak_member.clone()),
			body: None,
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "cannot_join_approval_required_directly",
			method: Method::POST,
			path: format!("/api/communities/{elm}/join"),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::UNPROCESSABLE_ENTITY,
		},
		AuthzCase {
			name: "cannot_join_invite_only_directly",
			method: Method::POST,
			path: format!("/api/communities/{pine}/join"),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::UNPROCESSABLE_ENTITY,
		},
		AuthzCase {
			name: "cannot_request_to_join_open_community",
			method: Method::POST,
			path: format!("/api/communities/{oak}/join-requests"),
			user: Some(f.elm_admin.clone()),
			body: None,
			expected_status: StatusCode::UNPROCESSABLE_ENTITY,
		},
		AuthzCase {
			name: "outsider_can_request_to_join",
			method: Method::POST,
			path: format!("/api/communities/{elm}/join-requests"),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "second_pending_request_conflicts",
			method: Method::POST,
			path: format!("/api/communities/{elm}/join-requests"),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "non_admin_cannot_list_join_requests",
			method: Method::GET,
			path: format!("/api/communities/{elm}/join-requests"),
			user: Some(f.oak_member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_of_other_community_cannot_list_join_requests",
			method: Method::GET,
			path: format!("/api/communities/{elm}/join-requests"),
			user: Some(f.oak_admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_can_list_join_requests",
			method: Method::GET,
			path: format!("/api/communities/{elm}/join-requests"),
			user: Some(f.elm_admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_of_other_community_cannot_approve",
			method: Method::POST,
			path: format!("/api/communities/{elm}/members/approve"),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"user_id": outsider_id})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "approve_rejects_malformed_user_id",
			method: Method::POST,
			path: format!("/api/communities/{elm}/members/approve"),
			user: Some(f.elm_admin.clone()),
			body: Some(json!({"user_id": "42"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_can_approve",
			method: Method::POST,
			path: format!("/api/communities/{elm}/members/approve"),
			user: Some(f.elm_admin.clone()),
			body: Some(json!({"user_id": outsider_id, "role": "MEMBER"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "approving_existing_member_conflicts",
			method: Method::POST,
			path: format!("/api/communities/{elm}/members/approve"),
			user: Some(f.elm_admin.clone()),
			body: Some(json!({"user_id": outsider_id})),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "approving_unknown_user_not_found",
			method: Method::POST,
			path: format!("/api/communities/{elm}/members/approve"),
			user: Some(f.elm_admin.clone()),
			body: Some(json!({"user_id": UserId::generate()})),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "reject_without_pending_request_not_found",
			method: Method::POST,
			path: format!("/api/communities/{elm}/members/reject"),
			user: Some(f.elm_admin.clone()),
			body: Some(json!({"user_id": member_id})),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "member_cannot_change_roles",
			method: Method::PATCH,
			path: format!("/api/communities/{oak}/members/{outsider_id}"),
			user: Some(f.oak_member.clone()),
			body: Some(json!({"role": "ADMIN"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unknown_role_is_rejected",
			method: Method::PATCH,
			path: format!("/api/communities/{oak}/members/{member_id}"),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"role": "OWNER"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "malformed_member_id_is_rejected",
			method: Method::PATCH,
			path: format!("/api/communities/{oak}/members/not-a-uuid"),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"role": "ADMIN"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "changing_role_of_non_member_not_found",
			method: Method::PATCH,
			path: format!("/api/communities/{oak}/members/{}", UserId::generate()),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"role": "ADMIN"})),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_can_change_role",
			method: Method::PATCH,
			path: format!("/api/communities/{oak}/members/{outsider_id}"),
			user: Some(f.oak_admin.clone()),
			body: Some(json!({"role": "ADMIN"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_of_other_community_cannot_remove",
			method: Method::DELETE,
			path: format!("/api/communities/{oak}/members/{member_id}"),
			user: Some(f.elm_admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_can_remove_member",
			method: Method::DELETE,
			path: format!("/api/communities/{oak}/members/{member_id}"),
			user: Some(f.oak_admin.clone()),
			body: None,
			expected_status: StatusCode::NO_CONTENT,
		},
		AuthzCase {
			name: "removing_twice_not_found",
			method: Method::DELETE,
			path: format!("/api/communities/{oak}/members/{member_id}"),
			user: Some(f.oak_admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "member_can_leave",
			method: Method::DELETE,
			path: format!("/api/communities/{elm}/membership"),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::NO_CONTENT,
		},
		AuthzCase {
			name: "leaving_twice_not_found",
			method: Method::DELETE,
			path: format!("/api/communities/{elm}/membership"),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn join_returns_member_row() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			&format!("/api/communities/{}/join", f.oak.id),
			Some(&f.outsider),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = body_json(response).await;
	assert_eq!(body["data"]["user_id"], f.outsider.user.id.to_string());
	assert_eq!(body["data"]["community_id"], f.oak.id.to_string());
	assert_eq!(body["data"]["role"], "MEMBER");
}

#[tokio::test]
async fn policy_violation_uses_its_own_code() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			&format!("/api/communities/{}/join", f.elm.id),
			Some(&f.outsider),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(
		body_json(response).await["error"]["code"],
		"POLICY_VIOLATION"
	);
}

#[tokio::test]
async fn cross_community_approve_reports_not_admin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			&format!("/api/communities/{}/members/approve", f.elm.id),
			Some(&f.oak_admin),
			json!({"user_id": f.outsider.user.id}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let body = body_json(response).await;
	assert_eq!(body["error"]["reason"], "NOT_ADMIN_OF_COMMUNITY");
	assert_eq!(body["error"]["message"], "not admin of community");
}

#[tokio::test]
async fn removed_member_can_rejoin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let member_path = format!(
		"/api/communities/{}/members/{}",
		f.oak.id, f.oak_member.user.id
	);

	let removed = app.delete(&member_path, Some(&f.oak_admin)).await;
	assert_eq!(removed.status(), StatusCode::NO_CONTENT);

	let again = app.delete(&member_path, Some(&f.oak_admin)).await;
	assert_eq!(again.status(), StatusCode::NOT_FOUND);

	let rejoined = app
		.post(
			&format!("/api/communities/{}/join", f.oak.id),
			Some(&f.oak_member),
			json!({}),
		)
		.await;
	assert_eq!(rejoined.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn approval_resolves_pending_request() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let requests_path = format!("/api/communities/{}/join-requests", f.elm.id);

	let requested = app.post(&requests_path, Some(&f.outsider), json!({})).await;
	assert_eq!(requested.status(), StatusCode::CREATED);
	let request = body_json(requested).await;
	assert_eq!(request["data"]["status"], "PENDING");

	let pending = body_json(app.get(&requests_path, Some(&f.elm_admin)).await).await;
	let pending = pending["data"].as_array().unwrap();
	assert_eq!(pending.len(), 1);
	assert_eq!(pending[0]["user_id"], f.outsider.user.id.to_string());

	let approved = app
		.post(
			&format!("/api/communities/{}/members/approve", f.elm.id),
			Some(&f.elm_admin),
			json!({"user_id": f.outsider.user.id, "role": "ADMIN"}),
		)
		.await;
	assert_eq!(approved.status(), StatusCode::CREATED);
	assert_eq!(body_json(approved).await["data"]["role"], "ADMIN");

	let pending = body_json(app.get(&requests_path, Some(&f.elm_admin)).await).await;
	assert!(pending["data"].as_array().unwrap().is_empty());

	// The new admin can now see the queue too.
	let own_view = app.get(&requests_path, Some(&f.outsider)).await;
	assert_eq!(own_view.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejected_user_can_request_again() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let requests_path = format!("/api/communities/{}/join-requests", f.elm.id);
	let reject_path = format!("/api/communities/{}/members/reject", f.elm.id);

	let first = app.post(&requests_path, Some(&f.outsider), json!({})).await;
	assert_eq!(first.status(), StatusCode::CREATED);

	let rejected = app
		.post(
			&reject_path,
			Some(&f.elm_admin),
			json!({"user_id": f.outsider.user.id}),
		)
		.await;
	assert_eq!(rejected.status(), StatusCode::NO_CONTENT);

	let second = app.post(&requests_path, Some(&f.outsider), json!({})).await;
	assert_eq!(second.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn concurrent_joins_yield_one_member() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/communities/{}/join", f.oak.id);

	let (a, b) = tokio::join!(
		app.post(&path, Some(&f.outsider), json!({})),
		app.post(&path, Some(&f.outsider), json!({})),
	);
	let mut statuses = vec![a.status(), b.status()];
	statuses.sort();
	assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

	let members = body_json(
		app.get(&format!("/api/communities/{}/members", f.oak.id), None)
			.await,
	)
	.await;
	let outsider_rows = members["data"]
		.as_array()
		.unwrap()
		.iter()
		.filter(|m| m["user_id"] == f.outsider.user.id.to_string())
		.count();
	assert_eq!(outsider_rows, 1);
}
