// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::{body_json, TestApp};

#[tokio::test]
async fn lists_posts_newest_first_with_paging() {
	let app = TestApp::new().await;

	let response = app.get("/api/posts", None).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	let posts = body["data"].as_array().unwrap();
	assert_eq!(posts.len(), 3);
	assert_eq!(posts[0]["community_id"], app.fixtures.elm.id.to_string());
	assert_eq!(posts[0]["title"], "event in elm-street");
	assert_eq!(posts[0]["community"]["name"], "elm-street");
	assert_eq!(posts[0]["community"]["slug"], "elm-street");
	assert_eq!(posts[0]["author_name"], "Elm Admin");
	assert_eq!(posts[1]["author_name"], "Oak Member");
	assert_eq!(posts[2]["post_type"], "announcement");
	assert_eq!(posts[2]["community"]["slug"], "oak-street");
	assert_eq!(posts[2]["author_name"], "Oak Admin");
	assert_eq!(body["paging"]["total"], 3);
	assert_eq!(body["paging"]["has_more"], false);
}

#[tokio::test]
async fn filters_by_community_and_type() {
	let app = TestApp::new().await;
	let oak = app.fixtures.oak.id;

	let body = body_json(app.get(&format!("/api/posts?communityId={oak}"), None).await).await;
	assert_eq!(body["data"].as_array().unwrap().len(), 2);

	let body = body_json(
		app.get(&format!("/api/posts?communityId={oak}&type=event"), None)
			.await,
	)
	.await;
	let posts = body["data"].as_array().unwrap();
	assert_eq!(posts.len(), 1);
	assert_eq!(posts[0]["post_type"], "event");
}

#[tokio::test]
async fn full_page_reports_more() {
	let app = TestApp::new().await;

	let body = body_json(app.get("/api/posts?limit=2", None).await).await;
	assert_eq!(body["data"].as_array().unwrap().len(), 2);
	assert_eq!(body["paging"]["has_more"], true);
	assert_eq!(body["paging"]["total"], 2);
}

#[tokio::test]
async fn malformed_query_is_rejected() {
	let app = TestApp::new().await;

	let response = app.get("/api/posts?communityId=oak", None).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");

	let response = app.get("/api/posts?limit=lots", None).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
