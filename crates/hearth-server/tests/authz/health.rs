// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::{body_json, TestApp};

#[tokio::test]
async fn health_reports_database() {
	let app = TestApp::new().await;

	let response = app.get("/health", None).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["status"], "healthy");
	assert_eq!(body["database"]["status"], "healthy");
}

#[tokio::test]
async fn health_is_unavailable_when_database_is_closed() {
	let app = TestApp::new().await;
	app.state.pool.close().await;

	let response = app.get("/health", None).await;
	assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body_json(response).await["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn serves_openapi_document() {
	let app = TestApp::new().await;

	let response = app.get("/api/openapi.json", None).await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["info"]["title"], "Hearth Server API");
	assert!(body["paths"]["/api/communities/{id}/members"].is_object());
}
