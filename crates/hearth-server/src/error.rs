// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API error types and HTTP response conversions.

use axum::{
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use hearth_community_core::CommunityError;
use serde::Serialize;
use utoipa::ToSchema;

/// Errors returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error(transparent)]
	Community(#[from] CommunityError),

	/// Malformed id, role, slug or body.
	#[error("validation error: {0}")]
	Validation(String),

	/// Missing or invalid bearer token.
	#[error("unauthorized: {0}")]
	Unauthorized(String),

	#[error("internal error: {0}")]
	Internal(String),
}

impl ApiError {
	pub fn validation(message: impl Into<String>) -> Self {
		ApiError::Validation(message.into())
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::Community(e) => match e {
				CommunityError::NotFound(_) => StatusCode::NOT_FOUND,
				CommunityError::Forbidden(_) => StatusCode::FORBIDDEN,
				CommunityError::PolicyViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
				CommunityError::Conflict(_) => StatusCode::CONFLICT,
				CommunityError::Validation(_) => StatusCode::BAD_REQUEST,
				CommunityError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
			},
			ApiError::Validation(_) => StatusCode::BAD_REQUEST,
			ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			ApiError::Community(e) => e.code(),
			ApiError::Validation(_) => "VALIDATION_ERROR",
			ApiError::Unauthorized(_) => "UNAUTHORIZED",
			ApiError::Internal(_) => "INTERNAL_ERROR",
		}
	}

	fn public_message(&self) -> String {
		match self {
			ApiError::Community(CommunityError::NotFound(what)) => format!("{what} not found"),
			ApiError::Community(CommunityError::Forbidden(reason)) => reason.message.clone(),
			ApiError::Community(CommunityError::PolicyViolation(msg))
			| ApiError::Community(CommunityError::Conflict(msg))
			| ApiError::Community(CommunityError::Validation(msg)) => msg.clone(),
			ApiError::Community(CommunityError::Storage(_)) | ApiError::Internal(_) => {
				"An internal error occurred".to_string()
			}
			ApiError::Validation(msg) | ApiError::Unauthorized(msg) => msg.clone(),
		}
	}
}

/// Error response body: `{ "error": { "code", "message" } }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
	pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
	pub code: String,
	pub message: String,
	/// Policy deny code, present on 403 responses.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		match status {
			StatusCode::INTERNAL_SERVER_ERROR => tracing::error!(error = %self, "request failed"),
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
				tracing::debug!(code = self.code(), "request denied")
			}
			_ => {}
		}

		let body = ErrorResponse {
			error: ErrorDetail {
				code: self.code().to_string(),
				message: self.public_message(),
				reason: match &self {
					ApiError::Community(CommunityError::Forbidden(reason)) => {
						Some(reason.code.as_str().to_string())
					}
					_ => None,
				},
			},
		};
		(status, Json(body)).into_response()
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::Validation(rejection.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		ApiError::Validation(rejection.body_text())
	}
}

impl From<PathRejection> for ApiError {
	fn from(rejection: PathRejection) -> Self {
		ApiError::Validation(rejection.body_text())
	}
}
