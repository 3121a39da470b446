// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Success envelope: `{ "data": ... }`.

use axum::{http::StatusCode, Json};
use hearth_community_core::Paging;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
	pub data: T,
	/// Present on list endpoints that page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub paging: Option<Paging>,
}

impl<T: Serialize> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, paging: None }
	}

	pub fn paged(data: T, paging: Paging) -> Self {
		Self {
			data,
			paging: Some(paging),
		}
	}
}

/// 200 with the data envelope.
pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
	(StatusCode::OK, Json(ApiResponse::new(data)))
}

/// 201 with the data envelope.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
	(StatusCode::CREATED, Json(ApiResponse::new(data)))
}
