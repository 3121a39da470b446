// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request-layer validation.
//!
//! Malformed ids, slugs and bodies are rejected here with
//! `VALIDATION_ERROR` before any core call is made.

use axum::extract::{FromRequest, FromRequestParts};
use hearth_community_core::{CommunityId, UserId};

use crate::error::ApiError;

/// JSON body extractor whose rejections render as `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections render as `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor whose rejections render as `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Check a slug taken from a URL before it reaches the store.
pub fn validate_slug(slug: &str) -> Result<(), ApiError> {
	hearth_community_core::validate_slug(slug)
		.map_err(|e| ApiError::validation(format!("invalid community slug '{slug}': {e}")))
}

pub fn parse_community_id(raw: &str) -> Result<CommunityId, ApiError> {
	raw.parse()
		.map_err(|_| ApiError::validation(format!("invalid community id '{raw}'")))
}

pub fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
	raw.parse()
		.map_err(|_| ApiError::validation(format!("invalid user id '{raw}'")))
}
