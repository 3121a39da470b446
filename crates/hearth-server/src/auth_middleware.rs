// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bearer token authentication.
//!
//! Handlers that need an actor take [`RequireAuth`]; it verifies the
//! `Authorization: Bearer <token>` header against the configured secret and
//! loads the user. Raw tokens are never logged.

use axum::{
	extract::FromRequestParts,
	http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use hearth_community_core::User;
use tracing::instrument;

use crate::{api::AppState, error::ApiError, token::verify_token};

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser {
	pub user: User,
}

/// Extractor that requires authentication.
///
/// Rejects with 401 when the header is missing, the token does not verify,
/// or the token names an unknown user.
pub struct RequireAuth(pub CurrentUser);

/// Pull the token out of an `Authorization: Bearer` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let (scheme, token) = value.split_once(' ')?;
	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}
	let token = token.trim();
	(!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for RequireAuth {
	type Rejection = ApiError;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all, fields(user_id = tracing::field::Empty))]
	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let token = extract_bearer_token(&parts.headers).ok_or_else(|| {
			tracing::debug!("no bearer token");
			ApiError::Unauthorized("Authentication required".to_string())
		})?;

		let user_id = verify_token(&state.auth_secret, token).map_err(|e| {
			tracing::debug!(reason = %e, "bearer token rejected");
			ApiError::Unauthorized("Invalid token".to_string())
		})?;

		let user = state
			.user_repo
			.get_user_by_id(&user_id)
			.await
			.map_err(|e| ApiError::Internal(format!("failed to load user: {e}")))?
			.ok_or_else(|| {
				tracing::debug!(%user_id, "token names unknown user");
				ApiError::Unauthorized("Invalid token".to_string())
			})?;

		tracing::Span::current().record("user_id", tracing::field::display(&user.id));
		Ok(RequireAuth(CurrentUser { user }))
	}
}
