// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::policy::DenyReason;

/// Errors returned by membership and directory operations.
#[derive(Debug, Error)]
pub enum CommunityError {
	#[error("not found: {0}")]
	NotFound(String),

	#[error("forbidden: {0}")]
	Forbidden(DenyReason),

	/// The community's join policy does not permit the operation.
	#[error("policy violation: {0}")]
	PolicyViolation(String),

	#[error("conflict: {0}")]
	Conflict(String),

	#[error("validation error: {0}")]
	Validation(String),

	#[error("storage error: {0}")]
	Storage(#[source] StoreError),
}

impl CommunityError {
	/// Stable machine-readable code for this error class.
	pub fn code(&self) -> &'static str {
		match self {
			CommunityError::NotFound(_) => "NOT_FOUND",
			CommunityError::Forbidden(_) => "FORBIDDEN",
			CommunityError::PolicyViolation(_) => "POLICY_VIOLATION",
			CommunityError::Conflict(_) => "CONFLICT",
			CommunityError::Validation(_) => "VALIDATION_ERROR",
			CommunityError::Storage(_) => "INTERNAL_ERROR",
		}
	}
}

/// Errors reported by storage implementations.
#[derive(Debug, Error)]
pub enum StoreError {
	/// A uniqueness constraint rejected the write.
	#[error("unique constraint violated: {0}")]
	UniqueViolation(String),

	#[error("storage backend error: {0}")]
	Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
	pub fn backend<E>(err: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		StoreError::Backend(Box::new(err))
	}
}

impl From<StoreError> for CommunityError {
	fn from(err: StoreError) -> Self {
		match err {
			StoreError::UniqueViolation(what) => CommunityError::Conflict(what),
			other => CommunityError::Storage(other),
		}
	}
}
