// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use hearth_community_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
	/// Maps a unique-constraint violation to `Conflict`, anything else to `Sqlx`.
	pub(crate) fn unique_as_conflict(err: sqlx::Error, message: &str) -> Self {
		match err {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(message.to_string())
			}
			_ => DbError::Sqlx(err),
		}
	}
}

impl From<DbError> for StoreError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::Conflict(message) => StoreError::UniqueViolation(message),
			other => StoreError::backend(other),
		}
	}
}
