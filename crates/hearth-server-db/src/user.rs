// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.
//!
//! Users are created by the external login system; this repository reads
//! them for authentication and member listings.

use hearth_community_core::{User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::rows::{format_timestamp, parse_enum, parse_timestamp, parse_uuid};

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a user.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
	pub async fn create_user(&self, user: &User) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (id, email, full_name, status, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&user.full_name)
		.bind(user.status.to_string())
		.bind(format_timestamp(&user.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::unique_as_conflict(e, "email already registered"))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, full_name, status, created_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_user(&r)).transpose()
	}

	fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
		let id: String = row.get("id");
		let status: String = row.get("status");
		let created_at: String = row.get("created_at");

		Ok(User {
			id: UserId::new(parse_uuid(&id, "user ID")?),
			email: row.get("email"),
			full_name: row.get("full_name"),
			status: parse_enum(&status, "status")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
		})
	}
}
