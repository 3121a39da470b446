// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema migrations.
//!
//! Migrations are numbered SQL files under `migrations/`, applied in order
//! once each. Applied versions are recorded in `schema_migrations`.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

struct Migration {
	version: i64,
	name: &'static str,
	sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
	Migration {
		version: 1,
		name: "users_communities",
		sql: include_str!("../migrations/001_users_communities.sql"),
	},
	Migration {
		version: 2,
		name: "join_requests",
		sql: include_str!("../migrations/002_join_requests.sql"),
	},
];

/// Apply every migration not yet recorded. Each runs in its own transaction.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS schema_migrations (
			version INTEGER PRIMARY KEY NOT NULL,
			name TEXT NOT NULL,
			applied_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	for migration in MIGRATIONS {
		let applied: Option<(i64,)> =
			sqlx::query_as("SELECT version FROM schema_migrations WHERE version = ?")
				.bind(migration.version)
				.fetch_optional(pool)
				.await?;
		if applied.is_some() {
			continue;
		}

		let mut tx = pool.begin().await?;
		sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;
		sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
			.bind(migration.version)
			.bind(migration.name)
			.bind(Utc::now().to_rfc3339())
			.execute(&mut *tx)
			.await?;
		tx.commit().await?;

		tracing::info!(version = migration.version, name = migration.name, "applied migration");
	}

	Ok(())
}
