// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Community repository for database operations.
//!
//! This module provides database access for community management including:
//! - Community creation and lookup
//! - Membership management (members, admins)
//! - Join requests (for approval-gated communities)
//!
//! Uniqueness of slugs, memberships and pending join requests is enforced by
//! the schema. Violations surface as `DbError::Conflict`.

use async_trait::async_trait;
use chrono::Utc;
use hearth_community_core::{
	Community, CommunityCounts, CommunityId, CommunityRole, CommunityStore, JoinRequest,
	JoinRequestId, JoinRequestStatus, MemberProfile, Membership, MembershipStore, StoreError,
	User, UserId, UserStore, UserSummary,
};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::rows::{format_timestamp, parse_enum, parse_timestamp, parse_uuid};
use crate::user::UserRepository;

const MEMBERSHIP_EXISTS: &str = "user is already a member of this community";
const SLUG_TAKEN: &str = "community slug already taken";
const REQUEST_PENDING: &str = "join request already pending";

/// Repository for community database operations.
///
/// Manages communities, their members, and join requests.
/// All IDs are UUIDs stored as strings in SQLite.
#[derive(Clone)]
pub struct CommunityRepository {
	pool: SqlitePool,
}

impl CommunityRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Communities
	// =========================================================================

	/// Create a community and its first admin in one transaction.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the slug is taken. Nothing is written
	/// in that case.
	#[tracing::instrument(skip(self, community, admin), fields(community_id = %community.id, slug = %community.slug))]
	pub async fn create_community_with_admin(
		&self,
		community: &Community,
		admin: &Membership,
	) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO communities (id, slug, name, description, join_policy, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(community.id.to_string())
		.bind(&community.slug)
		.bind(&community.name)
		.bind(&community.description)
		.bind(community.join_policy.to_string())
		.bind(format_timestamp(&community.created_at))
		.execute(&mut *tx)
		.await
		.map_err(|e| DbError::unique_as_conflict(e, SLUG_TAKEN))?;

		sqlx::query(
			r#"
			INSERT INTO memberships (user_id, community_id, role, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(admin.user_id.to_string())
		.bind(admin.community_id.to_string())
		.bind(admin.role.to_string())
		.bind(format_timestamp(&admin.created_at))
		.execute(&mut *tx)
		.await
		.map_err(|e| DbError::unique_as_conflict(e, MEMBERSHIP_EXISTS))?;

		tx.commit().await?;

		tracing::debug!(community_id = %community.id, admin_id = %admin.user_id, "community created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(community_id = %id))]
	pub async fn get_community_by_id(&self, id: &CommunityId) -> Result<Option<Community>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, slug, name, description, join_policy, created_at
			FROM communities
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_community(&r)).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_community_by_slug(&self, slug: &str) -> Result<Option<Community>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, slug, name, description, join_policy, created_at
			FROM communities
			WHERE slug = ?
			"#,
		)
		.bind(slug)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_community(&r)).transpose()
	}

	/// Count members and posts of a community.
	#[tracing::instrument(skip(self), fields(community_id = %id))]
	pub async fn community_counts(&self, id: &CommunityId) -> Result<CommunityCounts, DbError> {
		let row = sqlx::query(
			r#"
			SELECT
				(SELECT COUNT(*) FROM memberships WHERE community_id = ?1) AS members,
				(SELECT COUNT(*) FROM posts WHERE community_id = ?1) AS posts
			"#,
		)
		.bind(id.to_string())
		.fetch_one(&self.pool)
		.await?;

		let members: i64 = row.get("members");
		let posts: i64 = row.get("posts");
		Ok(CommunityCounts {
			members: members.max(0) as u64,
			posts: posts.max(0) as u64,
		})
	}

	// =========================================================================
	// Memberships
	// =========================================================================

	/// Add a membership.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the user already belongs to the community.
	#[tracing::instrument(skip(self, membership), fields(user_id = %membership.user_id, community_id = %membership.community_id, role = %membership.role))]
	pub async fn add_member(&self, membership: &Membership) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO memberships (user_id, community_id, role, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(membership.user_id.to_string())
		.bind(membership.community_id.to_string())
		.bind(membership.role.to_string())
		.bind(format_timestamp(&membership.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::unique_as_conflict(e, MEMBERSHIP_EXISTS))?;

		tracing::debug!(user_id = %membership.user_id, community_id = %membership.community_id, "member added");
		Ok(())
	}

	/// Add a membership and mark any pending join request for the pair as
	/// approved, atomically.
	#[tracing::instrument(skip(self, membership), fields(user_id = %membership.user_id, community_id = %membership.community_id, handled_by = %handled_by))]
	pub async fn add_member_approving_request(
		&self,
		membership: &Membership,
		handled_by: &UserId,
	) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO memberships (user_id, community_id, role, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(membership.user_id.to_string())
		.bind(membership.community_id.to_string())
		.bind(membership.role.to_string())
		.bind(format_timestamp(&membership.created_at))
		.execute(&mut *tx)
		.await
		.map_err(|e| DbError::unique_as_conflict(e, MEMBERSHIP_EXISTS))?;

		let resolved = sqlx::query(
			r#"
			UPDATE join_requests
			SET status = ?, handled_at = ?, handled_by = ?
			WHERE user_id = ? AND community_id = ? AND status = ?
			"#,
		)
		.bind(JoinRequestStatus::Approved.to_string())
		.bind(format_timestamp(&Utc::now()))
		.bind(handled_by.to_string())
		.bind(membership.user_id.to_string())
		.bind(membership.community_id.to_string())
		.bind(JoinRequestStatus::Pending.to_string())
		.execute(&mut *tx)
		.await?
		.rows_affected();

		tx.commit().await?;

		tracing::debug!(
			user_id = %membership.user_id,
			community_id = %membership.community_id,
			resolved_requests = resolved,
			"member approved"
		);
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn get_membership(
		&self,
		user_id: &UserId,
		community_id: &CommunityId,
	) -> Result<Option<Membership>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT user_id, community_id, role, created_at
			FROM memberships
			WHERE user_id = ? AND community_id = ?
			"#,
		)
		.bind(user_id.to_string())
		.bind(community_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_membership(&r)).transpose()
	}

	/// Change a member's role.
	///
	/// # Returns
	/// `false` if the user is not a member.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, community_id = %community_id, role = %role))]
	pub async fn update_member_role(
		&self,
		user_id: &UserId,
		community_id: &CommunityId,
		role: CommunityRole,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE memberships
			SET role = ?
			WHERE user_id = ? AND community_id = ?
			"#,
		)
		.bind(role.to_string())
		.bind(user_id.to_string())
		.bind(community_id.to_string())
		.execute(&self.pool)
		.await?;

		let updated = result.rows_affected() > 0;
		tracing::debug!(updated, "member role updated");
		Ok(updated)
	}

	/// Delete a membership.
	///
	/// # Returns
	/// `false` if the user is not a member.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn remove_member(
		&self,
		user_id: &UserId,
		community_id: &CommunityId,
	) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM memberships WHERE user_id = ? AND community_id = ?")
			.bind(user_id.to_string())
			.bind(community_id.to_string())
			.execute(&self.pool)
			.await?;

		let removed = result.rows_affected() > 0;
		tracing::debug!(removed, "member removed");
		Ok(removed)
	}

	/// Members of a community, oldest first, ties broken by user id.
	#[tracing::instrument(skip(self), fields(community_id = %community_id))]
	pub async fn list_members(&self, community_id: &CommunityId) -> Result<Vec<Membership>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT user_id, community_id, role, created_at
			FROM memberships
			WHERE community_id = ?
			ORDER BY created_at ASC, user_id ASC
			"#,
		)
		.bind(community_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_membership(r)).collect()
	}

	/// Members joined with their user rows, in [`Self::list_members`] order.
	#[tracing::instrument(skip(self), fields(community_id = %community_id))]
	pub async fn list_member_profiles(
		&self,
		community_id: &CommunityId,
	) -> Result<Vec<MemberProfile>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT
				m.user_id, m.community_id, m.role, m.created_at,
				u.email AS u_email, u.full_name AS u_full_name, u.status AS u_status
			FROM memberships m
			JOIN users u ON u.id = m.user_id
			WHERE m.community_id = ?
			ORDER BY m.created_at ASC, m.user_id ASC
			"#,
		)
		.bind(community_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter()
			.map(|r| -> Result<MemberProfile, DbError> {
				let membership = self.row_to_membership(r)?;
				let status: String = r.get("u_status");
				let user = UserSummary {
					id: membership.user_id,
					email: r.get("u_email"),
					full_name: r.get("u_full_name"),
					status: parse_enum(&status, "status")?,
				};
				Ok(MemberProfile::new(membership, user))
			})
			.collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_memberships_for_user(
		&self,
		user_id: &UserId,
	) -> Result<Vec<Membership>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT user_id, community_id, role, created_at
			FROM memberships
			WHERE user_id = ?
			ORDER BY created_at ASC
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_membership(r)).collect()
	}

	// =========================================================================
	// Join Requests
	// =========================================================================

	/// Record a pending join request.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if one is already pending for the pair.
	#[tracing::instrument(skip(self, request), fields(join_request_id = %request.id, user_id = %request.user_id, community_id = %request.community_id))]
	pub async fn create_join_request(&self, request: &JoinRequest) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO join_requests (id, community_id, user_id, status, created_at, handled_at, handled_by)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(request.id.to_string())
		.bind(request.community_id.to_string())
		.bind(request.user_id.to_string())
		.bind(request.status.to_string())
		.bind(format_timestamp(&request.created_at))
		.bind(request.handled_at.as_ref().map(format_timestamp))
		.bind(request.handled_by.map(|id| id.to_string()))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::unique_as_conflict(e, REQUEST_PENDING))?;

		tracing::debug!(join_request_id = %request.id, "join request created");
		Ok(())
	}

	/// Move the pending request for the pair to `status`.
	///
	/// # Returns
	/// `false` if nothing was pending.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, community_id = %community_id, status = %status, handled_by = %handled_by))]
	pub async fn resolve_join_request(
		&self,
		user_id: &UserId,
		community_id: &CommunityId,
		status: JoinRequestStatus,
		handled_by: &UserId,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE join_requests
			SET status = ?, handled_at = ?, handled_by = ?
			WHERE user_id = ? AND community_id = ? AND status = ?
			"#,
		)
		.bind(status.to_string())
		.bind(format_timestamp(&Utc::now()))
		.bind(handled_by.to_string())
		.bind(user_id.to_string())
		.bind(community_id.to_string())
		.bind(JoinRequestStatus::Pending.to_string())
		.execute(&self.pool)
		.await?;

		let resolved = result.rows_affected() > 0;
		tracing::debug!(resolved, "join request resolved");
		Ok(resolved)
	}

	#[tracing::instrument(skip(self), fields(community_id = %community_id))]
	pub async fn list_pending_join_requests(
		&self,
		community_id: &CommunityId,
	) -> Result<Vec<JoinRequest>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, community_id, user_id, status, created_at, handled_at, handled_by
			FROM join_requests
			WHERE community_id = ? AND status = ?
			ORDER BY created_at ASC, id ASC
			"#,
		)
		.bind(community_id.to_string())
		.bind(JoinRequestStatus::Pending.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_join_request(r)).collect()
	}

	// =========================================================================
	// Helpers
	// =========================================================================

	fn row_to_community(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Community, DbError> {
		let id: String = row.get("id");
		let join_policy: String = row.get("join_policy");
		let created_at: String = row.get("created_at");

		Ok(Community {
			id: CommunityId::new(parse_uuid(&id, "community ID")?),
			slug: row.get("slug"),
			name: row.get("name"),
			description: row.get("description"),
			join_policy: parse_enum(&join_policy, "join_policy")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
		})
	}

	fn row_to_membership(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Membership, DbError> {
		let user_id: String = row.get("user_id");
		let community_id: String = row.get("community_id");
		let role: String = row.get("role");
		let created_at: String = row.get("created_at");

		Ok(Membership {
			user_id: UserId::new(parse_uuid(&user_id, "user_id")?),
			community_id: CommunityId::new(parse_uuid(&community_id, "community_id")?),
			role: parse_enum(&role, "role")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
		})
	}

	fn row_to_join_request(&self, row: &sqlx::sqlite::SqliteRow) -> Result<JoinRequest, DbError> {
		let id: String = row.get("id");
		let community_id: String = row.get("community_id");
		let user_id: String = row.get("user_id");
		let status: String = row.get("status");
		let created_at: String = row.get("created_at");
		let handled_at: Option<String> = row.get("handled_at");
		let handled_by: Option<String> = row.get("handled_by");

		Ok(JoinRequest {
			id: JoinRequestId::new(parse_uuid(&id, "join request ID")?),
			community_id: CommunityId::new(parse_uuid(&community_id, "community_id")?),
			user_id: UserId::new(parse_uuid(&user_id, "user_id")?),
			status: parse_enum(&status, "status")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
			handled_at: handled_at
				.map(|t| parse_timestamp(&t, "handled_at"))
				.transpose()?,
			handled_by: handled_by
				.map(|id| parse_uuid(&id, "handled_by").map(UserId::new))
				.transpose()?,
		})
	}
}

#[async_trait]
impl CommunityStore for CommunityRepository {
	async fn get_community(&self, id: CommunityId) -> Result<Option<Community>, StoreError> {
		Ok(self.get_community_by_id(&id).await?)
	}

	async fn get_community_by_slug(&self, slug: &str) -> Result<Option<Community>, StoreError> {
		Ok(self.get_community_by_slug(slug).await?)
	}

	async fn community_counts(&self, id: CommunityId) -> Result<CommunityCounts, StoreError> {
		Ok(self.community_counts(&id).await?)
	}

	async fn create_community_with_admin(
		&self,
		community: &Community,
		admin: &Membership,
	) -> Result<(), StoreError> {
		Ok(self.create_community_with_admin(community, admin).await?)
	}
}

#[async_trait]
impl MembershipStore for CommunityRepository {
	async fn insert_membership(&self, membership: &Membership) -> Result<(), StoreError> {
		Ok(self.add_member(membership).await?)
	}

	async fn insert_membership_approving_request(
		&self,
		membership: &Membership,
		handled_by: UserId,
	) -> Result<(), StoreError> {
		Ok(self
			.add_member_approving_request(membership, &handled_by)
			.await?)
	}

	async fn get_membership(
		&self,
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<Option<Membership>, StoreError> {
		Ok(CommunityRepository::get_membership(self, &user_id, &community_id).await?)
	}

	async fn update_membership_role(
		&self,
		user_id: UserId,
		community_id: CommunityId,
		role: CommunityRole,
	) -> Result<bool, StoreError> {
		Ok(self.update_member_role(&user_id, &community_id, role).await?)
	}

	async fn delete_membership(
		&self,
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<bool, StoreError> {
		Ok(self.remove_member(&user_id, &community_id).await?)
	}

	async fn list_memberships(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<Membership>, StoreError> {
		Ok(self.list_members(&community_id).await?)
	}

	async fn list_member_profiles(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<MemberProfile>, StoreError> {
		Ok(CommunityRepository::list_member_profiles(self, &community_id).await?)
	}

	async fn memberships_for_user(&self, user_id: UserId) -> Result<Vec<Membership>, StoreError> {
		Ok(self.list_memberships_for_user(&user_id).await?)
	}

	async fn insert_join_request(&self, request: &JoinRequest) -> Result<(), StoreError> {
		Ok(self.create_join_request(request).await?)
	}

	async fn resolve_join_request(
		&self,
		user_id: UserId,
		community_id: CommunityId,
		status: JoinRequestStatus,
		handled_by: UserId,
	) -> Result<bool, StoreError> {
		Ok(
			CommunityRepository::resolve_join_request(self, &user_id, &community_id, status, &handled_by)
				.await?,
		)
	}

	async fn list_pending_join_requests(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<JoinRequest>, StoreError> {
		Ok(CommunityRepository::list_pending_join_requests(self, &community_id).await?)
	}
}

#[async_trait]
impl UserStore for CommunityRepository {
	async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
		Ok(UserRepository::new(self.pool.clone())
			.get_user_by_id(&id)
			.await?)
	}
}
