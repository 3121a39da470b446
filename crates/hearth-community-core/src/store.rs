// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage ports.
//!
//! The lifecycle and directory services are written against these traits so
//! the persistence layer is injected at construction. Implementations must
//! enforce uniqueness themselves and report violations as
//! [`StoreError::UniqueViolation`]; the services never pre-check and retry.

use async_trait::async_trait;

use crate::community::{Community, CommunityCounts};
use crate::error::StoreError;
use crate::membership::{JoinRequest, Membership};
use crate::post::{PostFilter, PostListing};
use crate::role::CommunityRole;
use crate::types::{CommunityId, JoinRequestStatus, UserId};
use crate::user::{MemberProfile, User};

#[async_trait]
pub trait CommunityStore: Send + Sync {
	async fn get_community(&self, id: CommunityId) -> Result<Option<Community>, StoreError>;

	async fn get_community_by_slug(&self, slug: &str) -> Result<Option<Community>, StoreError>;

	async fn community_counts(&self, id: CommunityId) -> Result<CommunityCounts, StoreError>;

	/// Inserts the community and the creator's membership atomically.
	/// A duplicate slug is a [`StoreError::UniqueViolation`].
	async fn create_community_with_admin(
		&self,
		community: &Community,
		admin: &Membership,
	) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
	/// Inserts a membership. An existing (user, community) pair is a
	/// [`StoreError::UniqueViolation`].
	async fn insert_membership(&self, membership: &Membership) -> Result<(), StoreError>;

	/// Inserts a membership and, in the same transaction, marks any pending
	/// join request for the pair as approved by `handled_by`.
	async fn insert_membership_approving_request(
		&self,
		membership: &Membership,
		handled_by: UserId,
	) -> Result<(), StoreError>;

	async fn get_membership(
		&self,
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<Option<Membership>, StoreError>;

	/// Returns false when no membership exists for the pair.
	async fn update_membership_role(
		&self,
		user_id: UserId,
		community_id: CommunityId,
		role: CommunityRole,
	) -> Result<bool, StoreError>;

	/// Returns false when no membership exists for the pair.
	async fn delete_membership(
		&self,
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<bool, StoreError>;

	/// Memberships of a community ordered by join time, then user id.
	async fn list_memberships(&self, community_id: CommunityId)
		-> Result<Vec<Membership>, StoreError>;

	/// Same order as [`MembershipStore::list_memberships`].
	async fn list_member_profiles(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<MemberProfile>, StoreError>;

	async fn memberships_for_user(&self, user_id: UserId) -> Result<Vec<Membership>, StoreError>;

	/// A second pending request for the pair is a [`StoreError::UniqueViolation`].
	async fn insert_join_request(&self, request: &JoinRequest) -> Result<(), StoreError>;

	/// Moves the pending request for the pair to `status`. Returns false when
	/// nothing was pending.
	async fn resolve_join_request(
		&self,
		user_id: UserId,
		community_id: CommunityId,
		status: JoinRequestStatus,
		handled_by: UserId,
	) -> Result<bool, StoreError>;

	/// Pending requests ordered by creation time.
	async fn list_pending_join_requests(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<JoinRequest>, StoreError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
	/// Posts matching `filter` with their community and author, newest first,
	/// at most `limit`.
	async fn list_posts(
		&self,
		filter: &PostFilter,
		limit: u32,
	) -> Result<Vec<PostListing>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;
}
