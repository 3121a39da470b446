// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership and join request types.
//!
//! This module provides:
//! - [`Membership`] - links a user to a community with a role
//! - [`JoinRequest`] - a pending ask to join an approval-gated community

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::CommunityRole;
use crate::types::{CommunityId, JoinRequestId, JoinRequestStatus, UserId};

/// A user's membership in a community.
///
/// At most one membership exists per (user, community) pair. A membership
/// either exists or it does not; removal deletes the row outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Membership {
	/// The user who is a member.
	pub user_id: UserId,

	/// The community this membership is for.
	pub community_id: CommunityId,

	/// The user's role within the community.
	pub role: CommunityRole,

	/// When this membership was created.
	pub created_at: DateTime<Utc>,
}

impl Membership {
	/// Creates a new membership with created_at set to now.
	pub fn new(user_id: UserId, community_id: CommunityId, role: CommunityRole) -> Self {
		Self {
			user_id,
			community_id,
			role,
			created_at: Utc::now(),
		}
	}

	/// Returns true if this member is an admin of the community.
	pub fn is_admin(&self) -> bool {
		self.role.is_admin()
	}

	/// Returns true if this member has at least the given role's privileges.
	pub fn has_at_least(&self, role: CommunityRole) -> bool {
		self.role.has_at_least(role)
	}
}

/// A request to join a community whose policy is `APPROVAL_REQUIRED`.
///
/// Only one `PENDING` request may exist per (user, community). A request is
/// never a membership: approving one creates the membership and marks the
/// request `APPROVED` together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JoinRequest {
	pub id: JoinRequestId,
	pub community_id: CommunityId,
	pub user_id: UserId,
	pub status: JoinRequestStatus,
	pub created_at: DateTime<Utc>,
	pub handled_at: Option<DateTime<Utc>>,
	pub handled_by: Option<UserId>,
}

impl JoinRequest {
	/// Creates a new pending request.
	pub fn new(community_id: CommunityId, user_id: UserId) -> Self {
		Self {
			id: JoinRequestId::generate(),
			community_id,
			user_id,
			status: JoinRequestStatus::Pending,
			created_at: Utc::now(),
			handled_at: None,
			handled_by: None,
		}
	}

	pub fn is_pending(&self) -> bool {
		self.status == JoinRequestStatus::Pending
	}
}

/// Sorts memberships by join time, then user id.
pub fn sort_memberships(memberships: &mut [Membership]) {
	memberships.sort_by(|a, b| {
		a.created_at
			.cmp(&b.created_at)
			.then_with(|| a.user_id.cmp(&b.user_id))
	});
}
