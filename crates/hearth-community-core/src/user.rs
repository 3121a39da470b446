// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User types as seen by the membership core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::membership::Membership;
use crate::role::CommunityRole;
use crate::types::{CommunityId, UserId, UserStatus};

/// A registered user. Users are owned by the external login system and are
/// never deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
	pub id: UserId,
	pub email: String,
	pub full_name: String,
	pub status: UserStatus,
	pub created_at: DateTime<Utc>,
}

impl User {
	pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
		Self {
			id: UserId::generate(),
			email: email.into(),
			full_name: full_name.into(),
			status: UserStatus::Active,
			created_at: Utc::now(),
		}
	}

	pub fn is_active(&self) -> bool {
		self.status == UserStatus::Active
	}
}

/// The public slice of a user shown next to a membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserSummary {
	pub id: UserId,
	pub email: String,
	pub full_name: String,
	pub status: UserStatus,
}

impl From<&User> for UserSummary {
	fn from(user: &User) -> Self {
		Self {
			id: user.id,
			email: user.email.clone(),
			full_name: user.full_name.clone(),
			status: user.status,
		}
	}
}

/// A membership joined with the member's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MemberProfile {
	pub user_id: UserId,
	pub community_id: CommunityId,
	pub role: CommunityRole,
	pub created_at: DateTime<Utc>,
	pub user: UserSummary,
}

impl MemberProfile {
	pub fn new(membership: Membership, user: UserSummary) -> Self {
		Self {
			user_id: membership.user_id,
			community_id: membership.community_id,
			role: membership.role,
			created_at: membership.created_at,
			user,
		}
	}
}
