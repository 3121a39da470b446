// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared by the membership and policy modules.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`],
//!   [`CommunityId`], [`PostId`], [`JoinRequestId`]) preventing accidental mixing
//! - **Status enums**: account status ([`UserStatus`]), community join policy
//!   ([`JoinPolicy`]) and join request state ([`JoinRequestStatus`])
//!
//! All ID types serialize transparently as UUID strings. All enums serialize
//! in `SCREAMING_SNAKE_CASE`, which is also their `Display`/`FromStr` form and
//! the form stored in the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(CommunityId, "Unique identifier for a community.");
define_id_type!(PostId, "Unique identifier for a post.");
define_id_type!(JoinRequestId, "Unique identifier for a join request.");

/// Returned when a stored or submitted string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
	pub kind: &'static str,
	pub value: String,
}

impl UnknownVariant {
	pub(crate) fn new(kind: &'static str, value: &str) -> Self {
		Self {
			kind,
			value: value.to_string(),
		}
	}
}

// =============================================================================
// User Status
// =============================================================================

/// Account status of a user. Users are never deleted, only re-statused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
	#[default]
	Pending,
	Active,
	Suspended,
}

impl fmt::Display for UserStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UserStatus::Pending => write!(f, "PENDING"),
			UserStatus::Active => write!(f, "ACTIVE"),
			UserStatus::Suspended => write!(f, "SUSPENDED"),
		}
	}
}

impl FromStr for UserStatus {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"PENDING" => Ok(UserStatus::Pending),
			"ACTIVE" => Ok(UserStatus::Active),
			"SUSPENDED" => Ok(UserStatus::Suspended),
			_ => Err(UnknownVariant::new("user status", s)),
		}
	}
}

// =============================================================================
// Join Policy
// =============================================================================

/// Per-community configuration controlling how memberships come to exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinPolicy {
	/// Anyone may join directly.
	#[default]
	Open,
	/// Users ask to join; an admin approves.
	ApprovalRequired,
	/// Only admins add members.
	InviteOnly,
}

impl JoinPolicy {
	/// Returns true if a user may create their own membership.
	pub fn allows_direct_join(&self) -> bool {
		matches!(self, JoinPolicy::Open)
	}

	/// Returns true if users may file a join request for admin review.
	pub fn accepts_join_requests(&self) -> bool {
		matches!(self, JoinPolicy::ApprovalRequired)
	}
}

impl fmt::Display for JoinPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			JoinPolicy::Open => write!(f, "OPEN"),
			JoinPolicy::ApprovalRequired => write!(f, "APPROVAL_REQUIRED"),
			JoinPolicy::InviteOnly => write!(f, "INVITE_ONLY"),
		}
	}
}

impl FromStr for JoinPolicy {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"OPEN" => Ok(JoinPolicy::Open),
			"APPROVAL_REQUIRED" => Ok(JoinPolicy::ApprovalRequired),
			"INVITE_ONLY" => Ok(JoinPolicy::InviteOnly),
			_ => Err(UnknownVariant::new("join policy", s)),
		}
	}
}

// =============================================================================
// Join Request Status
// =============================================================================

/// State of a request to join an approval-gated community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinRequestStatus {
	Pending,
	Approved,
	Rejected,
}

impl fmt::Display for JoinRequestStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			JoinRequestStatus::Pending => write!(f, "PENDING"),
			JoinRequestStatus::Approved => write!(f, "APPROVED"),
			JoinRequestStatus::Rejected => write!(f, "REJECTED"),
		}
	}
}

impl FromStr for JoinRequestStatus {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"PENDING" => Ok(JoinRequestStatus::Pending),
			"APPROVED" => Ok(JoinRequestStatus::Approved),
			"REJECTED" => Ok(JoinRequestStatus::Rejected),
			_ => Err(UnknownVariant::new("join request status", s)),
		}
	}
}
