// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Community roles and their ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::UnknownVariant;

/// Roles within a community.
///
/// Variants are declared in ascending order of privilege so the derived
/// `Ord` is the role hierarchy. Any tier added above `Admin` inherits admin
/// rights wherever callers check `has_at_least(CommunityRole::Admin)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunityRole {
	/// Standard member access.
	Member,
	/// Manage members of the community.
	Admin,
}

impl CommunityRole {
	/// Returns all available community roles, lowest first.
	pub fn all() -> &'static [CommunityRole] {
		&[CommunityRole::Member, CommunityRole::Admin]
	}

	/// Returns true if this role has at least the privileges of `required`.
	pub fn has_at_least(&self, required: CommunityRole) -> bool {
		*self >= required
	}

	pub fn is_admin(&self) -> bool {
		self.has_at_least(CommunityRole::Admin)
	}
}

/// Free-function form of [`CommunityRole::has_at_least`].
pub fn has_at_least(role: CommunityRole, required: CommunityRole) -> bool {
	role.has_at_least(required)
}

impl fmt::Display for CommunityRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CommunityRole::Member => write!(f, "MEMBER"),
			CommunityRole::Admin => write!(f, "ADMIN"),
		}
	}
}

impl FromStr for CommunityRole {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"MEMBER" => Ok(CommunityRole::Member),
			"ADMIN" => Ok(CommunityRole::Admin),
			_ => Err(UnknownVariant::new("community role", s)),
		}
	}
}
