// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for policy evaluation.
//!
//! - [`Action`]: the operation being attempted
//! - [`Capability`]: a platform-wide right derived from memberships
//! - [`Decision`]: the evaluator's answer, with a [`DenyReason`] on denial
//!
//! All attributes are supplied by the caller; nothing here touches storage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
	CreateCommunity,
	ApproveMember,
	ChangeRole,
	RemoveMember,
	ReadCommunity,
	ListMembers,
}

impl Action {
	pub fn all() -> &'static [Action] {
		&[
			Action::CreateCommunity,
			Action::ApproveMember,
			Action::ChangeRole,
			Action::RemoveMember,
			Action::ReadCommunity,
			Action::ListMembers,
		]
	}

	/// Returns true for actions that manage the members of one community.
	pub fn is_member_management(&self) -> bool {
		matches!(
			self,
			Action::ApproveMember | Action::ChangeRole | Action::RemoveMember
		)
	}
}

/// Rights that are not scoped to a single community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
	/// May create communities. Held by anyone who administers some community.
	PlatformAdmin,
}

/// Machine-readable reason for a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyCode {
	NotAdminOfCommunity,
	MissingCommunity,
	NotPlatformAdmin,
}

impl DenyCode {
	pub fn as_str(&self) -> &'static str {
		match self {
			DenyCode::NotAdminOfCommunity => "NOT_ADMIN_OF_COMMUNITY",
			DenyCode::MissingCommunity => "MISSING_COMMUNITY",
			DenyCode::NotPlatformAdmin => "NOT_PLATFORM_ADMIN",
		}
	}

	fn message(&self) -> &'static str {
		match self {
			DenyCode::NotAdminOfCommunity => "not admin of community",
			DenyCode::MissingCommunity => "missing community",
			DenyCode::NotPlatformAdmin => "platform admin capability required",
		}
	}
}

/// Why an action was denied: a stable code plus a human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyReason {
	pub code: DenyCode,
	pub message: String,
}

impl DenyReason {
	pub fn new(code: DenyCode) -> Self {
		Self {
			code,
			message: code.message().to_string(),
		}
	}

	pub fn not_admin_of_community() -> Self {
		Self::new(DenyCode::NotAdminOfCommunity)
	}

	pub fn missing_community() -> Self {
		Self::new(DenyCode::MissingCommunity)
	}

	pub fn not_platform_admin() -> Self {
		Self::new(DenyCode::NotPlatformAdmin)
	}
}

impl fmt::Display for DenyReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message)
	}
}

/// Outcome of a policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	Allow,
	Deny(DenyReason),
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, Decision::Allow)
	}

	/// Converts to a `Result`, keeping the reason on denial.
	pub fn into_result(self) -> Result<(), DenyReason> {
		match self {
			Decision::Allow => Ok(()),
			Decision::Deny(reason) => Err(reason),
		}
	}
}
