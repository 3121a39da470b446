// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Community types.
//!
//! This module provides:
//! - [`Community`] - a named group users can join
//! - [`NewCommunity`] - the validated input for creating one
//! - [`CommunitySummary`] - a community plus its computed counts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommunityError;
use crate::types::{CommunityId, JoinPolicy};

pub const SLUG_MIN_LEN: usize = 3;
pub const SLUG_MAX_LEN: usize = 50;
pub const NAME_MAX_LEN: usize = 100;

/// A community that users can belong to.
///
/// The slug is unique across all communities and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Community {
	/// Unique identifier for this community.
	pub id: CommunityId,

	/// URL-friendly identifier for the community.
	pub slug: String,

	/// Display name of the community.
	pub name: String,

	/// Optional free-form description.
	pub description: Option<String>,

	/// How memberships in this community come to exist.
	pub join_policy: JoinPolicy,

	/// When the community was created.
	pub created_at: DateTime<Utc>,
}

impl Community {
	/// Builds a community from validated input, generating the ID and timestamp.
	pub fn from_new(new: NewCommunity) -> Self {
		Self {
			id: CommunityId::generate(),
			slug: new.slug,
			name: new.name,
			description: new.description,
			join_policy: new.join_policy,
			created_at: Utc::now(),
		}
	}
}

/// Input for creating a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewCommunity {
	pub slug: String,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub join_policy: JoinPolicy,
}

impl NewCommunity {
	pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			slug: slug.into(),
			name: name.into(),
			description: None,
			join_policy: JoinPolicy::default(),
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_join_policy(mut self, join_policy: JoinPolicy) -> Self {
		self.join_policy = join_policy;
		self
	}

	/// Checks the slug and name, trimming the name in place.
	pub fn validate(&mut self) -> Result<(), CommunityError> {
		validate_slug(&self.slug)?;

		let name = self.name.trim();
		if name.is_empty() {
			return Err(CommunityError::Validation("name must not be empty".to_string()));
		}
		if name.chars().count() > NAME_MAX_LEN {
			return Err(CommunityError::Validation(format!(
				"name must be at most {NAME_MAX_LEN} characters"
			)));
		}
		self.name = name.to_string();

		Ok(())
	}
}

/// Validates a community slug.
///
/// A slug is 3 to 50 characters of lowercase ASCII letters, digits and
/// dashes, and neither starts nor ends with a dash.
pub fn validate_slug(slug: &str) -> Result<(), CommunityError> {
	let len = slug.len();
	if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
		return Err(CommunityError::Validation(format!(
			"slug must be between {SLUG_MIN_LEN} and {SLUG_MAX_LEN} characters"
		)));
	}

	if !slug
		.bytes()
		.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
	{
		return Err(CommunityError::Validation(
			"slug may only contain lowercase letters, digits and dashes".to_string(),
		));
	}

	if slug.starts_with('-') || slug.ends_with('-') {
		return Err(CommunityError::Validation(
			"slug must not start or end with a dash".to_string(),
		));
	}

	Ok(())
}

/// Member and post totals, computed at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CommunityCounts {
	pub members: u64,
	pub posts: u64,
}

/// A community together with its counts, as returned by slug lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CommunitySummary {
	#[serde(flatten)]
	pub community: Community,
	pub member_count: u64,
	pub post_count: u64,
}

impl CommunitySummary {
	pub fn new(community: Community, counts: CommunityCounts) -> Self {
		Self {
			community,
			member_count: counts.members,
			post_count: counts.posts,
		}
	}
}
