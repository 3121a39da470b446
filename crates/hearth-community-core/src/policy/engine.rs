// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy evaluation engine.
//!
//! [`can`] decides whether an actor, described only by its membership set,
//! may perform an action. It is pure: callers load memberships first.
//!
//! 1. **Platform actions**: `CREATE_COMMUNITY` needs [`Capability::PlatformAdmin`]
//! 2. **Community actions**: member management needs `ADMIN` in that community
//! 3. **Reads**: always allowed

use super::types::{Action, Capability, Decision, DenyReason};
use crate::membership::Membership;
use crate::role::CommunityRole;
use crate::types::CommunityId;
use tracing::instrument;

/// Evaluates whether an actor holding `memberships` may perform `action`.
///
/// `community_id` is required for member management actions; without it
/// they deny with a `missing community` reason.
#[instrument(
    level = "debug",
    skip(memberships),
    fields(
        membership_count = memberships.len(),
        community_id = ?community_id,
        action = ?action,
    )
)]
pub fn can(
	memberships: &[Membership],
	community_id: Option<CommunityId>,
	action: Action,
) -> Decision {
	match action {
		Action::CreateCommunity => {
			if has_capability(memberships, Capability::PlatformAdmin) {
				Decision::Allow
			} else {
				Decision::Deny(DenyReason::not_platform_admin())
			}
		}
		Action::ApproveMember | Action::ChangeRole | Action::RemoveMember => {
			let Some(community_id) = community_id else {
				return Decision::Deny(DenyReason::missing_community());
			};

			match role_in(memberships, community_id) {
				Some(role) if role.has_at_least(CommunityRole::Admin) => Decision::Allow,
				_ => Decision::Deny(DenyReason::not_admin_of_community()),
			}
		}
		Action::ReadCommunity | Action::ListMembers => Decision::Allow,
	}
}

/// Returns the actor's role in the given community, if a member.
pub fn role_in(memberships: &[Membership], community_id: CommunityId) -> Option<CommunityRole> {
	memberships
		.iter()
		.find(|m| m.community_id == community_id)
		.map(|m| m.role)
}

/// Capabilities granted by a membership set.
pub fn capabilities(memberships: &[Membership]) -> Vec<Capability> {
	let mut caps = Vec::new();
	if memberships
		.iter()
		.any(|m| m.role.has_at_least(CommunityRole::Admin))
	{
		caps.push(Capability::PlatformAdmin);
	}
	caps
}

pub fn has_capability(memberships: &[Membership], capability: Capability) -> bool {
	capabilities(memberships).contains(&capability)
}
