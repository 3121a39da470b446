// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership lifecycle.
//!
//! A membership is either absent or active. Every transition goes through
//! [`MembershipLifecycle`]; concurrent duplicates are left to the store's
//! uniqueness constraints and surface as [`CommunityError::Conflict`].

use std::sync::Arc;

use tracing::instrument;

use crate::community::Community;
use crate::error::CommunityError;
use crate::membership::{JoinRequest, Membership};
use crate::policy::{self, Action};
use crate::role::CommunityRole;
use crate::store::{CommunityStore, MembershipStore, UserStore};
use crate::types::{CommunityId, JoinRequestStatus, UserId};

pub struct MembershipLifecycle<S: ?Sized> {
	store: Arc<S>,
}

impl<S: ?Sized> Clone for MembershipLifecycle<S> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
		}
	}
}

impl<S> MembershipLifecycle<S>
where
	S: CommunityStore + MembershipStore + UserStore + ?Sized,
{
	pub fn new(store: Arc<S>) -> Self {
		Self { store }
	}

	/// Joins an `OPEN` community as a member.
	///
	/// # Errors
	/// - `NotFound` if the community does not exist
	/// - `PolicyViolation` if the community is not open
	/// - `Conflict` if the user is already a member
	#[instrument(level = "debug", skip(self), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn join(
		&self,
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<Membership, CommunityError> {
		let community = self.require_community(community_id).await?;
		if !community.join_policy.allows_direct_join() {
			return Err(CommunityError::PolicyViolation(format!(
				"community '{}' is {}; direct join is not permitted",
				community.slug, community.join_policy
			)));
		}

		let membership = Membership::new(user_id, community_id, CommunityRole::Member);
		self.store.insert_membership(&membership).await?;
		Ok(membership)
	}

	/// Adds a user to a community with `role` on an admin's authority,
	/// regardless of join policy. A pending join request for the pair is
	/// approved in the same write.
	///
	/// # Errors
	/// - `Forbidden` unless `approver` holds `ADMIN` in the community
	/// - `NotFound` if the community or the user does not exist
	/// - `Conflict` if the user is already a member
	#[instrument(
		level = "debug",
		skip(self, approver),
		fields(user_id = %user_id, community_id = %community_id, role = %role)
	)]
	pub async fn approve(
		&self,
		approver: &[Membership],
		user_id: UserId,
		community_id: CommunityId,
		role: CommunityRole,
	) -> Result<Membership, CommunityError> {
		let handled_by = authorize(approver, community_id, Action::ApproveMember)?;
		self.require_community(community_id).await?;
		if self.store.get_user(user_id).await?.is_none() {
			return Err(CommunityError::NotFound(format!("user {user_id}")));
		}

		let membership = Membership::new(user_id, community_id, role);
		self.store
			.insert_membership_approving_request(&membership, handled_by)
			.await?;
		Ok(membership)
	}

	/// Changes an existing member's role.
	///
	/// # Errors
	/// - `Forbidden` unless `approver` holds `ADMIN` in the community
	/// - `NotFound` if the user is not a member
	#[instrument(
		level = "debug",
		skip(self, approver),
		fields(user_id = %user_id, community_id = %community_id, role = %role)
	)]
	pub async fn change_role(
		&self,
		approver: &[Membership],
		user_id: UserId,
		community_id: CommunityId,
		role: CommunityRole,
	) -> Result<Membership, CommunityError> {
		authorize(approver, community_id, Action::ChangeRole)?;

		if !self
			.store
			.update_membership_role(user_id, community_id, role)
			.await?
		{
			return Err(membership_not_found());
		}

		self.store
			.get_membership(user_id, community_id)
			.await?
			.ok_or_else(membership_not_found)
	}

	/// Removes a member. Nothing is retained; the user may join or be
	/// approved again afterwards.
	///
	/// # Errors
	/// - `Forbidden` unless `approver` holds `ADMIN` in the community
	/// - `NotFound` if the user is not a member
	#[instrument(level = "debug", skip(self, approver), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn remove(
		&self,
		approver: &[Membership],
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<(), CommunityError> {
		authorize(approver, community_id, Action::RemoveMember)?;
		self.delete(user_id, community_id).await
	}

	/// Removes the caller's own membership.
	#[instrument(level = "debug", skip(self), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn leave(&self, user_id: UserId, community_id: CommunityId) -> Result<(), CommunityError> {
		self.delete(user_id, community_id).await
	}

	/// Files a join request for an `APPROVAL_REQUIRED` community.
	///
	/// # Errors
	/// - `NotFound` if the community does not exist
	/// - `PolicyViolation` if the community does not take requests
	/// - `Conflict` if the user is already a member or already has a pending request
	#[instrument(level = "debug", skip(self), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn request_to_join(
		&self,
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<JoinRequest, CommunityError> {
		let community = self.require_community(community_id).await?;
		if !community.join_policy.accepts_join_requests() {
			return Err(CommunityError::PolicyViolation(format!(
				"community '{}' is {}; join requests are not accepted",
				community.slug, community.join_policy
			)));
		}

		if self
			.store
			.get_membership(user_id, community_id)
			.await?
			.is_some()
		{
			return Err(CommunityError::Conflict(
				"user is already a member of this community".to_string(),
			));
		}

		let request = JoinRequest::new(community_id, user_id);
		self.store.insert_join_request(&request).await?;
		Ok(request)
	}

	/// Rejects a user's pending join request.
	///
	/// # Errors
	/// - `Forbidden` unless `approver` holds `ADMIN` in the community
	/// - `NotFound` if no request is pending
	#[instrument(level = "debug", skip(self, approver), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn reject(
		&self,
		approver: &[Membership],
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<(), CommunityError> {
		let handled_by = authorize(approver, community_id, Action::ApproveMember)?;

		if !self
			.store
			.resolve_join_request(user_id, community_id, JoinRequestStatus::Rejected, handled_by)
			.await?
		{
			return Err(CommunityError::NotFound("pending join request".to_string()));
		}
		Ok(())
	}

	#[instrument(level = "debug", skip(self), fields(user_id = %user_id, community_id = %community_id))]
	pub async fn find_membership(
		&self,
		user_id: UserId,
		community_id: CommunityId,
	) -> Result<Membership, CommunityError> {
		self.store
			.get_membership(user_id, community_id)
			.await?
			.ok_or_else(membership_not_found)
	}

	async fn require_community(&self, community_id: CommunityId) -> Result<Community, CommunityError> {
		self.store
			.get_community(community_id)
			.await?
			.ok_or_else(|| CommunityError::NotFound(format!("community {community_id}")))
	}

	async fn delete(&self, user_id: UserId, community_id: CommunityId) -> Result<(), CommunityError> {
		if !self.store.delete_membership(user_id, community_id).await? {
			return Err(membership_not_found());
		}
		Ok(())
	}
}

/// Runs the policy check for an admin action and returns the acting admin's id.
fn authorize(
	approver: &[Membership],
	community_id: CommunityId,
	action: Action,
) -> Result<UserId, CommunityError> {
	policy::can(approver, Some(community_id), action)
		.into_result()
		.map_err(CommunityError::Forbidden)?;

	approver
		.iter()
		.find(|m| m.community_id == community_id)
		.map(|m| m.user_id)
		.ok_or_else(|| CommunityError::Forbidden(policy::DenyReason::not_admin_of_community()))
}

fn membership_not_found() -> CommunityError {
	CommunityError::NotFound("membership".to_string())
}
