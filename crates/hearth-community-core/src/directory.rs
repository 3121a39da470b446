// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Community lookup and creation.

use std::sync::Arc;

use tracing::instrument;

use crate::community::{Community, CommunitySummary, NewCommunity};
use crate::error::CommunityError;
use crate::membership::{JoinRequest, Membership};
use crate::policy::{self, Action};
use crate::role::CommunityRole;
use crate::store::{CommunityStore, MembershipStore};
use crate::types::{CommunityId, UserId};
use crate::user::MemberProfile;

pub struct CommunityDirectory<S: ?Sized> {
	store: Arc<S>,
}

impl<S: ?Sized> Clone for CommunityDirectory<S> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
		}
	}
}

impl<S> CommunityDirectory<S>
where
	S: CommunityStore + MembershipStore + ?Sized,
{
	pub fn new(store: Arc<S>) -> Self {
		Self { store }
	}

	/// Looks up a community by slug along with its member and post counts.
	#[instrument(level = "debug", skip(self))]
	pub async fn find_by_slug(&self, slug: &str) -> Result<CommunitySummary, CommunityError> {
		let community = self
			.store
			.get_community_by_slug(slug)
			.await?
			.ok_or_else(|| CommunityError::NotFound(format!("community '{slug}'")))?;

		let counts = self.store.community_counts(community.id).await?;
		Ok(CommunitySummary::new(community, counts))
	}

	#[instrument(level = "debug", skip(self), fields(community_id = %id))]
	pub async fn find_by_id(&self, id: CommunityId) -> Result<Community, CommunityError> {
		self.store
			.get_community(id)
			.await?
			.ok_or_else(|| CommunityError::NotFound(format!("community {id}")))
	}

	/// Members ordered by join time, then user id.
	#[instrument(level = "debug", skip(self), fields(community_id = %community_id))]
	pub async fn list_members(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<Membership>, CommunityError> {
		self.find_by_id(community_id).await?;
		Ok(self.store.list_memberships(community_id).await?)
	}

	/// Members with their user profiles, in [`Self::list_members`] order.
	#[instrument(level = "debug", skip(self), fields(community_id = %community_id))]
	pub async fn list_member_profiles(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<MemberProfile>, CommunityError> {
		self.find_by_id(community_id).await?;
		Ok(self.store.list_member_profiles(community_id).await?)
	}

	/// The full membership set of a user, as passed to [`policy::can`].
	#[instrument(level = "debug", skip(self), fields(user_id = %user_id))]
	pub async fn memberships_for_user(
		&self,
		user_id: UserId,
	) -> Result<Vec<Membership>, CommunityError> {
		Ok(self.store.memberships_for_user(user_id).await?)
	}

	/// Creates a community with `creator` as its first admin.
	///
	/// # Errors
	/// - `Forbidden` unless `actor` holds the platform admin capability
	/// - `Validation` if the slug or name is malformed
	/// - `Conflict` if the slug is taken
	#[instrument(level = "debug", skip(self, actor, new), fields(creator = %creator, slug = %new.slug))]
	pub async fn create_community(
		&self,
		actor: &[Membership],
		creator: UserId,
		mut new: NewCommunity,
	) -> Result<Community, CommunityError> {
		policy::can(actor, None, Action::CreateCommunity)
			.into_result()
			.map_err(CommunityError::Forbidden)?;

		new.validate()?;

		let community = Community::from_new(new);
		let admin = Membership {
			user_id: creator,
			community_id: community.id,
			role: CommunityRole::Admin,
			created_at: community.created_at,
		};
		self.store
			.create_community_with_admin(&community, &admin)
			.await?;
		Ok(community)
	}

	/// Pending join requests, oldest first.
	#[instrument(level = "debug", skip(self), fields(community_id = %community_id))]
	pub async fn pending_join_requests(
		&self,
		community_id: CommunityId,
	) -> Result<Vec<JoinRequest>, CommunityError> {
		self.find_by_id(community_id).await?;
		Ok(self.store.list_pending_join_requests(community_id).await?)
	}
}
