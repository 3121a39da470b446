// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Community membership and authorization core for Hearth.
//!
//! This crate decides who may read and change a community and its members:
//!
//! - **Roles**: [`CommunityRole`] with a total order, `MEMBER < ADMIN`
//! - **Lifecycle**: [`MembershipLifecycle`] joins, approves, re-roles and removes members
//! - **Policy**: [`policy::can`] answers allow or deny for an actor's membership set
//! - **Directory**: [`CommunityDirectory`] looks communities and members up
//!
//! Persistence is supplied through the traits in [`store`]; the services hold
//! it behind an `Arc` handed in at construction.
//!
//! # Example
//!
//! ```
//! use hearth_community_core::{CommunityRole, has_at_least};
//!
//! assert!(has_at_least(CommunityRole::Admin, CommunityRole::Member));
//! assert!(!has_at_least(CommunityRole::Member, CommunityRole::Admin));
//! ```

pub mod community;
pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod membership;
pub mod policy;
pub mod post;
pub mod role;
pub mod store;
pub mod types;
pub mod user;


pub use community::{
	validate_slug, Community, CommunityCounts, CommunitySummary, NewCommunity, SLUG_MAX_LEN,
	SLUG_MIN_LEN,
};
pub use directory::CommunityDirectory;
pub use error::{CommunityError, StoreError};
pub use lifecycle::MembershipLifecycle;
pub use membership::{sort_memberships, JoinRequest, Membership};
pub use policy::{Action, Capability, Decision, DenyCode, DenyReason};
pub use post::{
	effective_limit, Paging, Post, PostCommunity, PostFeed, PostFilter, PostListing, PostPage,
	DEFAULT_POST_LIMIT, MAX_POST_LIMIT,
};
pub use role::{has_at_least, CommunityRole};
pub use store::{CommunityStore, MembershipStore, PostStore, UserStore};
pub use types::{
	CommunityId, JoinPolicy, JoinRequestId, JoinRequestStatus, PostId, UnknownVariant, UserId,
	UserStatus,
};
pub use user::{MemberProfile, User, UserSummary};
