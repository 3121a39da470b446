// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization policy for community actions.
//!
//! # Example
//!
//! ```
//! use hearth_community_core::policy::{can, Action, Decision};
//! use hearth_community_core::{CommunityId, CommunityRole, Membership, UserId};
//!
//! let user = UserId::generate();
//! let community = CommunityId::generate();
//! let memberships = vec![Membership::new(user, community, CommunityRole::Admin)];
//!
//! assert_eq!(can(&memberships, Some(community), Action::ApproveMember), Decision::Allow);
//! ```

mod engine;
mod types;

pub use engine::{can, capabilities, has_capability, role_in};
pub use types::{Action, Capability, Decision, DenyCode, DenyReason};
