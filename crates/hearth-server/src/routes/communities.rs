// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Community and membership HTTP handlers.
//!
//! Every mutating handler loads the caller's full membership set and hands it
//! to the core, which evaluates policy before touching storage.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use hearth_community_core::{
	policy::{self, Action},
	Community, CommunityError, CommunityRole, CommunitySummary, JoinRequest, MemberProfile,
	Membership, NewCommunity, UserId,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
	api::AppState,
	api_response::{created, ok},
	auth_middleware::{CurrentUser, RequireAuth},
	error::{ApiError, ErrorResponse},
	validation::{parse_community_id, parse_user_id, validate_slug, ApiJson, ApiPath},
};

/// Body of `POST /api/communities/{id}/members/approve`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveMemberRequest {
	pub user_id: UserId,
	/// Defaults to `MEMBER`.
	#[serde(default)]
	pub role: Option<CommunityRole>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectMemberRequest {
	pub user_id: UserId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
	pub role: CommunityRole,
}

async fn actor_memberships(
	state: &AppState,
	current_user: &CurrentUser,
) -> Result<Vec<Membership>, ApiError> {
	Ok(state
		.directory
		.memberships_for_user(current_user.user.id)
		.await?)
}

#[utoipa::path(
    get,
    path = "/api/communities/{id}",
    params(
        ("id" = String, Path, description = "Community slug")
    ),
    responses(
        (status = 200, description = "Community with member and post counts", body = CommunitySummary),
        (status = 400, description = "Malformed slug", body = ErrorResponse),
        (status = 404, description = "Community not found", body = ErrorResponse)
    ),
    tag = "communities"
)]
/// Look a community up by slug.
#[tracing::instrument(skip(state))]
pub async fn get_community_by_slug(
	State(state): State<AppState>,
	ApiPath(slug): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
	validate_slug(&slug)?;
	let summary = state.directory.find_by_slug(&slug).await?;
	Ok(ok(summary))
}

#[utoipa::path(
    post,
    path = "/api/communities",
    request_body = NewCommunity,
    responses(
        (status = 201, description = "Community created; the caller is its first admin", body = Community),
        (status = 400, description = "Invalid slug or name", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not a platform admin", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse)
    ),
    tag = "communities"
)]
/// Create a community.
///
/// # Authorization
/// Requires an ADMIN membership in any community.
#[tracing::instrument(skip(state, current_user, body), fields(user_id = %current_user.user.id, slug = %body.slug))]
pub async fn create_community(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(body): ApiJson<NewCommunity>,
) -> Result<impl IntoResponse, ApiError> {
	let actor = actor_memberships(&state, &current_user).await?;
	let community = state
		.directory
		.create_community(&actor, current_user.user.id, body)
		.await?;

	tracing::info!(community_id = %community.id, slug = %community.slug, "community created");
	Ok(created(community))
}

#[utoipa::path(
    get,
    path = "/api/communities/{id}/members",
    params(
        ("id" = String, Path, description = "Community ID")
    ),
    responses(
        (status = 200, description = "Members ordered by join time", body = [MemberProfile]),
        (status = 400, description = "Malformed community ID", body = ErrorResponse),
        (status = 404, description = "Community not found", body = ErrorResponse)
    ),
    tag = "communities"
)]
/// List a community's members with their profiles.
#[tracing::instrument(skip(state))]
pub async fn list_members(
	State(state): State<AppState>,
	ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
	let community_id = parse_community_id(&id)?;
	policy::can(&[], Some(community_id), Action::ListMembers)
		.into_result()
		.map_err(CommunityError::Forbidden)?;

	let members = state.directory.list_member_profiles(community_id).await?;
	Ok(ok(members))
}

#[utoipa::path(
    post,
    path = "/api/communities/{id}/join",
    params(
        ("id" = String, Path, description = "Community ID")
    ),
    responses(
        (status = 201, description = "Joined as MEMBER", body = Membership),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Community not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
        (status = 422, description = "Community is not open", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// Join an open community.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn join_community(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
	let community_id = parse_community_id(&id)?;
	let membership = state
		.lifecycle
		.join(current_user.user.id, community_id)
		.await?;
	Ok(created(membership))
}

#[utoipa::path(
    delete,
    path = "/api/communities/{id}/membership",
    params(
        ("id" = String, Path, description = "Community ID")
    ),
    responses(
        (status = 204, description = "Left the community"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Not a member", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// Leave a community.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn leave_community(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
	let community_id = parse_community_id(&id)?;
	state
		.lifecycle
		.leave(current_user.user.id, community_id)
		.await?;
	Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/communities/{id}/join-requests",
    params(
        ("id" = String, Path, description = "Community ID")
    ),
    responses(
        (status = 201, description = "Join request recorded", body = JoinRequest),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Community not found", body = ErrorResponse),
        (status = 409, description = "Already a member or a request is pending", body = ErrorResponse),
        (status = 422, description = "Community does not take join requests", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// Ask to join an approval-required community.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn request_to_join(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
	let community_id = parse_community_id(&id)?;
	let request = state
		.lifecycle
		.request_to_join(current_user.user.id, community_id)
		.await?;
	Ok(created(request))
}

#[utoipa::path(
    get,
    path = "/api/communities/{id}/join-requests",
    params(
        ("id" = String, Path, description = "Community ID")
    ),
    responses(
        (status = 200, description = "Pending join requests, oldest first", body = [JoinRequest]),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin of the community", body = ErrorResponse),
        (status = 404, description = "Community not found", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// List pending join requests.
///
/// # Authorization
/// Requires ADMIN in the community.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn list_join_requests(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
	let community_id = parse_community_id(&id)?;
	let actor = actor_memberships(&state, &current_user).await?;
	policy::can(&actor, Some(community_id), Action::ApproveMember)
		.into_result()
		.map_err(CommunityError::Forbidden)?;

	let pending = state.directory.pending_join_requests(community_id).await?;
	Ok(ok(pending))
}

#[utoipa::path(
    post,
    path = "/api/communities/{id}/members/approve",
    params(
        ("id" = String, Path, description = "Community ID")
    ),
    request_body = ApproveMemberRequest,
    responses(
        (status = 201, description = "Membership created", body = Membership),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin of the community", body = ErrorResponse),
        (status = 404, description = "Community not found", body = ErrorResponse),
        (status = 409, description = "User is already a member", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// Admit a user to a community with the given role.
///
/// Any pending join request from the user is marked approved.
#[tracing::instrument(skip(state, current_user, body), fields(user_id = %current_user.user.id, target_user_id = %body.user_id))]
pub async fn approve_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<String>,
	ApiJson(body): ApiJson<ApproveMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let community_id = parse_community_id(&id)?;
	let actor = actor_memberships(&state, &current_user).await?;
	let role = body.role.unwrap_or(CommunityRole::Member);

	let membership = state
		.lifecycle
		.approve(&actor, body.user_id, community_id, role)
		.await?;

	tracing::info!(%community_id, target_user_id = %body.user_id, %role, "member approved");
	Ok(created(membership))
}

#[utoipa::path(
    post,
    path = "/api/communities/{id}/members/reject",
    params(
        ("id" = String, Path, description = "Community ID")
    ),
    request_body = RejectMemberRequest,
    responses(
        (status = 204, description = "Join request rejected"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin of the community", body = ErrorResponse),
        (status = 404, description = "No pending join request", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// Reject a pending join request.
#[tracing::instrument(skip(state, current_user, body), fields(user_id = %current_user.user.id, target_user_id = %body.user_id))]
pub async fn reject_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath(id): ApiPath<String>,
	ApiJson(body): ApiJson<RejectMemberRequest>,
) -> Result<StatusCode, ApiError> {
	let community_id = parse_community_id(&id)?;
	let actor = actor_memberships(&state, &current_user).await?;
	state
		.lifecycle
		.reject(&actor, body.user_id, community_id)
		.await?;
	Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/communities/{id}/members/{user_id}",
    params(
        ("id" = String, Path, description = "Community ID"),
        ("user_id" = String, Path, description = "Member's user ID")
    ),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Updated membership", body = Membership),
        (status = 400, description = "Malformed ID or role", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin of the community", body = ErrorResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// Change a member's role.
#[tracing::instrument(skip(state, current_user, body), fields(user_id = %current_user.user.id, role = %body.role))]
pub async fn change_member_role(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((id, target)): ApiPath<(String, String)>,
	ApiJson(body): ApiJson<ChangeRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
	let community_id = parse_community_id(&id)?;
	let target = parse_user_id(&target)?;
	let actor = actor_memberships(&state, &current_user).await?;

	let membership = state
		.lifecycle
		.change_role(&actor, target, community_id, body.role)
		.await?;

	tracing::info!(%community_id, target_user_id = %target, role = %body.role, "member role changed");
	Ok(ok(membership))
}

#[utoipa::path(
    delete,
    path = "/api/communities/{id}/members/{user_id}",
    params(
        ("id" = String, Path, description = "Community ID"),
        ("user_id" = String, Path, description = "Member's user ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin of the community", body = ErrorResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse)
    ),
    tag = "memberships"
)]
/// Remove a member from a community.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn remove_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiPath((id, target)): ApiPath<(String, String)>,
) -> Result<StatusCode, ApiError> {
	let community_id = parse_community_id(&id)?;
	let target = parse_user_id(&target)?;
	let actor = actor_memberships(&state, &current_user).await?;

	state
		.lifecycle
		.remove(&actor, target, community_id)
		.await?;

	tracing::info!(%community_id, target_user_id = %target, "member removed");
	Ok(StatusCode::NO_CONTENT)
}
