// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for hearth-server, served at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hearth Server API",
        version = "1.0.0",
        description = "Community membership and authorization API.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Liveness and database health"),
        (name = "communities", description = "Community lookup, creation and member listing"),
        (name = "memberships", description = "Joining, leaving and member administration"),
        (name = "posts", description = "Read-only post listings")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::communities::get_community_by_slug,
        crate::routes::communities::create_community,
        crate::routes::communities::list_members,
        crate::routes::communities::join_community,
        crate::routes::communities::leave_community,
        crate::routes::communities::request_to_join,
        crate::routes::communities::list_join_requests,
        crate::routes::communities::approve_member,
        crate::routes::communities::reject_member,
        crate::routes::communities::change_member_role,
        crate::routes::communities::remove_member,
        crate::routes::posts::list_posts,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::error::ErrorDetail,
        crate::routes::communities::ApproveMemberRequest,
        crate::routes::communities::RejectMemberRequest,
        crate::routes::communities::ChangeRoleRequest,
        hearth_community_core::Paging,
        hearth_community_core::PostCommunity,
    ))
)]
pub struct ApiDoc;
