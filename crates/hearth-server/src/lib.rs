// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hearth community server.
//!
//! HTTP handlers over `hearth-community-core`, backed by the SQLite
//! repositories of `hearth-server-db`.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod error;
pub mod routes;
pub mod token;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ApiError;
pub use hearth_server_config::ServerConfig;
pub use token::{issue_token, verify_token, TokenError};
