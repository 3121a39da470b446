// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for Hearth.
//!
//! Repositories hold a cloned [`sqlx::SqlitePool`] and implement the storage
//! traits of `hearth-community-core`.

pub mod community;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod post;
mod rows;
pub mod user;


pub use community::CommunityRepository;
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::{create_pool, health_check};
pub use post::PostRepository;
pub use user::UserRepository;
