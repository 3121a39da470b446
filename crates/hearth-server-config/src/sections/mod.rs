// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod auth;
mod database;
mod http;
mod logging;

pub use auth::{AuthConfig, AuthConfigLayer, Environment};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LogLevel, LoggingConfig, LoggingConfigLayer};

pub(crate) use http::parse_origin_list;
