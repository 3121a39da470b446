// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration section.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::secret::SecretString;

/// Deployment environment the server runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
	#[default]
	Development,
	Production,
	Test,
}

impl Environment {
	pub fn as_str(&self) -> &'static str {
		match self {
			Environment::Development => "development",
			Environment::Production => "production",
			Environment::Test => "test",
		}
	}

	pub fn is_production(&self) -> bool {
		matches!(self, Environment::Production)
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Environment {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"development" => Ok(Environment::Development),
			"production" => Ok(Environment::Production),
			"test" => Ok(Environment::Test),
			other => Err(format!(
				"unknown environment '{other}', expected development, production or test"
			)),
		}
	}
}

/// Resolved authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Key used to sign and verify bearer tokens.
	pub secret: SecretString,
	pub environment: Environment,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub secret: Option<SecretString>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.secret.is_some() {
			self.secret = other.secret;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> Result<AuthConfig, ConfigError> {
		let secret = self.secret.ok_or_else(|| {
			ConfigError::Validation(
				"HEARTH_SERVER_AUTH_SECRET (or HEARTH_SERVER_AUTH_SECRET_FILE) must be set"
					.to_string(),
			)
		})?;

		let environment = match self.environment {
			Some(raw) => raw
				.parse()
				.map_err(|message| ConfigError::InvalidValue {
					key: "HEARTH_SERVER_ENV".to_string(),
					message,
				})?,
			None => Environment::default(),
		};

		Ok(AuthConfig {
			secret,
			environment,
		})
	}
}
