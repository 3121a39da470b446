// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer tokens of the form `<user-uuid>.<hex hmac-sha256(user-uuid)>`.
//!
//! Tokens are minted by the external login system with the shared auth
//! secret; the server only verifies them.

use hearth_community_core::UserId;
use hearth_server_config::SecretString;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
	#[error("malformed token")]
	Malformed,

	#[error("invalid token signature")]
	InvalidSignature,

	#[error("unusable signing key")]
	Key,
}

fn mac_for(secret: &SecretString, user_id: &str) -> Result<HmacSha256, TokenError> {
	let mut mac =
		HmacSha256::new_from_slice(secret.expose().as_bytes()).map_err(|_| TokenError::Key)?;
	mac.update(user_id.as_bytes());
	Ok(mac)
}

/// Sign a token for `user_id`.
pub fn issue_token(secret: &SecretString, user_id: UserId) -> Result<String, TokenError> {
	let subject = user_id.to_string();
	let signature = hex::encode(mac_for(secret, &subject)?.finalize().into_bytes());
	Ok(format!("{subject}.{signature}"))
}

/// Check a token's signature and return the user it names.
///
/// The comparison is constant time.
pub fn verify_token(secret: &SecretString, token: &str) -> Result<UserId, TokenError> {
	let (subject, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
	let user_id: UserId = subject.parse().map_err(|_| TokenError::Malformed)?;
	let expected = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

	mac_for(secret, subject)?
		.verify_slice(&expected)
		.map_err(|_| TokenError::InvalidSignature)?;
	Ok(user_id)
}
