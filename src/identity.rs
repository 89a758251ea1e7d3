//! User id from a bearer token.
//!
//! Only the payload segment of the JWT is read. The signature is not checked
//! here; the GraphQL endpoint does that on every request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

use crate::errors::IdentityError;

/// Decode the claims object in the middle segment of `token`.
///
/// Accepts base64url with or without `=` padding, and tolerates the standard
/// alphabet (`+`, `/`).
pub fn decode_claims(token: &str) -> Result<Map<String, Value>, IdentityError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(IdentityError::Empty);
    }

    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(IdentityError::Malformed {
            segments: segments.len(),
        });
    };

    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Numeric user id from the `sub` claim.
///
/// The platform issues `sub` as a decimal string; a JSON number is accepted
/// too.
pub fn user_id_from_token(token: &str) -> Result<i64, IdentityError> {
    let claims = decode_claims(token)?;
    let user_id = match claims.get("sub") {
        None | Some(Value::Null) => return Err(IdentityError::MissingSubject),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    };
    let user_id = user_id.ok_or_else(|| IdentityError::InvalidSubject {
        value: claims.get("sub").map(Value::to_string).unwrap_or_default(),
    })?;

    crate::log::debug!(user_id, "decoded token subject");
    Ok(user_id)
}
