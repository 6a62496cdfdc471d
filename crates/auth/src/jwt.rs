//! ID token validation against the provider's JWKS

use jsonwebtoken::{decode, decode_header, jwk::JwkSet, DecodingKey, Validation};

use crate::claims::IdentityClaims;
use crate::error::AuthError;

/// Validate an ID token: signature by a key in `jwks`, issuer and audience.
pub(crate) fn validate_id_token(
    token: &str,
    jwks: &JwkSet,
    issuer: &str,
    audience: &str,
) -> Result<IdentityClaims, AuthError> {
    let header = decode_header(token).map_err(|e| {
        tracing::debug!(error = %e, "ID token header could not be decoded");
        AuthError::InvalidToken("malformed header".to_string())
    })?;

    let jwk = match header.kid.as_deref() {
        Some(kid) => jwks.find(kid),
        // Single-key sets are allowed to omit `kid`
        None if jwks.keys.len() == 1 => jwks.keys.first(),
        None => None,
    }
    .ok_or_else(|| AuthError::InvalidToken("signing key not found in JWKS".to_string()))?;

    let decoding_key = DecodingKey::from_jwk(jwk)
        .map_err(|e| AuthError::InvalidToken(format!("unusable JWK: {}", e)))?;

    let mut validation = Validation::new(header.alg);
    validation.set_audience(&[audience]);
    validation.set_issuer(&[issuer]);

    let token_data = decode::<IdentityClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "ID token validation failed");
        AuthError::InvalidToken(e.to_string())
    })?;

    Ok(token_data.claims)
}
