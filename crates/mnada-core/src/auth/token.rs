//! Role claim decoding for stored credentials.
//!
//! Credentials are `header.payload.signature` strings. Only the payload is read
//! here; the signature is never verified client-side, the server does that on
//! every request.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

use super::Role;

/// Accepts padded or unpadded input so both `atob`-style and base64url tokens decode.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const SEGMENT_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token format: expected 3 segments, found {0}")]
    SegmentCount(usize),
    #[error("invalid base64 payload")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid json payload")]
    Json(#[from] serde_json::Error),
    #[error("unknown role claim: {0}")]
    UnknownRole(String),
}

#[derive(Debug, Deserialize)]
struct Claims {
    role: String,
}

/// Decode the role claim carried in a credential's payload segment.
pub fn decode_role(credential: &str) -> Result<Role, TokenError> {
    let segments: Vec<&str> = credential.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    let payload = decode_segment(segments[1])?;
    let claims: Claims = serde_json::from_slice(&payload)?;

    Role::from_claim(&claims.role).ok_or(TokenError::UnknownRole(claims.role))
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    // base64url -> standard alphabet
    let normalized: String = segment
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    PAYLOAD_ENGINE.decode(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_padded_payload() {
        let role = decode_role("header.eyJyb2xlIjoiYWRtaW4ifQ==.sig").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_decode_unpadded_payload() {
        let role = decode_role("h.eyJyb2xlIjoiY2xpZW50In0.s").unwrap();
        assert_eq!(role, Role::Client);
    }

    #[test]
    fn test_decode_ignores_extra_claims() {
        // {"role":"auctioneer","sub":"ann"}
        let role = decode_role("h.eyJyb2xlIjoiYXVjdGlvbmVlciIsInN1YiI6ImFubiJ9.s").unwrap();
        assert_eq!(role, Role::Auctioneer);
    }

    #[test]
    fn test_segment_count_mismatch() {
        for token in ["", "abc", "a.b", "a.b.c.d", "eyJyb2xlIjoiYWRtaW4ifQ=="] {
            assert!(
                matches!(decode_role(token), Err(TokenError::SegmentCount(_))),
                "expected segment error for {token:?}"
            );
        }
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(decode_role("h.!!!!.s"), Err(TokenError::Base64(_))));
    }

    #[test]
    fn test_invalid_json() {
        // "not json"
        assert!(matches!(decode_role("h.bm90IGpzb24=.s"), Err(TokenError::Json(_))));
    }

    #[test]
    fn test_missing_role_claim() {
        // {"sub":"x"}
        assert!(matches!(decode_role("h.eyJzdWIiOiJ4In0=.s"), Err(TokenError::Json(_))));
    }

    #[test]
    fn test_unknown_role_claim() {
        // {"role":"bidder"}
        let token = format!("h.{}.s", PAYLOAD_ENGINE.encode(br#"{"role":"bidder"}"#));
        assert!(matches!(decode_role(&token), Err(TokenError::UnknownRole(r)) if r == "bidder"));
    }

    #[test]
    fn test_url_safe_alphabet() {
        // Payload whose standard encoding contains '+' and '/'
        let json = br#"{"role":"client","n":">>>???"}"#;
        let encoded = PAYLOAD_ENGINE
            .encode(json)
            .replace('+', "-")
            .replace('/', "_")
            .trim_end_matches('=')
            .to_string();
        assert_eq!(decode_role(&format!("h.{encoded}.s")).unwrap(), Role::Client);
    }
}
