use crate::phone::PhoneNumber;
use crate::shared::entity::ID;
use chrono::{Duration, NaiveDate};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Number of signature bytes kept in the token
const SIGNATURE_LEN: usize = 16;

/// Longest time a link stays valid after the event
pub const MAX_RSVP_TOKEN_TTL_DAYS: i64 = 365;

/// Signed and expiring token embedded in the personal RSVP link of a `Guest`.
///
/// Format: `{expires_at_unix_secs}.{hex signature}`, where the signature is an
/// HMAC-SHA256 over the guest id, phone, event id and expiry.
pub struct RsvpToken;

#[derive(Error, Debug, PartialEq)]
pub enum InvalidRsvpToken {
    #[error("Token is malformed")]
    Malformed,
    #[error("Token has expired")]
    Expired,
    #[error("Token signature does not match")]
    BadSignature,
}

impl RsvpToken {
    pub fn issue(
        secret: &str,
        guest_id: &ID,
        phone: &PhoneNumber,
        event_id: &ID,
        expires_at: i64,
    ) -> String {
        let mac = Self::mac(secret, guest_id, phone, event_id, expires_at);
        let signature = mac.finalize().into_bytes();
        format!("{}.{}", expires_at, to_hex(&signature[..SIGNATURE_LEN]))
    }

    pub fn verify(
        secret: &str,
        token: &str,
        guest_id: &ID,
        phone: &PhoneNumber,
        event_id: &ID,
        now_secs: i64,
    ) -> Result<(), InvalidRsvpToken> {
        let (expires_at, signature) = token.split_once('.').ok_or(InvalidRsvpToken::Malformed)?;
        let expires_at = expires_at
            .parse::<i64>()
            .map_err(|_| InvalidRsvpToken::Malformed)?;
        let signature = from_hex(signature).ok_or(InvalidRsvpToken::Malformed)?;
        if signature.len() != SIGNATURE_LEN {
            return Err(InvalidRsvpToken::Malformed);
        }

        Self::mac(secret, guest_id, phone, event_id, expires_at)
            .verify_truncated_left(&signature)
            .map_err(|_| InvalidRsvpToken::BadSignature)?;

        if now_secs > expires_at {
            return Err(InvalidRsvpToken::Expired);
        }
        Ok(())
    }

    /// Links stay valid for `ttl_days` after the event, or after issuing
    /// when the event date is not known yet
    pub fn expiry(event_date: Option<NaiveDate>, now_secs: i64, ttl_days: i64) -> i64 {
        let ttl_days = ttl_days.clamp(0, MAX_RSVP_TOKEN_TTL_DAYS);
        match event_date.and_then(|date| date.and_hms_opt(23, 59, 59)) {
            Some(end_of_event) => (end_of_event + Duration::days(ttl_days))
                .and_utc()
                .timestamp(),
            None => now_secs + Duration::days(ttl_days).num_seconds(),
        }
    }

    fn mac(
        secret: &str,
        guest_id: &ID,
        phone: &PhoneNumber,
        event_id: &ID,
        expires_at: i64,
    ) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC can take key of any size"));
        mac.update(format!("{}|{}|{}|{}", guest_id, phone, event_id, expires_at).as_bytes());
        mac
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
