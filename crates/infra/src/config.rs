use rsvp_scheduler_domain::{Tz, MAX_RSVP_TOKEN_TTL_DAYS};
use std::ops::RangeInclusive;
use rsvp_scheduler_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret the external cron trigger sends in the `X-Cron-Secret` header
    pub cron_secret: String,
    /// Shared secret for managing events, guests and schedules (`X-Api-Key` header)
    pub api_secret: String,
    /// Key used to sign the personal RSVP links sent to guests
    pub rsvp_token_secret: String,
    /// Public page the RSVP links point to. The guest id and token are appended.
    pub rsvp_link_base_url: String,
    /// Number of days after the event that RSVP links stay valid
    pub rsvp_token_ttl_days: i64,
    /// Timezone that decides what "today" is for the dispatch job
    pub timezone: Tz,
    /// Maximum number of scheduled messages executed per dispatch run.
    /// This bounds the work a single trigger of the job can cause.
    pub dispatch_batch_size: usize,
}

impl Config {
    pub fn new() -> Self {
        let cron_secret = secret_from_env("CRON_SECRET");
        let api_secret = secret_from_env("API_SECRET");
        let rsvp_token_secret = secret_from_env("RSVP_TOKEN_SECRET");

        let default_port = 5000;
        let port = parse_from_env("PORT", default_port, 0..=65535);

        let rsvp_link_base_url = std::env::var("RSVP_LINK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/rsvp".into());

        let default_timezone = chrono_tz::Asia::Jerusalem;
        let timezone = match std::env::var("APP_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given APP_TIMEZONE: {} is not valid, falling back to: {}.",
                        tz, default_timezone
                    );
                    default_timezone
                }
            },
            Err(_) => default_timezone,
        };

        Self {
            port,
            cron_secret,
            api_secret,
            rsvp_token_secret,
            rsvp_link_base_url: rsvp_link_base_url.trim_end_matches('/').to_string(),
            rsvp_token_ttl_days: parse_from_env(
                "RSVP_TOKEN_TTL_DAYS",
                7,
                0..=MAX_RSVP_TOKEN_TTL_DAYS,
            ),
            timezone,
            dispatch_batch_size: parse_from_env(
                "DISPATCH_BATCH_SIZE",
                50,
                1..=MAX_DISPATCH_BATCH_SIZE,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn secret_from_env(var: &str) -> String {
    match std::env::var(var) {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            info!("Did not find {} environment variable. Going to create one.", var);
            let secret = create_random_secret(32);
            info!("{} was generated and set to: {}", var, secret);
            secret
        }
    }
}

const MAX_DISPATCH_BATCH_SIZE: usize = 1000;

fn parse_from_env<T>(var: &str, default: T, bounds: RangeInclusive<T>) -> T
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    parse_value(var, std::env::var(var).ok(), default, bounds)
}

/// Values that do not parse or lie outside of `bounds` fall back to `default`
fn parse_value<T>(var: &str, value: Option<String>, default: T, bounds: RangeInclusive<T>) -> T
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let value = match value {
        Some(value) => value,
        None => return default,
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if bounds.contains(&parsed) => parsed,
        _ => {
            warn!(
                "The given {}: {} is not valid, it must be between {} and {}. Falling back to the default: {}.",
                var,
                value,
                bounds.start(),
                bounds.end(),
                default
            );
            default
        }
    }
}
