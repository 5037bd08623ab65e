//! The personal RSVP page a guest reaches through the link in an invitation.

mod get_rsvp_details;
mod submit_rsvp;

use actix_web::web;
use get_rsvp_details::get_rsvp_details_controller;
use rsvp_scheduler_domain::{Event, Guest, InvalidRsvpToken, RsvpToken, ID};
use rsvp_scheduler_infra::{Config, RsvpContext};
use submit_rsvp::submit_rsvp_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/rsvp/{guest_id}", web::get().to(get_rsvp_details_controller));
    cfg.route("/rsvp/{guest_id}", web::post().to(submit_rsvp_controller));
}

/// Link with a signed token that lets the guest answer without an account
pub fn personal_rsvp_link(config: &Config, guest: &Guest, event: &Event, now_secs: i64) -> String {
    let expires_at = RsvpToken::expiry(event.date, now_secs, config.rsvp_token_ttl_days);
    let token = RsvpToken::issue(
        &config.rsvp_token_secret,
        &guest.id,
        &guest.phone,
        &event.id,
        expires_at,
    );
    format!("{}/{}?token={}", config.rsvp_link_base_url, guest.id, token)
}

#[derive(Debug, PartialEq)]
pub enum RsvpAccessError {
    GuestNotFound(ID),
    InvalidToken(InvalidRsvpToken),
}

/// Loads the guest and its event when the token was issued for this guest
async fn authorize_guest(
    ctx: &RsvpContext,
    guest_id: &ID,
    token: &str,
) -> Result<(Guest, Event), RsvpAccessError> {
    let guest = ctx
        .repos
        .guests
        .find(guest_id)
        .await
        .ok_or_else(|| RsvpAccessError::GuestNotFound(guest_id.clone()))?;
    let event = ctx
        .repos
        .events
        .find(&guest.event_id)
        .await
        .ok_or_else(|| RsvpAccessError::GuestNotFound(guest_id.clone()))?;

    RsvpToken::verify(
        &ctx.config.rsvp_token_secret,
        token,
        &guest.id,
        &guest.phone,
        &event.id,
        ctx.sys.get_timestamp_millis() / 1000,
    )
    .map_err(RsvpAccessError::InvalidToken)?;

    Ok((guest, event))
}
