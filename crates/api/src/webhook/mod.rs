mod gupshup_webhook;
mod handle_inbound_reply;
mod sms_webhook;

use actix_web::web;
use gupshup_webhook::gupshup_webhook_controller;
use sms_webhook::{sms_webhook_get_controller, sms_webhook_post_controller};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/webhooks/gupshup",
        web::post().to(gupshup_webhook_controller),
    );
    cfg.route("/webhooks/sms", web::get().to(sms_webhook_get_controller));
    cfg.route("/webhooks/sms", web::post().to(sms_webhook_post_controller));
}
