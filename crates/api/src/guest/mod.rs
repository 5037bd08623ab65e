mod add_guest;
mod add_guests_bulk;
mod delete_guest;
mod get_event_guests;
mod update_guest;

use actix_web::web;
use add_guest::add_guest_controller;
use add_guests_bulk::add_guests_bulk_controller;
use delete_guest::delete_guest_controller;
use get_event_guests::get_event_guests_controller;
use update_guest::update_guest_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/guests",
        web::post().to(add_guest_controller),
    );
    cfg.route(
        "/events/{event_id}/guests/bulk",
        web::post().to(add_guests_bulk_controller),
    );
    cfg.route(
        "/events/{event_id}/guests",
        web::get().to(get_event_guests_controller),
    );

    cfg.route("/guests/{guest_id}", web::put().to(update_guest_controller));
    cfg.route(
        "/guests/{guest_id}",
        web::delete().to(delete_guest_controller),
    );
}
