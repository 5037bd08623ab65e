mod create_schedules;
mod get_due_messages;
mod get_event_schedules;
pub mod planner;
mod process_due_messages;
mod update_schedules;

use actix_web::web;
use create_schedules::create_schedules_controller;
use get_due_messages::get_due_messages_controller;
use get_event_schedules::get_event_schedules_controller;
use process_due_messages::process_due_messages_controller;
use update_schedules::update_schedules_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/scheduler/process",
        web::post().to(process_due_messages_controller),
    );
    cfg.route("/scheduler/due", web::get().to(get_due_messages_controller));

    cfg.route(
        "/scheduler/events/{event_id}/schedules",
        web::post().to(create_schedules_controller),
    );
    cfg.route(
        "/scheduler/events/{event_id}/schedules",
        web::put().to(update_schedules_controller),
    );
    cfg.route(
        "/scheduler/events/{event_id}/schedules",
        web::get().to(get_event_schedules_controller),
    );
}
