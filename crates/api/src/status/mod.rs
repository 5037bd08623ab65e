use actix_web::{web, HttpResponse};
use rsvp_scheduler_api_structs::get_service_health::*;
use rsvp_scheduler_infra::RsvpContext;

async fn status(ctx: web::Data<RsvpContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        timestamp: ctx.sys.get_timestamp_millis(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
