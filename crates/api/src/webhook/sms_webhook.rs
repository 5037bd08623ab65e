use super::handle_inbound_reply::HandleInboundReplyUseCase;
use crate::shared::usecase::execute;
use actix_web::{web, HttpRequest, HttpResponse};
use rsvp_scheduler_api_structs::sms_webhook::*;
use rsvp_scheduler_api_structs::WebhookAck;
use rsvp_scheduler_domain::{DeliveryChannel, InboundReply};
use rsvp_scheduler_infra::RsvpContext;
use tracing::warn;

/// 019SMS forwards replies as query parameters
pub async fn sms_webhook_get_controller(
    http_req: HttpRequest,
    ctx: web::Data<RsvpContext>,
) -> HttpResponse {
    let sms = web::Query::<QueryParams>::from_query(http_req.query_string())
        .map(|q| q.into_inner())
        .unwrap_or_default();

    HttpResponse::Ok().json(WebhookAck::new(handle_sms(sms, &ctx).await))
}

/// Same as the GET variant but with a JSON or form encoded body
pub async fn sms_webhook_post_controller(
    http_req: HttpRequest,
    body: web::Bytes,
    ctx: web::Data<RsvpContext>,
) -> HttpResponse {
    let sms = parse_body(&body).unwrap_or_else(|| {
        web::Query::<QueryParams>::from_query(http_req.query_string())
            .map(|q| q.into_inner())
            .unwrap_or_default()
    });

    HttpResponse::Ok().json(WebhookAck::new(handle_sms(sms, &ctx).await))
}

fn parse_body(body: &[u8]) -> Option<InboundSms> {
    if body.is_empty() {
        return None;
    }
    if let Ok(sms) = serde_json::from_slice::<RequestBody>(body) {
        return Some(sms);
    }
    let form = std::str::from_utf8(body).ok()?;
    match web::Query::<RequestBody>::from_query(form) {
        Ok(sms) => Some(sms.into_inner()),
        Err(e) => {
            warn!("Unreadable SMS callback: {}", e);
            None
        }
    }
}

async fn handle_sms(sms: InboundSms, ctx: &RsvpContext) -> String {
    let (phone, text) = match (sms.msisdn, sms.msg) {
        (Some(phone), Some(text)) => (phone, text),
        _ => return "Ignored SMS without sender or text".into(),
    };

    let usecase = HandleInboundReplyUseCase {
        phone,
        reply: InboundReply::Text(text),
        channel: DeliveryChannel::Sms,
    };
    match execute(usecase, ctx).await {
        Ok(handled) => format!("Reply processed: {:?}", handled.outcome),
        Err(e) => e.describe(),
    }
}
