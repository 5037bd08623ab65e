use super::handle_inbound_reply::HandleInboundReplyUseCase;
use crate::shared::usecase::execute;
use actix_web::{web, HttpResponse};
use rsvp_scheduler_api_structs::gupshup_webhook::*;
use rsvp_scheduler_api_structs::WebhookAck;
use rsvp_scheduler_domain::{DeliveryChannel, InboundReply};
use rsvp_scheduler_infra::RsvpContext;
use tracing::warn;

/// Gupshup retries every callback that is not answered with a 2xx, so this
/// always acknowledges and only reports the outcome in the body.
pub async fn gupshup_webhook_controller(
    body: web::Bytes,
    ctx: web::Data<RsvpContext>,
) -> HttpResponse {
    let message = match serde_json::from_slice::<RequestBody>(&body) {
        Ok(body) => handle_callback(body, &ctx).await,
        Err(e) => {
            warn!("Unreadable Gupshup callback: {}", e);
            "Unrecognized payload".to_string()
        }
    };

    HttpResponse::Ok().json(WebhookAck::new(message))
}

async fn handle_callback(body: RequestBody, ctx: &RsvpContext) -> String {
    if body.event_type != "message" {
        return format!("Ignored {} event", body.event_type);
    }
    let message = match body.payload {
        Some(message) => message,
        None => return "Ignored message without payload".into(),
    };
    let phone = match message.sender_phone() {
        Some(phone) => phone.to_string(),
        None => return "Ignored message without sender".into(),
    };
    let reply = match to_reply(&message) {
        Some(reply) => reply,
        None => return format!("Ignored {} message", message.message_type),
    };

    let usecase = HandleInboundReplyUseCase {
        phone,
        reply,
        channel: DeliveryChannel::WhatsApp,
    };
    match execute(usecase, ctx).await {
        Ok(handled) => format!("Reply processed: {:?}", handled.outcome),
        Err(e) => e.describe(),
    }
}

fn to_reply(message: &InboundMessage) -> Option<InboundReply> {
    let content = message.payload.as_ref()?;
    match message.message_type.as_str() {
        "button_reply" | "quick_reply" => match &content.id {
            Some(id) => Some(InboundReply::Button(id.clone())),
            None => content
                .title
                .clone()
                .or_else(|| content.text.clone())
                .map(InboundReply::Text),
        },
        "text" => content.text.clone().map(InboundReply::Text),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn inbound(value: serde_json::Value) -> InboundMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reads_button_and_text_replies() {
        let button = inbound(json!({
            "type": "button_reply",
            "source": "972501234567",
            "payload": { "id": "rsvp_yes", "title": "Yes" }
        }));
        assert_eq!(
            to_reply(&button),
            Some(InboundReply::Button("rsvp_yes".into()))
        );

        let text = inbound(json!({
            "type": "text",
            "sender": { "phone": "972501234567", "name": "Dana" },
            "payload": { "text": "3" }
        }));
        assert_eq!(to_reply(&text), Some(InboundReply::Text("3".into())));
        assert_eq!(text.sender_phone(), Some("972501234567"));

        let location = inbound(json!({
            "type": "location",
            "source": "972501234567",
            "payload": {}
        }));
        assert_eq!(to_reply(&location), None);
    }
}
