use chrono::NaiveDate;
use rsvp_scheduler_domain::{MessageKind, ScheduledMessage, ScheduledMessageStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMessageDTO {
    pub id: ID,
    pub event_id: ID,
    pub ordinal: u32,
    pub kind: MessageKind,
    pub days_before: u32,
    pub due_date: NaiveDate,
    pub status: ScheduledMessageStatus,
    pub sent_at: Option<i64>,
    pub sent_count: u32,
    pub failed_count: u32,
    pub error_message: Option<String>,
}

impl ScheduledMessageDTO {
    pub fn new(message: ScheduledMessage) -> Self {
        Self {
            kind: message.kind(),
            id: message.id,
            event_id: message.event_id,
            ordinal: message.ordinal,
            days_before: message.days_before,
            due_date: message.due_date,
            status: message.status,
            sent_at: message.sent_at,
            sent_count: message.sent_count,
            failed_count: message.failed_count,
            error_message: message.error_message,
        }
    }
}
