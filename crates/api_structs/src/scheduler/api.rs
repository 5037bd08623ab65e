use crate::dtos::ScheduledMessageDTO;
use chrono::NaiveDate;
use rsvp_scheduler_domain::{MessageSchedulePolicy, ScheduledMessage, ID};
use serde::{Deserialize, Serialize};

fn to_dtos(messages: Vec<ScheduledMessage>) -> Vec<ScheduledMessageDTO> {
    messages.into_iter().map(ScheduledMessageDTO::new).collect()
}

/// Input of the schedule planning entry points
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequestBody {
    /// `YYYY-MM-DD` or an ISO datetime
    pub event_date: String,
    /// Keeps the current policy of the event when left out
    pub message_schedule: Option<MessageSchedulePolicy>,
}

pub mod process_due_messages {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub today: NaiveDate,
        /// Messages that were executed by this run
        pub processed: u32,
        /// Messages another run already owned or that failed to be stored
        pub skipped: u32,
        pub total_sent: u32,
        pub total_failed: u32,
        pub scheduled_messages: Vec<ScheduledMessageDTO>,
    }

    impl APIResponse {
        pub fn new(
            today: NaiveDate,
            skipped: u32,
            messages: Vec<ScheduledMessage>,
        ) -> Self {
            Self {
                today,
                processed: messages.len() as u32,
                skipped,
                total_sent: messages.iter().map(|m| m.sent_count).sum(),
                total_failed: messages.iter().map(|m| m.failed_count).sum(),
                scheduled_messages: to_dtos(messages),
            }
        }
    }
}

pub mod create_schedules {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type RequestBody = ScheduleRequestBody;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event_id: ID,
        pub created: u32,
        pub scheduled_messages: Vec<ScheduledMessageDTO>,
    }

    impl APIResponse {
        pub fn new(event_id: ID, created: Vec<ScheduledMessage>) -> Self {
            Self {
                event_id,
                created: created.len() as u32,
                scheduled_messages: to_dtos(created),
            }
        }
    }
}

pub mod update_schedules {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type RequestBody = ScheduleRequestBody;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event_id: ID,
        pub deleted: u32,
        pub created: u32,
        pub scheduled_messages: Vec<ScheduledMessageDTO>,
    }

    impl APIResponse {
        pub fn new(event_id: ID, deleted: u32, created: Vec<ScheduledMessage>) -> Self {
            Self {
                event_id,
                deleted,
                created: created.len() as u32,
                scheduled_messages: to_dtos(created),
            }
        }
    }
}

pub mod get_event_schedules {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event_id: ID,
        pub scheduled_messages: Vec<ScheduledMessageDTO>,
    }

    impl APIResponse {
        pub fn new(event_id: ID, messages: Vec<ScheduledMessage>) -> Self {
            Self {
                event_id,
                scheduled_messages: to_dtos(messages),
            }
        }
    }
}

pub mod get_due_messages {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub today: NaiveDate,
        pub count: u32,
        pub scheduled_messages: Vec<ScheduledMessageDTO>,
    }

    impl APIResponse {
        pub fn new(today: NaiveDate, messages: Vec<ScheduledMessage>) -> Self {
            Self {
                today,
                count: messages.len() as u32,
                scheduled_messages: to_dtos(messages),
            }
        }
    }
}
