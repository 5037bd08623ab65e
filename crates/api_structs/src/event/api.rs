use crate::dtos::EventDTO;
use rsvp_scheduler_domain::{Event, EventStatus, MessageSchedulePolicy, PackageKind, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event: EventDTO,
}

impl EventResponse {
    pub fn new(event: Event) -> Self {
        Self {
            event: EventDTO::new(event),
        }
    }
}

pub mod create_event {
    use super::*;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub owner_id: Option<ID>,
        /// `YYYY-MM-DD` or an ISO datetime
        pub date: Option<String>,
        /// `HH:MM`
        pub time: Option<String>,
        pub location: Option<String>,
        pub additional_info: Option<String>,
        pub image_url: Option<String>,
        pub package: Option<PackageKind>,
        pub message_schedule: Option<MessageSchedulePolicy>,
    }

    pub type APIResponse = EventResponse;
}

pub mod get_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod update_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub date: Option<String>,
        pub time: Option<String>,
        pub location: Option<String>,
        pub additional_info: Option<String>,
        pub image_url: Option<String>,
        pub package: Option<PackageKind>,
        pub message_schedule: Option<MessageSchedulePolicy>,
        pub status: Option<EventStatus>,
    }

    pub type APIResponse = EventResponse;
}

pub mod delete_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}
