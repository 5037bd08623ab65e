use crate::{APIResponse, BaseClient, MessageSchedulePolicy, PackageKind, ID};
use rsvp_scheduler_api_structs::*;
use rsvp_scheduler_domain::EventStatus;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct EventClient {
    base: Arc<BaseClient>,
}

#[derive(Default)]
pub struct CreateEventInput {
    pub title: String,
    pub owner_id: Option<ID>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub additional_info: Option<String>,
    pub image_url: Option<String>,
    pub package: Option<PackageKind>,
    pub message_schedule: Option<MessageSchedulePolicy>,
}

#[derive(Default)]
pub struct UpdateEventInput {
    pub event_id: ID,
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

impl EventClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateEventInput) -> APIResponse<create_event::APIResponse> {
        let body = create_event::RequestBody {
            title: input.title,
            owner_id: input.owner_id,
            date: input.date,
            time: input.time,
            location: input.location,
            additional_info: input.additional_info,
            image_url: input.image_url,
            package: input.package,
            message_schedule: input.message_schedule,
        };

        self.base
            .post(body, "events".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, event_id: ID) -> APIResponse<get_event::APIResponse> {
        self.base
            .get(format!("events/{}", event_id), StatusCode::OK)
            .await
    }

    pub async fn update(&self, input: UpdateEventInput) -> APIResponse<update_event::APIResponse> {
        let body = update_event::RequestBody {
            title: input.title,
            date: input.date,
            time: input.time,
            location: input.location,
            additional_info: input.additional_info,
            image_url: input.image_url,
            package: input.package,
            message_schedule: input.message_schedule,
            status: input.status,
        };

        self.base
            .put(body, format!("events/{}", input.event_id), StatusCode::OK)
            .await
    }

    pub async fn delete(&self, event_id: ID) -> APIResponse<delete_event::APIResponse> {
        self.base
            .delete(format!("events/{}", event_id), StatusCode::OK)
            .await
    }
}
